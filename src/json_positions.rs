//! JSON reader that remembers where every object key starts.
//!
//! `serde_json` validates the document; this module then walks the text a
//! second time to attach byte offsets to keys, so a dotted path can be
//! resolved by descending the real tree instead of searching for the first
//! textual occurrence of each segment.

use serde::de::IgnoredAny;

use crate::key_path::{DottedKey, MAX_DEPTH};

#[derive(Debug, Clone, PartialEq)]
pub enum PositionedValue {
    Object(Vec<PositionedEntry>),
    Array(Vec<PositionedValue>),
    String,
    /// number, boolean or null
    Scalar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEntry {
    pub key: String,
    /// Byte offset of the opening quote of the key
    pub key_offset: usize,
    pub value: PositionedValue,
}

impl PositionedValue {
    /// Parse a complete JSON document. Returns `None` for invalid JSON or
    /// nesting deeper than the supported limit.
    pub fn parse(content: &str) -> Option<Self> {
        let bom = if content.starts_with('\u{feff}') {
            '\u{feff}'.len_utf8()
        } else {
            0
        };
        serde_json::from_str::<IgnoredAny>(&content[bom..]).ok()?;

        let mut reader = Reader {
            text: content,
            pos: bom,
        };
        let value = reader.value(0)?;
        reader.skip_whitespace();
        (reader.pos == content.len()).then_some(value)
    }

    /// Entry for `name` in an object; the last duplicate wins, like `JSON.parse`.
    pub fn entry(&self, name: &str) -> Option<&PositionedEntry> {
        match self {
            PositionedValue::Object(entries) => entries.iter().rev().find(|e| e.key == name),
            _ => None,
        }
    }

    /// Byte offset of the final segment's key when `key` names a string leaf.
    pub fn leaf_offset(&self, key: &DottedKey) -> Option<usize> {
        let (last, parents) = key.segments().split_last()?;
        let mut current = self;
        for segment in parents {
            current = &current.entry(segment)?.value;
        }
        let entry = current.entry(last)?;
        matches!(entry.value, PositionedValue::String).then_some(entry.key_offset)
    }
}

struct Reader<'a> {
    text: &'a str,
    pos: usize,
}

impl Reader<'_> {
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> Option<()> {
        self.skip_whitespace();
        (self.peek()? == byte).then(|| self.pos += 1)
    }

    fn value(&mut self, depth: usize) -> Option<PositionedValue> {
        if depth > MAX_DEPTH {
            return None;
        }
        self.skip_whitespace();
        match self.peek()? {
            b'{' => self.object(depth),
            b'[' => self.array(depth),
            b'"' => self.string().map(|_| PositionedValue::String),
            _ => self.scalar(),
        }
    }

    fn object(&mut self, depth: usize) -> Option<PositionedValue> {
        self.expect(b'{')?;
        let mut entries = Vec::new();
        self.skip_whitespace();
        if self.peek()? == b'}' {
            self.pos += 1;
            return Some(PositionedValue::Object(entries));
        }
        loop {
            self.skip_whitespace();
            let key_offset = self.pos;
            let key = self.string()?;
            self.expect(b':')?;
            let value = self.value(depth + 1)?;
            entries.push(PositionedEntry {
                key,
                key_offset,
                value,
            });
            self.skip_whitespace();
            match self.peek()? {
                b',' => self.pos += 1,
                b'}' => {
                    self.pos += 1;
                    return Some(PositionedValue::Object(entries));
                }
                _ => return None,
            }
        }
    }

    fn array(&mut self, depth: usize) -> Option<PositionedValue> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek()? == b']' {
            self.pos += 1;
            return Some(PositionedValue::Array(items));
        }
        loop {
            items.push(self.value(depth + 1)?);
            self.skip_whitespace();
            match self.peek()? {
                b',' => self.pos += 1,
                b']' => {
                    self.pos += 1;
                    return Some(PositionedValue::Array(items));
                }
                _ => return None,
            }
        }
    }

    /// Reads a quoted string and returns its decoded value.
    fn string(&mut self) -> Option<String> {
        if self.peek()? != b'"' {
            return None;
        }
        let start = self.pos;
        let bytes = self.text.as_bytes();
        let mut i = start + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'"' => {
                    self.pos = i + 1;
                    return serde_json::from_str(&self.text[start..self.pos]).ok();
                }
                _ => i += 1,
            }
        }
        None
    }

    fn scalar(&mut self) -> Option<PositionedValue> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'+' | b'.') {
                self.pos += 1;
            } else {
                break;
            }
        }
        (self.pos > start).then_some(PositionedValue::Scalar)
    }
}
