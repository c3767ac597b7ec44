//! Coordinate conversions for one document.
//!
//! Scanners work on UTF-8 byte offsets; editors speak UTF-16 code units and
//! 0-based line/column pairs. `TextIndex` converts between the three.

use serde::Serialize;

/// A 0-based line/column location; the column counts UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Position {
    /// Rendered 1-based, the way compilers and editors print locations
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Line start table for a document.
pub struct TextIndex<'a> {
    content: &'a str,
    /// Byte offsets where each line starts. Line 0 starts at offset 0.
    line_starts: Vec<usize>,
}

impl<'a> TextIndex<'a> {
    pub fn new(content: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            content,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 0-based line containing a byte offset (binary search).
    pub fn line_of(&self, byte_offset: usize) -> usize {
        match self.line_starts.binary_search(&byte_offset) {
            Ok(line) => line,
            Err(line) => line - 1,
        }
    }

    /// Text of a 0-based line without its terminator.
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.content.len());
        let text = &self.content[start..end];
        Some(text.strip_suffix('\r').unwrap_or(text))
    }

    /// Text of the line containing a byte offset.
    pub fn line_at(&self, byte_offset: usize) -> &'a str {
        self.line_text(self.line_of(byte_offset)).unwrap_or("")
    }

    /// UTF-16 offset from the start of the document.
    pub fn utf16_offset(&self, byte_offset: usize) -> usize {
        utf16_len(&self.content[..self.clamp(byte_offset)])
    }

    /// Line/column of a byte offset.
    pub fn position(&self, byte_offset: usize) -> Position {
        let byte_offset = self.clamp(byte_offset);
        let line = self.line_of(byte_offset);
        let start = self.line_starts[line];
        Position {
            line,
            column: utf16_len(&self.content[start..byte_offset]),
        }
    }

    /// Line/column of a UTF-16 document offset.
    pub fn position_of_utf16(&self, utf16_offset: usize) -> Position {
        self.position(self.byte_offset_of_utf16(utf16_offset))
    }

    /// Byte offset of a UTF-16 document offset; offsets past the end clamp to it.
    pub fn byte_offset_of_utf16(&self, utf16_offset: usize) -> usize {
        byte_offset_in(self.content, utf16_offset)
    }

    /// Byte offset of a line/column pair; `None` when the line does not exist.
    pub fn byte_offset_of(&self, position: Position) -> Option<usize> {
        let start = *self.line_starts.get(position.line)?;
        let line = self.line_text(position.line)?;
        Some(start + byte_offset_in(line, position.column))
    }

    fn clamp(&self, byte_offset: usize) -> usize {
        let mut offset = byte_offset.min(self.content.len());
        while !self.content.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

/// Forward-only byte → UTF-16 converter for ascending offsets.
pub struct Utf16Cursor<'a> {
    content: &'a str,
    byte: usize,
    units: usize,
}

impl<'a> Utf16Cursor<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            byte: 0,
            units: 0,
        }
    }

    /// UTF-16 offset of `byte_offset`. Offsets behind the cursor restart it.
    pub fn advance_to(&mut self, byte_offset: usize) -> usize {
        if byte_offset < self.byte {
            self.byte = 0;
            self.units = 0;
        }
        let target = byte_offset.min(self.content.len());
        self.units += utf16_len(&self.content[self.byte..target]);
        self.byte = target;
        self.units
    }
}

/// Number of UTF-16 code units needed to encode `text`.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Byte offset inside `text` reached after `utf16_offset` code units.
/// An offset that falls inside a surrogate pair rounds down to the char start.
pub fn byte_offset_in(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        if units + ch.len_utf16() > utf16_offset {
            return byte;
        }
        units += ch.len_utf16();
    }
    text.len()
}
