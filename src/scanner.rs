//! Detection of hardcoded, user-facing text in templates and sources.
//!
//! Each dialect has a single forward scanner. Regions that are already
//! localized are collected into a [`SuppressionSet`] first; the scanner's
//! candidates are then checked against it with a binary search.

use regex::Regex;
use serde::Serialize;
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use crate::logging;
use crate::text_index::{TextIndex, Utf16Cursor};

/// Attributes whose literal values are shown to users
pub const TRANSLATABLE_ATTRIBUTES: [&str; 4] = ["placeholder", "title", "alt", "aria-label"];

/// Attributes that mark an element as translated by the directive
const TRANSLATE_DIRECTIVES: [&str; 4] = [
    "translate",
    "[translate]",
    "translateParams",
    "[translateParams]",
];

/// Elements whose content is not markup text
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Surface syntax of a scanned document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// HTML component templates
    Markup,
    /// TypeScript / JavaScript sources
    Script,
}

impl Dialect {
    /// Dialect implied by a file extension, if supported
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(Self::Markup),
            "ts" | "mts" | "cts" | "js" | "mjs" | "cjs" => Some(Self::Script),
            _ => None,
        }
    }

    /// Dialect for an editor language identifier (`html`, `typescript`, ...)
    pub fn from_language_id(id: &str) -> Option<Self> {
        match id {
            "html" => Some(Self::Markup),
            "typescript" | "javascript" => Some(Self::Script),
            _ => None,
        }
    }
}

/// A hardcoded text occurrence. Offsets are UTF-16 code units into the
/// scanned document and cover the trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatableSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

// =============================================================================
// Suppression intervals
// =============================================================================

/// Sorted, merged set of closed byte intervals that are already localized.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SuppressionSet {
    intervals: Vec<(usize, usize)>,
}

impl SuppressionSet {
    pub fn from_intervals<I: IntoIterator<Item = (usize, usize)>>(intervals: I) -> Self {
        let mut sorted: Vec<(usize, usize)> = intervals.into_iter().collect();
        sorted.sort_unstable();

        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(sorted.len());
        for (start, end) in sorted {
            match merged.last_mut() {
                Some(last) if start <= last.1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }
        Self { intervals: merged }
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// True when `[start, end]` touches any interval. Both ends are inclusive,
    /// so text starting right at the `>` of a translated tag is suppressed.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        let idx = self.intervals.partition_point(|&(_, e)| e < start);
        self.intervals
            .get(idx)
            .is_some_and(|&(s, _)| s <= end)
    }
}

// =============================================================================
// Static regex patterns (compiled once via OnceLock for thread-safe lazy init)
// =============================================================================

/// A quoted JS string literal on one line, escapes respected
const QUOTED: &str = r#"(?:'(?:[^'\\\n]|\\.)*'|"(?:[^"\\\n]|\\.)*")"#;

/// `{{ ... }}` interpolation blocks (may span lines)
static INTERPOLATION_REGEX: OnceLock<Regex> = OnceLock::new();

/// `| translate` filter inside an expression
static TRANSLATE_PIPE_REGEX: OnceLock<Regex> = OnceLock::new();

/// `translate.instant('key')`, `this.translateService.get("key", ...)`
static TRANSLATE_CALL_REGEX: OnceLock<Regex> = OnceLock::new();

/// `i18n.anything('key')`
static I18N_CALL_REGEX: OnceLock<Regex> = OnceLock::new();

/// Lines that declare or import rather than display
static DECLARATION_LINE_REGEX: OnceLock<Regex> = OnceLock::new();

fn interpolation_regex() -> &'static Regex {
    INTERPOLATION_REGEX.get_or_init(|| {
        Regex::new(r"(?s)\{\{.*?\}\}")
            .expect("INTERPOLATION_REGEX pattern is invalid - this is a bug")
    })
}

fn translate_pipe_regex() -> &'static Regex {
    TRANSLATE_PIPE_REGEX.get_or_init(|| {
        Regex::new(r"\|\s*translate\b")
            .expect("TRANSLATE_PIPE_REGEX pattern is invalid - this is a bug")
    })
}

fn translate_call_regex() -> &'static Regex {
    TRANSLATE_CALL_REGEX.get_or_init(|| {
        let pattern = format!(
            r"(?:\b[A-Za-z_$][\w$]*\s*\.\s*)*\btranslate(?:Service)?\s*\.\s*(?:instant|get|stream)\s*\(\s*{}\s*[,)]",
            QUOTED
        );
        Regex::new(&pattern).expect("TRANSLATE_CALL_REGEX pattern is invalid - this is a bug")
    })
}

fn i18n_call_regex() -> &'static Regex {
    I18N_CALL_REGEX.get_or_init(|| {
        let pattern = format!(r"\bi18n\s*\.\s*\w+\s*\(\s*{}\s*[,)]", QUOTED);
        Regex::new(&pattern).expect("I18N_CALL_REGEX pattern is invalid - this is a bug")
    })
}

fn declaration_line_regex() -> &'static Regex {
    DECLARATION_LINE_REGEX.get_or_init(|| {
        Regex::new(
            r"\bimport\s|\bfrom\s|\brequire\(|\bpath\.|\b(?:private|const)\s+[\w$]+\s*(?::[^=]+)?=",
        )
        .expect("DECLARATION_LINE_REGEX pattern is invalid - this is a bug")
    })
}

// =============================================================================
// Public entry points
// =============================================================================

/// Whether trimmed text is worth translating: at least two characters and
/// not only whitespace, digits and `.,:;!?%`.
pub fn is_translatable(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.chars().count() > 1
        && !trimmed
            .chars()
            .all(|c| c.is_whitespace() || c.is_ascii_digit() || ".,:;!?%".contains(c))
}

/// Find hardcoded text in `content`. Never fails; malformed input yields
/// fewer spans.
pub fn find_candidate_spans(content: &str, dialect: Dialect) -> Vec<TranslatableSpan> {
    let (mut ranges, suppressed) = match dialect {
        Dialect::Markup => scan_markup(content),
        Dialect::Script => scan_script(content),
    };
    ranges.sort_by_key(|range| range.start);

    logging::debug(&format!(
        "{:?} scan: {} candidate(s), {} suppressed region(s)",
        dialect,
        ranges.len(),
        suppressed.len()
    ));

    let mut cursor = Utf16Cursor::new(content);
    ranges
        .into_iter()
        .map(|range| TranslatableSpan {
            text: content[range.clone()].to_string(),
            start: cursor.advance_to(range.start),
            end: cursor.advance_to(range.end),
        })
        .collect()
}

/// Already-localized regions of `content`, as byte intervals.
pub fn suppressed_regions(content: &str, dialect: Dialect) -> SuppressionSet {
    match dialect {
        Dialect::Markup => markup_suppressions(content, &tokenize_markup(content)),
        Dialect::Script => script_suppressions(content),
    }
}

/// Narrow a byte range to its trimmed content
fn trim_range(content: &str, range: Range<usize>) -> Range<usize> {
    let raw = &content[range.clone()];
    let start = range.start + (raw.len() - raw.trim_start().len());
    let end = range.end - (raw.len() - raw.trim_end().len());
    start..end.max(start)
}

// =============================================================================
// Markup
// =============================================================================

#[derive(Debug)]
struct Attribute<'a> {
    name: &'a str,
    value: Option<Range<usize>>,
}

#[derive(Debug)]
struct Tag<'a> {
    range: Range<usize>,
    name: &'a str,
    closing: bool,
    attributes: Vec<Attribute<'a>>,
}

#[derive(Debug)]
enum Token<'a> {
    Tag(Tag<'a>),
    /// Text between a tag's `>` and the next tag's `<`
    Text(Range<usize>),
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

/// A `<` opens a tag only when followed by a name, `/`, `!` or `?`
fn opens_tag(bytes: &[u8], pos: usize) -> bool {
    bytes[pos] == b'<'
        && bytes
            .get(pos + 1)
            .is_some_and(|b| b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'))
}

fn tokenize_markup(content: &str) -> Vec<Token<'_>> {
    let bytes = content.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut text_start: Option<usize> = None;

    while pos < bytes.len() {
        if !opens_tag(bytes, pos) {
            pos += 1;
            continue;
        }

        if let Some(start) = text_start.take() {
            if start < pos {
                tokens.push(Token::Text(start..pos));
            }
        }

        if content[pos..].starts_with("<!--") {
            match content[pos + 4..].find("-->") {
                Some(rel) => {
                    pos += 4 + rel + 3;
                    text_start = Some(pos);
                    continue;
                }
                None => break,
            }
        }

        let Some(tag) = parse_tag(content, pos) else {
            break;
        };
        pos = tag.range.end;
        text_start = Some(pos);

        let raw_text = !tag.closing
            && !content[..pos].ends_with("/>")
            && RAW_TEXT_ELEMENTS
                .iter()
                .any(|name| tag.name.eq_ignore_ascii_case(name));
        let raw_name = raw_text.then(|| tag.name.clone());
        tokens.push(Token::Tag(tag));

        if let Some(name) = raw_name {
            match find_closing_tag(content, pos, &name) {
                Some(close) => {
                    pos = close;
                    text_start = None;
                }
                None => break,
            }
        }
    }

    tokens
}

/// Byte offset of the first `</name` at or after `from`, ignoring ASCII case.
fn find_closing_tag(content: &str, from: usize, name: &str) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut at = from;
    while let Some(rel) = content[at..].find("</") {
        let start = at + rel;
        let name_start = start + 2;
        if bytes
            .get(name_start..name_start + name.len())
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name.as_bytes()))
        {
            return Some(start);
        }
        at = name_start;
    }
    None
}

/// Parse the tag starting at `start` (which holds `<`). Quoted attribute
/// values may contain `>`. Returns `None` for an unterminated tag.
fn parse_tag(content: &str, start: usize) -> Option<Tag<'_>> {
    let bytes = content.as_bytes();
    let len = bytes.len();
    let mut i = start + 1;

    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }
    let name_start = i;
    while i < len && !is_space(bytes[i]) && !matches!(bytes[i], b'>' | b'/') {
        i += 1;
    }
    let name = &content[name_start..i];

    let mut attributes = Vec::new();
    loop {
        while i < len && is_space(bytes[i]) {
            i += 1;
        }
        match *bytes.get(i)? {
            b'>' => {
                return Some(Tag {
                    range: start..i + 1,
                    name,
                    closing,
                    attributes,
                });
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let attr_start = i;
        while i < len
            && !is_space(bytes[i])
            && !matches!(bytes[i], b'=' | b'>')
            && !(bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'>'))
        {
            i += 1;
        }
        let attr_name = &content[attr_start..i];

        while i < len && is_space(bytes[i]) {
            i += 1;
        }
        let mut value = None;
        if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < len && is_space(bytes[i]) {
                i += 1;
            }
            match *bytes.get(i)? {
                quote @ (b'"' | b'\'') => {
                    let value_start = i + 1;
                    let rel = content[value_start..].find(quote as char)?;
                    value = Some(value_start..value_start + rel);
                    i = value_start + rel + 1;
                }
                _ => {
                    let value_start = i;
                    while i < len && !is_space(bytes[i]) && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = Some(value_start..i);
                }
            }
        }

        attributes.push(Attribute {
            name: attr_name,
            value,
        });
    }
}

fn is_property_binding(name: &str) -> bool {
    (name.starts_with('[') && name.ends_with(']')) || name.starts_with("bind-")
}

/// Whether the tag is already handled by ngx-translate
fn tag_is_translated(content: &str, tag: &Tag<'_>) -> bool {
    tag.attributes.iter().any(|attr| {
        TRANSLATE_DIRECTIVES
            .iter()
            .any(|directive| attr.name.eq_ignore_ascii_case(directive))
            || (is_property_binding(attr.name)
                && attr
                    .value
                    .as_ref()
                    .is_some_and(|v| translate_pipe_regex().is_match(&content[v.clone()])))
    })
}

fn markup_suppressions(content: &str, tokens: &[Token<'_>]) -> SuppressionSet {
    let interpolations = interpolation_regex()
        .find_iter(content)
        .filter(|m| translate_pipe_regex().is_match(m.as_str()))
        .map(|m| (m.start(), m.end()));

    let tags = tokens.iter().filter_map(|token| match token {
        Token::Tag(tag) if !tag.closing && tag_is_translated(content, tag) => {
            Some((tag.range.start, tag.range.end))
        }
        _ => None,
    });

    SuppressionSet::from_intervals(interpolations.chain(tags))
}

fn scan_markup(content: &str) -> (Vec<Range<usize>>, SuppressionSet) {
    let tokens = tokenize_markup(content);
    let suppressed = markup_suppressions(content, &tokens);
    let mut candidates = Vec::new();

    for token in &tokens {
        match token {
            Token::Text(range) => {
                // Overlap is tested on the raw node so whitespace after a
                // translated tag's `>` does not hide the contact.
                if is_translatable(&content[range.clone()])
                    && !suppressed.overlaps(range.start, range.end)
                {
                    candidates.push(trim_range(content, range.clone()));
                }
            }
            Token::Tag(tag) if !tag.closing => {
                for attr in &tag.attributes {
                    let Some(value) = &attr.value else {
                        continue;
                    };
                    if !TRANSLATABLE_ATTRIBUTES
                        .iter()
                        .any(|allowed| attr.name.eq_ignore_ascii_case(allowed))
                    {
                        continue;
                    }
                    if !is_translatable(&content[value.clone()]) {
                        continue;
                    }
                    let trimmed = trim_range(content, value.clone());
                    if !suppressed.overlaps(trimmed.start, trimmed.end) {
                        candidates.push(trimmed);
                    }
                }
            }
            Token::Tag(_) => {}
        }
    }

    (candidates, suppressed)
}

// =============================================================================
// Script
// =============================================================================

fn script_suppressions(content: &str) -> SuppressionSet {
    let calls = translate_call_regex()
        .find_iter(content)
        .chain(i18n_call_regex().find_iter(content))
        .map(|m| (m.start(), m.end()));
    SuppressionSet::from_intervals(calls)
}

/// Byte ranges of the contents of single- and double-quoted literals.
///
/// Comments and template literals are skipped. A quote with no closing
/// partner on the same line is not a literal; scanning resumes after it.
fn string_literals(content: &str) -> Vec<Range<usize>> {
    let bytes = content.as_bytes();
    let len = bytes.len();
    let mut literals = Vec::new();
    let mut i = 0;

    while i < len {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = content[i..].find('\n').map_or(len, |rel| i + rel);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = content[i + 2..].find("*/").map_or(len, |rel| i + 2 + rel + 2);
            }
            b'`' => {
                let mut j = i + 1;
                while j < len && bytes[j] != b'`' {
                    j += if bytes[j] == b'\\' { 2 } else { 1 };
                }
                i = j + 1;
            }
            quote @ (b'\'' | b'"') => {
                let mut j = i + 1;
                let mut closed = None;
                while j < len {
                    match bytes[j] {
                        b'\\' => j += 2,
                        b'\n' => break,
                        b if b == quote => {
                            closed = Some(j);
                            break;
                        }
                        _ => j += 1,
                    }
                }
                match closed {
                    Some(end) => {
                        literals.push(i + 1..end);
                        i = end + 1;
                    }
                    None => i += 1,
                }
            }
            _ => i += 1,
        }
    }

    literals
}

fn scan_script(content: &str) -> (Vec<Range<usize>>, SuppressionSet) {
    let suppressed = script_suppressions(content);
    let index = TextIndex::new(content);
    let mut candidates = Vec::new();

    for literal in string_literals(content) {
        let raw = &content[literal.clone()];
        if !is_translatable(raw) || raw.contains(['.', '/', '\\']) {
            continue;
        }
        if declaration_line_regex().is_match(index.line_at(literal.start)) {
            continue;
        }
        if suppressed.overlaps(literal.start, literal.end) {
            continue;
        }
        candidates.push(trim_range(content, literal));
    }

    (candidates, suppressed)
}
