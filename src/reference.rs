//! Translation keys referenced from templates and sources.

use regex::Regex;
use std::sync::OnceLock;

use crate::text_index::byte_offset_in;

/// Reference forms, tried in order. The key is the first group that participates.
static REFERENCE_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn reference_patterns() -> &'static [Regex] {
    REFERENCE_PATTERNS.get_or_init(|| {
        [
            // {{ 'key' | translate }}
            r#"\{\{\s*(?:'([^']+)'|"([^"]+)")\s*\|\s*translate\b[^}]*\}\}"#,
            // translate.instant('key'), this.translateService.get("key", params)
            r#"\btranslate(?:Service)?\s*\.\s*(?:instant|get|stream)\(\s*(?:'([^']+)'|"([^"]+)")\s*[,)]"#,
            // [title]="'key' | translate"
            r#"\[[\w.-]+\]\s*=\s*(?:"\s*'([^']+)'\s*\|\s*translate\b|'\s*"([^"]+)"\s*\|\s*translate\b)"#,
            // [translate]="'key'"
            r#"\[translate\]\s*=\s*(?:"\s*'([^']+)'\s*"|'\s*"([^"]+)"\s*')"#,
            // translate="key"
            r#"\btranslate\s*=\s*(?:"([^"]+)"|'([^']+)')"#,
        ]
        .iter()
        .map(|pattern| {
            Regex::new(pattern).expect("REFERENCE_PATTERNS pattern is invalid - this is a bug")
        })
        .collect()
    })
}

/// Key under `column` (0-based, UTF-16 units) of `line_text`.
///
/// The caret may sit anywhere from the first character of the key up to
/// and including the position just after its last character.
pub fn key_at(line_text: &str, column: usize) -> Option<String> {
    let caret = byte_offset_in(line_text, column);

    for pattern in reference_patterns() {
        for caps in pattern.captures_iter(line_text) {
            let Some(key) = caps.iter().skip(1).flatten().next() else {
                continue;
            };
            if key.start() <= caret && caret <= key.end() {
                let key = key.as_str().trim();
                if !key.is_empty() {
                    return Some(key.to_string());
                }
            }
        }
    }
    None
}
