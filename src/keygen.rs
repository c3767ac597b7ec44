//! Translation key proposals.
//!
//! A key is `component[.role].fragment`: the component comes from the file
//! path, the role from the markup around the text (or the text itself), and
//! the fragment from the first words of the text. Proposing is pure;
//! confirming the proposal is the caller's job.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

use crate::error::AssistError;
use crate::key_path::DottedKey;

/// Fragment used when the text has no word characters
pub const FALLBACK_FRAGMENT: &str = "text";

const MAX_FRAGMENT_CHARS: usize = 30;
const MAX_FRAGMENT_WORDS: usize = 3;

// =============================================================================
// Static regex patterns (compiled once via OnceLock for thread-safe lazy init)
// =============================================================================

/// `home.component.html` → `home`
static COMPONENT_FILE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Confirm / cancel / action words
static BUTTON_WORDS_REGEX: OnceLock<Regex> = OnceLock::new();

/// Imperative prompt words
static PROMPT_WORDS_REGEX: OnceLock<Regex> = OnceLock::new();

/// Severity words
static SEVERITY_WORDS_REGEX: OnceLock<Regex> = OnceLock::new();

/// Anything that is neither a word character nor whitespace
static NON_WORD_REGEX: OnceLock<Regex> = OnceLock::new();

fn component_file_regex() -> &'static Regex {
    COMPONENT_FILE_REGEX.get_or_init(|| {
        Regex::new(r"^(.+)\.component\.(?:ts|html)$")
            .expect("COMPONENT_FILE_REGEX pattern is invalid - this is a bug")
    })
}

fn button_words_regex() -> &'static Regex {
    BUTTON_WORDS_REGEX.get_or_init(|| {
        Regex::new(r"(?i)ok|cancel|submit|save|delete|yes|no")
            .expect("BUTTON_WORDS_REGEX pattern is invalid - this is a bug")
    })
}

fn prompt_words_regex() -> &'static Regex {
    PROMPT_WORDS_REGEX.get_or_init(|| {
        Regex::new(r"(?i)enter|type|fill")
            .expect("PROMPT_WORDS_REGEX pattern is invalid - this is a bug")
    })
}

fn severity_words_regex() -> &'static Regex {
    SEVERITY_WORDS_REGEX.get_or_init(|| {
        Regex::new(r"(?i)error|warning|info")
            .expect("SEVERITY_WORDS_REGEX pattern is invalid - this is a bug")
    })
}

fn non_word_regex() -> &'static Regex {
    NON_WORD_REGEX.get_or_init(|| {
        Regex::new(r"[^\w\s]").expect("NON_WORD_REGEX pattern is invalid - this is a bug")
    })
}

/// Component name for a source file.
///
/// `login.component.ts` gives `login`; a file inside `user-profile-page/`
/// gives `user`; anything else gives the file name without its extension.
pub fn component_name(file_path: &Path) -> String {
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(caps) = component_file_regex().captures(&file_name) {
        return caps[1].to_string();
    }

    if let Some(dir) = file_path
        .parent()
        .and_then(Path::file_name)
        .map(|dir| dir.to_string_lossy())
    {
        if dir.ends_with("-component") || dir.ends_with("-page") {
            if let Some(first) = dir.split('-').next().filter(|s| !s.is_empty()) {
                return first.to_string();
            }
        }
    }

    file_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or(file_name)
}

/// Role of the element holding `text`, if one can be guessed.
pub fn element_role(text: &str, file_content: &str) -> Option<&'static str> {
    let length = text.chars().count();

    let context_line = file_content
        .lines()
        .find(|line| !text.is_empty() && line.contains(text));
    if let Some(line) = context_line {
        if line.contains("<button") || line.contains("mat-button") {
            return Some("button");
        }
        if line.contains("<h1") || line.contains("<h2") {
            return Some("title");
        }
        if line.contains("<label") || line.contains("aria-label") {
            return Some("label");
        }
        if line.contains("placeholder=") {
            return Some("placeholder");
        }
        if line.contains("<p") || length > 50 {
            return Some("text");
        }
    }

    if length < 20 {
        if button_words_regex().is_match(text) {
            Some("button")
        } else if prompt_words_regex().is_match(text) {
            Some("placeholder")
        } else if severity_words_regex().is_match(text) {
            Some("message")
        } else {
            None
        }
    } else if length > 100 {
        Some("paragraph")
    } else {
        None
    }
}

/// Short snake_case fragment from the first words of `text`.
///
/// Never empty and never longer than 30 characters.
pub fn text_fragment(text: &str) -> String {
    let lowered: String = text.nfc().flat_map(char::to_lowercase).collect();
    let cleaned = non_word_regex().replace_all(&lowered, "");

    let fragment: String = cleaned
        .split_whitespace()
        .take(MAX_FRAGMENT_WORDS)
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .take(MAX_FRAGMENT_CHARS)
        .collect();

    if fragment.is_empty() {
        FALLBACK_FRAGMENT.to_string()
    } else {
        fragment
    }
}

/// Proposed key for `text` found in the file at `file_path`.
pub fn propose_key(file_path: &Path, text: &str, file_content: &str) -> DottedKey {
    let text = text.trim();
    let component = component_name(file_path);
    let role = element_role(text, file_content).unwrap_or_default();
    let fragment = text_fragment(text);

    DottedKey::from_segments_or([component.as_str(), role, fragment.as_str()], FALLBACK_FRAGMENT)
}

/// The key to use after the user has seen `proposed`. Blank input accepts it.
pub fn confirm_key(proposed: &DottedKey, input: &str) -> Result<DottedKey, AssistError> {
    if input.trim().is_empty() {
        Ok(proposed.clone())
    } else {
        DottedKey::parse(input)
    }
}
