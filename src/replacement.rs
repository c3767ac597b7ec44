use regex::Regex;
use std::sync::OnceLock;

use crate::key_path::DottedKey;
use crate::scanner::{Dialect, TRANSLATABLE_ATTRIBUTES};

/// Source text that replaces an extracted selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub text: String,
    /// Follow-up the user must do by hand, such as binding an attribute
    pub advisory: Option<String>,
}

impl Replacement {
    fn plain(text: String) -> Self {
        Self {
            text,
            advisory: None,
        }
    }
}

/// Text before a selection that sits inside `name="` or `name='`
static ATTRIBUTE_PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();

fn attribute_prefix_regex() -> &'static Regex {
    ATTRIBUTE_PREFIX_REGEX.get_or_init(|| {
        Regex::new(r#"\s([\w-]+)=["']$"#)
            .expect("ATTRIBUTE_PREFIX_REGEX pattern is invalid - this is a bug")
    })
}

/// Key as it appears inside a single-quoted literal
fn quoted_key(key: &DottedKey) -> String {
    key.to_string().replace('\'', "\\'")
}

/// `{{ 'key' | translate }}`
pub fn interpolation(key: &DottedKey) -> String {
    format!("{{{{ '{}' | translate }}}}", quoted_key(key))
}

/// `this.translate.instant('key')`
pub fn instant_call(key: &DottedKey) -> String {
    format!("this.translate.instant('{}')", quoted_key(key))
}

/// Build the text that replaces `selection` on `line_text`.
pub fn build_replacement(
    dialect: Dialect,
    key: &DottedKey,
    selection: &str,
    line_text: &str,
) -> Replacement {
    match dialect {
        Dialect::Script => Replacement::plain(instant_call(key)),
        Dialect::Markup => markup_replacement(key, selection, line_text),
    }
}

fn markup_replacement(key: &DottedKey, selection: &str, line_text: &str) -> Replacement {
    if selection.contains('\n') || selection.contains('"') {
        return Replacement::plain(interpolation(key));
    }

    let Some(selection_start) = line_text.find(selection).filter(|_| !selection.is_empty()) else {
        return Replacement::plain(interpolation(key));
    };

    let before = &line_text[..selection_start];
    let Some(caps) = attribute_prefix_regex().captures(before) else {
        return Replacement::plain(interpolation(key));
    };

    let attribute = &caps[1];
    let advisory = TRANSLATABLE_ATTRIBUTES
        .iter()
        .any(|allowed| attribute.eq_ignore_ascii_case(allowed))
        .then(|| {
            format!(
                "Replace {attr}=\"...\" with [{attr}]=\"'{key}' | translate\" on this element",
                attr = attribute,
                key = quoted_key(key)
            )
        });

    Replacement {
        text: key.to_string(),
        advisory,
    }
}
