use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by catalog, settings and extraction operations.
///
/// Lookup misses (unknown key, absent catalog during navigation) are not
/// errors; those operations return `Option`.
#[derive(Debug, Error)]
pub enum AssistError {
    /// A required setting is missing or empty
    #[error("Translation setting '{setting}' is not configured.\n\nTip: Set translationPath and defaultLang in ngx-translate.json or pass --translation-path / --lang")]
    Config { setting: &'static str },

    /// The catalog file exists but is not valid JSON
    #[error("Cannot parse translation file {}: {source}", path.display())]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The catalog file is valid JSON but its top level is not an object
    #[error("Translation file {} must contain a JSON object at the top level", path.display())]
    NotAnObject { path: PathBuf },

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A user-supplied key has no non-empty segment
    #[error("'{input}' is not a valid translation key")]
    InvalidKey { input: String },

    /// Nothing but whitespace was selected for extraction
    #[error("The selection is empty.\n\nTip: Select the text to extract, e.g. --text \"Hello World\"")]
    EmptySelection,
}

impl AssistError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = AssistError> = std::result::Result<T, E>;
