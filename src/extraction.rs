//! One extraction: propose a key, let the user confirm it, store the text in
//! the catalog and hand back the replacement for the selection.

use std::path::Path;

use crate::catalog::{write_key, WriteOutcome};
use crate::config::Settings;
use crate::error::{AssistError, Result};
use crate::fs::FileSystem;
use crate::key_path::DottedKey;
use crate::keygen::{confirm_key, propose_key};
use crate::logging;
use crate::replacement::{build_replacement, Replacement};
use crate::scanner::Dialect;

/// What the user selected and where
#[derive(Debug, Clone, Copy)]
pub struct ExtractRequest<'a> {
    pub file_path: &'a Path,
    pub dialect: Dialect,
    /// Selected text, possibly with surrounding whitespace
    pub selection: &'a str,
    /// Full text of the line the selection starts on
    pub line_text: &'a str,
    /// Full text of the file, used to guess the element role
    pub file_content: &'a str,
}

/// Confirmation step for proposed keys.
pub trait KeyPrompt {
    /// Returns the user's answer (blank accepts the proposal), or `None` to cancel.
    fn confirm(&mut self, proposed: &DottedKey) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Extracted {
        key: DottedKey,
        replacement: Replacement,
        write: WriteOutcome,
    },
    /// The prompt was dismissed; nothing was written
    Cancelled,
}

impl ExtractionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Extracted { .. })
    }

    pub fn key(&self) -> Option<&DottedKey> {
        match self {
            Self::Extracted { key, .. } => Some(key),
            Self::Cancelled => None,
        }
    }

    pub fn replacement(&self) -> Option<&Replacement> {
        match self {
            Self::Extracted { replacement, .. } => Some(replacement),
            Self::Cancelled => None,
        }
    }
}

/// Extract `request.selection` into the workspace catalog.
///
/// Settings are validated before anything else, and the catalog is only
/// touched after the prompt returns a key.
pub fn extract_selection<F: FileSystem, P: KeyPrompt + ?Sized>(
    fs: &F,
    settings: &Settings,
    workspace_root: &Path,
    request: &ExtractRequest<'_>,
    prompt: &mut P,
) -> Result<ExtractionResult> {
    settings.validate()?;

    let text = request.selection.trim();
    if text.is_empty() {
        return Err(AssistError::EmptySelection);
    }

    let proposed = propose_key(request.file_path, text, request.file_content);
    logging::debug(&format!("Proposed key '{}'", proposed));

    let Some(answer) = prompt.confirm(&proposed) else {
        logging::debug("Extraction cancelled");
        return Ok(ExtractionResult::Cancelled);
    };
    let key = confirm_key(&proposed, &answer)?;

    let catalog_path = settings.catalog_path(workspace_root);
    let write = write_key(fs, &catalog_path, &key, text)?;
    if let Some(previous) = &write.replaced {
        logging::warn(&format!("'{}' already existed with value \"{}\"", key, previous));
    }

    let replacement = build_replacement(request.dialect, &key, request.selection, request.line_text);

    Ok(ExtractionResult::Extracted {
        key,
        replacement,
        write,
    })
}
