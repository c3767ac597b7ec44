use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::AssistError;

/// Name of the settings file looked up in the workspace root
pub const SETTINGS_FILE: &str = "ngx-translate.json";

/// How a dotted key is resolved to a position in the catalog text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocateStrategy {
    /// Descend the parsed tree, so `a.title` never lands on `b.title`
    #[default]
    Scoped,
    /// Textual search for the first segment anywhere in the document
    FirstMatch,
}

impl LocateStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scoped" => Some(Self::Scoped),
            "firstMatch" | "first-match" => Some(Self::FirstMatch),
            _ => None,
        }
    }
}

/// Settings for ngx-translate-assist
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Directory holding locale files, relative to the workspace root
    #[serde(default = "default_translation_path")]
    pub translation_path: String,

    /// Locale whose catalog receives extracted strings (e.g., "en")
    #[serde(default = "default_lang")]
    pub default_lang: String,

    /// Key location strategy for go-to-definition
    #[serde(default)]
    pub locate_strategy: LocateStrategy,
}

fn default_translation_path() -> String {
    "assets/i18n".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            translation_path: default_translation_path(),
            default_lang: default_lang(),
            locate_strategy: LocateStrategy::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON (or JSON5) file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        Self::from_json_string(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Load settings from a JSON string; comments and trailing commas are accepted
    pub fn from_json_string(json_str: &str) -> Result<Self> {
        let settings: Settings =
            json5::from_str(json_str).with_context(|| "Failed to parse settings JSON string")?;
        Ok(settings)
    }

    /// Load an explicit settings file, or `ngx-translate.json` from the
    /// workspace root when present, or fall back to defaults.
    pub fn load_or_default(explicit: Option<&Path>, workspace_root: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = workspace_root.join(SETTINGS_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply command-line overrides on top of loaded settings
    pub fn with_overrides(
        mut self,
        translation_path: Option<String>,
        default_lang: Option<String>,
    ) -> Self {
        if let Some(path) = translation_path {
            self.translation_path = path;
        }
        if let Some(lang) = default_lang {
            self.default_lang = lang;
        }
        self
    }

    /// Both location settings must be non-blank before the catalog is touched
    pub fn validate(&self) -> Result<(), AssistError> {
        if self.translation_path.trim().is_empty() {
            return Err(AssistError::Config {
                setting: "translationPath",
            });
        }
        if self.default_lang.trim().is_empty() {
            return Err(AssistError::Config {
                setting: "defaultLang",
            });
        }
        Ok(())
    }

    /// `<workspace_root>/<translation_path>/<default_lang>.json`
    pub fn catalog_path(&self, workspace_root: &Path) -> PathBuf {
        workspace_root
            .join(self.translation_path.trim())
            .join(format!("{}.json", self.default_lang.trim()))
    }
}
