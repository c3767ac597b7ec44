pub mod extract;
pub mod goto;
pub mod init;
pub mod keys;
pub mod locate;
pub mod scan;

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::config::{LocateStrategy, Settings};

/// Workspace root plus the settings that apply to it
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub settings: Settings,
}

impl Workspace {
    pub fn new(root: PathBuf, settings: Settings) -> Self {
        Self { root, settings }
    }

    /// Resolve a user-supplied path against the workspace root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Path shown to the user: relative to the root when possible
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.settings.catalog_path(&self.root)
    }

    /// Settings with the `--strategy` flag applied
    pub fn settings_with_strategy(&self, strategy: Option<&str>) -> Result<Settings> {
        let mut settings = self.settings.clone();
        if let Some(value) = strategy {
            match LocateStrategy::parse(value) {
                Some(parsed) => settings.locate_strategy = parsed,
                None => bail!(
                    "Unknown locate strategy '{}'. Expected 'scoped' or 'first-match'.",
                    value
                ),
            }
        }
        Ok(settings)
    }
}
