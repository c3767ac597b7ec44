use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::catalog::locate_in_workspace;
use crate::commands::Workspace;
use crate::fs::{FileSystem, RealFileSystem};
use crate::key_path::DottedKey;
use crate::reference::key_at;
use crate::text_index::TextIndex;

/// Jump from the key under `line:column` (both 1-based) in `file` to its
/// definition in the catalog.
pub fn run(
    workspace: &Workspace,
    file: &Path,
    line: usize,
    column: usize,
    strategy: Option<&str>,
) -> Result<()> {
    let settings = workspace.settings_with_strategy(strategy)?;
    let path = workspace.resolve(file);
    let fs = RealFileSystem;
    let content = fs
        .read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let index = TextIndex::new(&content);
    let Some(line_text) = line.checked_sub(1).and_then(|l| index.line_text(l)) else {
        bail!(
            "Line {} is outside {} ({} lines)",
            line,
            workspace.display_path(&path),
            index.line_count()
        );
    };

    let Some(raw_key) = key_at(line_text, column.saturating_sub(1)) else {
        println!(
            "No translation key at {}:{}:{}",
            workspace.display_path(&path),
            line,
            column
        );
        return Ok(());
    };
    let key = DottedKey::parse(&raw_key)?;

    match locate_in_workspace(&fs, &settings, &workspace.root, &key)? {
        Some((catalog, position)) => {
            println!("{}:{}", workspace.display_path(&catalog), position);
        }
        None => println!(
            "Key '{}' is not defined in {}",
            key,
            workspace.display_path(&workspace.catalog_path())
        ),
    }

    Ok(())
}
