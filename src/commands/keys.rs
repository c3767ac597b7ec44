use anyhow::Result;

use crate::catalog::catalog_keys;
use crate::commands::Workspace;
use crate::fs::RealFileSystem;
use crate::logging;

/// Print every dotted key of the default-language catalog, one per line
pub fn run(workspace: &Workspace) -> Result<()> {
    workspace.settings.validate()?;
    let path = workspace.catalog_path();
    let keys = catalog_keys(&RealFileSystem, &path)?;

    for key in &keys {
        println!("{}", key);
    }
    logging::debug(&format!(
        "{} key(s) in {}",
        keys.len(),
        workspace.display_path(&path)
    ));

    Ok(())
}
