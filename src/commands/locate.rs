use anyhow::Result;

use crate::catalog::locate_in_workspace;
use crate::commands::Workspace;
use crate::fs::RealFileSystem;
use crate::key_path::DottedKey;

pub fn run(workspace: &Workspace, key: &str, strategy: Option<&str>) -> Result<()> {
    let settings = workspace.settings_with_strategy(strategy)?;
    let key = DottedKey::parse(key)?;

    match locate_in_workspace(&RealFileSystem, &settings, &workspace.root, &key)? {
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
