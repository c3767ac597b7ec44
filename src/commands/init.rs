use anyhow::{bail, Result};

use crate::commands::Workspace;
use crate::config::SETTINGS_FILE;

pub fn run(workspace: &Workspace, force: bool) -> Result<()> {
    println!("=== ngx-translate-assist init ===\n");

    workspace.settings.validate()?;
    let config_path = workspace.root.join(SETTINGS_FILE);

    if config_path.exists() && !force {
        bail!(
            "Settings file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config_str = serde_json::to_string_pretty(&workspace.settings)?;
    std::fs::write(&config_path, format!("{}\n", config_str))?;

    println!("Created settings file: {}\n", config_path.display());
    println!("Settings:");
    println!("  Translation path: {}", workspace.settings.translation_path);
    println!("  Default language: {}", workspace.settings.default_lang);

    let catalog_path = workspace.catalog_path();
    if let Some(dir) = catalog_path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("\nCreated: {}", workspace.display_path(dir));
        }
    }
    if !catalog_path.exists() {
        std::fs::write(&catalog_path, "{}\n")?;
        println!("Created: {}", workspace.display_path(&catalog_path));
    }

    println!("\nNext steps:");
    println!("  1. Run 'ngx-translate-assist scan \"src/**/*.html\"' to find hardcoded text");
    println!("  2. Run 'ngx-translate-assist extract <file> --text \"...\"' to move text into the catalog");

    println!("\nDone!");
    Ok(())
}
