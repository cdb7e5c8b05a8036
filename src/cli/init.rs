use std::path::PathBuf;

use dialoguer::Input;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_file, shellexpand_path};

pub fn run(data_dir: Option<&str>) -> Result<()> {
    let mut settings = load_settings();

    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(dir);
    } else if !settings_file().exists() {
        let chosen: String = Input::new()
            .with_prompt("Data directory")
            .default(settings.data_dir.clone())
            .interact_text()
            .unwrap_or_else(|_| settings.data_dir.clone());
        settings.data_dir = shellexpand_path(chosen.trim());
    }

    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;

    println!("Initialized stonestreet at {}", resolved.display());
    println!("Put your bank export at {}", resolved.join(&settings.ledger_file).display());
    Ok(())
}
