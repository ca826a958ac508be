// Init command for creating a new apps manifest

use crate::config;
use crate::manifest::Manifest;
use crate::ui;
use std::path::Path;

pub fn init() -> anyhow::Result<i32> {
    if Path::new(&config::manifest_path()).exists() {
        ui::dim("Manifest detected. Skipping initialization.");
        return Ok(0);
    }

    Manifest::default().save()?;
    ui::success(&format!("Initialized {}", config::manifest_path()));
    Ok(0)
}
