// Remove command for removing an app from the manifest

use crate::commands::load_manifest;
use crate::ui;

pub fn remove(name: &str) -> anyhow::Result<i32> {
    let mut manifest = load_manifest()?;

    if manifest.apps.remove(name).is_none() {
        anyhow::bail!("App '{}' not found in manifest", name);
    }

    manifest.save()?;
    ui::success(&format!("Removed {}", name));
    Ok(0)
}
