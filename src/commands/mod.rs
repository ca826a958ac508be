// Subcommand implementations

pub mod add;
pub mod fetch;
pub mod init;
pub mod remove;
pub mod sync;

use crate::manifest::Manifest;

fn load_manifest() -> anyhow::Result<Manifest> {
    Manifest::load().map_err(|e| {
        log::debug!("{:#}", e);
        anyhow::anyhow!("Manifest not found. Run 'apkfetch init' first.")
    })
}
