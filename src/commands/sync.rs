// Sync command for downloading every app in the manifest

use crate::commands::fetch::fetch_app;
use crate::commands::load_manifest;
use crate::config;
use crate::downloader::DownloaderRegistry;
use crate::ui;

pub async fn sync(dry_run: bool) -> anyhow::Result<i32> {
    let manifest = load_manifest()?;
    let registry = DownloaderRegistry::new(&manifest.request, config::downloads_dir(), dry_run)?;

    if dry_run {
        ui::status("[DRY RUN]", "Previewing sync...");
    }

    let mut failed = Vec::new();
    for (name, spec) in &manifest.apps {
        let app = spec.to_app(name);
        if let Err(e) = fetch_app(&registry, &app, spec, spec.version.as_deref()).await {
            ui::error(&format!("{:#}", e));
            failed.push(name.as_str());
        }
    }

    let total = manifest.apps.len();
    let done = total - failed.len();
    if dry_run {
        ui::status("[DRY RUN]", &format!("Resolved {} of {} app(s)", done, total));
    } else {
        ui::success(&format!("Fetched {} of {} app(s)", done, total));
    }

    if failed.is_empty() {
        Ok(0)
    } else {
        ui::warning(&format!("Failed: {}", failed.join(", ")));
        Ok(1)
    }
}
