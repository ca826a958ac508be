// Add command for adding an app to the manifest

use crate::commands::load_manifest;
use crate::config;
use crate::downloader::{self, DownloaderRegistry, transfer, version_listing};
use crate::manifest::AppSpec;
use crate::ui;
use log::info;

pub fn add(
    name: String,
    source: String,
    version: Option<String>,
    downloader_name: String,
) -> anyhow::Result<i32> {
    if name.trim().is_empty() {
        anyhow::bail!("App name cannot be empty");
    }

    // The name becomes the APK file name inside the download directory
    if !transfer::is_plain_file_name(&name) {
        anyhow::bail!(
            "Invalid app name '{}': it must not contain path separators",
            name
        );
    }

    if !version_listing::is_http_url(&source) {
        anyhow::bail!(
            "Invalid source '{}': expected an http(s) URL of the app page",
            source
        );
    }

    let mut manifest = load_manifest()?;

    // Dry-run registry: only used to check the downloader name
    let registry = DownloaderRegistry::new(&manifest.request, config::downloads_dir(), true)?;
    registry.get_or_error(&downloader_name)?;

    let version = version.filter(|v| !downloader::is_latest(Some(v)));
    let label = version.clone().unwrap_or_else(|| "latest".to_string());

    let replaced = manifest
        .apps
        .insert(
            name.clone(),
            AppSpec {
                source: source.trim_end_matches('/').to_string(),
                downloader: downloader_name.clone(),
                version,
            },
        )
        .is_some();

    manifest.save()?;
    info!("Added app '{}' from downloader '{}'", name, downloader_name);

    if replaced {
        ui::success(&format!("Updated {} ({})", name, label));
    } else {
        ui::success(&format!("Added {} ({})", name, label));
    }
    Ok(0)
}
