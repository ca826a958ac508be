// Fetch command for downloading a single app

use crate::commands::load_manifest;
use crate::config;
use crate::downloader::{self, DownloadResult, DownloaderRegistry};
use crate::manifest::{App, AppSpec};
use crate::ui;

pub async fn fetch(name: &str, version: Option<String>, dry_run: bool) -> anyhow::Result<i32> {
    let manifest = load_manifest()?;
    let (app, spec) = manifest.app(name)?;
    let registry = DownloaderRegistry::new(&manifest.request, config::downloads_dir(), dry_run)?;

    if dry_run {
        ui::status("[DRY RUN]", "Resolving without downloading...");
    }

    let version = version.or_else(|| spec.version.clone());
    fetch_app(&registry, &app, spec, version.as_deref()).await?;
    Ok(0)
}

/// Resolve and download one app with the downloader its manifest entry names.
/// Failures are returned, not printed; the caller reports them.
pub async fn fetch_app(
    registry: &DownloaderRegistry,
    app: &App,
    spec: &AppSpec,
    version: Option<&str>,
) -> anyhow::Result<DownloadResult> {
    let backend = registry.get_or_error(&spec.downloader)?;
    let label = if downloader::is_latest(version) {
        "latest"
    } else {
        version.unwrap_or_default()
    };

    ui::action(&format!(
        "Resolving {} {} from {}...",
        app,
        label,
        backend.name()
    ));

    match downloader::download(backend.as_ref(), app, version).await {
        Ok(result) => {
            ui::success(&format!("{} → {}", result.file_name, result.download_url));
            Ok(result)
        }
        Err(e) => {
            log::debug!("Lookup for {} failed at {:?}", app, e.url());
            let context = if e.is_download_link() {
                format!(
                    "Failed to download {}; the download page may have changed, check its source in apps.toml",
                    app
                )
            } else {
                format!("Failed to download {}", app)
            };
            Err(anyhow::Error::new(e).context(context))
        }
    }
}
