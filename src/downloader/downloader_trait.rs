// Trait definition for APK download backends

use crate::error::Result;
use crate::manifest::App;

/// Result of resolving and downloading an APK
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub file_name: String,
    pub download_url: String,
}

/// Trait for download sites (Uptodown, ...)
#[async_trait::async_trait]
pub trait ApkDownloader: Send + Sync {
    /// Get the downloader name (e.g., "uptodown")
    fn name(&self) -> &'static str;

    /// Resolve and download the newest release of `app`
    async fn latest_version(&self, app: &App) -> Result<DownloadResult>;

    /// Resolve and download an exact version of `app`
    ///
    /// # Arguments
    /// * `app` - The application descriptor
    /// * `version` - Version string as published by the site; matched exactly
    async fn specific_version(&self, app: &App, version: &str) -> Result<DownloadResult>;
}
