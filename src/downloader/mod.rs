// Downloader module for APK download backends

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

pub mod downloader_trait;
pub mod http;
pub mod transfer;
pub mod uptodown;
pub mod version_listing;

pub use downloader_trait::{ApkDownloader, DownloadResult};
pub use uptodown::UptodownDownloader;

use crate::config::RequestConfig;
use crate::constants;
use crate::error::Result;
use crate::manifest::App;
use self::http::HttpClient;
use self::transfer::{DryRunTransfer, FileTransfer, HttpFileTransfer};

/// Registry for download backends
pub struct DownloaderRegistry {
    downloaders: BTreeMap<&'static str, Arc<dyn ApkDownloader>>,
}

impl DownloaderRegistry {
    /// Build every backend around shared HTTP clients.
    /// With `dry_run`, URLs are resolved but nothing is written to `download_dir`.
    pub fn new(
        config: &RequestConfig,
        download_dir: impl Into<PathBuf>,
        dry_run: bool,
    ) -> anyhow::Result<Self> {
        let pages = HttpClient::new(config)?;
        let download_dir = download_dir.into();
        let transfer: Arc<dyn FileTransfer> = if dry_run {
            Arc::new(DryRunTransfer::new(download_dir))
        } else {
            Arc::new(HttpFileTransfer::new(
                http::build_transfer_client(config)?,
                download_dir,
            ))
        };

        let mut registry = Self::empty();
        registry.register(Arc::new(UptodownDownloader::new(
            Arc::new(pages),
            transfer,
            config,
        )));
        Ok(registry)
    }

    pub fn empty() -> Self {
        Self {
            downloaders: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, downloader: Arc<dyn ApkDownloader>) {
        self.downloaders.insert(downloader.name(), downloader);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ApkDownloader>> {
        self.downloaders.get(name)
    }

    pub fn get_or_error(&self, name: &str) -> anyhow::Result<&Arc<dyn ApkDownloader>> {
        self.get(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unsupported downloader: '{}'. Supported downloaders: {}",
                name,
                self.names().join(", ")
            )
        })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.downloaders.keys().copied().collect()
    }
}

/// Whether a requested version means "whatever is newest"
pub fn is_latest(version: Option<&str>) -> bool {
    match version {
        None => true,
        Some(v) => v.trim().is_empty() || v.eq_ignore_ascii_case(constants::LATEST),
    }
}

/// Download `app` at `version`, or its latest release when no version is pinned
pub async fn download(
    downloader: &dyn ApkDownloader,
    app: &App,
    version: Option<&str>,
) -> Result<DownloadResult> {
    match version {
        Some(v) if !is_latest(Some(v)) => downloader.specific_version(app, v).await,
        _ => downloader.latest_version(app).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubDownloader {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ApkDownloader for StubDownloader {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn latest_version(&self, app: &App) -> Result<DownloadResult> {
            self.calls.lock().unwrap().push("latest".into());
            Ok(DownloadResult {
                file_name: format!("{}.apk", app.app_name),
                download_url: "https://stub/latest".into(),
            })
        }

        async fn specific_version(&self, app: &App, version: &str) -> Result<DownloadResult> {
            self.calls.lock().unwrap().push(version.into());
            Ok(DownloadResult {
                file_name: format!("{}.apk", app.app_name),
                download_url: format!("https://stub/{}", version),
            })
        }
    }

    #[test]
    fn test_is_latest() {
        assert!(is_latest(None));
        assert!(is_latest(Some("latest")));
        assert!(is_latest(Some("LATEST")));
        assert!(is_latest(Some("")));
        assert!(!is_latest(Some("1.2.3")));
    }

    #[tokio::test]
    async fn test_download_dispatches_on_version() {
        let stub = StubDownloader::default();
        let app = App::new("Stub", "https://stub");

        download(&stub, &app, None).await.unwrap();
        download(&stub, &app, Some("latest")).await.unwrap();
        let pinned = download(&stub, &app, Some("4.5")).await.unwrap();

        assert_eq!(pinned.download_url, "https://stub/4.5");
        assert_eq!(
            *stub.calls.lock().unwrap(),
            vec!["latest".to_string(), "latest".into(), "4.5".into()]
        );
    }

    #[test]
    fn test_registry_lists_supported_downloaders() {
        let dir = tempfile::TempDir::new().unwrap();
        let registry =
            DownloaderRegistry::new(&RequestConfig::default(), dir.path(), true).unwrap();
        assert!(registry.get("uptodown").is_some());

        let Err(err) = registry.get_or_error("apkmirror") else {
            panic!("apkmirror should not be registered");
        };
        assert!(err.to_string().contains("Supported downloaders: uptodown"));
    }

    #[test]
    fn test_register_custom_downloader() {
        let mut registry = DownloaderRegistry::empty();
        registry.register(Arc::new(StubDownloader::default()));
        assert_eq!(registry.names(), vec!["stub"]);
    }
}
