// File transfer: moving the resolved APK onto disk

use crate::downloader::http;
use crate::error::Result;
use crate::ui;
use async_trait::async_trait;
use reqwest::Client;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Performs the actual binary download once a URL has been resolved
#[async_trait]
pub trait FileTransfer: Send + Sync {
    /// Download `url` as `file_name`, returning where it was written
    async fn transfer(&self, url: &str, file_name: &str) -> Result<PathBuf>;
}

/// Streams downloads into a directory, staging them as `.part` files first
pub struct HttpFileTransfer {
    client: Client,
    dir: PathBuf,
}

impl HttpFileTransfer {
    pub fn new(client: Client, dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dir: dir.into(),
        }
    }
}

/// Whether `file_name` names a single file directly inside the download directory
pub fn is_plain_file_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && file_name != "."
        && file_name != ".."
        && !file_name.contains(['/', '\\'])
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}

#[async_trait]
impl FileTransfer for HttpFileTransfer {
    async fn transfer(&self, url: &str, file_name: &str) -> Result<PathBuf> {
        if !is_plain_file_name(file_name) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Refusing to write '{}' outside the download directory", file_name),
            )
            .into());
        }
        fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(file_name);
        let staging = staging_path(&target);

        log::info!("Downloading {} to {}", url, target.display());
        let mut response = self.client.get(url).send().await?;
        http::check_status(response.status(), url)?;

        let pb = ui::download_bar(file_name, response.content_length());
        let result = async {
            let mut file = fs::File::create(&staging)?;
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk)?;
                pb.inc(chunk.len() as u64);
            }
            file.flush()?;
            Ok::<(), crate::error::DownloadError>(())
        }
        .await;

        if let Err(e) = result {
            ui::clear_bar(&pb);
            let _ = fs::remove_file(&staging);
            return Err(e);
        }

        fs::rename(&staging, &target)?;
        ui::finish_download_success(&pb, file_name);
        Ok(target)
    }
}

/// Resolves without touching the network or disk beyond the lookup itself
pub struct DryRunTransfer {
    dir: PathBuf,
}

impl DryRunTransfer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FileTransfer for DryRunTransfer {
    async fn transfer(&self, url: &str, file_name: &str) -> Result<PathBuf> {
        let target = self.dir.join(file_name);
        log::info!("[dry run] would download {} to {}", url, target.display());
        Ok(target)
    }
}
