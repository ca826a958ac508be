// Error types shared by all downloader backends

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DownloadError>;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// A page could not be fetched or did not contain the expected download link
    #[error("{message} (url: {url})")]
    DownloadLink { message: String, url: String },

    /// The version listing ran out of pages without a matching record
    #[error("Version '{version}' of {app} not found (url: {url})")]
    VersionNotFound {
        app: String,
        version: String,
        url: String,
    },

    /// The configured page cap was reached before the listing ended
    #[error(
        "Gave up looking for version '{version}' of {app} after {pages} page(s) without reaching the end of the listing (url: {url})"
    )]
    PageLimit {
        app: String,
        version: String,
        url: String,
        pages: u32,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    pub fn download_link(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::DownloadLink {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Whether this is a download-link failure (as opposed to transport or I/O)
    pub fn is_download_link(&self) -> bool {
        matches!(
            self,
            Self::DownloadLink { .. } | Self::VersionNotFound { .. } | Self::PageLimit { .. }
        )
    }

    /// URL that triggered a download-link failure
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::DownloadLink { url, .. }
            | Self::VersionNotFound { url, .. }
            | Self::PageLimit { url, .. } => Some(url),
            Self::Http(e) => e.url().map(|u| u.as_str()),
            Self::Io(_) => None,
        }
    }
}
