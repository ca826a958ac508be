// Shared HTTP client utilities

use crate::config::RequestConfig;
use crate::constants;
use crate::error::{DownloadError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, StatusCode, redirect};

/// A fetched page: final status and body text
#[derive(Debug, Clone)]
pub struct Page {
    /// URL that was requested
    pub url: String,
    pub status: StatusCode,
    pub body: String,
}

/// Anything that can GET a URL and hand back its text
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<Page>;
}

/// reqwest-backed fetcher configured from `RequestConfig`
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &RequestConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_client(config)?,
        })
    }

}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn get(&self, url: &str) -> Result<Page> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(Page {
            url: url.to_string(),
            status,
            body,
        })
    }
}

fn client_builder(config: &RequestConfig) -> anyhow::Result<ClientBuilder> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| anyhow::anyhow!("Invalid header name '{}': {}", name, e))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| anyhow::anyhow!("Invalid value for header '{}': {}", name.as_str(), e))?;
        headers.insert(name, value);
    }

    Ok(Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .redirect(redirect::Policy::limited(constants::MAX_REDIRECTS)))
}

/// Client for page lookups: the timeout bounds each whole request
pub fn build_client(config: &RequestConfig) -> anyhow::Result<Client> {
    Ok(client_builder(config)?.timeout(config.timeout()).build()?)
}

/// Client for file downloads: the timeout bounds connecting and each read,
/// so a large body that keeps arriving is never cut off
pub fn build_transfer_client(config: &RequestConfig) -> anyhow::Result<Client> {
    Ok(client_builder(config)?
        .connect_timeout(config.timeout())
        .read_timeout(config.timeout())
        .build()?)
}

/// Fail with a download-link error if the response status is not a success
pub fn check_response(page: &Page) -> Result<()> {
    check_status(page.status, &page.url)
}

pub fn check_status(status: StatusCode, url: &str) -> Result<()> {
    if status == StatusCode::NOT_FOUND {
        return Err(DownloadError::download_link("Resource not found", url));
    }

    if !status.is_success() {
        return Err(DownloadError::download_link(
            format!("HTTP request failed ({})", status),
            url,
        ));
    }

    Ok(())
}
