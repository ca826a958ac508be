// Uptodown downloader implementation

use crate::config::RequestConfig;
use crate::downloader::downloader_trait::{ApkDownloader, DownloadResult};
use crate::downloader::http::{self, PageFetcher};
use crate::downloader::transfer::FileTransfer;
use crate::downloader::version_listing::{self, ListingPage};
use crate::error::{DownloadError, Result};
use crate::manifest::App;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::Arc;

/// Prefix the download button's `data-url` token is appended to
const DOWNLOAD_URL_PREFIX: &str = "https://dw.uptodown.com/dwn/";

/// Outcome of walking the version listing
#[derive(Debug, Clone, PartialEq, Eq)]
enum SearchOutcome {
    Found(String),
    /// A page without `data` was reached after `pages` fetches
    Exhausted { pages: u32 },
    /// Every allowed page was fetched and the listing still had data
    PageLimit { pages: u32 },
}

pub struct UptodownDownloader {
    fetcher: Arc<dyn PageFetcher>,
    transfer: Arc<dyn FileTransfer>,
    max_version_pages: u32,
}

impl UptodownDownloader {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        transfer: Arc<dyn FileTransfer>,
        config: &RequestConfig,
    ) -> Self {
        Self {
            fetcher,
            transfer,
            max_version_pages: config.max_version_pages,
        }
    }

    /// Fetch a detail page, pull the final APK URL off its download button and download it
    pub async fn extract_download_link(&self, page: &str, app_name: &str) -> Result<DownloadResult> {
        let response = self.fetcher.get(page).await?;
        http::check_response(&response)?;

        let data_url = download_token(&response.body, page, app_name)?;
        let download_url = format!("{}{}", DOWNLOAD_URL_PREFIX, data_url);
        log::debug!("Final download URL: {}", download_url);

        let file_name = format!("{}.apk", app_name);
        self.transfer.transfer(&download_url, &file_name).await?;

        Ok(DownloadResult {
            file_name,
            download_url,
        })
    }

    /// Walk the listing page by page until `version` turns up or the listing ends
    async fn search_versions(&self, app: &App, app_code: &str, version: &str) -> Result<SearchOutcome> {
        for (page, url) in
            version_listing::page_urls(&app.download_source, app_code, self.max_version_pages)
        {
            let response = self.fetcher.get(&url).await?;
            http::check_response(&response)?;

            let listing = ListingPage::parse(&response.body).map_err(|e| {
                DownloadError::download_link(format!("Invalid version listing: {}", e), &url)
            })?;

            let records = match listing {
                ListingPage::End => return Ok(SearchOutcome::Exhausted { pages: page }),
                ListingPage::Records(records) => records,
            };

            if let Some(candidate) =
                version_listing::find_candidate(&records, version, &app.app_name)
            {
                return Ok(SearchOutcome::Found(candidate));
            }
        }

        Ok(SearchOutcome::PageLimit {
            pages: self.max_version_pages,
        })
    }
}

fn selector(css: &str, url: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| DownloadError::download_link(format!("Invalid selector '{}': {}", css, e), url))
}

/// `data-url` token of the detail page's download button
fn download_token(html: &str, page: &str, app_name: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let selector = selector("button#detail-download-button", page)?;

    let Some(button) = document.select(&selector).next() else {
        log::error!("Could not find detail-download-button on page: {}", page);
        return Err(DownloadError::download_link(
            format!("Unable to download {} from uptodown.", app_name),
            page,
        ));
    };

    match button.value().attr("data-url") {
        Some(data_url) if !data_url.is_empty() => Ok(data_url.to_string()),
        _ => {
            log::error!("data-url attribute missing from button on page: {}", page);
            Err(DownloadError::download_link(
                format!("Unable to retrieve data-url for {} from uptodown.", app_name),
                page,
            ))
        }
    }
}

/// Numeric app code carried by the versions page heading
fn app_code(html: &str, page: &str, app_name: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let selector = selector("h1#detail-app-name", page)?;

    let code = document
        .select(&selector)
        .next()
        .and_then(|heading| heading.value().attr("data-code"))
        .filter(|code| !code.is_empty());

    match code {
        Some(code) => Ok(code.to_string()),
        None => {
            log::error!("Could not find the app code on page: {}", page);
            Err(DownloadError::download_link(
                format!("Unable to download {} from uptodown.", app_name),
                page,
            ))
        }
    }
}

#[async_trait]
impl ApkDownloader for UptodownDownloader {
    fn name(&self) -> &'static str {
        "uptodown"
    }

    async fn latest_version(&self, app: &App) -> Result<DownloadResult> {
        log::debug!("Downloading latest version of {} from uptodown", app);
        let page = format!("{}/download", app.download_source);
        self.extract_download_link(&page, &app.app_name).await
    }

    async fn specific_version(&self, app: &App, version: &str) -> Result<DownloadResult> {
        log::debug!("Downloading version {} of {} from uptodown", version, app);
        let versions_url = format!("{}/versions", app.download_source);
        let response = self.fetcher.get(&versions_url).await?;
        http::check_response(&response)?;
        let code = app_code(&response.body, &versions_url, &app.app_name)?;

        match self.search_versions(app, &code, version).await? {
            SearchOutcome::Found(candidate) => {
                self.extract_download_link(&candidate, &app.app_name).await
            }
            SearchOutcome::Exhausted { pages } => {
                log::error!(
                    "Version {} of {} not found after {} page(s)",
                    version,
                    app,
                    pages
                );
                Err(DownloadError::VersionNotFound {
                    app: app.app_name.clone(),
                    version: version.to_string(),
                    url: versions_url,
                })
            }
            SearchOutcome::PageLimit { pages } => {
                log::error!(
                    "Stopped looking for version {} of {} after {} page(s)",
                    version,
                    app,
                    pages
                );
                Err(DownloadError::PageLimit {
                    app: app.app_name.clone(),
                    version: version.to_string(),
                    url: versions_url,
                    pages,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::http::Page;
    use reqwest::StatusCode;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    const SOURCE: &str = "https://example.uptodown.com/app";

    /// Serves canned pages and records every URL requested
    #[derive(Default)]
    struct FakeSite {
        pages: HashMap<String, (u16, String)>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeSite {
        fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), (200, body.to_string()));
            self
        }

        fn status(mut self, url: &str, status: u16) -> Self {
            self.pages.insert(url.to_string(), (status, String::new()));
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for FakeSite {
        async fn get(&self, url: &str) -> Result<Page> {
            self.requests.lock().unwrap().push(url.to_string());
            let (status, body) = self
                .pages
                .get(url)
                .cloned()
                .unwrap_or((404, String::new()));
            Ok(Page {
                url: url.to_string(),
                status: StatusCode::from_u16(status).unwrap(),
                body,
            })
        }
    }

    #[derive(Default)]
    struct RecordingTransfer {
        calls: Mutex<Vec<(String, String)>>,
    }

    impl RecordingTransfer {
        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FileTransfer for RecordingTransfer {
        async fn transfer(&self, url: &str, file_name: &str) -> Result<PathBuf> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), file_name.to_string()));
            Ok(PathBuf::from(file_name))
        }
    }

    fn downloader(
        site: FakeSite,
        max_pages: u32,
    ) -> (UptodownDownloader, Arc<FakeSite>, Arc<RecordingTransfer>) {
        let site = Arc::new(site);
        let transfer = Arc::new(RecordingTransfer::default());
        let config = RequestConfig {
            max_version_pages: max_pages,
            ..RequestConfig::default()
        };
        let downloader = UptodownDownloader::new(site.clone(), transfer.clone(), &config);
        (downloader, site, transfer)
    }

    fn app() -> App {
        App::new("Example", SOURCE)
    }

    fn detail_page(data_url: &str) -> String {
        format!(
            r#"<html><body><button id="detail-download-button" class="button download" data-url="{}">Download</button></body></html>"#,
            data_url
        )
    }

    fn versions_page(code: &str) -> String {
        format!(
            r#"<html><body><h1 id="detail-app-name" data-code="{}">Example</h1></body></html>"#,
            code
        )
    }

    fn listing_url(page: u32) -> String {
        format!("{}/apps/42/versions/{}", SOURCE, page)
    }

    #[tokio::test]
    async fn test_extract_download_link() {
        let site = FakeSite::default().page("https://d/page", &detail_page("abc123"));
        let (downloader, _, transfer) = downloader(site, 10);

        let result = downloader
            .extract_download_link("https://d/page", "Example")
            .await
            .unwrap();

        assert_eq!(result.file_name, "Example.apk");
        assert_eq!(result.download_url, "https://dw.uptodown.com/dwn/abc123");
        assert_eq!(
            transfer.calls(),
            vec![(
                "https://dw.uptodown.com/dwn/abc123".to_string(),
                "Example.apk".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_missing_button_fails_without_transfer() {
        let site = FakeSite::default().page("https://d/page", "<html><body><button id=\"other\"></button></body></html>");
        let (downloader, _, transfer) = downloader(site, 10);

        let err = downloader
            .extract_download_link("https://d/page", "Example")
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::DownloadLink { .. }));
        assert_eq!(err.url(), Some("https://d/page"));
        assert!(transfer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_data_url_fails() {
        let site = FakeSite::default().page("https://d/page", &detail_page(""));
        let (downloader, _, transfer) = downloader(site, 10);

        let err = downloader
            .extract_download_link("https://d/page", "Example")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("data-url"));
        assert!(transfer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bad_status_fails_with_page_url() {
        let site = FakeSite::default().status("https://d/page", 500);
        let (downloader, _, _) = downloader(site, 10);

        let err = downloader
            .extract_download_link("https://d/page", "Example")
            .await
            .unwrap_err();

        assert!(err.is_download_link());
        assert_eq!(err.url(), Some("https://d/page"));
    }

    #[tokio::test]
    async fn test_latest_version_uses_download_page() {
        let site = FakeSite::default().page(&format!("{}/download", SOURCE), &detail_page("latest"));
        let (downloader, site, _) = downloader(site, 10);

        let result = downloader.latest_version(&app()).await.unwrap();

        assert_eq!(result.download_url, "https://dw.uptodown.com/dwn/latest");
        assert_eq!(site.requests(), vec![format!("{}/download", SOURCE)]);
    }

    #[tokio::test]
    async fn test_specific_version_found_on_second_page() {
        let site = FakeSite::default()
            .page(&format!("{}/versions", SOURCE), &versions_page("42"))
            .page(
                &listing_url(1),
                r#"{"data":[{"version":"2.1","versionURL":"http://d/a"}]}"#,
            )
            .page(
                &listing_url(2),
                r#"{"data":[{"version":"2.3","versionURL":"http://d/b"}]}"#,
            )
            .page(
                &listing_url(3),
                r#"{"data":[{"version":"2.3","versionURL":"http://d/c"}]}"#,
            )
            .page("http://d/b-x", &detail_page("tok"));
        let (downloader, site, transfer) = downloader(site, 10);

        let result = downloader.specific_version(&app(), "2.3").await.unwrap();

        assert_eq!(result.download_url, "https://dw.uptodown.com/dwn/tok");
        assert_eq!(result.file_name, "Example.apk");
        assert_eq!(
            site.requests(),
            vec![
                format!("{}/versions", SOURCE),
                listing_url(1),
                listing_url(2),
                "http://d/b-x".to_string(),
            ]
        );
        assert_eq!(transfer.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_incomplete_record_is_skipped() {
        let site = FakeSite::default()
            .page(&format!("{}/versions", SOURCE), &versions_page("42"))
            .page(
                &listing_url(1),
                r#"{"data":[{"version":"1.0","versionURL":{"url":"http://d","versionID":"7"}}]}"#,
            )
            .page(
                &listing_url(2),
                r#"{"data":[{"version":"1.0","versionURL":{"url":"http://d","extraURL":"e","versionID":7}}]}"#,
            )
            .page("http://d/e/7-x", &detail_page("ok"));
        let (downloader, _, _) = downloader(site, 10);

        let result = downloader.specific_version(&app(), "1.0").await.unwrap();
        assert_eq!(result.download_url, "https://dw.uptodown.com/dwn/ok");
    }

    #[tokio::test]
    async fn test_listing_exhausted_without_match() {
        let site = FakeSite::default()
            .page(&format!("{}/versions", SOURCE), &versions_page("42"))
            .page(
                &listing_url(1),
                r#"{"data":[{"version":"2.1","versionURL":"http://d/a"}]}"#,
            )
            .page(&listing_url(2), "{}");
        let (downloader, site, transfer) = downloader(site, 10);

        let err = downloader.specific_version(&app(), "9.9").await.unwrap_err();

        assert!(matches!(err, DownloadError::VersionNotFound { .. }));
        assert!(err.is_download_link());
        assert_eq!(err.url(), Some(format!("{}/versions", SOURCE).as_str()));
        assert_eq!(site.requests().len(), 3);
        assert!(transfer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_page_does_not_end_listing() {
        let site = FakeSite::default()
            .page(&format!("{}/versions", SOURCE), &versions_page("42"))
            .page(&listing_url(1), r#"{"data":[]}"#)
            .page(
                &listing_url(2),
                r#"{"data":[{"version":"3.0","versionURL":"https://d/z"}]}"#,
            )
            .page("https://d/z-x", &detail_page("z"));
        let (downloader, _, _) = downloader(site, 10);

        let result = downloader.specific_version(&app(), "3.0").await.unwrap();
        assert_eq!(result.download_url, "https://dw.uptodown.com/dwn/z");
    }

    #[tokio::test]
    async fn test_page_limit_is_reported() {
        let site = FakeSite::default()
            .page(&format!("{}/versions", SOURCE), &versions_page("42"))
            .page(&listing_url(1), r#"{"data":[{"version":"1","versionURL":"http://d/1"}]}"#)
            .page(&listing_url(2), r#"{"data":[{"version":"2","versionURL":"http://d/2"}]}"#);
        let (downloader, site, _) = downloader(site, 2);

        let err = downloader.specific_version(&app(), "3").await.unwrap_err();

        assert!(matches!(err, DownloadError::PageLimit { pages: 2, .. }));
        assert_eq!(err.url(), Some(format!("{}/versions", SOURCE).as_str()));
        assert_eq!(site.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_app_heading_fails() {
        let site = FakeSite::default().page(
            &format!("{}/versions", SOURCE),
            "<html><body><h1>Example</h1></body></html>",
        );
        let (downloader, site, _) = downloader(site, 10);

        let err = downloader.specific_version(&app(), "1.0").await.unwrap_err();

        assert!(matches!(err, DownloadError::DownloadLink { .. }));
        assert_eq!(err.url(), Some(format!("{}/versions", SOURCE).as_str()));
        assert_eq!(site.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_listing_status_carries_page_url() {
        let site = FakeSite::default()
            .page(&format!("{}/versions", SOURCE), &versions_page("42"))
            .status(&listing_url(1), 502);
        let (downloader, _, _) = downloader(site, 10);

        let err = downloader.specific_version(&app(), "1.0").await.unwrap_err();

        assert_eq!(err.url(), Some(listing_url(1).as_str()));
    }

    #[test]
    fn test_download_token_takes_first_button() {
        let html = format!("{}{}", detail_page("first"), detail_page("second"));
        assert_eq!(download_token(&html, "p", "a").unwrap(), "first");
    }

    #[test]
    fn test_app_code_requires_data_code() {
        let html = r#"<h1 id="detail-app-name">Example</h1>"#;
        assert!(app_code(html, "p", "a").is_err());
        assert_eq!(app_code(&versions_page("1234"), "p", "a").unwrap(), "1234");
    }
}
