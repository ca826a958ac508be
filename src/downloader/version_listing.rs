// Paginated version listing returned by the Uptodown versions endpoint

use serde_json::Value;

/// Suffix the listing expects on a version page URL to reach its download page
const VERSION_PAGE_SUFFIX: &str = "-x";

/// Where a version's download page lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionUrl {
    /// Plain URL string
    Direct(String),
    /// Structured `{url, extraURL, versionID}` object
    Composite {
        url: String,
        extra: String,
        id: String,
    },
}

/// Why a matching record could not produce a candidate URL
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidVersionUrl {
    /// A structured value missing one of `url`, `extraURL`, `versionID`
    #[error("incomplete versionURL data: {0}")]
    Incomplete(Value),
    /// Neither a string nor an object
    #[error("unsupported versionURL value: {0}")]
    Unsupported(Value),
}

impl VersionUrl {
    pub fn from_value(value: &Value) -> Result<Self, InvalidVersionUrl> {
        match value {
            Value::String(url) => Ok(Self::Direct(url.clone())),
            Value::Object(map) => {
                let url = map.get("url").and_then(non_empty_text);
                let extra = map.get("extraURL").and_then(non_empty_text);
                let id = map.get("versionID").and_then(non_empty_text);
                match (url, extra, id) {
                    (Some(url), Some(extra), Some(id)) => Ok(Self::Composite { url, extra, id }),
                    _ => Err(InvalidVersionUrl::Incomplete(value.clone())),
                }
            }
            other => Err(InvalidVersionUrl::Unsupported(other.clone())),
        }
    }

    /// URL of the version's download page
    pub fn page_url(&self) -> String {
        match self {
            Self::Direct(url) => format!("{}{}", url, VERSION_PAGE_SUFFIX),
            Self::Composite { url, extra, id } => {
                format!("{}/{}/{}{}", url, extra, id, VERSION_PAGE_SUFFIX)
            }
        }
    }
}

/// `versionID` shows up both as a string and as a number
fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accept only absolute HTTP(S) candidates
pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// One entry of a listing page, kept raw until it matches
#[derive(Debug, Clone)]
pub struct VersionRecord {
    pub version: String,
    pub version_url: Value,
}

/// A single page of the listing
#[derive(Debug, Clone, PartialEq)]
pub enum ListingPage {
    Records(Vec<Value>),
    /// No `data` array: the listing has no more pages
    End,
}

impl ListingPage {
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        let json: Value = serde_json::from_str(body)?;
        Ok(match json.get("data") {
            Some(Value::Array(items)) => Self::Records(items.clone()),
            Some(other) => {
                log::warn!("Version listing 'data' is not an array: {}", other);
                Self::End
            }
            None => Self::End,
        })
    }
}

impl VersionRecord {
    pub fn from_value(value: &Value) -> Option<Self> {
        let version = value.get("version")?.as_str()?.to_string();
        let version_url = value.get("versionURL").cloned().unwrap_or(Value::Null);
        Some(Self {
            version,
            version_url,
        })
    }
}

/// Scan records in order for the first usable candidate matching `target_version`.
///
/// Matches with an unusable `versionURL` are logged and skipped; the scan goes on.
pub fn find_candidate(records: &[Value], target_version: &str, app_name: &str) -> Option<String> {
    for item in records {
        let Some(record) = VersionRecord::from_value(item) else {
            log::warn!("Skipping version record without a version string: {}", item);
            continue;
        };
        if record.version != target_version {
            continue;
        }

        let candidate = match VersionUrl::from_value(&record.version_url) {
            Ok(version_url) => version_url.page_url(),
            Err(e) => {
                log::error!("Skipping version {} of {}: {}", record.version, app_name, e);
                continue;
            }
        };

        if !is_http_url(&candidate) {
            log::error!("Invalid download URL constructed: {}", candidate);
            continue;
        }

        log::debug!("Constructed download URL: {}", candidate);
        return Some(candidate);
    }
    None
}

/// Listing page URLs, starting at page 1 and capped at `max_pages`
pub fn page_urls<'a>(
    source: &'a str,
    app_code: &'a str,
    max_pages: u32,
) -> impl Iterator<Item = (u32, String)> + 'a {
    (1..=max_pages).map(move |page| {
        (
            page,
            format!("{}/apps/{}/versions/{}", source, app_code, page),
        )
    })
}
