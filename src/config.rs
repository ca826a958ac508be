// Config module for shared configuration utilities

use crate::constants;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub fn config_dir() -> String {
    std::env::var("APKFETCH_DIR").unwrap_or_else(|_| ".".to_string())
}

pub fn manifest_path() -> String {
    let dir = config_dir();
    if dir == "." {
        constants::MANIFEST_FILE.to_string()
    } else {
        format!("{}/{}", dir, constants::MANIFEST_FILE)
    }
}

pub fn downloads_dir() -> PathBuf {
    PathBuf::from(config_dir()).join(constants::DOWNLOADS_DIR)
}

/// Request settings shared by every HTTP call a downloader makes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub user_agent: String,

    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,

    pub timeout_secs: u64,

    /// Upper bound on version-listing pages fetched while looking for a version
    pub max_version_pages: u32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            user_agent: constants::USER_AGENT.to_string(),
            headers: BTreeMap::new(),
            timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
            max_version_pages: constants::DEFAULT_MAX_VERSION_PAGES,
        }
    }
}

impl RequestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
