// Manifest module for the list of tracked applications

use crate::config::{self, RequestConfig};
use crate::constants;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub apps: BTreeMap<String, AppSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSpec {
    /// Base URL of the app on the download site
    pub source: String,
    #[serde(default = "default_downloader")]
    pub downloader: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

fn default_downloader() -> String {
    constants::DEFAULT_DOWNLOADER.to_string()
}

/// Application descriptor handed to downloaders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub app_name: String,
    pub download_source: String,
}

impl App {
    pub fn new(app_name: impl Into<String>, download_source: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            download_source: download_source.into().trim_end_matches('/').to_string(),
        }
    }
}

impl std::fmt::Display for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.app_name)
    }
}

impl AppSpec {
    pub fn to_app(&self, name: &str) -> App {
        App::new(name, &self.source)
    }
}

impl Manifest {
    pub fn load() -> anyhow::Result<Self> {
        let path = config::manifest_path();
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path))?;
        Self::parse(&text).with_context(|| format!("Failed to parse {}", path))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let dir = config::config_dir();
        std::fs::create_dir_all(&dir)?;
        let path = config::manifest_path();
        let text = toml::to_string_pretty(self)?;
        std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path))?;
        Ok(())
    }

    pub fn app(&self, name: &str) -> anyhow::Result<(App, &AppSpec)> {
        let spec = self
            .apps
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("App '{}' not found in manifest", name))?;
        Ok((spec.to_app(name), spec))
    }
}
