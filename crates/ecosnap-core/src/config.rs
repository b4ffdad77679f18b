//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the app origin, the current cache generation and its seeded assets, the
//! product-lookup endpoint, and whether stats updates are serialized.
//!
//! Configuration is stored at `~/.config/ecosnap/config.json`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::cache::manager::{DEFAULT_CACHE_NAME, DEFAULT_LOOKUP_HOST, DEFAULT_STATIC_ASSETS};
use crate::cache::CacheSettings;
use crate::http::fetcher::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::lookup::DEFAULT_LOOKUP_BASE_URL;

/// Application name used for config/cache/data directory paths
const APP_NAME: &str = "ecosnap";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Origin the app is served from when nothing else is configured
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub origin: String,
    pub cache_name: String,
    pub static_assets: Vec<String>,
    pub lookup_host: String,
    pub lookup_base_url: String,
    pub request_timeout_secs: u64,
    pub serialize_updates: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            static_assets: DEFAULT_STATIC_ASSETS.iter().map(|s| s.to_string()).collect(),
            lookup_host: DEFAULT_LOOKUP_HOST.to_string(),
            lookup_base_url: DEFAULT_LOOKUP_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            serialize_updates: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_json(&contents)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse config file")
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where cache generations live.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("responses"))
    }

    /// Where the stats record lives.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("logs"))
    }

    pub fn origin_url(&self) -> Result<Url> {
        Url::parse(&self.origin).with_context(|| format!("Invalid origin: {}", self.origin))
    }

    pub fn lookup_base(&self) -> Result<Url> {
        Url::parse(&self.lookup_base_url)
            .with_context(|| format!("Invalid lookup base URL: {}", self.lookup_base_url))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_settings(&self) -> Result<CacheSettings> {
        Ok(CacheSettings::new(self.origin_url()?)
            .with_cache_name(self.cache_name.clone())
            .with_static_assets(self.static_assets.clone())
            .with_lookup_host(self.lookup_host.clone()))
    }
}
