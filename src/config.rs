//! Runtime configuration: backend base URL and log filter.
//!
//! Read from `<config dir>/clinic-admin/config.json` when present, then
//! overridden by `CLINIC_ADMIN_API_URL` and `CLINIC_ADMIN_LOG`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
/// Log filter used when nothing else is configured.
pub const DEFAULT_LOG_FILTER: &str = "info";

const API_URL_ENV: &str = "CLINIC_ADMIN_API_URL";
const LOG_FILTER_ENV: &str = "CLINIC_ADMIN_LOG";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for [`Config`].
    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    /// The platform does not provide a config directory.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// The configured base URL is not an absolute http(s) URL.
    #[error("invalid API base URL {url:?}: {detail}")]
    InvalidUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        detail: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Backend base URL, without trailing slash.
    pub api_base_url: String,
    /// `tracing` filter directive, e.g. `info` or `clinic_admin=debug`.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Loads the config file from the platform config directory and applies
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        Self::from_file(&path)?.with_overrides(|key| std::env::var(key).ok())
    }

    /// Returns `<config dir>/clinic-admin/config.json`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("clinic-admin").join("config.json"))
    }

    /// Reads a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies overrides from `lookup` (normally the process environment),
    /// then validates and normalises the result.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(filter) = lookup(LOG_FILTER_ENV).filter(|v| !v.trim().is_empty()) {
            self.log_filter = filter;
        }
        self.api_base_url = normalize_base_url(&self.api_base_url)?;
        Ok(self)
    }
}

/// Checks that `raw` is an absolute http(s) URL and strips trailing slashes.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let invalid = |detail: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        detail,
    };
    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
