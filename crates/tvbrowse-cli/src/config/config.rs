//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tvbrowse_api::tvmaze::{DEFAULT_GENRE_LIMIT, DEFAULT_RUNNING_LIMIT};
use url::Url;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Genres shown by `genres` and the browse screen when none are configured.
const DEFAULT_GENRES: &[&str] = &["Drama", "Comedy", "Action", "Crime"];

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TVmaze API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Browse listing settings.
    #[serde(default)]
    pub browse: BrowseConfig,
}

/// TVmaze API configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL override (e.g. a local mirror). Uses the public API when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Parses the configured base URL, if any.
    ///
    /// A missing trailing slash is added so relative endpoint paths resolve
    /// beneath the configured prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is set but not a valid URL.
    pub fn parsed_base_url(&self) -> Result<Option<Url>> {
        let Some(raw) = self.base_url.as_deref() else {
            return Ok(None);
        };
        let normalized = if raw.ends_with('/') {
            String::from(raw)
        } else {
            format!("{raw}/")
        };
        let url = Url::parse(&normalized)
            .with_context(|| format!("invalid api.base_url in config: {raw}"))?;
        Ok(Some(url))
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Browse listing configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowseConfig {
    /// Genres listed by default.
    pub genres: Vec<String>,
    /// Shows per genre.
    pub per_genre: usize,
    /// Running shows listed on the browse screen at startup.
    pub running_limit: usize,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            genres: DEFAULT_GENRES.iter().map(|g| String::from(*g)).collect(),
            per_genre: DEFAULT_GENRE_LIMIT,
            running_limit: DEFAULT_RUNNING_LIMIT,
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
