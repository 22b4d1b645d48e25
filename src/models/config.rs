//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Flat-file cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Announcement retrieval settings
    #[serde(default)]
    pub retriever: RetrieverConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Use the given cache file. An empty name disables persistence.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.cache.filename = filename.into();
        self
    }

    /// Disable the cache file entirely.
    pub fn online_only(self) -> Self {
        self.with_filename("")
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.retriever.user_agent.trim().is_empty() {
            return Err(AppError::validation("retriever.user_agent is empty"));
        }
        if self.retriever.search_url.trim().is_empty() {
            return Err(AppError::validation("retriever.search_url is empty"));
        }
        if self.retriever.content_selector.trim().is_empty() {
            return Err(AppError::validation(
                "retriever.content_selector is empty",
            ));
        }
        if self.retriever.timeout_secs == 0 {
            return Err(AppError::validation("retriever.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.retriever.search_url)?;
        Ok(())
    }
}

/// Cache file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache file path; empty disables persistence
    #[serde(default = "defaults::filename")]
    pub filename: String,
}

impl CacheConfig {
    /// The cache path, or `None` when persistence is disabled.
    pub fn path(&self) -> Option<PathBuf> {
        let trimmed = self.filename.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            filename: defaults::filename(),
        }
    }
}

/// HTTP client and retrieval behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Search endpoint of the government site
    #[serde(default = "defaults::search_url")]
    pub search_url: String,

    /// CSS selector of the announcement body
    #[serde(default = "defaults::content_selector")]
    pub content_selector: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay before each announcement fetch in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            search_url: defaults::search_url(),
            content_selector: defaults::content_selector(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "defaults::level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::level(),
        }
    }
}

mod defaults {
    // Cache defaults
    pub fn filename() -> String {
        "holiday-data".into()
    }

    // Retriever defaults
    pub fn search_url() -> String {
        "http://sousuo.gov.cn/s.htm".into()
    }
    pub fn content_selector() -> String {
        "td#UCAP-CONTENT".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; china-holiday/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        500
    }

    // Logging defaults
    pub fn level() -> String {
        "info".into()
    }
}
