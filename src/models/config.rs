//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Upstream conference list and feed metadata
    #[serde(default)]
    pub feed: FeedConfig,

    /// Default filter settings, extended by CLI flags
    #[serde(default)]
    pub filters: FilterConfig,

    /// Announced-conference state file
    #[serde(default)]
    pub state: StateConfig,

    /// OpenGraph link previews
    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::config("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        Url::parse(&self.feed.base_url)
            .map_err(|e| AppError::config(format!("feed.base_url is invalid: {e}")))?;
        Url::parse(&self.feed.site_url)
            .map_err(|e| AppError::config(format!("feed.site_url is invalid: {e}")))?;
        if self.state.file.as_os_str().is_empty() {
            return Err(AppError::config("state.file is empty"));
        }
        if self.preview.max_description_chars == 0 {
            return Err(AppError::config(
                "preview.max_description_chars must be > 0",
            ));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Where conferences come from and how the generated feed describes itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Root of the per-year, per-topic JSON files
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Public site linked from the generated feed
    #[serde(default = "defaults::site_url")]
    pub site_url: String,

    #[serde(default = "defaults::author")]
    pub author: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            site_url: defaults::site_url(),
            author: defaults::author(),
        }
    }
}

/// Filter defaults. CLI flags are merged on top.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Countries whose conferences are never announced
    #[serde(default)]
    pub countries_blacklist: Vec<String>,

    /// Only announce conferences whose call for papers is over
    #[serde(default)]
    pub cfp_finished: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "defaults::state_file")]
    pub file: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            file: defaults::state_file(),
        }
    }
}

/// OpenGraph preview settings for Teams messages and feed items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "defaults::preview_enabled")]
    pub enabled: bool,

    /// Longer descriptions are cut at a grapheme boundary
    #[serde(default = "defaults::max_description_chars")]
    pub max_description_chars: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::preview_enabled(),
            max_description_chars: defaults::max_description_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; confs-push/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Feed defaults
    pub fn base_url() -> String {
        "https://raw.githubusercontent.com/tech-conferences/conference-data/master/conferences"
            .into()
    }
    pub fn site_url() -> String {
        "https://confs.tech".into()
    }
    pub fn author() -> String {
        "https://confs.tech/".into()
    }

    pub fn state_file() -> PathBuf {
        PathBuf::from("state.json")
    }

    // Preview defaults
    pub fn preview_enabled() -> bool {
        true
    }
    pub fn max_description_chars() -> usize {
        280
    }

    pub fn log_level() -> String {
        "info".into()
    }
}
