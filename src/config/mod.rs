//! Configuration management for feed-digest.
//!
//! Configuration is read from the file given with `--config`, otherwise from
//! `~/.config/feed-digest/config.toml` when it exists. Missing fields use
//! default values; command-line flags and environment variables override
//! whatever the file says.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app::FeedDigestError;
use crate::fetcher::{DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_TIMEOUT_SECS};

/// Week offset used when none is configured: the week starts Saturday 01:00.
pub const DEFAULT_WEEK_OFFSET_HOURS: i64 = 47;

/// Offsets must stay within one week in either direction.
const MAX_WEEK_OFFSET_HOURS: i64 = 167;

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub archive: ArchiveConfig,
    pub digest: DigestConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Feed to fetch; required by `run` and `update`.
    pub url: Option<String>,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Largest accepted response body in bytes (default: 10 MiB)
    pub max_response_bytes: usize,

    /// User agent sent with feed requests
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: concat!("feed-digest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub path: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Name shown in rendered documents
    pub user_name: String,

    /// Hours added to each published time before picking its ISO week
    pub week_offset_hours: i64,

    /// Base directory for generated documents
    pub output_dir: PathBuf,

    /// Weekly documents go here, relative to `output_dir`
    pub weekly_dir: PathBuf,

    /// Summary document file name, relative to `output_dir`
    pub summary_file: PathBuf,

    /// Custom Handlebars template replacing the built-in one
    pub template: Option<PathBuf>,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            user_name: "reader".to_string(),
            week_offset_hours: DEFAULT_WEEK_OFFSET_HOURS,
            output_dir: PathBuf::from("."),
            weekly_dir: PathBuf::from("data"),
            summary_file: PathBuf::from("README.md"),
            template: None,
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub user_name: Option<String>,
    pub week_offset_hours: Option<i64>,
    pub archive_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default path is used
    /// if present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Ok(default_path) if default_path.exists() => Self::from_file(&default_path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Get the default config file path: `~/.config/feed-digest/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("feed-digest").join("config.toml"))
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.url {
            self.feed.url = Some(url);
        }
        if let Some(user_name) = overrides.user_name {
            self.digest.user_name = user_name;
        }
        if let Some(offset) = overrides.week_offset_hours {
            self.digest.week_offset_hours = offset;
        }
        if let Some(path) = overrides.archive_path {
            self.archive.path = path;
        }
        if let Some(dir) = overrides.output_dir {
            self.digest.output_dir = dir;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let offset = self.digest.week_offset_hours;
        if offset.abs() > MAX_WEEK_OFFSET_HOURS {
            return Err(ConfigError::Invalid(format!(
                "week_offset_hours must be between -{MAX_WEEK_OFFSET_HOURS} and {MAX_WEEK_OFFSET_HOURS}, got {offset}"
            )));
        }
        if self.feed.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".into()));
        }
        if self.feed.max_response_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_response_bytes must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn feed_url(&self) -> Result<&str, ConfigError> {
        self.feed
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingFeedUrl)
    }

    /// The default config file content with comments.
    pub fn default_config_content() -> String {
        r##"# feed-digest configuration
#
# Command-line flags and the environment variables RSS_URL, USERNAME,
# WEEK_OFFSET, ARCHIVE_PATH and OUTPUT_DIR take precedence over this file.

[feed]
# RSS feed to archive (required for `run` and `update`)
# url = "https://www.instapaper.com/rss/..."

# Request timeout in seconds
timeout_secs = 30

# Responses larger than this are rejected (10 MiB)
max_response_bytes = 10485760

[archive]
# JSON archive of every item seen so far
path = "data.json"

[digest]
# Name shown in the generated documents
user_name = "reader"

# Hours added to each published time before picking its ISO week.
# 0 keeps the Monday 00:00 cut-off, 47 moves it to Saturday 01:00.
week_offset_hours = 47

# Documents are written below this directory
output_dir = "."

# Weekly documents (YYYY-WW.md), relative to output_dir
weekly_dir = "data"

# Summary document, relative to output_dir
summary_file = "README.md"

# Custom Handlebars template (optional)
# template = "digest.md.hbs"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("No feed URL configured (set RSS_URL, --url or [feed] url)")]
    MissingFeedUrl,

    #[error("{0}")]
    Invalid(String),
}

impl From<ConfigError> for FeedDigestError {
    fn from(e: ConfigError) -> Self {
        FeedDigestError::Config(e.to_string())
    }
}
