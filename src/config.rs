//! Logger configuration and JSON config loading.
//!
//! [`LoggerConfig`] holds the state the logger consults on every write.
//! [`LoggerSettings`] is what a config file deserializes into: the same
//! fields plus the custom levels to register at construction time.
//!
//! ```json
//! {
//!   "environment": "production",
//!   "min_level": "WARNING",
//!   "max_file_size_bytes": 10240,
//!   "routing": { "per_caller": { "default": "main.log" } },
//!   "custom_levels": { "SESSION": 2, "AUDIT": 3 }
//! }
//! ```

use crate::error::{ConfigError, LogError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
pub const DEFAULT_LOG_FILE: &str = "main.log";
pub const DEFAULT_BASE_DIR: &str = "logs";

/// Deployment mode. Changes how strictly messages are filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Everything is logged regardless of the minimum level.
    #[default]
    Development,
    Testing,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "testing" => Ok(Environment::Testing),
            "production" => Ok(Environment::Production),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }
}

/// How a write picks its target file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingPolicy {
    /// Every write goes to the same file.
    Fixed(String),
    /// One file per calling unit (`billing.rs` -> `billing.log`), falling back
    /// to `default` when the caller is unknown.
    PerCaller { default: String },
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        RoutingPolicy::Fixed(DEFAULT_LOG_FILE.to_string())
    }
}

/// What happens when the filesystem refuses a directory, open, append,
/// flush or rotation delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoFailurePolicy {
    /// Return [`LogError::Io`] from the failing call.
    #[default]
    Propagate,
    /// Drop the entry and report success.
    Skip,
}

/// Shape of one persisted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryLayout {
    /// `[ts] [label] [LEVEL]: message\n`
    #[default]
    Line,
    /// `[ts label] [LEVEL]:\nmessage\n\n`
    Block,
}

/// Runtime configuration owned by a [`FileLogger`](crate::logger::FileLogger).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub environment: Environment,
    /// Normalized to uppercase; always resolvable in the severity table.
    pub min_level: String,
    pub rotation_enabled: bool,
    pub max_file_size_bytes: u64,
    /// Directory holding every log file. Created on first write.
    pub base_dir: PathBuf,
    pub routing: RoutingPolicy,
    pub io_failure: IoFailurePolicy,
    pub layout: EntryLayout,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            min_level: "DEBUG".to_string(),
            rotation_enabled: true,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            routing: RoutingPolicy::default(),
            io_failure: IoFailurePolicy::default(),
            layout: EntryLayout::default(),
        }
    }
}

impl LoggerConfig {
    /// Default configuration rooted at `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }
}

/// Contents of a logger config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    #[serde(flatten)]
    pub config: LoggerConfig,
    /// Custom level name to severity, registered before the minimum level
    /// is applied so the minimum may name a custom level.
    pub custom_levels: BTreeMap<String, u32>,
}

/// Reads logger settings from a JSON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<LoggerSettings> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| LogError::ConfigFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| LogError::ConfigFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
