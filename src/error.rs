//! Error types for the file logger.
//!
//! Configuration mistakes are always reported to the caller of the mutating
//! method. I/O failures go through [`LogError::Io`] and are either surfaced or
//! absorbed according to the configured [`IoFailurePolicy`](crate::config::IoFailurePolicy).

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by every fallible logger operation.
pub type Result<T> = std::result::Result<T, LogError>;

/// Invalid configuration supplied to a logger mutator or config file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The level name is neither a standard nor a registered custom level.
    #[error("Invalid log level: {0}")]
    UnknownLevel(String),

    /// Level names must contain at least one non-whitespace character.
    #[error("Invalid log level name: {0:?}")]
    InvalidLevelName(String),

    /// Custom levels may not shadow DEBUG, INFO, WARNING, ERROR or CRITICAL.
    #[error("Cannot override standard log level: {0}")]
    StandardLevelCollision(String),

    #[error("Invalid environment: {0}. Valid options are: development, testing, production")]
    InvalidEnvironment(String),

    #[error("Max file size must be a positive number")]
    NonPositiveMaxSize,

    /// The configured minimum level no longer resolves in the severity table.
    #[error("Minimum log level {0} cannot be resolved")]
    UnresolvableMinLevel(String),
}

/// Top-level logger error.
#[derive(Error, Debug)]
pub enum LogError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A directory could not be created or a log file could not be opened,
    /// appended to, flushed or removed.
    #[error("Unable to access log file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON configuration file could not be read or parsed.
    #[error("Unable to load logger config {}: {message}", .path.display())]
    ConfigFile { path: PathBuf, message: String },

    /// The logger was shut down and no longer accepts writes.
    #[error("Logger has been shut down")]
    Closed,
}

impl LogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LogError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures that the `skip` I/O policy is allowed to absorb.
    pub fn is_io(&self) -> bool {
        matches!(self, LogError::Io { .. })
    }
}
