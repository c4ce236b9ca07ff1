//! Shared helpers for logger tests.

use crate::config::{Environment, LoggerConfig, RoutingPolicy};
use crate::logger::FileLogger;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A logger writing into a fresh temporary directory.
///
/// The directory lives as long as the fixture.
pub struct LoggerFixture {
    pub dir: TempDir,
    pub logger: FileLogger,
}

impl LoggerFixture {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn in_environment(environment: Environment) -> Self {
        Self::with_config(|config| config.environment = environment)
    }

    /// Builds a fixture after letting `customize` adjust the default config.
    pub fn with_config(customize: impl FnOnce(&mut LoggerConfig)) -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = LoggerConfig::with_base_dir(dir.path().join("logs"));
        customize(&mut config);
        let logger = FileLogger::new(config).unwrap();
        Self { dir, logger }
    }

    pub fn per_caller() -> Self {
        Self::with_config(|config| {
            config.routing = RoutingPolicy::PerCaller {
                default: "main.log".to_string(),
            }
        })
    }

    pub fn log_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("logs")
    }

    /// Contents of `filename`, or an empty string when it does not exist.
    pub fn read(&self, filename: &str) -> String {
        read_or_empty(&self.log_dir().join(filename))
    }

    pub fn lines(&self, filename: &str) -> Vec<String> {
        self.read(filename).lines().map(str::to_string).collect()
    }

    pub fn size(&self, filename: &str) -> u64 {
        fs::metadata(self.log_dir().join(filename))
            .map(|m| m.len())
            .unwrap_or(0)
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.log_dir().join(filename).exists()
    }
}

pub fn read_or_empty(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

/// Asserts `line` has the `[ts] [label] [LEVEL]: message` shape and returns
/// the part after the timestamp.
pub fn strip_timestamp(line: &str) -> &str {
    assert!(line.starts_with('['), "entry should start with a timestamp: {line}");
    let close = line.find(']').expect("timestamp bracket");
    let timestamp = &line[1..close];
    assert!(
        chrono::NaiveDateTime::parse_from_str(timestamp, crate::logger::core::TIMESTAMP_FORMAT)
            .is_ok(),
        "unparseable timestamp {timestamp:?}"
    );
    line[close + 1..].trim_start()
}
