//! Level names and their numeric severities.
//!
//! The five standard levels are fixed. Callers may register custom levels at
//! runtime with any severity, as long as the name does not shadow a standard
//! one. Lookups are case-insensitive; names are stored uppercase.

use crate::error::ConfigError;
use std::collections::HashMap;

/// Built-in levels, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl StandardLevel {
    pub const ALL: [StandardLevel; 5] = [
        StandardLevel::Debug,
        StandardLevel::Info,
        StandardLevel::Warning,
        StandardLevel::Error,
        StandardLevel::Critical,
    ];

    /// Returns the canonical uppercase name written to log files.
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardLevel::Debug => "DEBUG",
            StandardLevel::Info => "INFO",
            StandardLevel::Warning => "WARNING",
            StandardLevel::Error => "ERROR",
            StandardLevel::Critical => "CRITICAL",
        }
    }

    pub fn severity(&self) -> u32 {
        *self as u32
    }

    /// Case-insensitive lookup of a standard level by name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = normalize_level(name);
        Self::ALL.into_iter().find(|level| level.as_str() == name)
    }
}

/// Normalizes a level name to the stored form: trimmed and uppercase.
pub fn normalize_level(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Name to severity mapping shared by filtering and validation.
#[derive(Debug, Clone, Default)]
pub struct SeverityTable {
    custom: HashMap<String, u32>,
}

impl SeverityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or re-registers) a custom level.
    ///
    /// Fails without touching the table when `name` is blank or names a
    /// standard level.
    pub fn add_custom(&mut self, name: &str, severity: u32) -> Result<(), ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidLevelName(name.to_string()));
        }
        let name = normalize_level(name);
        if StandardLevel::from_name(&name).is_some() {
            return Err(ConfigError::StandardLevelCollision(name));
        }
        self.custom.insert(name, severity);
        Ok(())
    }

    pub fn severity_of(&self, name: &str) -> Option<u32> {
        if let Some(level) = StandardLevel::from_name(name) {
            return Some(level.severity());
        }
        self.custom.get(&normalize_level(name)).copied()
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.severity_of(name).is_some()
    }

    pub fn is_custom(&self, name: &str) -> bool {
        self.custom.contains_key(&normalize_level(name))
    }

    /// Registered custom levels, sorted by name.
    pub fn custom_levels(&self) -> Vec<(&str, u32)> {
        let mut levels: Vec<(&str, u32)> = self
            .custom
            .iter()
            .map(|(name, severity)| (name.as_str(), *severity))
            .collect();
        levels.sort_unstable();
        levels
    }
}
