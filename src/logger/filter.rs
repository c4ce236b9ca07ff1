//! Environment-aware filtering.
//!
//! - development: everything is emitted
//! - production: unknown levels compare as INFO
//! - any other environment: unknown levels bypass the threshold

use super::levels::{SeverityTable, StandardLevel};
use crate::config::{Environment, LoggerConfig};
use crate::error::ConfigError;

/// Decides whether a message at `level` is emitted under `config`.
///
/// An unresolvable `config.min_level` is reported as an error rather than
/// treated as a pass; mutators never let that state arise.
pub fn should_log(
    level: &str,
    config: &LoggerConfig,
    table: &SeverityTable,
) -> Result<bool, ConfigError> {
    if config.environment == Environment::Development {
        return Ok(true);
    }

    let severity = match table.severity_of(level) {
        Some(severity) => severity,
        None if config.environment == Environment::Production => StandardLevel::Info.severity(),
        None => return Ok(true),
    };

    let threshold = table
        .severity_of(&config.min_level)
        .ok_or_else(|| ConfigError::UnresolvableMinLevel(config.min_level.clone()))?;

    Ok(severity >= threshold)
}
