pub mod config;
pub mod error;
pub mod hooks;
pub mod logger;
pub mod render;

pub use config::{Environment, LoggerConfig};
pub use error::{ConfigError, LogError, Result};
pub use logger::{FileLogger, Logger, UnitLogger};

#[cfg(test)]
mod test_utilities;

#[cfg(test)]
mod tests;

/// Writes through a [`FileLogger`] with the invoking source file as caller.
///
/// ```rust,no_run
/// use filelog::{FileLogger, LoggerConfig, file_log};
///
/// let logger = FileLogger::new(LoggerConfig::default()).unwrap();
/// file_log!(logger, "WARNING", "disk almost full").unwrap();
/// ```
#[macro_export]
macro_rules! file_log {
    ($logger:expr, $level:expr, $message:expr) => {
        $logger.write_from(::core::option::Option::Some(::core::file!()), &$message, $level)
    };
}
