//! Leveled file logging.
//!
//! - `levels`: standard and custom level names with their severities
//! - `filter`: the environment-aware emit/skip decision
//! - `router`: target filename resolution and the handle cache
//! - `rotation`: size-based discarding of oversized files
//! - `core`: the `Logger` trait, `FileLogger` orchestrator and `UnitLogger`
//!
//! ```rust,no_run
//! use filelog::config::{Environment, LoggerConfig};
//! use filelog::logger::FileLogger;
//! use std::sync::Arc;
//!
//! let logger = Arc::new(FileLogger::new(LoggerConfig::with_base_dir("logs")).unwrap());
//! logger.set_environment(Environment::Production);
//! logger.add_custom_level("AUDIT", 3).unwrap();
//! logger.write("settings changed", "AUDIT").unwrap();
//!
//! let billing = logger.for_unit("src/billing.rs");
//! billing.write(&serde_json::json!({ "invoice": 42 }), "INFO").unwrap();
//! ```

pub mod core;
pub mod filter;
pub mod levels;
pub mod rotation;
pub mod router;

pub use self::core::{DEFAULT_LEVEL, FileLogger, Logger, UnitLogger, format_entry};
pub use levels::{SeverityTable, StandardLevel};
