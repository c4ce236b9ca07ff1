//! The file logger and the `Logger` trait it implements.
//!
//! A write runs through five steps under one lock:
//! filter -> resolve target file -> rotate -> open/reuse handle -> append.
//! Holding a single lock over the whole sequence keeps the rotation
//! check-delete-reopen step atomic with respect to other threads.
//!
//! Responsibilities:
//! - Own the severity table, runtime configuration and every open handle
//! - Validate every configuration change before applying it
//! - Apply the configured I/O failure policy uniformly
//!
//! The logger is an ordinary value. Build one at the composition root, wrap
//! it in an [`Arc`], and hand clones (or [`UnitLogger`]s) to consumers.

use super::filter::should_log;
use super::levels::{SeverityTable, StandardLevel, normalize_level};
use super::rotation::check_and_rotate;
use super::router::{FileRouter, resolve_filename, unit_basename};
use crate::config::{
    EntryLayout, Environment, IoFailurePolicy, LoggerConfig, LoggerSettings, load_config,
};
use crate::error::{ConfigError, LogError, Result};
use crate::render;
use serde::Serialize;
use std::cell::Cell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Level used when a caller has no better choice.
pub const DEFAULT_LEVEL: &str = "INFO";

/// `chrono` format of the entry timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lowest standard level; the value the production switch upgrades from.
const DEFAULT_MIN_LEVEL: StandardLevel = StandardLevel::Debug;

/// Minimal logging surface shared by [`FileLogger`] and [`UnitLogger`].
///
/// Only `log` is required; the per-level helpers are written in terms of it,
/// which keeps test doubles small.
pub trait Logger: Send + Sync {
    /// Emit an already-rendered message at `level` on behalf of `source`.
    fn log(&self, source: Option<&str>, level: &str, message: &str) -> Result<()>;

    /// Push every written entry to storage.
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn debug(&self, message: &str) -> Result<()> {
        self.log(None, StandardLevel::Debug.as_str(), message)
    }
    fn info(&self, message: &str) -> Result<()> {
        self.log(None, StandardLevel::Info.as_str(), message)
    }
    fn warning(&self, message: &str) -> Result<()> {
        self.log(None, StandardLevel::Warning.as_str(), message)
    }
    fn error(&self, message: &str) -> Result<()> {
        self.log(None, StandardLevel::Error.as_str(), message)
    }
    fn critical(&self, message: &str) -> Result<()> {
        self.log(None, StandardLevel::Critical.as_str(), message)
    }
}

/// Formats one persisted entry.
pub fn format_entry(
    layout: EntryLayout,
    timestamp: &str,
    label: Option<&str>,
    level: &str,
    message: &str,
) -> String {
    match (layout, label) {
        (EntryLayout::Line, Some(label)) => {
            format!("[{timestamp}] [{label}] [{level}]: {message}\n")
        }
        (EntryLayout::Line, None) => format!("[{timestamp}] [{level}]: {message}\n"),
        (EntryLayout::Block, Some(label)) => {
            format!("[{timestamp} {label}] [{level}]:\n{message}\n\n")
        }
        (EntryLayout::Block, None) => format!("[{timestamp}] [{level}]:\n{message}\n\n"),
    }
}

thread_local! {
    static WRITING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as inside the write path.
///
/// A panic raised while the state lock is held reaches the panic hook on the
/// same thread. Every operation the hook performs must check the flag and
/// back off instead of locking again.
struct WriteGuard;

fn in_write_path() -> bool {
    WRITING.with(Cell::get)
}

impl WriteGuard {
    fn enter() -> Option<Self> {
        if in_write_path() {
            return None;
        }
        WRITING.with(|w| w.set(true));
        Some(WriteGuard)
    }
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        WRITING.with(|w| w.set(false));
    }
}

struct LoggerState {
    config: LoggerConfig,
    levels: SeverityTable,
    router: FileRouter,
    /// Set once a caller picks the minimum level; disables the production upgrade.
    min_level_explicit: bool,
    closed: bool,
}

impl LoggerState {
    fn set_environment(&mut self, environment: Environment) {
        self.config.environment = environment;
        if environment == Environment::Production
            && !self.min_level_explicit
            && self.config.min_level == DEFAULT_MIN_LEVEL.as_str()
        {
            self.config.min_level = StandardLevel::Info.as_str().to_string();
        }
    }

    fn set_min_level(&mut self, level: &str) -> std::result::Result<(), ConfigError> {
        let level = normalize_level(level);
        if !self.levels.is_known(&level) {
            return Err(ConfigError::UnknownLevel(level));
        }
        self.config.min_level = level;
        self.min_level_explicit = true;
        Ok(())
    }

    fn write(&mut self, source: Option<&str>, level: &str, message: impl FnOnce() -> String) -> Result<()> {
        if self.closed {
            return Err(LogError::Closed);
        }
        let level = normalize_level(level);
        if !should_log(&level, &self.config, &self.levels)? {
            return Ok(());
        }

        let filename = resolve_filename(&self.config.routing, source);
        let outcome = self.append(&filename, source.and_then(unit_basename), &level, message);
        self.absorb_io(outcome)
    }

    fn append(
        &mut self,
        filename: &str,
        label: Option<&str>,
        level: &str,
        message: impl FnOnce() -> String,
    ) -> Result<()> {
        check_and_rotate(filename, &mut self.router, &self.config)?;

        let file = self.router.handle(&self.config.base_dir, filename)?;
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let entry = format_entry(self.config.layout, &timestamp, label, level, &message());

        if let Err(e) = file.write_all(entry.as_bytes()) {
            // a handle that failed once is not trusted for the next write
            self.router.release(filename);
            return Err(LogError::io(self.config.base_dir.join(filename), e));
        }
        Ok(())
    }

    fn absorb_io(&self, outcome: Result<()>) -> Result<()> {
        match outcome {
            Err(e) if e.is_io() && self.config.io_failure == IoFailurePolicy::Skip => Ok(()),
            other => other,
        }
    }
}

/// Leveled, environment-aware, rotating file logger.
///
/// Handles are closed when they are rotated away, on [`shutdown`](Self::shutdown),
/// or when the logger is dropped.
pub struct FileLogger {
    state: Mutex<LoggerState>,
}

impl FileLogger {
    /// Builds a logger from runtime configuration.
    pub fn new(config: LoggerConfig) -> std::result::Result<Self, ConfigError> {
        Self::from_settings(LoggerSettings {
            config,
            custom_levels: Default::default(),
        })
    }

    /// Builds a logger from file settings.
    ///
    /// Custom levels are registered first, then the minimum level is applied,
    /// then the environment, exactly as if the equivalent mutators had been
    /// called on a default logger. A minimum of `DEBUG` therefore counts as
    /// the default and is upgraded to `INFO` in production.
    pub fn from_settings(settings: LoggerSettings) -> std::result::Result<Self, ConfigError> {
        let LoggerSettings {
            config,
            custom_levels,
        } = settings;
        if config.max_file_size_bytes == 0 {
            return Err(ConfigError::NonPositiveMaxSize);
        }

        let mut levels = SeverityTable::new();
        for (name, severity) in &custom_levels {
            levels.add_custom(name, *severity)?;
        }

        let environment = config.environment;
        let requested_min = normalize_level(&config.min_level);
        let mut state = LoggerState {
            config: LoggerConfig {
                environment: Environment::Development,
                min_level: DEFAULT_MIN_LEVEL.as_str().to_string(),
                ..config
            },
            levels,
            router: FileRouter::new(),
            min_level_explicit: false,
            closed: false,
        };
        if requested_min != DEFAULT_MIN_LEVEL.as_str() {
            state.set_min_level(&requested_min)?;
        }
        state.set_environment(environment);

        Ok(Self {
            state: Mutex::new(state),
        })
    }

    /// Loads a JSON config file and builds a logger from it.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = load_config(path)?;
        Ok(Self::from_settings(settings)?)
    }

    fn lock(&self) -> MutexGuard<'_, LoggerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes `message` at `level` with no caller identity.
    pub fn write<M: Serialize + ?Sized>(&self, message: &M, level: &str) -> Result<()> {
        self.write_from(None, message, level)
    }

    /// Writes `message` at `level` on behalf of the unit named `source`.
    ///
    /// `source` labels the entry and, under per-caller routing, picks the
    /// target file. A filtered message touches nothing on disk and is never
    /// rendered.
    pub fn write_from<M: Serialize + ?Sized>(
        &self,
        source: Option<&str>,
        message: &M,
        level: &str,
    ) -> Result<()> {
        let Some(_guard) = WriteGuard::enter() else {
            return Ok(());
        };
        self.lock().write(source, level, || render::render(message))
    }

    /// Switches the environment. Entering production raises a still-default
    /// `DEBUG` minimum to `INFO`; an explicitly chosen minimum is kept.
    pub fn set_environment(&self, environment: Environment) -> &Self {
        self.lock().set_environment(environment);
        self
    }

    /// Sets the minimum level. Fails for names the severity table does not know.
    pub fn set_min_level(&self, level: &str) -> std::result::Result<&Self, ConfigError> {
        self.lock().set_min_level(level)?;
        Ok(self)
    }

    /// Registers a custom level. Fails on a collision with a standard name.
    pub fn add_custom_level(
        &self,
        name: &str,
        severity: u32,
    ) -> std::result::Result<&Self, ConfigError> {
        self.lock().levels.add_custom(name, severity)?;
        Ok(self)
    }

    /// Enables or disables rotation, optionally changing the size ceiling.
    pub fn configure_rotation(
        &self,
        enabled: bool,
        max_size_bytes: Option<u64>,
    ) -> std::result::Result<&Self, ConfigError> {
        if max_size_bytes == Some(0) {
            return Err(ConfigError::NonPositiveMaxSize);
        }
        let mut state = self.lock();
        state.config.rotation_enabled = enabled;
        if let Some(max) = max_size_bytes {
            state.config.max_file_size_bytes = max;
        }
        Ok(self)
    }

    /// Flushes and syncs every open handle.
    ///
    /// Does nothing when called from inside this thread's own write, which
    /// is where a panic hook lands if rendering a message panics.
    pub fn flush(&self) -> Result<()> {
        if in_write_path() {
            return Ok(());
        }
        let mut state = self.lock();
        let outcome = {
            let LoggerState { config, router, .. } = &mut *state;
            router.flush_all(&config.base_dir)
        };
        state.absorb_io(outcome)
    }

    /// Releases every handle and stops accepting writes. Returns how many
    /// handles were closed; calling it again closes nothing.
    pub fn shutdown(&self) -> usize {
        let mut state = self.lock();
        state.closed = true;
        state.router.release_all()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Returns a logger bound to `unit` that shares this logger's state.
    pub fn for_unit(self: &Arc<Self>, unit: impl Into<String>) -> UnitLogger {
        UnitLogger {
            logger: Arc::clone(self),
            unit: unit.into(),
        }
    }

    pub fn environment(&self) -> Environment {
        self.lock().config.environment
    }

    pub fn min_level(&self) -> String {
        self.lock().config.min_level.clone()
    }

    pub fn severity_of(&self, level: &str) -> Option<u32> {
        self.lock().levels.severity_of(level)
    }

    pub fn is_known_level(&self, level: &str) -> bool {
        self.lock().levels.is_known(level)
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> LoggerConfig {
        self.lock().config.clone()
    }

    pub fn open_handle_count(&self) -> usize {
        self.lock().router.open_count()
    }

    /// File a write from `source` would target under the current routing.
    pub fn target_filename(&self, source: Option<&str>) -> String {
        resolve_filename(&self.lock().config.routing, source)
    }

    /// Full path of `filename` inside the log directory.
    pub fn log_path(&self, filename: &str) -> PathBuf {
        self.lock().config.base_dir.join(filename)
    }
}

impl Logger for FileLogger {
    fn log(&self, source: Option<&str>, level: &str, message: &str) -> Result<()> {
        self.write_from(source, message, level)
    }

    fn flush(&self) -> Result<()> {
        FileLogger::flush(self)
    }
}

/// A [`FileLogger`] handle pre-bound to one calling unit.
#[derive(Clone)]
pub struct UnitLogger {
    logger: Arc<FileLogger>,
    unit: String,
}

impl UnitLogger {
    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn write<M: Serialize + ?Sized>(&self, message: &M, level: &str) -> Result<()> {
        self.logger.write_from(Some(&self.unit), message, level)
    }
}

impl Logger for UnitLogger {
    fn log(&self, source: Option<&str>, level: &str, message: &str) -> Result<()> {
        self.logger
            .write_from(Some(source.unwrap_or(&self.unit)), message, level)
    }

    fn flush(&self) -> Result<()> {
        self.logger.flush()
    }
}
