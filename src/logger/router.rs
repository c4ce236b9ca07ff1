//! Target file resolution and the append-handle cache.
//!
//! Handles are opened lazily on the first write to a filename and cached for
//! the lifetime of the owning logger. Dropping a cached [`File`] closes it, so
//! removing it from the cache is the only way a handle is released.

use crate::config::RoutingPolicy;
use crate::error::{LogError, Result};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Extension given to per-caller log files.
const LOG_EXTENSION: &str = "log";

/// Returns the last path component of a caller identity, accepting both `/`
/// and `\` separators. `None` when nothing usable remains.
pub fn unit_basename(unit: &str) -> Option<&str> {
    let name = unit.rsplit(['/', '\\']).next()?.trim();
    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

/// Maps a caller identity to its log filename: `src/billing.rs` -> `billing.log`.
pub fn unit_log_filename(unit: &str) -> Option<String> {
    let name = unit_basename(unit)?;
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    Some(format!("{stem}.{LOG_EXTENSION}"))
}

/// Resolves the file a write targets under `policy`.
pub fn resolve_filename(policy: &RoutingPolicy, caller: Option<&str>) -> String {
    match policy {
        RoutingPolicy::Fixed(filename) => filename.clone(),
        RoutingPolicy::PerCaller { default } => caller
            .and_then(unit_log_filename)
            .unwrap_or_else(|| default.clone()),
    }
}

/// Cache of open append handles keyed by filename.
#[derive(Debug, Default)]
pub struct FileRouter {
    handles: HashMap<String, File>,
}

impl FileRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached handle for `filename`, opening it in append mode
    /// (and creating `base_dir`) on first access.
    pub fn handle(&mut self, base_dir: &Path, filename: &str) -> Result<&mut File> {
        match self.handles.entry(filename.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                fs::create_dir_all(base_dir).map_err(|e| LogError::io(base_dir, e))?;
                let path = base_dir.join(filename);
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .map_err(|e| LogError::io(&path, e))?;
                Ok(entry.insert(file))
            }
        }
    }

    pub fn is_open(&self, filename: &str) -> bool {
        self.handles.contains_key(filename)
    }

    pub fn open_count(&self) -> usize {
        self.handles.len()
    }

    /// Closes and forgets the handle for `filename`. Returns whether one was open.
    pub fn release(&mut self, filename: &str) -> bool {
        self.handles.remove(filename).is_some()
    }

    /// Closes every cached handle, returning how many were released.
    pub fn release_all(&mut self) -> usize {
        let count = self.handles.len();
        self.handles.clear();
        count
    }

    /// Flushes and syncs every open handle to storage.
    ///
    /// All handles are attempted; the first failure is returned.
    pub fn flush_all(&mut self, base_dir: &Path) -> Result<()> {
        let mut first_err = None;
        for (filename, file) in &mut self.handles {
            let outcome = file.flush().and_then(|()| file.sync_data());
            if let Err(e) = outcome
                && first_err.is_none()
            {
                first_err = Some(LogError::io(base_dir.join(filename), e));
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
