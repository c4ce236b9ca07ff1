//! Size-based rotation.
//!
//! Rotation discards the oversized file outright: the cached handle is
//! closed, the file is deleted, and the next write recreates it empty. No
//! numbered backups are kept.

use super::router::FileRouter;
use crate::config::LoggerConfig;
use crate::error::{LogError, Result};
use std::fs;
use std::io::ErrorKind;

/// Rotates `filename` if rotation is enabled and the file has reached
/// `config.max_file_size_bytes`. Returns whether the file was discarded.
///
/// Must run before the handle for `filename` is obtained for a write.
pub fn check_and_rotate(
    filename: &str,
    router: &mut FileRouter,
    config: &LoggerConfig,
) -> Result<bool> {
    if !config.rotation_enabled {
        return Ok(false);
    }

    let path = config.base_dir.join(filename);
    let size = match fs::metadata(&path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(LogError::io(&path, e)),
    };
    if size < config.max_file_size_bytes {
        return Ok(false);
    }

    // close before unlinking; some platforms refuse to delete open files
    router.release(filename);
    match fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
        Err(e) => Err(LogError::io(&path, e)),
    }
}
