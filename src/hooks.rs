//! Process-level adapters that turn panics and reported errors into log entries.
//!
//! Nothing here runs implicitly: the composition root calls
//! [`install_panic_hook`] once at startup. Failures of the hook's own write
//! are dropped so a broken log file can never cause a second panic.

use crate::logger::Logger;
use std::error::Error;
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;

/// Level written for uncaught panics.
pub const PANIC_LEVEL: &str = "EXCEPTION";
/// Level written by [`report_error`].
pub const ERROR_LEVEL: &str = "ERROR";

/// Describes a panic as `Uncaught panic: <message> in <file>:<line>`.
pub fn describe_panic(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("Box<dyn Any>");
    match info.location() {
        Some(location) => format!(
            "Uncaught panic: {message} in {}:{}",
            location.file(),
            location.line()
        ),
        None => format!("Uncaught panic: {message}"),
    }
}

/// Describes an error and its `source()` chain.
pub fn describe_error(err: &(dyn Error + 'static)) -> String {
    let mut description = format!("Error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        description.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    description
}

/// Installs a panic hook that logs every panic at [`PANIC_LEVEL`] and then
/// hands over to the previously installed hook.
pub fn install_panic_hook(logger: Arc<dyn Logger>) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let source = info.location().map(|location| location.file());
        let _ = logger.log(source, PANIC_LEVEL, &describe_panic(info));
        let _ = logger.flush();
        previous(info);
    }));
}

/// Logs `err` at [`ERROR_LEVEL`], swallowing any failure of the write itself.
pub fn report_error(logger: &dyn Logger, err: &(dyn Error + 'static)) {
    let _ = logger.log(None, ERROR_LEVEL, &describe_error(err));
}
