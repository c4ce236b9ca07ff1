//! Panic and error hooks writing through a real file logger.

use crate::hooks::{describe_error, install_panic_hook, report_error};
use crate::logger::{FileLogger, Logger};
use crate::test_utilities::LoggerFixture;
use serde::{Serialize, Serializer};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/// The panic hook is process-global; tests that replace it run one at a time.
static HOOK_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with the logger's panic hook installed, then puts back whatever
/// hook was active before.
fn with_panic_hook<T>(logger: Arc<FileLogger>, f: impl FnOnce() -> T) -> T {
    let _serial = HOOK_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let previous = panic::take_hook();
    install_panic_hook(logger as Arc<dyn Logger>);

    let result = f();

    let _ = panic::take_hook();
    panic::set_hook(previous);
    result
}

/// Serializes by panicking, like a broken user `Serialize` impl.
struct ExplodingValue;

impl Serialize for ExplodingValue {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        panic!("serializer exploded")
    }
}

#[derive(Debug)]
struct ConnectError {
    cause: std::io::Error,
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "database unreachable")
    }
}

impl std::error::Error for ConnectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

fn connect_error() -> ConnectError {
    ConnectError {
        cause: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
    }
}

#[test]
fn test_describe_error_includes_source_chain() {
    let text = describe_error(&connect_error());
    assert_eq!(text, "Error: database unreachable\n  caused by: refused");
}

#[test]
fn test_report_error_writes_error_entry() {
    let fx = LoggerFixture::new();
    report_error(&fx.logger, &connect_error());

    let content = fx.read("main.log");
    assert!(content.contains("[ERROR]: Error: database unreachable"));
    assert!(content.contains("caused by: refused"));
}

#[test]
fn test_report_error_swallows_write_failure() {
    let fx = LoggerFixture::new();
    fx.logger.shutdown();
    // a closed logger rejects the write; the adapter must not propagate it
    report_error(&fx.logger, &connect_error());
    assert!(!fx.exists("main.log"));
}

#[test]
fn test_panic_hook_logs_exception_entry() {
    let fx = LoggerFixture::per_caller();
    let logger: Arc<FileLogger> = Arc::new(fx.logger);

    let result = with_panic_hook(logger, || {
        panic::catch_unwind(|| {
            panic!("worker crashed");
        })
    });

    assert!(result.is_err());
    let content = std::fs::read_to_string(fx.dir.path().join("logs/test_hooks.log")).unwrap();
    assert!(content.contains("[test_hooks.rs] [EXCEPTION]: Uncaught panic: worker crashed in "));
    assert!(content.contains("test_hooks.rs:"));
}

#[test]
fn test_panic_while_rendering_does_not_deadlock_hook() {
    let fx = LoggerFixture::new();
    let logger: Arc<FileLogger> = Arc::new(fx.logger);

    let outcome = with_panic_hook(logger.clone(), || {
        let (tx, rx) = mpsc::channel();
        let writer = logger.clone();
        thread::spawn(move || {
            let failed = panic::catch_unwind(AssertUnwindSafe(|| {
                writer.write(&ExplodingValue, "INFO")
            }));
            let _ = tx.send(failed.is_err());
        });
        // Edge case: the hook runs while the writer thread holds the state lock
        rx.recv_timeout(Duration::from_secs(5))
    });

    assert_eq!(outcome, Ok(true), "write with a panicking serializer must unwind, not hang");

    // the lock was poisoned by the unwinding write; later writes still land
    logger.write("after the panic", "INFO").unwrap();
    logger.flush().unwrap();
    let content = std::fs::read_to_string(fx.dir.path().join("logs/main.log")).unwrap();
    assert!(content.contains("[INFO]: after the panic"));
    assert!(!content.contains("serializer exploded"));
}

#[test]
fn test_flush_from_panic_hook_inside_write_returns() {
    let fx = LoggerFixture::new();
    let logger: Arc<FileLogger> = Arc::new(fx.logger);
    logger.write("before", "INFO").unwrap();

    let outcome = with_panic_hook(logger.clone(), || {
        let (tx, rx) = mpsc::channel();
        let writer = logger.clone();
        thread::spawn(move || {
            let _ = panic::catch_unwind(AssertUnwindSafe(|| {
                writer.write_from(Some("src/jobs.rs"), &ExplodingValue, "ERROR")
            }));
            // the hook's flush must have returned for this thread to get here
            let _ = tx.send(writer.flush().is_ok());
        });
        rx.recv_timeout(Duration::from_secs(5))
    });

    assert_eq!(outcome, Ok(true));
    assert_eq!(logger.open_handle_count(), 1);
}
