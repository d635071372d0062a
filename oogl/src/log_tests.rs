//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry, DefaultLogger and the global logger swap.

use crate::log::{self, Logger, LogEntry, LogSeverity, DefaultLogger};
use serial_test::serial;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "oogl::test".to_string(),
        message: format!("{:?} message", severity),
        file,
        line,
    }
}

/// Captures entries whose source starts with a prefix, so that concurrent
/// tests logging through the global logger do not interfere.
struct CapturingLogger {
    prefix: &'static str,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CapturingLogger {
    fn new(prefix: &'static str) -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { prefix, entries: entries.clone() }, entries)
    }
}

impl Logger for CapturingLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source.starts_with(self.prefix) {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Warn), "Warn");
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        logger.log(&entry(severity, None, None));
        logger.log(&entry(severity, Some("buffer.rs"), Some(42)));
    }
}

#[test]
fn test_severity_from_name() {
    assert_eq!(LogSeverity::from_name("trace"), Some(LogSeverity::Trace));
    assert_eq!(LogSeverity::from_name(" DEBUG "), Some(LogSeverity::Debug));
    assert_eq!(LogSeverity::from_name("Warning"), Some(LogSeverity::Warn));
    assert_eq!(LogSeverity::from_name("error"), Some(LogSeverity::Error));
    assert_eq!(LogSeverity::from_name("verbose"), None);
}

#[test]
fn test_default_logger_threshold_is_stable() {
    assert_eq!(DefaultLogger::min_severity(), DefaultLogger::min_severity());
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
}

// ============================================================================
// GLOBAL LOGGER TESTS
// ============================================================================

#[test]
#[serial]
fn test_set_logger_captures_macros() {
    let (logger, entries) = CapturingLogger::new("oogl::log_test");
    log::set_logger(logger);

    crate::oogl_info!("oogl::log_test", "allocated {} handles", 3);
    crate::oogl_warn!("oogl::log_test", "leaked handle {}", 7);
    crate::oogl_error!("oogl::log_test", "bad handle");

    log::reset_logger();

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 3);
    assert_eq!(captured[0].severity, LogSeverity::Info);
    assert_eq!(captured[0].message, "allocated 3 handles");
    assert!(captured[0].file.is_none());
    assert_eq!(captured[1].severity, LogSeverity::Warn);
    assert_eq!(captured[1].message, "leaked handle 7");
    assert_eq!(captured[2].severity, LogSeverity::Error);
    assert!(captured[2].file.is_some());
    assert!(captured[2].line.is_some());
}

#[test]
#[serial]
fn test_oogl_err_logs_and_builds_error() {
    let (logger, entries) = CapturingLogger::new("oogl::log_test");
    log::set_logger(logger);

    fn fails() -> crate::Result<()> {
        crate::oogl_bail!("oogl::log_test", "size {} out of range", 99);
    }
    let result = fails();

    log::reset_logger();

    match result {
        Err(crate::Error::InvalidResource(msg)) => assert_eq!(msg, "size 99 out of range"),
        other => panic!("unexpected result: {:?}", other),
    }
    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Error);
}

#[test]
#[serial]
fn test_reset_logger_stops_capture() {
    let (logger, entries) = CapturingLogger::new("oogl::log_test");
    log::set_logger(logger);
    log::reset_logger();

    crate::oogl_info!("oogl::log_test", "goes to the console");

    assert!(entries.lock().unwrap().is_empty());
}
