//! Logging for oogl
//!
//! Every wrapper reports through one process-wide [`Logger`]. The default
//! one prints colored lines to stdout; tests and applications can install
//! their own with [`set_logger`].
//!
//! Levels as used by the crate:
//! - `Trace`: per-call GL traffic (enable, bind, upload)
//! - `Debug`: allocation, compile/link, skipped inactive names
//! - `Warn`: leaked handles, swallowed deletion failures
//! - `Error`: failures returned to the caller, with file:line
//!
//! The logger is the only global state in the crate; GL bookkeeping always
//! lives in a `Context`.

use colored::*;
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Receives every log entry
///
/// ```no_run
/// use oogl::log::{Logger, LogEntry, LogSeverity};
///
/// struct StderrWarnings;
///
/// impl Logger for StderrWarnings {
///     fn log(&self, entry: &LogEntry) {
///         if entry.severity >= LogSeverity::Warn {
///             eprintln!("{}: {}", entry.source, entry.message);
///         }
///     }
/// }
///
/// oogl::log::set_logger(StderrWarnings);
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// One log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting wrapper, e.g. "oogl::VertexBuffer"
    pub source: String,
    pub message: String,
    /// Set for `Error` entries only
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogSeverity {
    /// Parse a level name as accepted by `OOGL_LOG` (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogSeverity::Trace),
            "debug" => Some(LogSeverity::Debug),
            "info" => Some(LogSeverity::Info),
            "warn" | "warning" => Some(LogSeverity::Warn),
            "error" => Some(LogSeverity::Error),
            _ => None,
        }
    }
}

/// Colored stdout logger
///
/// Prints `[time] [LEVEL] [source] message`, plus `(file:line)` for errors.
/// Entries below the level named by the `OOGL_LOG` environment variable
/// (read once, default `info`) are dropped.
pub struct DefaultLogger;

impl DefaultLogger {
    /// Lowest severity printed
    pub fn min_severity() -> LogSeverity {
        static MIN: OnceLock<LogSeverity> = OnceLock::new();
        *MIN.get_or_init(|| {
            std::env::var("OOGL_LOG")
                .ok()
                .and_then(|value| LogSeverity::from_name(&value))
                .unwrap_or(LogSeverity::Info)
        })
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.severity < Self::min_severity() {
            return;
        }

        let time: DateTime<Local> = entry.timestamp.into();
        let level = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };
        let location = match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(" ({}:{})", file, line),
            _ => String::new(),
        };

        println!(
            "[{}] [{}] [{}] {}{}",
            time.format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            entry.source.bright_blue(),
            entry.message,
            location
        );
    }
}

// ===== GLOBAL LOGGER =====

static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

fn dispatch(entry: LogEntry) {
    if let Ok(current) = logger().read() {
        current.log(&entry);
    }
}

/// Install `new_logger` for the whole process
pub fn set_logger<L: Logger + 'static>(new_logger: L) {
    if let Ok(mut current) = logger().write() {
        *current = Box::new(new_logger);
    }
}

/// Go back to `DefaultLogger`
pub fn reset_logger() {
    if let Ok(mut current) = logger().write() {
        *current = Box::new(DefaultLogger);
    }
}

/// Backend of `oogl_trace!` .. `oogl_warn!`
pub fn log(severity: LogSeverity, source: &str, message: String) {
    dispatch(LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message,
        file: None,
        line: None,
    });
}

/// Backend of `oogl_error!`, `oogl_err!` and `oogl_bail!`
pub fn log_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    dispatch(LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message,
        file: Some(file),
        line: Some(line),
    });
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
///
/// ```no_run
/// oogl::oogl_trace!("oogl::Context", "glEnable({:?})", "Blend");
/// ```
#[macro_export]
macro_rules! oogl_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log($crate::log::LogSeverity::Trace, $source, format!($($arg)*))
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! oogl_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log($crate::log::LogSeverity::Debug, $source, format!($($arg)*))
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! oogl_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log($crate::log::LogSeverity::Info, $source, format!($($arg)*))
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! oogl_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log($crate::log::LogSeverity::Warn, $source, format!($($arg)*))
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! oogl_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR message and evaluate to `Error::InvalidResource` with the same text
#[macro_export]
macro_rules! oogl_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::Error::InvalidResource(message)
    }};
}

/// Log an ERROR message and return `Err(Error::InvalidResource(..))`
#[macro_export]
macro_rules! oogl_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::oogl_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
