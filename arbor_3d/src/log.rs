//! Internal logging system for Arbor3D
//!
//! Every diagnostic produced by the scene graph (rejected attribute arrays,
//! missing geometry data, incomplete timelines, unset projections) goes
//! through this module:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - Minimum severity filtering configured through LogConfig
//! - File and line information for detailed ERROR logs

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to route scene diagnostics somewhere else
/// (a file, an in-game console, a test capture buffer).
///
/// # Example
///
/// ```no_run
/// use arbor_3d::arbor3d::log::{Logger, LogEntry};
///
/// struct ConsoleOverlay;
///
/// impl Logger for ConsoleOverlay {
///     fn log(&self, entry: &LogEntry) {
///         // Push to overlay...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source component (e.g., "arbor3d::SceneGraph", "arbor3d::Timeline")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose information (per-node traversal details)
    Trace,

    /// Development information (buffer allocations, timeline state changes)
    Debug,

    /// Important informational messages
    Info,

    /// Recoverable problems (rejected input, skipped draws)
    Warn,

    /// Error messages with file:line details
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by the default logger
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// Logging configuration applied by `Engine::initialize()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    /// Entries below this severity are dropped before reaching the logger
    pub min_severity: LogSeverity,
    /// Color the severity and source fields (DefaultLogger only)
    pub colored: bool,
    /// Prefix each line with a local timestamp (DefaultLogger only)
    pub show_timestamp: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            min_severity: if cfg!(debug_assertions) {
                LogSeverity::Debug
            } else {
                LogSeverity::Info
            },
            colored: true,
            show_timestamp: true,
        }
    }
}

/// Default logger implementation using console output
///
/// Colors (when enabled):
/// - Trace: bright_black
/// - Debug: cyan
/// - Info: green
/// - Warn: yellow
/// - Error: red + bold
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
#[derive(Debug, Clone, Copy)]
pub struct DefaultLogger {
    colored: bool,
    show_timestamp: bool,
}

impl DefaultLogger {
    /// Create a default logger with colors and timestamps
    pub fn new() -> Self {
        Self::with_config(&LogConfig::default())
    }

    /// Create a default logger from a LogConfig
    pub fn with_config(config: &LogConfig) -> Self {
        Self {
            colored: config.colored,
            show_timestamp: config.show_timestamp,
        }
    }

    /// Format an entry as a single line (without trailing newline)
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        let label = entry.severity.label();
        let (severity_str, source) = if self.colored {
            let severity = match entry.severity {
                LogSeverity::Trace => label.bright_black(),
                LogSeverity::Debug => label.cyan(),
                LogSeverity::Info => label.green(),
                LogSeverity::Warn => label.yellow(),
                LogSeverity::Error => label.red().bold(),
            };
            (severity.to_string(), entry.source.bright_blue().to_string())
        } else {
            (label.to_string(), entry.source.clone())
        };

        let mut line = String::new();
        if self.show_timestamp {
            // YYYY-MM-DD HH:MM:SS.mmm
            let datetime: DateTime<Local> = entry.timestamp.into();
            line.push_str(&format!("[{}] ", datetime.format("%Y-%m-%d %H:%M:%S%.3f")));
        }
        line.push_str(&format!("[{}] [{}] {}", severity_str, source, entry.message));

        if let (Some(file), Some(line_no)) = (entry.file, entry.line) {
            line.push_str(&format!(" ({}:{})", file, line_no));
        }
        line
    }
}

impl Default for DefaultLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        println!("{}", self.format_entry(entry));
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose, typically filtered out)
///
/// # Example
///
/// ```ignore
/// engine_trace!("arbor3d::SceneGraph", "Visiting {}", name);
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::arbor3d::Engine::log(
            $crate::arbor3d::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message (development information)
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::arbor3d::Engine::log(
            $crate::arbor3d::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message (important events)
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::arbor3d::Engine::log(
            $crate::arbor3d::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (recoverable problems)
///
/// # Example
///
/// ```ignore
/// engine_warn!("arbor3d::SceneGraph", "Vertices are missing in {}", name);
/// ```
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::arbor3d::Engine::log(
            $crate::arbor3d::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::arbor3d::Engine::log_detailed(
            $crate::arbor3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
