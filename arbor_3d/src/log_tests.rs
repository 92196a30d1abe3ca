//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry, LogConfig, and DefaultLogger formatting.

use crate::log::{Logger, LogEntry, LogSeverity, LogConfig, DefaultLogger};
use std::time::SystemTime;

fn entry(severity: LogSeverity, message: &str) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "arbor3d::SceneGraph".to_string(),
        message: message.to_string(),
        file: None,
        line: None,
    }
}

fn plain_logger() -> DefaultLogger {
    DefaultLogger::with_config(&LogConfig {
        min_severity: LogSeverity::Trace,
        colored: false,
        show_timestamp: false,
    })
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
fn test_log_severity_labels_are_fixed_width() {
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        assert_eq!(severity.label().len(), 5);
    }
}

// ============================================================================
// LOG CONFIG TESTS
// ============================================================================

#[test]
fn test_log_config_default() {
    let config = LogConfig::default();
    assert!(config.colored);
    assert!(config.show_timestamp);
    if cfg!(debug_assertions) {
        assert_eq!(config.min_severity, LogSeverity::Debug);
    } else {
        assert_eq!(config.min_severity, LogSeverity::Info);
    }
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_format_plain_entry() {
    let logger = plain_logger();
    let line = logger.format_entry(&entry(LogSeverity::Warn, "Vertices are missing in cube"));
    assert_eq!(line, "[WARN ] [arbor3d::SceneGraph] Vertices are missing in cube");
}

#[test]
fn test_format_error_entry_has_location() {
    let logger = plain_logger();
    let mut e = entry(LogSeverity::Error, "Invalid vertex array length");
    e.file = Some("geometry_buffer.rs");
    e.line = Some(42);

    let line = logger.format_entry(&e);
    assert!(line.starts_with("[ERROR]"));
    assert!(line.ends_with("(geometry_buffer.rs:42)"));
}

#[test]
fn test_format_with_timestamp_has_prefix() {
    let logger = DefaultLogger::with_config(&LogConfig {
        min_severity: LogSeverity::Trace,
        colored: false,
        show_timestamp: true,
    });
    let line = logger.format_entry(&entry(LogSeverity::Info, "ready"));
    // "[YYYY-MM-DD HH:MM:SS.mmm] [INFO ] ..."
    assert!(line.starts_with('['));
    assert!(line.contains("] [INFO ] [arbor3d::SceneGraph] ready"));
}

#[test]
fn test_default_logger_logs_every_severity() {
    let logger = DefaultLogger::new();
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        // Just verify it doesn't panic
        logger.log(&entry(severity, "message"));
    }
}
