//! Integration tests for Engine logging system
//!
//! These tests verify the logging system functionality, including the
//! diagnostics emitted by scene operations.
//!
//! Run with: cargo test --test logging_integration_tests

use arbor_3d::arbor3d::Engine;
use arbor_3d::arbor3d::log::{Logger, LogEntry, LogSeverity, LogConfig};
use arbor_3d::arbor3d::resource::GeometryBuffer;
use arbor_3d::arbor3d::scene::{SceneGraph, StatsDrawer};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

/// Install a capturing logger that sees every severity
fn capture() -> Arc<Mutex<Vec<LogEntry>>> {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);
    Engine::set_min_severity(LogSeverity::Trace);
    entries
}

fn restore() {
    Engine::reset_logger();
    Engine::set_min_severity(LogConfig::default().min_severity);
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let entries = capture();

    Engine::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    Engine::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    Engine::log(LogSeverity::Error, "test::module", "Test error message".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(captured[0].severity, LogSeverity::Info);
        assert_eq!(captured[0].source, "test::module");
        assert_eq!(captured[0].message, "Test info message");
        assert_eq!(captured[1].severity, LogSeverity::Warn);
        assert_eq!(captured[2].severity, LogSeverity::Error);
        assert_eq!(captured[2].message, "Test error message");
    }

    restore();
}

#[test]
#[serial]
fn test_integration_error_logging_with_location() {
    let entries = capture();

    Engine::log_detailed(
        LogSeverity::Error,
        "test::error",
        "Critical error occurred".to_string(),
        "test_file.rs",
        42,
    );

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        let entry = &captured[0];
        assert_eq!(entry.source, "test::error");
        assert_eq!(entry.file, Some("test_file.rs"));
        assert_eq!(entry.line, Some(42));
    }

    restore();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let entries = capture();
    Engine::log(LogSeverity::Info, "test", "Message 1".to_string());
    assert_eq!(entries.lock().unwrap().len(), 1);

    Engine::reset_logger();

    // Goes to the default logger, not captured
    Engine::log(LogSeverity::Info, "test", "Message 2".to_string());
    assert_eq!(entries.lock().unwrap().len(), 1);

    restore();
}

#[test]
#[serial]
fn test_integration_min_severity_filter() {
    let entries = capture();
    Engine::set_min_severity(LogSeverity::Warn);

    Engine::log(LogSeverity::Trace, "test", "Trace message".to_string());
    Engine::log(LogSeverity::Debug, "test", "Debug message".to_string());
    Engine::log(LogSeverity::Info, "test", "Info message".to_string());
    Engine::log(LogSeverity::Warn, "test", "Warn message".to_string());
    Engine::log(LogSeverity::Error, "test", "Error message".to_string());

    {
        let captured = entries.lock().unwrap();
        let severities: Vec<LogSeverity> = captured.iter().map(|e| e.severity).collect();
        assert_eq!(severities, vec![LogSeverity::Warn, LogSeverity::Error]);
    }

    restore();
}

// ============================================================================
// DIAGNOSTICS FROM SCENE OPERATIONS
// ============================================================================

#[test]
#[serial]
fn test_integration_rejected_mutation_is_logged_as_error() {
    let entries = capture();

    let mut geometry = GeometryBuffer::new("bad");
    assert!(geometry.set_vertices(&[0.0, 1.0]).is_err());

    {
        let captured = entries.lock().unwrap();
        let error = captured.iter().find(|e| e.severity == LogSeverity::Error).unwrap();
        assert_eq!(error.source, "arbor3d::GeometryBuffer");
        assert!(error.file.is_some());
    }

    restore();
}

#[test]
#[serial]
fn test_integration_draw_of_incomplete_geometry_warns() {
    let entries = capture();

    let mut graph = SceneGraph::new();
    let empty = graph.create_geometry("empty", GeometryBuffer::new("empty"));
    graph.attach_child(graph.root(), empty).unwrap();

    let mut drawer = StatsDrawer::new();
    graph.draw(&mut drawer);

    assert_eq!(drawer.stats().draw_calls, 0);
    {
        let captured = entries.lock().unwrap();
        assert!(captured.iter().any(|e| e.severity == LogSeverity::Warn
            && e.source == "arbor3d::SceneGraph"
            && e.message.contains("empty")));
    }

    restore();
}
