//! Unit tests for error.rs
//!
//! Tests all Error variants, their Display output, and the error macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("glGenBuffers failed".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("glGenBuffers failed"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of GPU memory");
}

#[test]
fn test_invalid_input_display() {
    let err = Error::InvalidInput("vertex array length 7 is not a multiple of 3".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Invalid input"));
    assert!(display.contains("multiple of 3"));
}

#[test]
fn test_missing_data_display() {
    let err = Error::MissingData("no indices".to_string());
    assert_eq!(format!("{}", err), "Missing data: no indices");
}

#[test]
fn test_incomplete_animation_display() {
    let err = Error::IncompleteAnimation("1 frame".to_string());
    assert!(format!("{}", err).contains("Incomplete animation"));
}

// ============================================================================
// CONVERSIONS AND TRAITS
// ============================================================================

#[test]
fn test_error_from_io_error() {
    let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stream ended");
    let err: Error = io.into();
    match err {
        Error::Io(msg) => assert!(msg.contains("stream ended")),
        other => panic!("expected Io, got {:?}", other),
    }
}

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone() {
    let err1 = Error::InvalidResource("node".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// MACROS
// ============================================================================

fn bail_if_negative(value: i32) -> Result<i32> {
    if value < 0 {
        crate::engine_bail!("arbor3d::tests", InvalidInput => "negative value {}", value);
    }
    Ok(value)
}

#[test]
fn test_engine_bail_returns_variant() {
    assert_eq!(bail_if_negative(3).unwrap(), 3);
    match bail_if_negative(-2) {
        Err(Error::InvalidInput(msg)) => assert_eq!(msg, "negative value -2"),
        other => panic!("expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn test_engine_err_builds_variant() {
    let err = crate::engine_err!("arbor3d::tests", MissingData => "{} has no {}", "mesh", "indices");
    match err {
        Error::MissingData(msg) => assert_eq!(msg, "mesh has no indices"),
        other => panic!("expected MissingData, got {:?}", other),
    }
}
