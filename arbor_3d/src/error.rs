//! Error types for the Arbor3D scene graph
//!
//! This module defines the error types used throughout the crate:
//! graphics device failures, malformed input, missing prerequisites,
//! incomplete animation definitions, and import/export stream failures.
//!
//! Errors built with `engine_err!` / `engine_bail!` are logged at the point
//! where they are created, so callers that only need best-effort behavior
//! may discard them.

use std::fmt;

/// Result type for Arbor3D operations
pub type Result<T> = std::result::Result<T, Error>;

/// Arbor3D errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Graphics device failure (buffer generation, upload, deletion)
    BackendError(String),

    /// The graphics device cannot hand out more buffer handles
    OutOfMemory,

    /// Unknown or wrong-kind resource (node key, geometry key, clone mutation)
    InvalidResource(String),

    /// Malformed input (array lengths, matrix sizes)
    InvalidInput(String),

    /// A prerequisite is missing (no vertices, no indices, no projection)
    MissingData(String),

    /// An animation timeline has too few frames to run
    IncompleteAnimation(String),

    /// Stream failure while importing or exporting geometry
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::MissingData(msg) => write!(f, "Missing data: {}", msg),
            Error::IncompleteAnimation(msg) => write!(f, "Incomplete animation: {}", msg),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

// ===== ERROR MACROS =====

/// Build an [`Error`] of the given variant and log it at ERROR severity
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("arbor3d::SceneGraph", InvalidResource => "unknown node {:?}", key);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $kind:ident => $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::arbor3d::Error::$kind(message)
    }};
}

/// Log an error of the given variant and return it from the current function
///
/// # Example
///
/// ```ignore
/// engine_bail!("arbor3d::GeometryBuffer", InvalidInput => "bad length {}", len);
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $kind:ident => $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $kind => $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
