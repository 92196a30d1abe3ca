/// Arbor3D Engine - global host for the logging subsystem
///
/// The scene graph itself is an ordinary owned value (no singletons). The only
/// process-wide state is the logger and its severity filter, stored in
/// thread-safe statics so that diagnostics can be emitted from any module
/// without threading a logger handle through every call.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::error::Result;
use crate::log::{Logger, LogEntry, LogSeverity, LogConfig, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Global minimum severity filter
static MIN_SEVERITY: OnceLock<RwLock<LogSeverity>> = OnceLock::new();

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::new())))
}

fn min_severity_lock() -> &'static RwLock<LogSeverity> {
    MIN_SEVERITY.get_or_init(|| RwLock::new(LogConfig::default().min_severity))
}

// ===== PUBLIC API =====

/// Global logging host
///
/// # Example
///
/// ```no_run
/// use arbor_3d::arbor3d::Engine;
/// use arbor_3d::arbor3d::log::{LogConfig, LogSeverity};
///
/// Engine::initialize_with(LogConfig {
///     min_severity: LogSeverity::Warn,
///     ..LogConfig::default()
/// })?;
/// # Ok::<(), arbor_3d::arbor3d::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Initialize logging with the default configuration
    ///
    /// # Errors
    ///
    /// Currently always succeeds, but returns Result for future extensibility.
    pub fn initialize() -> Result<()> {
        Self::initialize_with(LogConfig::default())
    }

    /// Initialize logging with an explicit configuration
    ///
    /// Installs a `DefaultLogger` built from `config` and applies its
    /// severity filter. Calling it again replaces both.
    pub fn initialize_with(config: LogConfig) -> Result<()> {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(DefaultLogger::with_config(&config));
        }
        Self::set_min_severity(config.min_severity);
        crate::engine_debug!("arbor3d::Engine", "Logging initialized (min severity {:?})",
            config.min_severity);
        Ok(())
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// Replace the default logger with a custom implementation.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use arbor_3d::arbor3d::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct Overlay;
    /// impl Logger for Overlay {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Draw on screen...
    ///     }
    /// }
    ///
    /// Engine::set_logger(Overlay);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    ///
    /// The severity filter is left unchanged.
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(DefaultLogger::new());
        }
    }

    /// Set the minimum severity; lower entries are dropped
    pub fn set_min_severity(severity: LogSeverity) {
        if let Ok(mut lock) = min_severity_lock().write() {
            *lock = severity;
        }
    }

    /// Current minimum severity
    pub fn min_severity() -> LogSeverity {
        min_severity_lock()
            .read()
            .map(|lock| *lock)
            .unwrap_or(LogSeverity::Trace)
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    ///
    /// # Arguments
    ///
    /// * `severity` - Log severity level
    /// * `source` - Source component (e.g., "arbor3d::SceneGraph")
    /// * `message` - Log message
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None, None);
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by engine_error! macro to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some(file), Some(line));
    }

    fn dispatch(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: Option<&'static str>,
        line: Option<u32>,
    ) {
        if severity < Self::min_severity() {
            return;
        }
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file,
                line,
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
