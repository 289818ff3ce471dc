//! Error types for logger storage.

use thiserror::Error;

/// Errors that can occur in logger storage.
///
/// Storage operations themselves are total; errors only arise when turning
/// untrusted input into storage values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogError {
    /// A severity name did not match any known level.
    #[error("unknown severity: {0}")]
    UnknownSeverity(String),
}

/// Result type alias for log operations.
pub type Result<T> = std::result::Result<T, LogError>;
