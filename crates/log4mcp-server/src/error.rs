//! Error types for the Log4MCP server.

use thiserror::Error;

/// Errors that can occur while configuring or running a transport.
///
/// Malformed client input never shows up here; it is answered on the wire.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {0}: {1}")]
    BindFailed(String, std::io::Error),

    /// Reading from or writing to a stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration cannot be served.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
