//! Protocol error types

use thiserror::Error;

use crate::envelope::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, RpcError,
};

/// Protocol error type
///
/// Every variant maps onto one standard JSON-RPC error code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Malformed bytes, invalid JSON, or a bad envelope field
    #[error("parse error: {0}")]
    Parse(String),

    /// Protocol violation, such as use before the handshake
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Method name is not served
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// Params are missing or have the wrong shape for the method
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// Unexpected failure while serving a request
    #[error("internal error: {0}")]
    Internal(String),
}

impl ProtocolError {
    /// Get the JSON-RPC error code for this error
    pub const fn code(&self) -> i32 {
        match self {
            Self::Parse(_) => PARSE_ERROR,
            Self::InvalidRequest(_) => INVALID_REQUEST,
            Self::MethodNotFound(_) => METHOD_NOT_FOUND,
            Self::InvalidParams(_) => INVALID_PARAMS,
            Self::Internal(_) => INTERNAL_ERROR,
        }
    }

    /// Convert into the wire error object
    pub fn to_rpc_error(&self) -> RpcError {
        RpcError::new(self.code(), self.to_string())
    }
}

/// Protocol result type
pub type ProtocolResult<T> = Result<T, ProtocolError>;
