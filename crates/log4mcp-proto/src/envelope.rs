//! Request and response envelopes.
//!
//! [`Envelope`] is the raw wire shape of anything a client sends.
//! [`Incoming`] splits it into the two cases the server treats differently:
//! a [`Request`] carries an id and always gets exactly one [`Response`], a
//! [`Notification`] has no id and never gets one.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::ProtocolError;
use crate::id::RequestId;

/// The only accepted value of the `jsonrpc` field.
pub const JSONRPC_VERSION: &str = "2.0";

// Standard JSON-RPC error codes
/// Invalid JSON or malformed envelope.
pub const PARSE_ERROR: i32 = -32700;
/// Protocol-level violation.
pub const INVALID_REQUEST: i32 = -32600;
/// Unknown method name.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Missing or wrongly typed params.
pub const INVALID_PARAMS: i32 = -32602;
/// Unexpected server failure.
pub const INTERNAL_ERROR: i32 = -32603;

/// The `"jsonrpc":"2.0"` protocol tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Version;

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(JSONRPC_VERSION)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == JSONRPC_VERSION {
            Ok(Self)
        } else {
            Err(de::Error::custom(format!(
                "unsupported jsonrpc version {raw:?}, expected {JSONRPC_VERSION:?}"
            )))
        }
    }
}

/// Raw wire envelope for requests and notifications.
///
/// An absent `id` stays absent on re-encoding; it never turns into `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Protocol tag
    pub jsonrpc: Version,
    /// Request id; `None` marks a notification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    /// Method name
    pub method: String,
    /// Method parameters, validated later against `method`
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

impl Envelope {
    /// Build a request envelope.
    pub fn request(id: impl Into<RequestId>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: Version,
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    /// Build a notification envelope.
    pub fn notification(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: Version,
            id: None,
            method: method.into(),
            params,
        }
    }
}

/// A message that expects a response.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Id to echo back
    pub id: RequestId,
    /// Method name
    pub method: String,
    /// Method parameters
    pub params: Value,
}

/// A message that never receives a response, not even an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Method name
    pub method: String,
    /// Method parameters
    pub params: Value,
}

/// A decoded client message.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// Carries an id
    Request(Request),
    /// Carries no id
    Notification(Notification),
}

impl Incoming {
    /// Method name of the message.
    pub fn method(&self) -> &str {
        match self {
            Self::Request(r) => &r.method,
            Self::Notification(n) => &n.method,
        }
    }

    /// The request id, if this is a request.
    pub const fn id(&self) -> Option<&RequestId> {
        match self {
            Self::Request(r) => Some(&r.id),
            Self::Notification(_) => None,
        }
    }

    /// Split into id, method and params.
    pub fn into_parts(self) -> (Option<RequestId>, String, Value) {
        match self {
            Self::Request(r) => (Some(r.id), r.method, r.params),
            Self::Notification(n) => (None, n.method, n.params),
        }
    }
}

impl From<Envelope> for Incoming {
    fn from(envelope: Envelope) -> Self {
        match envelope.id {
            Some(id) => Self::Request(Request {
                id,
                method: envelope.method,
                params: envelope.params,
            }),
            None => Self::Notification(Notification {
                method: envelope.method,
                params: envelope.params,
            }),
        }
    }
}

impl From<Incoming> for Envelope {
    fn from(incoming: Incoming) -> Self {
        let (id, method, params) = incoming.into_parts();
        Self {
            jsonrpc: Version,
            id,
            method,
            params,
        }
    }
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Optional structured detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    /// Create an error object without data.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Exactly one of `result` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Success payload
    Result(Value),
    /// Failure payload
    Error(RpcError),
}

/// JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Protocol tag
    pub jsonrpc: Version,
    /// Id copied from the request; `null` when it could not be recovered
    pub id: Option<RequestId>,
    /// Result or error
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Response {
    /// Create a success response
    pub fn success(id: RequestId, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                jsonrpc: Version,
                id: Some(id),
                outcome: Outcome::Result(value),
            },
            Err(e) => Self::from_error(Some(id), &ProtocolError::Internal(e.to_string())),
        }
    }

    /// Create an error response
    pub fn error(id: Option<RequestId>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: Version,
            id,
            outcome: Outcome::Error(RpcError::new(code, message)),
        }
    }

    /// Create an error response from a protocol error
    pub fn from_error(id: Option<RequestId>, err: &ProtocolError) -> Self {
        Self {
            jsonrpc: Version,
            id,
            outcome: Outcome::Error(err.to_rpc_error()),
        }
    }

    /// The result payload, if successful.
    pub const fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(v) => Some(v),
            Outcome::Error(_) => None,
        }
    }

    /// The error object, if failed.
    pub const fn error_object(&self) -> Option<&RpcError> {
        match &self.outcome {
            Outcome::Result(_) => None,
            Outcome::Error(e) => Some(e),
        }
    }

    /// Returns true if this is an error response.
    pub const fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}
