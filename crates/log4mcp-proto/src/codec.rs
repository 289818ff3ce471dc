//! Line codec: one JSON object per line in each direction.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::envelope::{Envelope, Incoming, Response};
use crate::error::{ProtocolError, ProtocolResult};
use crate::id::RequestId;

/// Matches an `"id": <string|integer>` member anywhere in a raw line.
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""id"\s*:\s*(?:("(?:[^"\\]|\\.)*")|(-?\d+))"#)
        .unwrap_or_else(|_| unreachable!())
});

/// A line that could not be decoded into an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct DecodeFailure {
    /// Id recovered from the raw line, if any
    pub id: Option<RequestId>,
    /// Why decoding failed
    pub error: ProtocolError,
}

impl DecodeFailure {
    /// The error response owed to the client for this line.
    pub fn into_response(self) -> Response {
        Response::from_error(self.id, &self.error)
    }
}

/// Decode one line into a request or notification.
///
/// # Errors
///
/// Returns a [`DecodeFailure`] carrying a parse error when the line is not
/// JSON, is not an object, or has a missing or mistyped envelope field.
pub fn decode_line(line: &str) -> Result<Incoming, DecodeFailure> {
    let value: Value = serde_json::from_str(line).map_err(|e| DecodeFailure {
        id: recover_id(line),
        error: ProtocolError::Parse(e.to_string()),
    })?;

    if !value.is_object() {
        return Err(DecodeFailure {
            id: None,
            error: ProtocolError::Parse("expected a JSON object".to_string()),
        });
    }

    let id = structured_id(&value);
    serde_json::from_value::<Envelope>(value)
        .map(Incoming::from)
        .map_err(|e| DecodeFailure {
            id,
            error: ProtocolError::Parse(e.to_string()),
        })
}

/// Best-effort id recovery from a line that failed to decode.
///
/// Tries a structured lookup first and falls back to a textual scan, so a
/// truncated or otherwise broken line can still be answered with its id.
pub fn recover_id(raw: &str) -> Option<RequestId> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return structured_id(&value);
    }

    let captures = ID_PATTERN.captures(raw)?;
    if let Some(quoted) = captures.get(1) {
        return serde_json::from_str::<String>(quoted.as_str())
            .ok()
            .map(RequestId::String);
    }
    captures
        .get(2)
        .and_then(|n| n.as_str().parse::<i64>().ok())
        .map(RequestId::Number)
}

fn structured_id(value: &Value) -> Option<RequestId> {
    value
        .get("id")
        .and_then(|id| serde_json::from_value(id.clone()).ok())
}

/// Encode a response as a single line, without the trailing newline.
///
/// # Errors
///
/// Returns [`ProtocolError::Internal`] if serialization fails.
pub fn encode_response(response: &Response) -> ProtocolResult<String> {
    serde_json::to_string(response).map_err(|e| ProtocolError::Internal(e.to_string()))
}

/// Encode a request or notification as a single line, without the trailing
/// newline.
///
/// # Errors
///
/// Returns [`ProtocolError::Internal`] if serialization fails.
pub fn encode_envelope(envelope: &Envelope) -> ProtocolResult<String> {
    serde_json::to_string(envelope).map_err(|e| ProtocolError::Internal(e.to_string()))
}
