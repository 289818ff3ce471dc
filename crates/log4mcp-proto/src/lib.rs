//! # log4mcp-proto
//!
//! Wire protocol for the Log4MCP logging service.
//!
//! Messages are JSON-RPC 2.0 objects, one per line:
//!
//! Request:
//! ```json
//! {"jsonrpc":"2.0","id":"1","method":"log.message","params":{"loggerId":"app","message":"hi"}}
//! ```
//!
//! Notification (no `id`, never answered):
//! ```json
//! {"jsonrpc":"2.0","method":"notifications/initialized"}
//! ```
//!
//! Response:
//! ```json
//! {"jsonrpc":"2.0","id":"1","result":{"success":true}}
//! ```
//!
//! Error:
//! ```json
//! {"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"parse error: ..."}}
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod envelope;
pub mod error;
pub mod id;
pub mod methods;

pub use codec::{DecodeFailure, decode_line, encode_envelope, encode_response, recover_id};
pub use envelope::{
    Envelope, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, Incoming, JSONRPC_VERSION,
    METHOD_NOT_FOUND, Notification, Outcome, PARSE_ERROR, Request, Response, RpcError, Version,
};
pub use error::{ProtocolError, ProtocolResult};
pub use id::RequestId;
pub use methods::{
    Call, CapabilitiesResult, ClearParams, ClientInfo, EntriesResult, GetEntriesParams,
    InitializeParams, InitializeResult, LogMessageParams, PROTOCOL_VERSION, ServerCapabilities,
    ServerInfo, SetLevelParams, SuccessResult, is_handshake_method, names,
};
