//! Method names, typed params, and result payloads.
//!
//! [`Call::parse`] validates params against the method name, so a handler
//! never has to guess a params shape from the fields that happen to be present.

use log4mcp_logs::{EntryMetadata, LogEntry, LogFilter, Severity};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ProtocolError, ProtocolResult};

/// Protocol version reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Wire method names.
pub mod names {
    /// Handshake request.
    pub const INITIALIZE: &str = "initialize";
    /// Handshake-complete notification.
    pub const INITIALIZED: &str = "notifications/initialized";
    /// Liveness check.
    pub const PING: &str = "ping";
    /// Capability descriptor.
    pub const CAPABILITIES: &str = "system.capabilities";
    /// Append a message to a logger.
    pub const LOG_MESSAGE: &str = "log.message";
    /// Read a logger's entries.
    pub const LOG_GET_ENTRIES: &str = "log.getEntries";
    /// Clear a logger's entries.
    pub const LOG_CLEAR: &str = "log.clear";
    /// Change a logger's threshold.
    pub const LOG_SET_LEVEL: &str = "log.setLevel";

    /// Every method a request may name.
    pub const ALL: [&str; 8] = [
        INITIALIZE,
        INITIALIZED,
        PING,
        CAPABILITIES,
        LOG_MESSAGE,
        LOG_GET_ENTRIES,
        LOG_CLEAR,
        LOG_SET_LEVEL,
    ];
}

/// Returns true for methods answered before the handshake completes.
pub fn is_handshake_method(method: &str) -> bool {
    matches!(
        method,
        names::INITIALIZE | names::PING | names::CAPABILITIES
    )
}

// ─────────────────────────────────────────────────────────────
// Params
// ─────────────────────────────────────────────────────────────

/// Client identity sent with `initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client name
    pub name: String,
    /// Client version
    #[serde(default)]
    pub version: Option<String>,
}

/// Params of `initialize`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by the client
    #[serde(default)]
    pub protocol_version: Option<String>,
    /// Client identity
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
    /// Client capabilities, ignored by the server
    #[serde(default)]
    pub capabilities: Value,
}

/// Params of `log.message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMessageParams {
    /// Target logger; may be empty
    pub logger_id: String,
    /// Entry severity
    #[serde(alias = "severity")]
    pub level: Severity,
    /// Message text
    pub message: String,
    /// Source file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Source line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Source function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

impl LogMessageParams {
    /// Entry metadata for the calling thread plus the client's source location.
    pub fn metadata(&self) -> EntryMetadata {
        EntryMetadata {
            file: self.file.clone(),
            line: self.line,
            function: self.function.clone(),
            ..EntryMetadata::current()
        }
    }
}

/// Params of `log.getEntries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEntriesParams {
    /// Target logger
    pub logger_id: String,
    /// Exact-match severity filter; `null` or absent returns every level
    #[serde(default, alias = "severity")]
    pub level: Option<Severity>,
    /// At-or-above severity filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<Severity>,
    /// Return at most this many of the newest matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl GetEntriesParams {
    /// Storage filter described by these params.
    pub const fn filter(&self) -> LogFilter {
        LogFilter {
            level: self.level,
            min_level: self.min_level,
            limit: self.limit,
        }
    }
}

/// Params of `log.clear`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearParams {
    /// Target logger
    pub logger_id: String,
}

/// Params of `log.setLevel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLevelParams {
    /// Target logger
    pub logger_id: String,
    /// New threshold
    #[serde(alias = "severity")]
    pub level: Severity,
}

/// A method call with params validated for that method.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// `initialize`
    Initialize(InitializeParams),
    /// `notifications/initialized`
    Initialized,
    /// `ping`
    Ping,
    /// `system.capabilities`
    Capabilities,
    /// `log.message`
    LogMessage(LogMessageParams),
    /// `log.getEntries`
    GetEntries(GetEntriesParams),
    /// `log.clear`
    Clear(ClearParams),
    /// `log.setLevel`
    SetLevel(SetLevelParams),
}

impl Call {
    /// Validate `params` against `method`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MethodNotFound`] for unknown methods and
    /// [`ProtocolError::InvalidParams`] when params do not fit the method.
    pub fn parse(method: &str, params: Value) -> ProtocolResult<Self> {
        match method {
            names::INITIALIZE => parse_params(params).map(Self::Initialize),
            names::INITIALIZED => Ok(Self::Initialized),
            names::PING => Ok(Self::Ping),
            names::CAPABILITIES => Ok(Self::Capabilities),
            names::LOG_MESSAGE => parse_params(params).map(Self::LogMessage),
            names::LOG_GET_ENTRIES => parse_params(params).map(Self::GetEntries),
            names::LOG_CLEAR => parse_params(params).map(Self::Clear),
            names::LOG_SET_LEVEL => parse_params(params).map(Self::SetLevel),
            other => Err(ProtocolError::MethodNotFound(other.to_string())),
        }
    }

    /// Wire name of this call.
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Initialize(_) => names::INITIALIZE,
            Self::Initialized => names::INITIALIZED,
            Self::Ping => names::PING,
            Self::Capabilities => names::CAPABILITIES,
            Self::LogMessage(_) => names::LOG_MESSAGE,
            Self::GetEntries(_) => names::LOG_GET_ENTRIES,
            Self::Clear(_) => names::LOG_CLEAR,
            Self::SetLevel(_) => names::LOG_SET_LEVEL,
        }
    }
}

/// Parse params into a typed struct. Absent params decode as `{}`.
fn parse_params<T: DeserializeOwned>(params: Value) -> ProtocolResult<T> {
    let params = if params.is_null() {
        Value::Object(Map::new())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| ProtocolError::InvalidParams(e.to_string()))
}

// ─────────────────────────────────────────────────────────────
// Results
// ─────────────────────────────────────────────────────────────

/// Result of the mutating `log.*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResult {
    /// Always true on success
    pub success: bool,
}

impl SuccessResult {
    /// The success payload.
    pub const OK: Self = Self { success: true };
}

/// Result of `log.getEntries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntriesResult {
    /// Entries in insertion order
    pub entries: Vec<LogEntry>,
}

/// Server identity reported by `initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

/// Capability descriptor reported by `initialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Logging capability, advertised as an empty object
    pub logging: Value,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            logging: Value::Object(Map::new()),
        }
    }
}

/// Result of `initialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Protocol version spoken by the server
    pub protocol_version: String,
    /// Server capabilities
    pub capabilities: ServerCapabilities,
    /// Server identity
    pub server_info: ServerInfo,
}

/// Result of `system.capabilities`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesResult {
    /// Served method names
    pub methods: Vec<String>,
    /// Known severity names in ascending order
    pub levels: Vec<Severity>,
    /// Capacity of new loggers
    pub max_log_entries: usize,
    /// Threshold of new loggers
    pub default_level: Severity,
    /// Number of loggers created so far
    pub logger_count: usize,
    /// Names of existing loggers, sorted
    pub loggers: Vec<String>,
}
