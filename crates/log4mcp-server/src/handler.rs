//! Protocol engine: handshake gating and method dispatch.
//!
//! One [`RequestHandler`] is shared by every session of a server, so the
//! handshake state and the logger registry are shared as well. Requests get
//! exactly one response; notifications never get one, not even on error.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log4mcp_logs::{LoggerDefaults, LoggerRegistry, Severity};
use log4mcp_proto::{
    Call, CapabilitiesResult, EntriesResult, INTERNAL_ERROR, Incoming, InitializeResult,
    PROTOCOL_VERSION, ProtocolError, ProtocolResult, Response, ServerCapabilities, ServerInfo,
    SuccessResult, decode_line, encode_response, is_handshake_method, names, recover_id,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

/// Serves decoded messages against a shared logger registry.
#[derive(Debug)]
pub struct RequestHandler {
    registry: Arc<LoggerRegistry>,
    initialized: AtomicBool,
    server_info: ServerInfo,
}

impl RequestHandler {
    /// Create a handler with a fresh registry.
    #[must_use]
    pub fn new(defaults: LoggerDefaults) -> Self {
        Self::with_registry(Arc::new(LoggerRegistry::new(defaults)))
    }

    /// Create a handler over an existing registry.
    #[must_use]
    pub fn with_registry(registry: Arc<LoggerRegistry>) -> Self {
        Self {
            registry,
            initialized: AtomicBool::new(false),
            server_info: ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// The registry this handler serves.
    pub const fn registry(&self) -> &Arc<LoggerRegistry> {
        &self.registry
    }

    /// Whether the handshake has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Handle one raw input line.
    ///
    /// Returns the encoded response line (without newline), or `None` for
    /// blank lines and notifications. A line that is not valid UTF-8 gets a
    /// parse error carrying whatever id can be recovered from it.
    pub fn handle_bytes(&self, raw: &[u8]) -> Option<String> {
        match std::str::from_utf8(raw) {
            Ok(line) => self.handle_line(line),
            Err(e) => {
                let id = recover_id(&String::from_utf8_lossy(raw));
                warn!(id = ?id, error = %e, "input line is not valid UTF-8");
                Some(encode_or_fallback(&Response::from_error(
                    id,
                    &ProtocolError::Parse(e.to_string()),
                )))
            }
        }
    }

    /// Handle one input line. See [`RequestHandler::handle_bytes`].
    ///
    /// Blank and whitespace-only lines are keep-alive padding, not messages,
    /// and produce no response.
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match decode_line(line) {
            Ok(incoming) => self.handle(incoming)?,
            Err(failure) => {
                warn!(id = ?failure.id, error = %failure, "undecodable line");
                failure.into_response()
            }
        };
        Some(encode_or_fallback(&response))
    }

    /// Handle a decoded message.
    pub fn handle(&self, incoming: Incoming) -> Option<Response> {
        let (id, method, params) = incoming.into_parts();

        let gated = method != names::INITIALIZED && !is_handshake_method(&method);
        if gated && !self.is_initialized() {
            debug!(%method, id = ?id, "rejected before handshake");
            return id.map(|id| {
                Response::from_error(
                    Some(id),
                    &ProtocolError::InvalidRequest(format!(
                        "server not initialized, {method} requires the initialize handshake"
                    )),
                )
            });
        }

        let outcome = Call::parse(&method, params).and_then(|call| self.dispatch(call));
        match (id, outcome) {
            (Some(id), Ok(result)) => Some(Response::success(id, result)),
            (Some(id), Err(e)) => {
                debug!(%method, %id, code = e.code(), error = %e, "request failed");
                Some(Response::from_error(Some(id), &e))
            }
            (None, Ok(_)) => None,
            (None, Err(e)) => {
                debug!(%method, error = %e, "notification failed");
                None
            }
        }
    }

    fn dispatch(&self, call: Call) -> ProtocolResult<Value> {
        match call {
            Call::Initialize(params) => {
                debug!(
                    client = ?params.client_info.as_ref().map(|c| &c.name),
                    requested = ?params.protocol_version,
                    "initialize"
                );
                to_value(InitializeResult {
                    protocol_version: PROTOCOL_VERSION.to_string(),
                    capabilities: ServerCapabilities::default(),
                    server_info: self.server_info.clone(),
                })
            }
            Call::Initialized => {
                if !self.initialized.swap(true, Ordering::AcqRel) {
                    info!("handshake complete");
                }
                Ok(json!({}))
            }
            Call::Ping => Ok(json!({})),
            Call::Capabilities => {
                let defaults = self.registry.defaults();
                to_value(CapabilitiesResult {
                    methods: names::ALL.iter().map(ToString::to_string).collect(),
                    levels: Severity::ALL.to_vec(),
                    max_log_entries: defaults.max_entries,
                    default_level: defaults.default_level,
                    logger_count: self.registry.count(),
                    loggers: self.registry.names(),
                })
            }
            Call::LogMessage(params) => {
                let logger = self.registry.get_or_create(&params.logger_id);
                let metadata = params.metadata();
                let stored = logger.append(params.level, params.message, metadata);
                debug!(
                    logger = %params.logger_id,
                    level = %params.level,
                    stored,
                    "log.message"
                );
                to_value(SuccessResult::OK)
            }
            Call::GetEntries(params) => {
                let logger = self.registry.get_or_create(&params.logger_id);
                let entries = logger.entries(&params.filter());
                debug!(logger = %params.logger_id, count = entries.len(), "log.getEntries");
                to_value(EntriesResult { entries })
            }
            Call::Clear(params) => {
                self.registry.get_or_create(&params.logger_id).clear();
                debug!(logger = %params.logger_id, "log.clear");
                to_value(SuccessResult::OK)
            }
            Call::SetLevel(params) => {
                self.registry
                    .get_or_create(&params.logger_id)
                    .set_threshold(params.level);
                debug!(logger = %params.logger_id, level = %params.level, "log.setLevel");
                to_value(SuccessResult::OK)
            }
        }
    }
}

impl Default for RequestHandler {
    fn default() -> Self {
        Self::new(LoggerDefaults::default())
    }
}

fn to_value(result: impl Serialize) -> ProtocolResult<Value> {
    serde_json::to_value(result).map_err(|e| ProtocolError::Internal(e.to_string()))
}

fn encode_or_fallback(response: &Response) -> String {
    encode_response(response).unwrap_or_else(|e| {
        error!(error = %e, "failed to encode response");
        json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": {"code": INTERNAL_ERROR, "message": "internal error"}
        })
        .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use log4mcp_proto::{Envelope, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, RequestId};
    use test_case::test_case;

    fn request(id: &str, method: &str, params: Value) -> Incoming {
        Incoming::from(Envelope::request(id, method, params))
    }

    fn notification(method: &str, params: Value) -> Incoming {
        Incoming::from(Envelope::notification(method, params))
    }

    fn initialized_handler() -> RequestHandler {
        let handler = RequestHandler::default();
        assert!(handler.handle(notification(names::INITIALIZED, Value::Null)).is_none());
        handler
    }

    fn error_code(response: &Response) -> i32 {
        response.error_object().map_or(0, |e| e.code)
    }

    // ==================== Handshake Tests ====================

    #[test_case(names::INITIALIZE ; "initialize")]
    #[test_case(names::PING ; "ping")]
    #[test_case(names::CAPABILITIES ; "capabilities")]
    fn handshake_methods_work_before_initialization(method: &str) {
        let handler = RequestHandler::default();
        let response = handler
            .handle(request("1", method, Value::Null))
            .expect("request gets a response");
        assert!(!response.is_error(), "{response:?}");
        assert!(!handler.is_initialized());
    }

    #[test]
    fn domain_request_before_handshake_is_invalid_request() {
        let handler = RequestHandler::default();
        let response = handler
            .handle(request(
                "1",
                names::LOG_MESSAGE,
                json!({"loggerId": "a", "level": "INFO", "message": "m"}),
            ))
            .expect("request gets a response");
        assert_eq!(error_code(&response), INVALID_REQUEST);
        assert_eq!(response.id, Some(RequestId::from("1")));
        assert_eq!(handler.registry().count(), 0);
    }

    #[test]
    fn domain_notification_before_handshake_is_dropped() {
        let handler = RequestHandler::default();
        let response = handler.handle(notification(
            names::LOG_MESSAGE,
            json!({"loggerId": "a", "level": "INFO", "message": "m"}),
        ));
        assert!(response.is_none());
        assert_eq!(handler.registry().count(), 0);
    }

    #[test]
    fn unknown_method_before_handshake_is_invalid_request() {
        let handler = RequestHandler::default();
        let response = handler
            .handle(request("1", "log.frobnicate", Value::Null))
            .expect("request gets a response");
        assert_eq!(error_code(&response), INVALID_REQUEST);
    }

    #[test]
    fn initialized_notification_is_silent_and_one_way() {
        let handler = RequestHandler::default();
        assert!(handler.handle(notification(names::INITIALIZED, Value::Null)).is_none());
        assert!(handler.is_initialized());
        assert!(handler.handle(notification(names::INITIALIZED, Value::Null)).is_none());
        assert!(handler.is_initialized());
    }

    #[test]
    fn initialized_sent_as_request_is_answered() {
        let handler = RequestHandler::default();
        let response = handler
            .handle(request("9", names::INITIALIZED, Value::Null))
            .expect("request gets a response");
        assert_eq!(response.result(), Some(&json!({})));
        assert!(handler.is_initialized());
    }

    #[test]
    fn initialize_reports_server_info() {
        let handler = RequestHandler::default();
        let response = handler
            .handle(request(
                "1",
                names::INITIALIZE,
                json!({"protocolVersion": "2024-11-05", "clientInfo": {"name": "test"}}),
            ))
            .expect("response");
        let result = response.result().expect("success");
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "log4mcp-server");
        assert!(result["capabilities"].is_object());
    }

    // ==================== Dispatch Tests ====================

    #[test]
    fn message_then_entries() {
        let handler = initialized_handler();
        let response = handler
            .handle(request(
                "1",
                names::LOG_MESSAGE,
                json!({"loggerId": "app", "level": "ERROR", "message": "boom", "file": "main.rs"}),
            ))
            .expect("response");
        assert_eq!(response.result(), Some(&json!({"success": true})));

        let response = handler
            .handle(request("2", names::LOG_GET_ENTRIES, json!({"loggerId": "app"})))
            .expect("response");
        let entries = &response.result().expect("success")["entries"];
        assert_eq!(entries.as_array().map(Vec::len), Some(1));
        assert_eq!(entries[0]["message"], "boom");
        assert_eq!(entries[0]["level"], "ERROR");
        assert_eq!(entries[0]["loggerId"], "app");
        assert_eq!(entries[0]["file"], "main.rs");
    }

    #[test]
    fn get_entries_for_unknown_logger_creates_it_empty() {
        let handler = initialized_handler();
        let response = handler
            .handle(request(
                "1",
                names::LOG_GET_ENTRIES,
                json!({"loggerId": "new", "level": null}),
            ))
            .expect("response");
        assert_eq!(response.result(), Some(&json!({"entries": []})));
        assert!(handler.registry().get("new").is_some());
    }

    #[test]
    fn get_entries_level_is_exact() {
        let handler = initialized_handler();
        for level in ["INFO", "WARN", "ERROR"] {
            handler.handle(notification(
                names::LOG_MESSAGE,
                json!({"loggerId": "a", "level": level, "message": level}),
            ));
        }
        let response = handler
            .handle(request(
                "1",
                names::LOG_GET_ENTRIES,
                json!({"loggerId": "a", "level": "WARN"}),
            ))
            .expect("response");
        let entries = response.result().expect("success")["entries"].clone();
        assert_eq!(entries.as_array().map(Vec::len), Some(1));
        assert_eq!(entries[0]["level"], "WARN");
    }

    #[test]
    fn set_level_drops_future_lower_entries() {
        let handler = initialized_handler();
        handler.handle(request(
            "1",
            names::LOG_SET_LEVEL,
            json!({"loggerId": "a", "level": "WARN"}),
        ));
        handler.handle(notification(
            names::LOG_MESSAGE,
            json!({"loggerId": "a", "level": "INFO", "message": "x"}),
        ));
        handler.handle(notification(
            names::LOG_MESSAGE,
            json!({"loggerId": "a", "level": "ERROR", "message": "y"}),
        ));

        let logger = handler.registry().get("a").expect("created");
        let messages: Vec<String> = logger
            .entries(&log4mcp_logs::LogFilter::new())
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, vec!["y"]);
    }

    #[test]
    fn clear_only_affects_named_logger() {
        let handler = initialized_handler();
        for logger in ["a", "b"] {
            handler.handle(notification(
                names::LOG_MESSAGE,
                json!({"loggerId": logger, "level": "INFO", "message": "m"}),
            ));
        }
        let response = handler
            .handle(request("1", names::LOG_CLEAR, json!({"loggerId": "a"})))
            .expect("response");
        assert_eq!(response.result(), Some(&json!({"success": true})));

        let registry = handler.registry();
        assert!(registry.get("a").is_some_and(|l| l.is_empty()));
        assert_eq!(registry.get("b").map(|l| l.len()), Some(1));
    }

    #[test]
    fn capabilities_describe_server() {
        let handler = RequestHandler::new(LoggerDefaults::new(25, Severity::Debug));
        let response = handler
            .handle(request("1", names::CAPABILITIES, Value::Null))
            .expect("response");
        let result = response.result().expect("success");
        assert_eq!(result["maxLogEntries"], 25);
        assert_eq!(result["defaultLevel"], "DEBUG");
        assert_eq!(result["loggerCount"], 0);
        assert_eq!(result["loggers"], json!([]));
        assert_eq!(result["levels"][0], "TRACE");
        assert!(
            result["methods"]
                .as_array()
                .is_some_and(|m| m.contains(&json!("log.getEntries")))
        );
    }

    #[test]
    fn invalid_params_request_and_notification() {
        let handler = initialized_handler();
        let params = json!({"loggerId": "a", "level": "LOUD", "message": "m"});

        let response = handler
            .handle(request("1", names::LOG_MESSAGE, params.clone()))
            .expect("response");
        assert_eq!(error_code(&response), INVALID_PARAMS);

        assert!(handler.handle(notification(names::LOG_MESSAGE, params)).is_none());
    }

    #[test]
    fn unknown_method_after_handshake() {
        let handler = initialized_handler();
        let response = handler
            .handle(request("1", "log.frobnicate", Value::Null))
            .expect("response");
        assert_eq!(error_code(&response), METHOD_NOT_FOUND);

        assert!(handler.handle(notification("log.frobnicate", Value::Null)).is_none());
    }

    // ==================== Line Tests ====================

    #[test]
    fn malformed_line_yields_parse_error() {
        let handler = RequestHandler::default();
        let line = handler.handle_line("{not json").expect("one response line");
        let value: Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["error"]["code"], -32700);
        assert!(value["id"].is_null());
    }

    #[test]
    fn invalid_utf8_yields_parse_error() {
        let handler = RequestHandler::default();
        let raw = b"{\"jsonrpc\":\"2.0\",\"id\":\"7\",\"method\":\"log.message\",\
                    \"params\":{\"message\":\"\xff\"}}";
        let line = handler.handle_bytes(raw).expect("one response line");
        let value: Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["error"]["code"], -32700);
        assert_eq!(value["id"], "7");
    }

    #[test]
    fn invalid_utf8_without_id_has_null_id() {
        let handler = RequestHandler::default();
        let line = handler.handle_bytes(b"{\"method\":\"\xfe\"}").expect("one response line");
        let value: Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["error"]["code"], -32700);
        assert!(value["id"].is_null());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let handler = RequestHandler::default();
        assert!(handler.handle_line("").is_none());
        assert!(handler.handle_line("   \r").is_none());
    }

    #[test]
    fn request_line_echoes_id_type() {
        let handler = RequestHandler::default();
        let line = handler
            .handle_line(r#"{"jsonrpc":"2.0","id":17,"method":"ping"}"#)
            .expect("response");
        let value: Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["id"], 17);
        assert_eq!(value["result"], json!({}));
    }
}
