//! Server configuration.

use std::fmt;

use clap::ValueEnum;
use log4mcp_logs::{DEFAULT_MAX_ENTRIES, LoggerDefaults, Severity};

use crate::error::{ServerError, ServerResult};

/// Default TCP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Which transport the server runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TransportMode {
    /// Line-delimited JSON over a TCP socket, many clients.
    #[default]
    Tcp,
    /// Line-delimited JSON over stdin/stdout, one client.
    Stdio,
}

impl TransportMode {
    /// Lower-case name of the mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Stdio => "stdio",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the Log4MCP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind in TCP mode.
    pub host: String,
    /// Port to bind in TCP mode.
    pub port: u16,
    /// Capacity of each newly created logger.
    pub max_log_entries: usize,
    /// Threshold of each newly created logger.
    pub default_level: Severity,
    /// Emit debug diagnostics on stderr.
    pub verbose: bool,
    /// Transport to serve.
    pub mode: TransportMode,
}

impl ServerConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_log_entries: DEFAULT_MAX_ENTRIES,
            default_level: Severity::Info,
            verbose: false,
            mode: TransportMode::Tcp,
        }
    }

    /// Set the bind host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the bind port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the capacity of new loggers.
    #[must_use]
    pub fn with_max_log_entries(mut self, max: usize) -> Self {
        self.max_log_entries = max;
        self
    }

    /// Set the threshold of new loggers.
    #[must_use]
    pub fn with_default_level(mut self, level: Severity) -> Self {
        self.default_level = level;
        self
    }

    /// Enable or disable verbose diagnostics.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the transport mode.
    #[must_use]
    pub fn with_mode(mut self, mode: TransportMode) -> Self {
        self.mode = mode;
        self
    }

    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Defaults applied to loggers created by the registry.
    pub fn logger_defaults(&self) -> LoggerDefaults {
        LoggerDefaults::new(self.max_log_entries, self.default_level)
    }

    /// Check the configuration can be served.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidConfig`] for a zero logger capacity, or
    /// for an empty host or port 0 in TCP mode.
    pub fn validate(&self) -> ServerResult<()> {
        if self.max_log_entries == 0 {
            return Err(ServerError::InvalidConfig(
                "max log entries must be at least 1".to_string(),
            ));
        }
        if self.mode == TransportMode::Tcp {
            if self.host.trim().is_empty() {
                return Err(ServerError::InvalidConfig("host must not be empty".to_string()));
            }
            if self.port == 0 {
                return Err(ServerError::InvalidConfig("port must not be 0".to_string()));
            }
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    // ==================== Construction Tests ====================

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_log_entries, 1000);
        assert_eq!(config.default_level, Severity::Info);
        assert!(!config.verbose);
        assert_eq!(config.mode, TransportMode::Tcp);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_builder_chaining() {
        let config = ServerConfig::new()
            .with_host("0.0.0.0")
            .with_port(4100)
            .with_max_log_entries(50)
            .with_default_level(Severity::Warn)
            .with_verbose(true)
            .with_mode(TransportMode::Stdio);

        assert_eq!(config.bind_address(), "0.0.0.0:4100");
        assert!(config.verbose);
        assert_eq!(config.mode, TransportMode::Stdio);

        let defaults = config.logger_defaults();
        assert_eq!(defaults.max_entries, 50);
        assert_eq!(defaults.default_level, Severity::Warn);
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_default_config_is_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let err = ServerConfig::new()
            .with_max_log_entries(0)
            .validate()
            .expect_err("zero capacity");
        assert!(matches!(err, ServerError::InvalidConfig(_)));
    }

    #[test]
    fn test_port_zero_only_matters_for_tcp() {
        assert!(ServerConfig::new().with_port(0).validate().is_err());
        assert!(
            ServerConfig::new()
                .with_port(0)
                .with_mode(TransportMode::Stdio)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_empty_host_is_rejected() {
        assert!(ServerConfig::new().with_host(" ").validate().is_err());
    }

    // ==================== TransportMode Tests ====================

    #[test_case("tcp", TransportMode::Tcp ; "tcp")]
    #[test_case("STDIO", TransportMode::Stdio ; "upper stdio")]
    fn test_transport_mode_value_enum(input: &str, expected: TransportMode) {
        assert_eq!(TransportMode::from_str(input, true).ok(), Some(expected));
        assert!(TransportMode::from_str("udp", true).is_err());
    }

    #[test]
    fn test_transport_mode_display_matches_cli_name() {
        for mode in TransportMode::value_variants() {
            let name = mode.to_possible_value().map(|v| v.get_name().to_string());
            assert_eq!(name.as_deref(), Some(mode.as_str()));
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }
}
