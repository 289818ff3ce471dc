//! Command-line argument parsing with clap.

use clap::Parser;
use log4mcp_logs::{DEFAULT_MAX_ENTRIES, Severity};

use crate::config::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig, TransportMode};

/// Log4MCP - a JSON-RPC logging service.
#[derive(Parser, Debug, Clone)]
#[command(name = "log4mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Port to listen on in TCP mode.
    #[arg(short, long, env = "LOG4MCP_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Host to bind in TCP mode.
    #[arg(long, env = "LOG4MCP_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Maximum entries kept per logger.
    #[arg(
        short,
        long = "max-entries",
        env = "LOG4MCP_MAX_ENTRIES",
        default_value_t = DEFAULT_MAX_ENTRIES
    )]
    pub max_entries: usize,

    /// Threshold of newly created loggers (TRACE, DEBUG, INFO, WARN, ERROR, FATAL).
    #[arg(short, long, env = "LOG4MCP_LOG_LEVEL", default_value_t = Severity::Info)]
    pub log_level: Severity,

    /// Emit debug diagnostics on stderr.
    #[arg(short, long, env = "LOG4MCP_VERBOSE")]
    pub verbose: bool,

    /// Transport to serve.
    #[arg(long, value_enum, env = "LOG4MCP_MODE", default_value_t = TransportMode::Tcp)]
    pub mode: TransportMode,
}

impl Cli {
    /// Convert parsed arguments into a server configuration.
    pub fn into_config(self) -> ServerConfig {
        ServerConfig::new()
            .with_host(self.host)
            .with_port(self.port)
            .with_max_log_entries(self.max_entries)
            .with_default_level(self.log_level)
            .with_verbose(self.verbose)
            .with_mode(self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_server_config() {
        let cli = Cli::try_parse_from(["log4mcp"]).expect("parse");
        let config = cli.into_config();
        assert_eq!(config.port, ServerConfig::default().port);
        assert_eq!(config.host, ServerConfig::default().host);
        assert_eq!(config.max_log_entries, ServerConfig::default().max_log_entries);
        assert_eq!(config.default_level, Severity::Info);
        assert_eq!(config.mode, TransportMode::Tcp);
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "log4mcp",
            "--port",
            "4000",
            "--host",
            "0.0.0.0",
            "--max-entries",
            "10",
            "--log-level",
            "warn",
            "--verbose",
            "--mode",
            "stdio",
        ])
        .expect("parse");
        let config = cli.into_config();

        assert_eq!(config.bind_address(), "0.0.0.0:4000");
        assert_eq!(config.max_log_entries, 10);
        assert_eq!(config.default_level, Severity::Warn);
        assert!(config.verbose);
        assert_eq!(config.mode, TransportMode::Stdio);
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(Cli::try_parse_from(["log4mcp", "--log-level", "LOUD"]).is_err());
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["log4mcp", "--mode", "udp"]).is_err());
    }
}
