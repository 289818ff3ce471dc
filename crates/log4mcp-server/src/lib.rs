//! # log4mcp-server
//!
//! Protocol engine and transports for the Log4MCP logging service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  stdin/stdout   ┌────────────────┐     ┌────────────────┐
//! │  client  │◄───────────────►│                │     │                │
//! └──────────┘                 │ RequestHandler │────►│ LoggerRegistry │
//! ┌──────────┐   TcpServer     │  (handshake,   │     │  name → Logger │
//! │ clients  │◄───────────────►│   dispatch)    │     │                │
//! └──────────┘                 └────────────────┘     └────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use log4mcp_server::{RequestHandler, ServerConfig, TcpServer};
//!
//! # async fn run() -> Result<(), log4mcp_server::ServerError> {
//! let config = ServerConfig::new().with_port(3000);
//! let handler = Arc::new(RequestHandler::new(config.logger_defaults()));
//!
//! let server = TcpServer::bind(&config.bind_address(), handler).await?;
//! server.serve().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod transport;

pub use cli::Cli;
pub use config::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig, TransportMode};
pub use error::{ServerError, ServerResult};
pub use handler::RequestHandler;
pub use transport::{ServerHandle, TcpServer, run_session, serve_stdio};
