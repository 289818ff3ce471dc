//! Log4MCP server binary.
//!
//! ```bash
//! log4mcp --port 3000                # TCP, many clients
//! log4mcp --mode stdio               # one client on stdin/stdout
//! ```
//!
//! Diagnostics always go to stderr so stdout stays clean for the stdio
//! transport.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log4mcp_server::{Cli, RequestHandler, ServerConfig, TcpServer, TransportMode, serve_stdio};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Cli::parse().into_config();
    init_tracing(config.verbose);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "log4mcp=debug" } else { "log4mcp=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_ansi(false))
        .with(filter)
        .init();
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;
    info!(
        mode = %config.mode,
        max_entries = config.max_log_entries,
        default_level = %config.default_level,
        "log4mcp starting"
    );

    let handler = Arc::new(RequestHandler::new(config.logger_defaults()));

    match config.mode {
        TransportMode::Stdio => serve_stdio(&handler)
            .await
            .context("stdio session failed")?,
        TransportMode::Tcp => {
            let server = TcpServer::bind(&config.bind_address(), handler).await?;
            let handle = server.handle();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("interrupt received");
                    handle.shutdown();
                }
            });
            server.serve().await.context("tcp server failed")?;
        }
    }

    info!("log4mcp shutting down");
    Ok(())
}
