use tokio::io::{self, BufReader};
use tracing::info;

use super::run_session;
use crate::error::ServerResult;
use crate::handler::RequestHandler;

/// Serve a single client over stdin/stdout until stdin closes.
///
/// # Errors
///
/// Returns an error if stdin or stdout fails.
pub async fn serve_stdio(handler: &RequestHandler) -> ServerResult<()> {
    info!("serving on stdio");
    run_session(BufReader::new(io::stdin()), io::stdout(), handler).await?;
    info!("stdin closed");
    Ok(())
}
