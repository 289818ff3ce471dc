//! Transports carrying newline-delimited JSON to the protocol engine.

mod stdio;
mod tcp;

pub use stdio::serve_stdio;
pub use tcp::{ServerHandle, TcpServer};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ServerResult;
use crate::handler::RequestHandler;

/// Serve one connection until end of stream.
///
/// Each input line is handled in order and its response, if any, is written
/// and flushed before the next line is read. Every request line gets exactly
/// one response line. Notifications get none, and neither do blank or
/// whitespace-only lines, which are skipped as padding.
///
/// # Errors
///
/// Returns [`crate::ServerError::Io`] if reading or writing fails.
pub async fn run_session<R, W>(
    mut reader: R,
    mut writer: W,
    handler: &RequestHandler,
) -> ServerResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }

        if let Some(response) = handler.handle_bytes(&line) {
            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }
    Ok(())
}
