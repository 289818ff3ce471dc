use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::run_session;
use crate::error::{ServerError, ServerResult};
use crate::handler::RequestHandler;

/// TCP server running one session task per connection.
///
/// Every connection shares the same [`RequestHandler`], and with it the
/// logger registry and handshake state.
#[derive(Debug)]
pub struct TcpServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    handler: Arc<RequestHandler>,
    connections: Arc<AtomicUsize>,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: mpsc::Receiver<()>,
}

/// Controls a running [`TcpServer`] from another task.
#[derive(Debug, Clone)]
pub struct ServerHandle {
    connections: Arc<AtomicUsize>,
    shutdown_tx: mpsc::Sender<()>,
}

impl ServerHandle {
    /// Stop accepting connections. Open sessions run until their clients
    /// disconnect.
    pub fn shutdown(&self) {
        // A full channel already holds a pending shutdown.
        let _ = self.shutdown_tx.try_send(());
    }

    /// Number of currently open connections.
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::Acquire)
    }
}

impl TcpServer {
    /// Bind to `addr` (`host:port`; port 0 picks a free port).
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::BindFailed`] if the address cannot be bound.
    pub async fn bind(addr: &str, handler: Arc<RequestHandler>) -> ServerResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindFailed(addr.to_string(), e))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::BindFailed(addr.to_string(), e))?;

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        Ok(Self {
            listener,
            local_addr,
            handler,
            connections: Arc::new(AtomicUsize::new(0)),
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// The address actually bound.
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Number of currently open connections.
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::Acquire)
    }

    /// Handle for shutting the server down while it serves.
    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            connections: Arc::clone(&self.connections),
            shutdown_tx: self.shutdown_tx.clone(),
        }
    }

    /// Accept connections until [`ServerHandle::shutdown`] is called.
    ///
    /// # Errors
    ///
    /// Accept failures are logged and do not stop the server; this currently
    /// always returns `Ok`.
    pub async fn serve(self) -> ServerResult<()> {
        let Self {
            listener,
            local_addr,
            handler,
            connections,
            mut shutdown_rx,
            ..
        } = self;
        info!(addr = %local_addr, "listening");

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer)) => spawn_session(stream, peer, &handler, &connections),
                        Err(e) => warn!(error = %e, "failed to accept connection"),
                    }
                }
                Some(()) = shutdown_rx.recv() => {
                    info!("shutdown signal received");
                    break;
                }
            }
        }

        info!(
            open = connections.load(Ordering::Acquire),
            "server stopped accepting connections"
        );
        Ok(())
    }
}

fn spawn_session(
    stream: TcpStream,
    peer: SocketAddr,
    handler: &Arc<RequestHandler>,
    connections: &Arc<AtomicUsize>,
) {
    let guard = ConnectionGuard::new(Arc::clone(connections));
    let handler = Arc::clone(handler);
    debug!(%peer, open = connections.load(Ordering::Acquire), "connection opened");

    tokio::spawn(async move {
        let _guard = guard;
        let (reader, writer) = stream.into_split();
        match run_session(BufReader::new(reader), writer, &handler).await {
            Ok(()) => debug!(%peer, "connection closed"),
            Err(e) => debug!(%peer, error = %e, "connection ended with error"),
        }
    });
}

/// Counts a connection as open for as long as it lives.
struct ConnectionGuard(Arc<AtomicUsize>);

impl ConnectionGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
