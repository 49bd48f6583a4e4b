//! API server lifecycle: binds a listener, serves `api_router()` and
//! shuts down gracefully.
//!
//! `serve_until` runs in the foreground until a shutdown future resolves
//! (the binary passes Ctrl-C). `start_server` spawns the same loop in a
//! background task and returns a handle with a shutdown channel.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::api_router;
use crate::db::{DatabaseError, RecordStore};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind API server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("API server error: {0}")]
    Serve(std::io::Error),
    #[error("Cannot create data directory: {0}")]
    DataDir(std::io::Error),
    #[error("Cannot open record store: {0}")]
    Store(#[from] DatabaseError),
}

/// Handle to a running API server.
pub struct RecordServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), ServerError>>,
}

impl RecordServer {
    /// Signal graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Shut down and wait for in-flight requests to finish.
    pub async fn stop(mut self) -> Result<(), ServerError> {
        self.shutdown();
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(ServerError::Serve(std::io::Error::other(e))),
        }
    }
}

/// Bind a listener, reporting the address on failure.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve_until<F>(
    listener: TcpListener,
    store: Arc<dyn RecordStore>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().map_err(ServerError::Serve)?;
    let app = api_router(store);

    tracing::info!(%addr, "API server started");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;
    tracing::info!("API server stopped");

    Ok(())
}

/// Start the API server in a background task.
///
/// Pass port 0 to bind an ephemeral port; the chosen address is on the
/// returned handle.
pub async fn start_server(
    store: Arc<dyn RecordStore>,
    addr: SocketAddr,
) -> Result<RecordServer, ServerError> {
    let listener = bind(addr).await?;
    let addr = listener.local_addr().map_err(ServerError::Serve)?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let shutdown_signal = async move {
        let _ = shutdown_rx.await;
        tracing::info!("API server received shutdown signal");
    };

    let task = tokio::spawn(serve_until(listener, store, shutdown_signal));

    Ok(RecordServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}
