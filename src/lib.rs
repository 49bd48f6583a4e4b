pub mod api; // HTTP router, handlers, server lifecycle
pub mod config;
pub mod db;
pub mod models;
pub mod validation; // Payload validation + test date normalization

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::server::{bind, serve_until, ServerError};
use crate::config::{AppConfig, DbLocation};
use crate::db::{RecordStore, SqliteRecordStore};

/// Install the global tracing subscriber (`RUST_LOG` or the default filter).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Open the record store the configuration points at.
pub fn open_store(location: &DbLocation) -> Result<Arc<dyn RecordStore>, ServerError> {
    let store = match location {
        DbLocation::Memory => {
            tracing::warn!("Using in-memory database; records are lost on exit");
            SqliteRecordStore::open_in_memory()?
        }
        DbLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(ServerError::DataDir)?;
            }
            tracing::info!(path = %path.display(), "Opening record database");
            SqliteRecordStore::open(path)?
        }
    };
    Ok(Arc::new(store))
}

/// Run the service until Ctrl-C.
pub async fn run(config: AppConfig) -> Result<(), ServerError> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let store = open_store(&config.db)?;
    let listener = bind(config.bind_addr).await?;

    serve_until(listener, store, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
