use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rosca_backend::config::{AppConfig, StorageKind};
use rosca_backend::storage::seed::demo_ledger;
use rosca_backend::storage::{Connection, FileConnection, MemoryConnection};
use rosca_backend::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting with {} storage", config.storage);
    match config.storage {
        StorageKind::Memory => {
            warn!("In-memory storage: all data is lost when the server stops");
            serve(Arc::new(MemoryConnection::new()), &config).await
        }
        StorageKind::File => {
            info!("Using data directory {:?}", config.data_directory);
            serve(Arc::new(FileConnection::new(&config.data_directory)?), &config).await
        }
    }
}

async fn serve<C: Connection>(connection: Arc<C>, config: &AppConfig) -> Result<()> {
    let app_state = AppState::new(connection);

    if config.seed_demo_data && app_state.snapshot_service.seed_if_empty(demo_ledger())? {
        info!("Loaded demo data into the empty store");
    }

    let router = create_router(app_state, config.allowed_origin.as_deref())?;
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
