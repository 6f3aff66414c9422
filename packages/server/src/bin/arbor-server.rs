//! Arbor HTTP Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (port 3001, default DB path)
//! cargo run --bin arbor-server
//!
//! # Custom port and database, seeded with the demo forest
//! ARBOR_PORT=3002 ARBOR_DB_PATH=/tmp/arbor.db ARBOR_SEED_DEMO=1 cargo run --bin arbor-server
//! ```
//!
//! See [`arbor_server::config`] for every environment variable. `RUST_LOG`
//! controls the log level (default: info).

use std::sync::Arc;

use arbor_core::db::{DatabaseService, NodeStore, TursoStore};
use arbor_core::services::TreeService;
use arbor_server::http::spawn_event_logger;
use arbor_server::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!("Port: {}", config.port);
    tracing::info!("Database: {}", config.db_path.display());

    let db = Arc::new(DatabaseService::new(config.db_path.clone()).await?);
    let store: Arc<dyn NodeStore> = Arc::new(TursoStore::new(db));
    let tree_service = TreeService::with_config(store, config.tree);

    if config.seed_demo {
        let seeded = tree_service.seed_demo_forest().await?;
        if !seeded.is_empty() {
            tracing::info!("Seeded {} demo nodes", seeded.len());
        }
    }

    let _event_logger = spawn_event_logger(&tree_service);

    start_server(
        tree_service,
        config.port,
        config.cors_allow_origin.as_deref(),
    )
    .await
}
