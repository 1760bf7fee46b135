//! Cityline Console Server Binary
//!
//! Starts the console HTTP API on top of the configured record store.
//!
//! # Usage
//!
//! ```bash
//! # In-memory store, revalidation disabled, port 3020
//! cargo run --bin console-server
//!
//! # Persistent store and revalidation against the public site
//! CITYLINE_DB_PATH=./data/cityline.db \
//! CITYLINE_REVALIDATE_URL=https://www.example.com \
//!     cargo run --bin console-server
//! ```
//!
//! # Environment Variables
//!
//! See [`cityline_core::config`] for the full list. `RUST_LOG` sets the log
//! level (default `info`).

use std::sync::Arc;

use cityline_core::api::{self, AppState};
use cityline_core::db::{MemoryStore, RecordStore};
use cityline_core::{CityCoordinator, ConsoleConfig, RevalidationNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ConsoleConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!("Cityline console {}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config).await?;
    let notifier = RevalidationNotifier::from_config(&config)?;
    let coordinator = CityCoordinator::new(store, notifier);

    api::start_server(AppState::new(coordinator), config.port).await
}

#[cfg(feature = "surrealdb")]
async fn open_store(config: &ConsoleConfig) -> anyhow::Result<Arc<dyn RecordStore>> {
    use cityline_core::db::SurrealStore;

    match &config.database_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tracing::info!("Record store: SurrealDB at {}", path.display());
            Ok(Arc::new(SurrealStore::new(path.clone()).await?))
        }
        None => {
            tracing::warn!("Record store: in-memory (set CITYLINE_DB_PATH to persist)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(not(feature = "surrealdb"))]
async fn open_store(config: &ConsoleConfig) -> anyhow::Result<Arc<dyn RecordStore>> {
    if config.database_path.is_some() {
        anyhow::bail!("CITYLINE_DB_PATH requires the `surrealdb` feature");
    }
    tracing::warn!("Record store: in-memory");
    Ok(Arc::new(MemoryStore::new()))
}
