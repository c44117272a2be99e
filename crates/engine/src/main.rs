//! WrldBldr map engine - Main entry point.
//!
//! Wires the engine from the environment, logs every map event and waits
//! for Ctrl-C. Embedders use the library crate directly.

use std::sync::Arc;
use std::time::Duration;

use wrldbldr_map_domain::MapEvent;
use wrldbldr_map_engine::infrastructure::config::{init_tracing, StoreBackend};
use wrldbldr_map_engine::{App, EngineConfig, ListenerError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the subscriber reads RUST_LOG.
    let _ = dotenvy::dotenv();
    init_tracing();
    let config = EngineConfig::from_env();

    tracing::info!("Starting WrldBldr map engine");
    match &config.store {
        StoreBackend::Memory => tracing::info!("Store: in-memory"),
        StoreBackend::Sqlite { path } => tracing::info!(path = %path, "Store: SQLite"),
    }

    let app = App::from_config(&config).await?;
    app.add_event_listener(Arc::new(|event: &MapEvent| -> Result<(), ListenerError> {
        tracing::info!(
            map_id = %event.map_id,
            event_type = event.event_type(),
            "Map event"
        );
        Ok(())
    }));

    // Spawn cache sweeper
    let sweeper = Arc::clone(&app.repositories.maps);
    let sweep_every = config.cache_ttl.max(Duration::from_secs(60));
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(sweep_every).await;
            let removed = sweeper.purge_expired_cache().await;
            if removed > 0 {
                tracing::debug!(removed, "Purged expired map cache entries");
            }
        }
    });

    let maps = app.repositories.maps.get_all_maps().await?;
    tracing::info!(count = maps.len(), "Loaded world maps");
    for map in &maps {
        tracing::debug!(map_id = %map.id(), name = %map.name(), version = map.version(), "Map available");
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    Ok(())
}
