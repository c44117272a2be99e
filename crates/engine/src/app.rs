//! Application state and composition.

use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::{
    clock::SystemClock,
    config::{EngineConfig, StoreBackend},
    event_bus::{ListenerId, MapEventBus, MapEventListener},
    memory_store::InMemoryDocumentStore,
    ports::{ClockPort, DocumentStore, RepoError},
    sqlite_store::SqliteDocumentStore,
};
use crate::repositories::{CharacterPositionRepository, MapRepository};
use crate::use_cases;

/// Main application state.
///
/// Every collaborator is constructor-injected; there is no global instance.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    events: Arc<MapEventBus>,
}

/// Container for the repositories.
pub struct Repositories {
    pub maps: Arc<MapRepository>,
    pub positions: Arc<CharacterPositionRepository>,
}

/// Container for all use cases.
pub struct UseCases {
    pub content: Arc<use_cases::MapContent>,
    pub movement: Arc<use_cases::CharacterMovement>,
    pub travel: Arc<use_cases::TravelEstimator>,
    pub fog: Arc<use_cases::FogOfWar>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn ClockPort>, cache_ttl: Duration) -> Self {
        let events = Arc::new(MapEventBus::new());

        let positions = Arc::new(CharacterPositionRepository::new(store.clone()));
        let maps = Arc::new(MapRepository::new(
            store,
            positions.clone(),
            clock,
            events.clone(),
            cache_ttl,
        ));

        let use_cases = UseCases {
            content: Arc::new(use_cases::MapContent::new(maps.clone())),
            movement: Arc::new(use_cases::CharacterMovement::new(
                maps.clone(),
                positions.clone(),
            )),
            travel: Arc::new(use_cases::TravelEstimator::new(maps.clone())),
            fog: Arc::new(use_cases::FogOfWar::new(maps.clone())),
        };

        Self {
            repositories: Repositories { maps, positions },
            use_cases,
            events,
        }
    }

    /// Build the store named by `config` and wire the app on top of it.
    pub async fn from_config(config: &EngineConfig) -> Result<Self, RepoError> {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        let store: Arc<dyn DocumentStore> = match &config.store {
            StoreBackend::Memory => {
                tracing::info!("Using in-memory document store");
                Arc::new(InMemoryDocumentStore::new())
            }
            StoreBackend::Sqlite { path } => {
                Arc::new(SqliteDocumentStore::new(path, clock.clone()).await?)
            }
        };
        Ok(Self::new(store, clock, config.cache_ttl))
    }

    /// Subscribe to map events. Listeners run in registration order.
    pub fn add_event_listener(&self, listener: Arc<dyn MapEventListener>) -> ListenerId {
        self.events.add_listener(listener)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.events.remove_listener(id)
    }
}
