//! Shared wiring for use case tests.
//!
//! Everything runs against the in-memory store with a stepping clock, so
//! timestamps are distinct and ordered without sleeping.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use wrldbldr_map_domain::WorldMap;

use crate::infrastructure::clock::SteppingClock;
use crate::infrastructure::event_bus::{MapEventBus, RecordingListener};
use crate::infrastructure::memory_store::InMemoryDocumentStore;
use crate::infrastructure::ports::{ClockPort, Collection, DocumentStore, RepoError};
use crate::repositories::{CharacterPositionRepository, MapRepository};

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 12, 9, 0, 0).unwrap()
}

pub struct TestContext {
    pub store: Arc<dyn DocumentStore>,
    pub clock: Arc<dyn ClockPort>,
    pub events: Arc<MapEventBus>,
    pub recorder: Arc<RecordingListener>,
    pub positions: Arc<CharacterPositionRepository>,
    pub maps: Arc<MapRepository>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryDocumentStore::new()))
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        let clock: Arc<dyn ClockPort> = Arc::new(SteppingClock::new(start_time()));
        let events = Arc::new(MapEventBus::new());
        let recorder = Arc::new(RecordingListener::default());
        events.add_listener(recorder.clone());
        let positions = Arc::new(CharacterPositionRepository::new(store.clone()));
        let maps = Arc::new(MapRepository::new(
            store.clone(),
            positions.clone(),
            clock.clone(),
            events.clone(),
            Duration::from_secs(300),
        ));
        Self {
            store,
            clock,
            events,
            recorder,
            positions,
            maps,
        }
    }

    /// A fresh 1000x1000 map.
    pub async fn map(&self, name: &str) -> WorldMap {
        self.maps
            .create_map(name, 1000.0, 1000.0, None)
            .await
            .expect("create map")
    }
}

/// In-memory store whose writes to one collection can be made to fail.
pub struct FlakyStore {
    inner: InMemoryDocumentStore,
    failing: Mutex<Option<Collection>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryDocumentStore::new(),
            failing: Mutex::new(None),
        }
    }

    /// Puts and deletes in `collection` fail until [`FlakyStore::heal`].
    pub fn fail_writes_to(&self, collection: Collection) {
        *self.failing.lock().unwrap() = Some(collection);
    }

    pub fn heal(&self) {
        *self.failing.lock().unwrap() = None;
    }

    fn check_write(&self, collection: Collection, operation: &'static str) -> Result<(), RepoError> {
        if *self.failing.lock().unwrap() == Some(collection) {
            return Err(RepoError::database(operation, "disk full"));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, RepoError> {
        self.inner.get(collection, id).await
    }

    async fn put(&self, collection: Collection, id: &str, document: Value) -> Result<(), RepoError> {
        self.check_write(collection, "put")?;
        self.inner.put(collection, id, document).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), RepoError> {
        self.check_write(collection, "delete")?;
        self.inner.delete(collection, id).await
    }

    async fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>, RepoError> {
        self.inner.list(collection).await
    }
}
