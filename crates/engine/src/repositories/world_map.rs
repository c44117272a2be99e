//! World map persistence.
//!
//! All writes to a map go through [`MapRepository`]. Writers of the same map
//! are serialised by a per-map async mutex, and every stored map carries a
//! version: a save whose version does not match the stored one is rejected
//! with [`MapError::Conflict`] instead of silently overwriting newer data.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use wrldbldr_map_domain::{DomainError, MapEvent, MapEventData, MapId, MapName, WorldMap};

use crate::error::MapError;
use crate::infrastructure::cache::MapCache;
use crate::infrastructure::event_bus::MapEventBus;
use crate::infrastructure::locks::{KeyedLockGuard, KeyedLocks};
use crate::infrastructure::ports::{ClockPort, Collection, DocumentStore, RepoError};
use crate::repositories::CharacterPositionRepository;

/// Exclusive hold on one map's write lock.
pub type MapWriteGuard<'a> = KeyedLockGuard<'a, MapId>;

/// CRUD over `WorldMap` aggregates, with a read-through cache and event
/// publication.
pub struct MapRepository {
    store: Arc<dyn DocumentStore>,
    positions: Arc<CharacterPositionRepository>,
    clock: Arc<dyn ClockPort>,
    events: Arc<MapEventBus>,
    cache: MapCache,
    write_locks: KeyedLocks<MapId>,
}

impl MapRepository {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        positions: Arc<CharacterPositionRepository>,
        clock: Arc<dyn ClockPort>,
        events: Arc<MapEventBus>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            store,
            positions,
            clock,
            events,
            cache: MapCache::new(cache_ttl),
            write_locks: KeyedLocks::new(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Publish an event about `map_id`, stamped with the current time.
    pub fn publish(&self, map_id: MapId, data: MapEventData) {
        let event = MapEvent::new(map_id, data, self.clock.now());
        self.events.publish(&event);
    }

    /// Create and persist a new map with the canonical layer stack.
    pub async fn create_map(
        &self,
        name: &str,
        width: f64,
        height: f64,
        description: Option<String>,
    ) -> Result<WorldMap, MapError> {
        let name = MapName::new(name)?;
        let mut map = WorldMap::new(name, width, height, self.clock.now())?;
        if description.is_some() {
            map.set_description(description);
        }

        self.put(&map).await?;
        self.cache.insert(&map).await;

        tracing::info!(map_id = %map.id(), name = %map.name(), "Created world map");
        self.publish(
            map.id(),
            MapEventData::MapCreated {
                name: map.name().to_string(),
            },
        );
        Ok(map)
    }

    /// Fetch a map, serving from the cache when possible.
    pub async fn get_map(&self, id: MapId) -> Result<WorldMap, MapError> {
        if let Some(map) = self.cache.get(id).await {
            tracing::debug!(map_id = %id, "Map cache hit");
            return Ok(map);
        }
        tracing::debug!(map_id = %id, "Map cache miss");

        let map = self
            .load(id)
            .await?
            .ok_or_else(|| MapError::map_not_found(id))?;
        self.cache.fill(&map).await;
        Ok(map)
    }

    /// Persist a caller-edited map and publish `map_updated`.
    ///
    /// # Errors
    ///
    /// `Conflict` when the map was saved by someone else after `map` was
    /// read, `NotFound` when it has been deleted.
    pub async fn update_map(&self, map: &WorldMap) -> Result<WorldMap, MapError> {
        let _guard = self.write_locks.lock(map.id()).await;

        let stored = self
            .load(map.id())
            .await?
            .ok_or_else(|| MapError::map_not_found(map.id()))?;
        if stored.version() != map.version() {
            tracing::warn!(
                map_id = %map.id(),
                expected = map.version(),
                found = stored.version(),
                "Rejected stale map update"
            );
            return Err(MapError::Conflict {
                map_id: map.id(),
                expected: map.version(),
                found: stored.version(),
            });
        }

        let saved = self.commit(map.clone()).await?;
        self.publish(
            saved.id(),
            MapEventData::MapUpdated {
                version: saved.version(),
            },
        );
        Ok(saved)
    }

    /// Load the latest stored map, apply `edit`, and persist the result.
    ///
    /// Runs under the map's write lock, so concurrent edits of the same map
    /// apply one after the other. Nothing is stored if `edit` fails. The
    /// caller publishes whatever event describes the edit.
    pub async fn modify<T, F>(&self, id: MapId, edit: F) -> Result<(WorldMap, T), MapError>
    where
        F: FnOnce(&mut WorldMap) -> Result<T, DomainError> + Send,
        T: Send,
    {
        let _guard = self.write_locks.lock(id).await;

        let mut map = self
            .load(id)
            .await?
            .ok_or_else(|| MapError::map_not_found(id))?;
        let outcome = edit(&mut map)?;
        let saved = self.commit(map).await?;
        Ok((saved, outcome))
    }

    /// Hold the map's write lock and return the stored map.
    ///
    /// While the guard lives, nothing can edit or delete the map, so work
    /// that depends on the map existing (placing a character on it) cannot
    /// interleave with its deletion.
    pub async fn lock_existing(&self, id: MapId) -> Result<(MapWriteGuard<'_>, WorldMap), MapError> {
        let guard = self.write_locks.lock(id).await;
        let map = self
            .load(id)
            .await?
            .ok_or_else(|| MapError::map_not_found(id))?;
        Ok((guard, map))
    }

    /// Delete a map and every live character position on it.
    ///
    /// Positions go first: if that fails the map is still there and the
    /// delete can be retried. Travel logs that mention the map are kept.
    pub async fn delete_map(&self, id: MapId) -> Result<(), MapError> {
        let _guard = self.write_locks.lock(id).await;

        if self.store.get(Collection::WorldMaps, &id.to_string()).await?.is_none() {
            return Err(MapError::map_not_found(id));
        }
        let removed_positions = self.positions.delete_for_map(id).await?;
        self.store.delete(Collection::WorldMaps, &id.to_string()).await?;
        self.cache.invalidate(id).await;

        tracing::info!(map_id = %id, removed_positions, "Deleted world map");
        self.publish(id, MapEventData::MapDeleted { removed_positions });
        Ok(())
    }

    /// Every stored map, ordered by name.
    pub async fn get_all_maps(&self) -> Result<Vec<WorldMap>, MapError> {
        let documents = self.store.list(Collection::WorldMaps).await?;
        let mut maps = documents
            .into_iter()
            .map(|(_, document)| decode(document))
            .collect::<Result<Vec<_>, _>>()?;
        maps.sort_by(|a, b| {
            a.name()
                .as_str()
                .cmp(b.name().as_str())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(maps)
    }

    pub async fn find_maps_by_tag(&self, tag: &str) -> Result<Vec<WorldMap>, MapError> {
        let mut maps = self.get_all_maps().await?;
        maps.retain(|map| map.has_tag(tag));
        Ok(maps)
    }

    /// Drop expired cache entries. Returns how many were removed.
    pub async fn purge_expired_cache(&self) -> usize {
        self.cache.cleanup_expired().await
    }

    async fn load(&self, id: MapId) -> Result<Option<WorldMap>, RepoError> {
        self.store
            .get(Collection::WorldMaps, &id.to_string())
            .await?
            .map(decode)
            .transpose()
    }

    /// Bump version and timestamp, store, refresh the cache. Caller holds
    /// the write lock.
    async fn commit(&self, mut map: WorldMap) -> Result<WorldMap, MapError> {
        map.mark_saved(self.clock.now());
        self.put(&map).await?;
        self.cache.insert(&map).await;
        tracing::debug!(map_id = %map.id(), version = map.version(), "Saved world map");
        Ok(map)
    }

    async fn put(&self, map: &WorldMap) -> Result<(), RepoError> {
        let document = serde_json::to_value(map).map_err(RepoError::serialization)?;
        self.store
            .put(Collection::WorldMaps, &map.id().to_string(), document)
            .await
    }
}

fn decode(document: serde_json::Value) -> Result<WorldMap, RepoError> {
    serde_json::from_value(document).map_err(RepoError::serialization)
}
