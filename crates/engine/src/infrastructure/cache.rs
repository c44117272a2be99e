//! Read-through cache for world maps.
//!
//! Holds owned clones: a map handed out by the cache can be edited freely
//! without touching the cached copy, so the only way to change what readers
//! see is a repository save.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use wrldbldr_map_domain::{MapId, WorldMap};

/// Thread-safe map cache with time-to-live expiration.
pub struct MapCache {
    entries: RwLock<HashMap<MapId, CachedMap>>,
    ttl: Duration,
}

struct CachedMap {
    map: WorldMap,
    inserted_at: Instant,
}

impl CachedMap {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() < ttl
    }
}

impl MapCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Store a copy of `map`, replacing any cached version.
    pub async fn insert(&self, map: &WorldMap) {
        let entry = CachedMap {
            map: map.clone(),
            inserted_at: Instant::now(),
        };
        self.entries.write().await.insert(map.id(), entry);
    }

    /// Fill the cache after a store read.
    ///
    /// The read may have started before a concurrent save refreshed the
    /// entry, so an older version never replaces a newer one.
    pub async fn fill(&self, map: &WorldMap) {
        let mut guard = self.entries.write().await;
        if let Some(cached) = guard.get(&map.id()) {
            if cached.map.version() > map.version() {
                return;
            }
        }
        guard.insert(
            map.id(),
            CachedMap {
                map: map.clone(),
                inserted_at: Instant::now(),
            },
        );
    }

    /// Insert with an explicit timestamp (tests only).
    #[cfg(test)]
    pub async fn insert_at(&self, map: &WorldMap, inserted_at: Instant) {
        let entry = CachedMap {
            map: map.clone(),
            inserted_at,
        };
        self.entries.write().await.insert(map.id(), entry);
    }

    /// A copy of the cached map, if present and not expired.
    pub async fn get(&self, id: MapId) -> Option<WorldMap> {
        let guard = self.entries.read().await;
        guard
            .get(&id)
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.map.clone())
    }

    pub async fn invalidate(&self, id: MapId) {
        self.entries.write().await.remove(&id);
    }

    /// Remove all expired entries and return how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let mut guard = self.entries.write().await;
        let before = guard.len();
        guard.retain(|_, entry| entry.is_fresh(self.ttl));
        before - guard.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
