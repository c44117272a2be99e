//! Persistence collaborator port.
//!
//! The engine stores JSON documents in three named collections and never
//! relies on anything beyond keyed get/put/delete plus a full listing.

use async_trait::async_trait;
use serde_json::Value;

use super::RepoError;

/// Logical document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    /// Keyed by map id
    WorldMaps,
    /// Keyed by `characterId:mapId`
    CharacterMapPositions,
    /// Keyed by character id; value is a JSON array, oldest entry first
    CharacterTravelLogs,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorldMaps => "worldMaps",
            Self::CharacterMapPositions => "characterMapPositions",
            Self::CharacterTravelLogs => "characterTravelLogs",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/document store the engine persists through.
///
/// `put` replaces the whole document. `delete` of a missing id succeeds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, RepoError>;
    async fn put(&self, collection: Collection, id: &str, document: Value) -> Result<(), RepoError>;
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), RepoError>;
    /// Every `(id, document)` pair in the collection, ordered by id.
    async fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>, RepoError>;
}
