//! Live positions and travel logs.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use wrldbldr_map_domain::{CharacterId, CharacterMapPosition, MapId, TravelLogEntry};

use crate::infrastructure::ports::{Collection, DocumentStore, RepoError};

/// Typed access to the `characterMapPositions` and `characterTravelLogs`
/// collections.
pub struct CharacterPositionRepository {
    store: Arc<dyn DocumentStore>,
}

impl CharacterPositionRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn get(
        &self,
        character_id: CharacterId,
        map_id: MapId,
    ) -> Result<Option<CharacterMapPosition>, RepoError> {
        let key = CharacterMapPosition::storage_key(character_id, map_id);
        self.store
            .get(Collection::CharacterMapPositions, &key)
            .await?
            .map(decode)
            .transpose()
    }

    /// Overwrite the live record for the position's (character, map).
    pub async fn save(&self, position: &CharacterMapPosition) -> Result<(), RepoError> {
        let key = CharacterMapPosition::storage_key(position.character_id, position.map_id);
        self.store
            .put(Collection::CharacterMapPositions, &key, encode(position)?)
            .await
    }

    /// Every live record on `map_id`.
    pub async fn list_for_map(&self, map_id: MapId) -> Result<Vec<CharacterMapPosition>, RepoError> {
        let documents = self.store.list(Collection::CharacterMapPositions).await?;
        let mut positions = Vec::new();
        for (_, document) in documents {
            let position: CharacterMapPosition = decode(document)?;
            if position.map_id == map_id {
                positions.push(position);
            }
        }
        Ok(positions)
    }

    /// Drop every live record on `map_id`. Returns how many were removed.
    pub async fn delete_for_map(&self, map_id: MapId) -> Result<usize, RepoError> {
        let positions = self.list_for_map(map_id).await?;
        for position in &positions {
            let key = CharacterMapPosition::storage_key(position.character_id, map_id);
            self.store
                .delete(Collection::CharacterMapPositions, &key)
                .await?;
        }
        Ok(positions.len())
    }

    /// The full travel log of a character, oldest entry first.
    pub async fn travel_log(&self, character_id: CharacterId) -> Result<Vec<TravelLogEntry>, RepoError> {
        match self
            .store
            .get(Collection::CharacterTravelLogs, &character_id.to_string())
            .await?
        {
            Some(document) => decode(document),
            None => Ok(Vec::new()),
        }
    }

    pub async fn append_travel_log(&self, entry: &TravelLogEntry) -> Result<(), RepoError> {
        let mut log = self.travel_log(entry.character_id).await?;
        log.push(entry.clone());
        self.store
            .put(
                Collection::CharacterTravelLogs,
                &entry.character_id.to_string(),
                encode(&log)?,
            )
            .await
    }
}

fn decode<T: DeserializeOwned>(document: Value) -> Result<T, RepoError> {
    serde_json::from_value(document).map_err(RepoError::serialization)
}

fn encode<T: Serialize>(value: &T) -> Result<Value, RepoError> {
    serde_json::to_value(value).map_err(RepoError::serialization)
}
