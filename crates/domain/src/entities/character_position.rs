//! Live character positions and the travel history they leave behind

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::travel::calculate_distance;
use crate::value_objects::Point;
use crate::{CharacterId, MapId, MapLocationId, TravelLogEntryId};

/// The single current position of a character on a map.
///
/// Keyed by (character, map) and overwritten on every move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterMapPosition {
    pub character_id: CharacterId,
    pub map_id: MapId,
    pub position: Point,
    pub location_id: Option<MapLocationId>,
    pub timestamp: DateTime<Utc>,
}

impl CharacterMapPosition {
    pub fn new(
        character_id: CharacterId,
        map_id: MapId,
        position: Point,
        location_id: Option<MapLocationId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            character_id,
            map_id,
            position,
            location_id,
            timestamp,
        }
    }

    /// Storage key in the `characterMapPositions` collection.
    pub fn storage_key(character_id: CharacterId, map_id: MapId) -> String {
        format!("{}:{}", character_id, map_id)
    }

    /// Log entry for moving from this position to `next`.
    pub fn travel_to(&self, next: &CharacterMapPosition) -> TravelLogEntry {
        TravelLogEntry {
            id: TravelLogEntryId::new(),
            character_id: self.character_id,
            map_id: self.map_id,
            start_position: self.position,
            end_position: next.position,
            start_location_id: self.location_id,
            end_location_id: next.location_id,
            start_time: self.timestamp,
            end_time: next.timestamp,
            distance: calculate_distance(&self.position, &next.position),
        }
    }
}

/// An immutable record of one move.
///
/// Entries outlive the map they refer to; they belong to the character's
/// history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelLogEntry {
    pub id: TravelLogEntryId,
    pub character_id: CharacterId,
    pub map_id: MapId,
    pub start_position: Point,
    pub end_position: Point,
    pub start_location_id: Option<MapLocationId>,
    pub end_location_id: Option<MapLocationId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub distance: f64,
}
