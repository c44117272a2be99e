//! Fog-of-war tracking.
//!
//! Revealed and explored areas only ever grow. Revealing the same polygon
//! twice stores two records; no polygon merging is attempted.

use std::sync::Arc;

use wrldbldr_map_domain::{CharacterId, FogArea, FogState, MapEventData, MapId, Point};

use crate::error::MapError;
use crate::repositories::MapRepository;

pub struct FogOfWar {
    maps: Arc<MapRepository>,
}

impl FogOfWar {
    pub fn new(maps: Arc<MapRepository>) -> Self {
        Self { maps }
    }

    /// Record an area as currently visible to `character_id`.
    ///
    /// # Errors
    ///
    /// `Validation` for a polygon with fewer than three points.
    pub async fn reveal_area(
        &self,
        map_id: MapId,
        character_id: CharacterId,
        points: Vec<Point>,
    ) -> Result<FogArea, MapError> {
        let area = FogArea::new(points, Some(character_id), self.maps.now())?;
        let stored = area.clone();
        self.maps
            .modify(map_id, move |map| map.reveal_area(area))
            .await?;

        tracing::debug!(map_id = %map_id, character_id = %character_id, area_id = %stored.id, "Revealed fog area");
        self.maps.publish(
            map_id,
            MapEventData::FogRevealed {
                character_id,
                area: stored.clone(),
            },
        );
        Ok(stored)
    }

    /// Record an area as visited by `character_id`.
    pub async fn mark_explored(
        &self,
        map_id: MapId,
        character_id: CharacterId,
        points: Vec<Point>,
    ) -> Result<FogArea, MapError> {
        let area = FogArea::new(points, Some(character_id), self.maps.now())?;
        let stored = area.clone();
        self.maps
            .modify(map_id, move |map| map.explore_area(area))
            .await?;

        tracing::debug!(map_id = %map_id, character_id = %character_id, area_id = %stored.id, "Explored fog area");
        self.maps.publish(
            map_id,
            MapEventData::FogExplored {
                character_id,
                area: stored.clone(),
            },
        );
        Ok(stored)
    }

    pub async fn get_fog_state(&self, map_id: MapId) -> Result<FogState, MapError> {
        let map = self.maps.get_map(map_id).await?;
        Ok(map.fog().cloned().unwrap_or_default())
    }
}
