//! Points of interest.

use wrldbldr_map_domain::{MapEventData, MapId, MapLocation, MapLocationId};

use super::MapContent;
use crate::error::MapError;

impl MapContent {
    /// Place a new location on the points-of-interest layer.
    ///
    /// # Errors
    ///
    /// `Validation` when a location with the same id already exists.
    pub async fn add_location(
        &self,
        map_id: MapId,
        location: MapLocation,
    ) -> Result<MapLocation, MapError> {
        let stored = location.clone();
        self.maps
            .modify(map_id, move |map| map.add_location(location))
            .await?;

        tracing::info!(map_id = %map_id, location_id = %stored.id(), "Added map location");
        self.maps.publish(
            map_id,
            MapEventData::LocationCreated {
                location: stored.clone(),
            },
        );
        Ok(stored)
    }

    /// Replace the stored location that has the same id as `location`.
    pub async fn update_location(
        &self,
        map_id: MapId,
        location: MapLocation,
    ) -> Result<MapLocation, MapError> {
        let stored = location.clone();
        self.maps
            .modify(map_id, move |map| map.update_location(location))
            .await?;

        self.maps.publish(
            map_id,
            MapEventData::LocationUpdated {
                location: stored.clone(),
            },
        );
        Ok(stored)
    }

    /// Remove a location. Connections from other locations to it go too.
    pub async fn delete_location(
        &self,
        map_id: MapId,
        location_id: MapLocationId,
    ) -> Result<(), MapError> {
        self.maps
            .modify(map_id, |map| map.remove_location(location_id))
            .await?;

        tracing::info!(map_id = %map_id, location_id = %location_id, "Deleted map location");
        self.maps
            .publish(map_id, MapEventData::LocationDeleted { id: location_id });
        Ok(())
    }

    pub async fn get_locations(&self, map_id: MapId) -> Result<Vec<MapLocation>, MapError> {
        Ok(self.maps.get_map(map_id).await?.locations().to_vec())
    }

    pub async fn get_location(
        &self,
        map_id: MapId,
        location_id: MapLocationId,
    ) -> Result<MapLocation, MapError> {
        self.maps
            .get_map(map_id)
            .await?
            .location(location_id)
            .cloned()
            .ok_or_else(|| MapError::not_found("MapLocation", location_id))
    }
}
