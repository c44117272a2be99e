//! Distance and travel-time estimates between map locations.

use std::sync::Arc;

use wrldbldr_map_domain::{
    calculate_distance, estimate_travel, MapId, MapLocationId, Point, TravelEstimate,
    TravelOptions, WorldMap,
};

use crate::error::MapError;
use crate::repositories::MapRepository;

/// Read-only travel math over stored maps.
pub struct TravelEstimator {
    maps: Arc<MapRepository>,
}

impl TravelEstimator {
    pub fn new(maps: Arc<MapRepository>) -> Self {
        Self { maps }
    }

    /// Straight-line distance between two points, in map units.
    pub fn calculate_distance(&self, from: Point, to: Point) -> f64 {
        calculate_distance(&from, &to)
    }

    pub async fn calculate_distance_between_locations(
        &self,
        map_id: MapId,
        from: MapLocationId,
        to: MapLocationId,
    ) -> Result<f64, MapError> {
        let map = self.maps.get_map(map_id).await?;
        let (start, end) = endpoints(&map, from, to)?;
        Ok(calculate_distance(&start, &end))
    }

    /// Estimate the time to travel between two locations in a straight line.
    ///
    /// Without an explicit `terrain_factor`, the terrain under the midpoint
    /// of the journey sets it.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown map or location, `Validation` for a
    /// non-positive speed or travel-hours-per-day, or when the midpoint
    /// lies in terrain that cannot be crossed on foot.
    pub async fn estimate_travel_time(
        &self,
        map_id: MapId,
        from: MapLocationId,
        to: MapLocationId,
        options: TravelOptions,
    ) -> Result<TravelEstimate, MapError> {
        let map = self.maps.get_map(map_id).await?;
        let (start, end) = endpoints(&map, from, to)?;
        let midpoint = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
        let terrain = map.terrain_at(midpoint);
        let options = match (options.terrain_factor, terrain) {
            (None, Some(kind)) => options.over_terrain(kind)?,
            _ => options,
        };
        let estimate = estimate_travel(calculate_distance(&start, &end), &options)?;

        tracing::debug!(
            map_id = %map_id,
            from = %from,
            to = %to,
            terrain = ?terrain,
            distance = estimate.distance,
            total_hours = estimate.total_hours,
            "Estimated travel time"
        );
        Ok(estimate)
    }
}

fn endpoints(map: &WorldMap, from: MapLocationId, to: MapLocationId) -> Result<(Point, Point), MapError> {
    let position = |id: MapLocationId| {
        map.location(id)
            .map(|l| l.position())
            .ok_or_else(|| MapError::not_found("MapLocation", id))
    };
    Ok((position(from)?, position(to)?))
}
