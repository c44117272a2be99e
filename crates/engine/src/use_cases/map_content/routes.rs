//! Routes between points of interest.

use wrldbldr_map_domain::{MapEventData, MapId, MapRoute, Point, RouteId, RouteName, RouteType};

use super::MapContent;
use crate::error::MapError;

/// Input for [`MapContent::add_route`].
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub name: String,
    pub route_type: RouteType,
    pub points: Vec<Point>,
    pub description: Option<String>,
}

impl NewRoute {
    pub fn new(name: impl Into<String>, route_type: RouteType, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            route_type,
            points,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl MapContent {
    /// Validate and add a route. Travel time is computed from the polyline.
    ///
    /// # Errors
    ///
    /// `Validation` for fewer than two points; the map is not touched.
    pub async fn add_route(&self, map_id: MapId, new_route: NewRoute) -> Result<MapRoute, MapError> {
        let mut route = MapRoute::new(
            RouteName::new(new_route.name)?,
            new_route.route_type,
            new_route.points,
        )?;
        if let Some(description) = new_route.description {
            route = route.with_description(description);
        }

        let stored = route.clone();
        self.maps
            .modify(map_id, move |map| map.add_route(route))
            .await?;

        tracing::info!(
            map_id = %map_id,
            route_id = %stored.id(),
            length = stored.length(),
            "Added map route"
        );
        self.maps.publish(
            map_id,
            MapEventData::RouteCreated {
                route: stored.clone(),
            },
        );
        Ok(stored)
    }

    /// Apply an edited route. Travel time is recomputed only when the
    /// points changed.
    pub async fn update_route(&self, map_id: MapId, route: MapRoute) -> Result<MapRoute, MapError> {
        let (_, updated) = self
            .maps
            .modify(map_id, move |map| map.update_route(route).cloned())
            .await?;

        self.maps.publish(
            map_id,
            MapEventData::RouteUpdated {
                route: updated.clone(),
            },
        );
        Ok(updated)
    }

    pub async fn delete_route(&self, map_id: MapId, route_id: RouteId) -> Result<(), MapError> {
        self.maps
            .modify(map_id, |map| map.remove_route(route_id))
            .await?;

        tracing::info!(map_id = %map_id, route_id = %route_id, "Deleted map route");
        self.maps
            .publish(map_id, MapEventData::RouteDeleted { id: route_id });
        Ok(())
    }

    pub async fn get_routes(&self, map_id: MapId) -> Result<Vec<MapRoute>, MapError> {
        Ok(self.maps.get_map(map_id).await?.routes().to_vec())
    }
}
