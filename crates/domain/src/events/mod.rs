//! Map Events
//!
//! Notifications published after a map change has been persisted. One event
//! is published per successful operation; listeners receive them in the order
//! the operations completed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{
    FogArea, GridSettings, LayerType, MapAnnotation, MapLocation, MapRoute, PoliticalRegion,
    TerrainFeature,
};
use crate::value_objects::Point;
use crate::{
    AnnotationId, CharacterId, LayerId, MapId, MapLocationId, PoliticalRegionId, RouteId,
    TerrainFeatureId, TravelLogEntryId,
};

/// A persisted change to a world map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapEvent {
    pub map_id: MapId,
    pub timestamp: DateTime<Utc>,
    pub data: MapEventData,
}

impl MapEvent {
    pub fn new(map_id: MapId, data: MapEventData, timestamp: DateTime<Utc>) -> Self {
        Self {
            map_id,
            timestamp,
            data,
        }
    }

    /// Wire name of the event, e.g. `location_deleted`.
    pub fn event_type(&self) -> &'static str {
        self.data.event_type()
    }
}

/// What changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapEventData {
    // Map lifecycle
    MapCreated {
        name: String,
    },
    MapUpdated {
        version: u64,
    },
    MapDeleted {
        removed_positions: usize,
    },

    // Points of interest
    LocationCreated {
        location: MapLocation,
    },
    LocationUpdated {
        location: MapLocation,
    },
    LocationDeleted {
        id: MapLocationId,
    },

    // Routes
    RouteCreated {
        route: MapRoute,
    },
    RouteUpdated {
        route: MapRoute,
    },
    RouteDeleted {
        id: RouteId,
    },

    // Layers
    LayerCreated {
        id: LayerId,
        layer_type: LayerType,
    },
    LayerUpdated {
        id: LayerId,
    },
    LayerDeleted {
        id: LayerId,
    },

    // Terrain and borders
    TerrainFeatureCreated {
        feature: TerrainFeature,
    },
    TerrainFeatureDeleted {
        id: TerrainFeatureId,
    },
    PoliticalRegionCreated {
        region: PoliticalRegion,
    },
    PoliticalRegionDeleted {
        id: PoliticalRegionId,
    },

    // Notes and grid
    AnnotationCreated {
        annotation: MapAnnotation,
    },
    AnnotationUpdated {
        annotation: MapAnnotation,
    },
    AnnotationDeleted {
        id: AnnotationId,
    },
    GridUpdated {
        grid: GridSettings,
        enabled: bool,
    },

    // Characters
    CharacterMoved {
        character_id: CharacterId,
        from: Option<Point>,
        to: Point,
        location_id: Option<MapLocationId>,
        travel_log_entry_id: Option<TravelLogEntryId>,
    },

    // Fog of war
    FogRevealed {
        character_id: CharacterId,
        area: FogArea,
    },
    FogExplored {
        character_id: CharacterId,
        area: FogArea,
    },
}

impl MapEventData {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MapCreated { .. } => "map_created",
            Self::MapUpdated { .. } => "map_updated",
            Self::MapDeleted { .. } => "map_deleted",
            Self::LocationCreated { .. } => "location_created",
            Self::LocationUpdated { .. } => "location_updated",
            Self::LocationDeleted { .. } => "location_deleted",
            Self::RouteCreated { .. } => "route_created",
            Self::RouteUpdated { .. } => "route_updated",
            Self::RouteDeleted { .. } => "route_deleted",
            Self::LayerCreated { .. } => "layer_created",
            Self::LayerUpdated { .. } => "layer_updated",
            Self::LayerDeleted { .. } => "layer_deleted",
            Self::TerrainFeatureCreated { .. } => "terrain_feature_created",
            Self::TerrainFeatureDeleted { .. } => "terrain_feature_deleted",
            Self::PoliticalRegionCreated { .. } => "political_region_created",
            Self::PoliticalRegionDeleted { .. } => "political_region_deleted",
            Self::AnnotationCreated { .. } => "annotation_created",
            Self::AnnotationUpdated { .. } => "annotation_updated",
            Self::AnnotationDeleted { .. } => "annotation_deleted",
            Self::GridUpdated { .. } => "grid_updated",
            Self::CharacterMoved { .. } => "character_moved",
            Self::FogRevealed { .. } => "fog_revealed",
            Self::FogExplored { .. } => "fog_explored",
        }
    }
}
