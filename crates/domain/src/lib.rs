//! Core types for the world-map engine: the layered `WorldMap` aggregate,
//! the entities drawn on its layers, character position records, map events
//! and the pure travel math.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod travel;
pub mod value_objects;

pub use aggregates::{MapMetadata, MapSettings, WorldMap};

pub use entities::{
    CharacterMapPosition, FogArea, FogState, GridSettings, GridStyle, Layer, LayerPatch,
    LayerPayload, LayerType, MapAnnotation, MapLocation, MapLocationType, MapRoute,
    PoliticalRegion, RouteType, TerrainFeature, TerrainKind, TravelLogEntry,
};

pub use error::DomainError;
pub use events::{MapEvent, MapEventData};

// Re-export ID types
pub use ids::{
    AnnotationId, CharacterId, FogAreaId, LayerId, MapId, MapLocationId, PoliticalRegionId,
    RouteId, TerrainFeatureId, TravelLogEntryId,
};

pub use travel::{
    calculate_distance, estimate_travel, polyline_length, route_travel_time, TravelEstimate,
    TravelOptions, TravelTime, RIDING_SPEED, WALKING_SPEED,
};

pub use value_objects::{
    LayerName, LocationName, MapName, MapScale, MapView, NoteText, Point, RouteName,
};
