//! Entities that live inside a world map's layers, plus the per-character
//! records kept alongside the map.

mod annotation;
mod character_position;
mod fog;
mod grid;
mod layer;
mod map_location;
mod map_route;
mod terrain;

pub use annotation::MapAnnotation;
pub use character_position::{CharacterMapPosition, TravelLogEntry};
pub use fog::{FogArea, FogState};
pub use grid::{GridSettings, GridStyle};
pub use layer::{Layer, LayerPatch, LayerPayload, LayerType};
pub use map_location::{MapLocation, MapLocationType};
pub use map_route::{MapRoute, RouteType};
pub use terrain::{PoliticalRegion, TerrainFeature, TerrainKind};
