//! Map layers and their typed payloads

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::map_route::validate_points;
use crate::entities::{
    FogState, GridSettings, MapAnnotation, MapLocation, MapRoute, PoliticalRegion, TerrainFeature,
};
use crate::error::DomainError;
use crate::value_objects::{ensure_finite_points, LayerName};
use crate::LayerId;

/// Layer kinds, in the order `WorldMap::new` stacks them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerType {
    Base,
    Terrain,
    Political,
    PointsOfInterest,
    Routes,
    Notes,
    Grid,
    FogOfWar,
    Custom,
}

impl LayerType {
    /// Layers every new map starts with, bottom to top.
    pub const CANONICAL: [LayerType; 8] = [
        LayerType::Base,
        LayerType::Terrain,
        LayerType::Political,
        LayerType::PointsOfInterest,
        LayerType::Routes,
        LayerType::Notes,
        LayerType::Grid,
        LayerType::FogOfWar,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Base => "Base",
            Self::Terrain => "Terrain",
            Self::Political => "Political",
            Self::PointsOfInterest => "Points of Interest",
            Self::Routes => "Routes",
            Self::Notes => "Notes",
            Self::Grid => "Grid",
            Self::FogOfWar => "Fog of War",
            Self::Custom => "Custom",
        }
    }

    /// (visible, opacity) for a freshly created layer of this type.
    pub fn default_appearance(&self) -> (bool, f64) {
        match self {
            Self::Grid | Self::FogOfWar => (false, 1.0),
            Self::Political => (true, 0.6),
            _ => (true, 1.0),
        }
    }

    /// Empty payload of the matching variant.
    pub fn empty_payload(&self) -> LayerPayload {
        match self {
            Self::Base => LayerPayload::Base {
                background_asset: None,
            },
            Self::Terrain => LayerPayload::Terrain {
                features: Vec::new(),
            },
            Self::Political => LayerPayload::Political {
                regions: Vec::new(),
            },
            Self::PointsOfInterest => LayerPayload::PointsOfInterest {
                locations: Vec::new(),
            },
            Self::Routes => LayerPayload::Routes { routes: Vec::new() },
            Self::Notes => LayerPayload::Notes { notes: Vec::new() },
            Self::Grid => LayerPayload::Grid(GridSettings::default()),
            Self::FogOfWar => LayerPayload::FogOfWar(FogState::default()),
            Self::Custom => LayerPayload::Custom {
                properties: BTreeMap::new(),
            },
        }
    }
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Layer data; the variant is the layer's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum LayerPayload {
    Base { background_asset: Option<String> },
    Terrain { features: Vec<TerrainFeature> },
    Political { regions: Vec<PoliticalRegion> },
    PointsOfInterest { locations: Vec<MapLocation> },
    Routes { routes: Vec<MapRoute> },
    Notes { notes: Vec<MapAnnotation> },
    Grid(GridSettings),
    FogOfWar(FogState),
    Custom { properties: BTreeMap<String, String> },
}

impl LayerPayload {
    pub fn layer_type(&self) -> LayerType {
        match self {
            Self::Base { .. } => LayerType::Base,
            Self::Terrain { .. } => LayerType::Terrain,
            Self::Political { .. } => LayerType::Political,
            Self::PointsOfInterest { .. } => LayerType::PointsOfInterest,
            Self::Routes { .. } => LayerType::Routes,
            Self::Notes { .. } => LayerType::Notes,
            Self::Grid(_) => LayerType::Grid,
            Self::FogOfWar(_) => LayerType::FogOfWar,
            Self::Custom { .. } => LayerType::Custom,
        }
    }

    /// Geometry checks for every entity the payload carries. A payload that
    /// passes can be stored and read back.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Terrain { features } => features.iter().try_for_each(TerrainFeature::validate),
            Self::Political { regions } => regions.iter().try_for_each(PoliticalRegion::validate),
            Self::PointsOfInterest { locations } => locations
                .iter()
                .try_for_each(|l| l.position().ensure_finite("Location")),
            Self::Routes { routes } => routes.iter().try_for_each(|r| validate_points(r.points())),
            Self::Notes { notes } => notes
                .iter()
                .try_for_each(|n| n.position().ensure_finite("Annotation")),
            Self::Grid(grid) => grid.validate(),
            Self::FogOfWar(fog) => fog
                .revealed_areas()
                .iter()
                .chain(fog.explored_areas())
                .try_for_each(|area| ensure_finite_points(&area.points, "Fog area")),
            Self::Base { .. } | Self::Custom { .. } => Ok(()),
        }
    }
}

/// Changes to a layer's presentation. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPatch {
    pub name: Option<LayerName>,
    pub visible: Option<bool>,
    pub opacity: Option<f64>,
}

/// One stackable slice of a map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    id: LayerId,
    name: LayerName,
    visible: bool,
    opacity: f64,
    order: u32,
    payload: LayerPayload,
}

impl Layer {
    /// New layer using its type's default appearance. `order` is assigned
    /// when the layer joins a map.
    pub fn new(name: LayerName, payload: LayerPayload) -> Self {
        let (visible, opacity) = payload.layer_type().default_appearance();
        Self {
            id: LayerId::new(),
            name,
            visible,
            opacity,
            order: 0,
            payload,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn name(&self) -> &LayerName {
        &self.name
    }

    pub fn layer_type(&self) -> LayerType {
        self.payload.layer_type()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn payload(&self) -> &LayerPayload {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut LayerPayload {
        &mut self.payload
    }

    pub(crate) fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    /// Apply a presentation patch atomically: nothing changes if any field
    /// is invalid.
    pub fn apply(&mut self, patch: LayerPatch) -> Result<(), DomainError> {
        if let Some(opacity) = patch.opacity {
            validate_opacity(opacity)?;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity;
        }
        Ok(())
    }
}

fn validate_opacity(opacity: f64) -> Result<(), DomainError> {
    if (0.0..=1.0).contains(&opacity) {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "Layer opacity must be within [0, 1], got {}",
            opacity
        )))
    }
}
