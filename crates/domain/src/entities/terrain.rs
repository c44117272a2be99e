//! Area features for the Terrain and Political layers

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{ensure_polygon, polygon_contains, Point};
use crate::{PoliticalRegionId, TerrainFeatureId};

/// Types of overland terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerrainKind {
    #[default]
    Plains,
    Forest,
    Hills,
    Mountains,
    Swamp,
    Desert,
    Tundra,
    Water,
}

impl TerrainKind {
    /// Multiplier applied to overland travel time through this terrain.
    ///
    /// Suitable as `TravelOptions::terrain_factor`. Water is not crossable on
    /// foot and reports `None`.
    pub fn travel_multiplier(&self) -> Option<f64> {
        match self {
            Self::Plains => Some(1.0),
            Self::Desert => Some(1.25),
            Self::Forest | Self::Hills | Self::Tundra => Some(1.5),
            Self::Swamp => Some(2.0),
            Self::Mountains => Some(3.0),
            Self::Water => None,
        }
    }
}

/// A terrain polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainFeature {
    pub id: TerrainFeatureId,
    pub name: Option<String>,
    pub kind: TerrainKind,
    pub area: Vec<Point>,
}

impl TerrainFeature {
    /// # Errors
    ///
    /// The outline needs at least three finite points.
    pub fn new(kind: TerrainKind, area: Vec<Point>) -> Result<Self, DomainError> {
        ensure_polygon(&area, "Terrain feature")?;
        Ok(Self {
            id: TerrainFeatureId::new(),
            name: None,
            kind,
            area,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn contains(&self, point: Point) -> bool {
        polygon_contains(&self.area, point)
    }

    pub(crate) fn validate(&self) -> Result<(), DomainError> {
        ensure_polygon(&self.area, "Terrain feature")
    }
}

/// A political border (kingdom, barony, free city...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliticalRegion {
    pub id: PoliticalRegionId,
    pub name: String,
    pub color: Option<String>,
    pub area: Vec<Point>,
}

impl PoliticalRegion {
    /// # Errors
    ///
    /// Blank names and outlines with fewer than three finite points.
    pub fn new(name: impl Into<String>, area: Vec<Point>) -> Result<Self, DomainError> {
        let region = Self {
            id: PoliticalRegionId::new(),
            name: name.into().trim().to_string(),
            color: None,
            area,
        };
        region.validate()?;
        Ok(region)
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn contains(&self, point: Point) -> bool {
        polygon_contains(&self.area, point)
    }

    pub(crate) fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Region name cannot be empty"));
        }
        ensure_polygon(&self.area, "Political region")
    }
}
