//! Fog-of-war mask data.
//!
//! Both area collections are append-only: nothing in the engine removes an
//! area once recorded. Overlapping reveals are kept as separate records, so
//! the list doubles as a reveal history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{ensure_finite_points, Point};
use crate::{CharacterId, FogAreaId};

/// One recorded polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FogArea {
    pub id: FogAreaId,
    pub points: Vec<Point>,
    /// Character whose movement or action uncovered the area, if any
    pub character_id: Option<CharacterId>,
    pub recorded_at: DateTime<Utc>,
}

impl FogArea {
    /// # Errors
    ///
    /// Polygons need at least three finite points.
    pub fn new(
        points: Vec<Point>,
        character_id: Option<CharacterId>,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if points.len() < 3 {
            return Err(DomainError::validation(format!(
                "A fog area needs at least 3 points, got {}",
                points.len()
            )));
        }
        ensure_finite_points(&points, "Fog area")?;
        Ok(Self {
            id: FogAreaId::new(),
            points,
            character_id,
            recorded_at,
        })
    }
}

/// Payload of the FogOfWar layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FogState {
    #[serde(default)]
    revealed_areas: Vec<FogArea>,
    #[serde(default)]
    explored_areas: Vec<FogArea>,
}

impl FogState {
    pub fn revealed_areas(&self) -> &[FogArea] {
        &self.revealed_areas
    }

    pub fn explored_areas(&self) -> &[FogArea] {
        &self.explored_areas
    }

    pub fn reveal(&mut self, area: FogArea) {
        self.revealed_areas.push(area);
    }

    pub fn explore(&mut self, area: FogArea) {
        self.explored_areas.push(area);
    }

    pub fn is_empty(&self) -> bool {
        self.revealed_areas.is_empty() && self.explored_areas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn triangle() -> Vec<Point> {
        vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)]
    }

    #[test]
    fn degenerate_polygons_are_rejected() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let err = FogArea::new(triangle()[..2].to_vec(), None, now).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn identical_reveals_accumulate() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut fog = FogState::default();
        fog.reveal(FogArea::new(triangle(), None, now).unwrap());
        fog.reveal(FogArea::new(triangle(), None, now).unwrap());
        assert_eq!(fog.revealed_areas().len(), 2);
        assert!(fog.explored_areas().is_empty());
        assert_ne!(fog.revealed_areas()[0].id, fog.revealed_areas()[1].id);
    }
}
