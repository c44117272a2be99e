//! Coordinate grid overlay settings

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GridStyle {
    #[default]
    Square,
    Hex,
}

/// Payload of the Grid layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    /// Cell edge (square) or flat-to-flat width (hex), in map units
    pub cell_size: f64,
    pub offset: Point,
    pub style: GridStyle,
    pub color: Option<String>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            cell_size: 50.0,
            offset: Point::ORIGIN,
            style: GridStyle::Square,
            color: None,
        }
    }
}

impl GridSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(DomainError::validation("Grid cell size must be positive"));
        }
        if !self.offset.is_finite() {
            return Err(DomainError::validation("Grid offset must be finite"));
        }
        Ok(())
    }

    /// Square-grid cell containing `point`, as (column, row).
    pub fn cell_at(&self, point: Point) -> (i64, i64) {
        let col = ((point.x - self.offset.x) / self.cell_size).floor() as i64;
        let row = ((point.y - self.offset.y) / self.cell_size).floor() as i64;
        (col, row)
    }
}
