//! Plan-space geometry shared by every map layer.
//!
//! Coordinates are unitless map-plane values; `MapScale` says what one unit
//! means in the fiction (e.g. 1 unit = 2 miles).

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A position on the map plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in map units.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Validation error naming `what` unless both coordinates are finite.
    pub fn ensure_finite(&self, what: &str) -> Result<(), DomainError> {
        ensure_finite_points(std::slice::from_ref(self), what)
    }
}

/// Rejects any point with a NaN or infinite coordinate.
pub fn ensure_finite_points(points: &[Point], what: &str) -> Result<(), DomainError> {
    if points.iter().all(Point::is_finite) {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "{} contains a non-finite coordinate",
            what
        )))
    }
}

/// Checks an area outline: at least three points, all finite.
pub fn ensure_polygon(points: &[Point], what: &str) -> Result<(), DomainError> {
    if points.len() < 3 {
        return Err(DomainError::validation(format!(
            "{} needs at least 3 points, got {}",
            what,
            points.len()
        )));
    }
    ensure_finite_points(points, what)
}

/// Even-odd rule. Points exactly on an edge may land on either side.
pub fn polygon_contains(polygon: &[Point], point: Point) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for (i, a) in polygon.iter().enumerate() {
        let b = &polygon[j];
        if (a.y > point.y) != (b.y > point.y) {
            let crossing = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < crossing {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// What one map unit represents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapScale {
    pub value: f64,
    pub unit: String,
}

impl Default for MapScale {
    fn default() -> Self {
        Self {
            value: 1.0,
            unit: "miles".to_string(),
        }
    }
}

/// Initial camera for viewers of the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Point,
    pub zoom: f64,
}

impl MapView {
    pub fn centered_on(width: f64, height: f64) -> Self {
        Self {
            center: Point::new(width / 2.0, height / 2.0),
            zoom: 1.0,
        }
    }
}
