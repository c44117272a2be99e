//! Routes drawn between points on a world map

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::travel::{polyline_length, route_travel_time, TravelTime};
use crate::value_objects::{ensure_finite_points, Point, RouteName};
use crate::RouteId;

/// Kind of route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteType {
    Road,
    Trail,
    River,
    SeaLane,
    MountainPass,
    Secret,
    #[default]
    #[serde(other)]
    Other,
}

/// A polyline route with travel times precomputed at the reference speeds.
///
/// # Invariants
///
/// - At least two points, all finite
/// - `travel_time` always matches the current points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRoute {
    id: RouteId,
    name: RouteName,
    route_type: RouteType,
    points: Vec<Point>,
    travel_time: TravelTime,
    #[serde(default)]
    description: Option<String>,
}

impl MapRoute {
    /// Create a route, computing its travel time from the polyline length.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when fewer than two points are given
    /// or any coordinate is not finite.
    pub fn new(name: RouteName, route_type: RouteType, points: Vec<Point>) -> Result<Self, DomainError> {
        validate_points(&points)?;
        let travel_time = route_travel_time(&points);
        Ok(Self {
            id: RouteId::new(),
            name,
            route_type,
            points,
            travel_time,
            description: None,
        })
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn name(&self) -> &RouteName {
        &self.name
    }

    pub fn route_type(&self) -> RouteType {
        self.route_type
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn travel_time(&self) -> TravelTime {
        self.travel_time
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn length(&self) -> f64 {
        polyline_length(&self.points)
    }

    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn with_id(mut self, id: RouteId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn rename(&mut self, name: RouteName) {
        self.name = name;
    }

    pub fn set_route_type(&mut self, route_type: RouteType) {
        self.route_type = route_type;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Replace the polyline. Travel time is recomputed only when the points
    /// actually differ.
    pub fn set_points(&mut self, points: Vec<Point>) -> Result<(), DomainError> {
        validate_points(&points)?;
        if points != self.points {
            self.travel_time = route_travel_time(&points);
            self.points = points;
        }
        Ok(())
    }

    /// Take name, type, description and points from `edited`, keeping the
    /// stored travel time unless the points changed.
    pub fn apply_edit(&mut self, edited: MapRoute) -> Result<(), DomainError> {
        self.set_points(edited.points)?;
        self.name = edited.name;
        self.route_type = edited.route_type;
        self.description = edited.description;
        Ok(())
    }
}

pub(crate) fn validate_points(points: &[Point]) -> Result<(), DomainError> {
    if points.len() < 2 {
        return Err(DomainError::validation(format!(
            "A route needs at least 2 points, got {}",
            points.len()
        )));
    }
    ensure_finite_points(points, "Route")
}
