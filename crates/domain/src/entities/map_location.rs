//! Points of interest placed on a world map

use serde::{Deserialize, Serialize};

use crate::value_objects::{LocationName, Point};
use crate::MapLocationId;

/// Kind of point of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MapLocationType {
    City,
    Town,
    Village,
    Dungeon,
    Landmark,
    Ruins,
    Fortress,
    Temple,
    Camp,
    Port,
    Wilderness,
    /// Unknown type for forward compatibility
    #[default]
    #[serde(other)]
    Other,
}

impl MapLocationType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::City => "City",
            Self::Town => "Town",
            Self::Village => "Village",
            Self::Dungeon => "Dungeon",
            Self::Landmark => "Landmark",
            Self::Ruins => "Ruins",
            Self::Fortress => "Fortress",
            Self::Temple => "Temple",
            Self::Camp => "Camp",
            Self::Port => "Port",
            Self::Wilderness => "Wilderness",
            Self::Other => "Location",
        }
    }

    /// Settlements are where travellers can rest and resupply.
    pub fn is_settlement(&self) -> bool {
        matches!(self, Self::City | Self::Town | Self::Village | Self::Port)
    }
}

/// A named point of interest on the PointsOfInterest layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLocation {
    id: MapLocationId,
    name: LocationName,
    location_type: MapLocationType,
    position: Point,
    discovered: bool,
    visited: bool,
    #[serde(default)]
    tags: Vec<String>,
    /// Other locations reachable directly from here
    #[serde(default)]
    connections: Vec<MapLocationId>,
    #[serde(default)]
    description: Option<String>,
}

impl MapLocation {
    pub fn new(name: LocationName, location_type: MapLocationType, position: Point) -> Self {
        Self {
            id: MapLocationId::new(),
            name,
            location_type,
            position,
            discovered: false,
            visited: false,
            tags: Vec::new(),
            connections: Vec::new(),
            description: None,
        }
    }

    // Read-only accessors

    pub fn id(&self) -> MapLocationId {
        self.id
    }

    pub fn name(&self) -> &LocationName {
        &self.name
    }

    pub fn location_type(&self) -> MapLocationType {
        self.location_type
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_discovered(&self) -> bool {
        self.discovered
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn connections(&self) -> &[MapLocationId] {
        &self.connections
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    // Builder-style methods

    pub fn with_id(mut self, id: MapLocationId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_connections(mut self, connections: Vec<MapLocationId>) -> Self {
        self.connections = connections;
        self
    }

    pub fn discovered(mut self) -> Self {
        self.discovered = true;
        self
    }

    // Mutations

    pub fn rename(&mut self, name: LocationName) {
        self.name = name;
    }

    pub fn set_location_type(&mut self, location_type: MapLocationType) {
        self.location_type = location_type;
    }

    pub fn move_to(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Visiting a location implies it has been discovered.
    pub fn mark_visited(&mut self) {
        self.visited = true;
        self.discovered = true;
    }

    pub fn mark_discovered(&mut self) {
        self.discovered = true;
    }

    pub fn connect_to(&mut self, other: MapLocationId) {
        if other != self.id && !self.connections.contains(&other) {
            self.connections.push(other);
        }
    }

    /// Drop a connection, returning whether one was present.
    pub fn disconnect_from(&mut self, other: MapLocationId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| *c != other);
        before != self.connections.len()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tavern() -> MapLocation {
        MapLocation::new(
            LocationName::new("Crossroads Inn").unwrap(),
            MapLocationType::Landmark,
            Point::new(10.0, 20.0),
        )
    }

    #[test]
    fn new_locations_are_undiscovered() {
        let loc = tavern();
        assert!(!loc.is_discovered());
        assert!(!loc.is_visited());
        assert!(loc.connections().is_empty());
    }

    #[test]
    fn visiting_discovers() {
        let mut loc = tavern();
        loc.mark_visited();
        assert!(loc.is_visited());
        assert!(loc.is_discovered());
    }

    #[test]
    fn connections_ignore_self_and_duplicates() {
        let mut loc = tavern();
        let other = MapLocationId::new();
        loc.connect_to(other);
        loc.connect_to(other);
        loc.connect_to(loc.id());
        assert_eq!(loc.connections(), &[other]);
        assert!(loc.disconnect_from(other));
        assert!(!loc.disconnect_from(other));
    }

    #[test]
    fn unknown_types_deserialize_as_other() {
        let kind: MapLocationType = serde_json::from_str("\"floatingIsland\"").unwrap();
        assert_eq!(kind, MapLocationType::Other);
        assert!(MapLocationType::Port.is_settlement());
    }
}
