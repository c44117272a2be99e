//! WorldMap aggregate - a layered overland map
//!
//! The map owns every layer and every entity placed on a layer. All changes
//! go through methods on the aggregate so the layer invariants hold no matter
//! who edits it:
//!
//! - layer ids are unique
//! - layer `order` values are exactly `0..layers.len()`, and `layers` is kept
//!   sorted by order
//! - ids are unique inside each entity list (locations, routes, notes)
//! - the default layer always exists
//! - every stored coordinate is finite
//! - recorded fog of war is never discarded

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{
    FogArea, FogState, GridSettings, Layer, LayerPatch, LayerPayload, LayerType, MapAnnotation,
    MapLocation, MapRoute, PoliticalRegion, TerrainFeature, TerrainKind,
};
use crate::error::DomainError;
use crate::value_objects::{LayerName, MapName, MapScale, MapView, Point};
use crate::{
    AnnotationId, LayerId, MapId, MapLocationId, PoliticalRegionId, RouteId, TerrainFeatureId,
};

/// Map-wide toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSettings {
    pub grid_enabled: bool,
    pub fog_of_war_enabled: bool,
    /// Layer selected when the map is opened for editing
    pub default_layer_id: LayerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A layered world map
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use wrldbldr_map_domain::aggregates::WorldMap;
/// use wrldbldr_map_domain::entities::LayerType;
/// use wrldbldr_map_domain::value_objects::MapName;
///
/// let map = WorldMap::new(MapName::new("The Known World").unwrap(), 1000.0, 800.0, Utc::now()).unwrap();
///
/// assert_eq!(map.layers().len(), 8);
/// assert_eq!(map.default_layer().map(|l| l.layer_type()), Some(LayerType::PointsOfInterest));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldMap {
    // Identity
    id: MapId,
    name: MapName,
    description: Option<String>,

    // Plan space
    width: f64,
    height: f64,
    scale: MapScale,

    layers: Vec<Layer>,
    default_view: MapView,
    settings: MapSettings,
    metadata: MapMetadata,

    /// Bumped on every successful save; used to reject stale writes
    version: u64,
}

impl WorldMap {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a map with the eight canonical layers.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when either dimension is not a
    /// positive finite number.
    pub fn new(name: MapName, width: f64, height: f64, now: DateTime<Utc>) -> Result<Self, DomainError> {
        for (label, value) in [("width", width), ("height", height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(DomainError::validation(format!(
                    "Map {} must be a positive number, got {}",
                    label, value
                )));
            }
        }

        let mut layers = Vec::with_capacity(LayerType::CANONICAL.len());
        for (order, layer_type) in LayerType::CANONICAL.iter().enumerate() {
            let mut layer = Layer::new(
                LayerName::new(layer_type.display_name())?,
                layer_type.empty_payload(),
            );
            layer.set_order(order as u32);
            layers.push(layer);
        }

        let default_layer_id = layers
            .iter()
            .find(|l| l.layer_type() == LayerType::PointsOfInterest)
            .map(Layer::id)
            .ok_or_else(|| DomainError::not_found("Layer", LayerType::PointsOfInterest))?;

        Ok(Self {
            id: MapId::new(),
            name,
            description: None,
            width,
            height,
            scale: MapScale::default(),
            layers,
            default_view: MapView::centered_on(width, height),
            settings: MapSettings {
                grid_enabled: false,
                fog_of_war_enabled: false,
                default_layer_id,
            },
            metadata: MapMetadata {
                created_at: now,
                updated_at: now,
                tags: Vec::new(),
            },
            version: 1,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> MapId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &MapName {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn scale(&self) -> &MapScale {
        &self.scale
    }

    /// Layers sorted bottom to top.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn default_view(&self) -> MapView {
        self.default_view
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    pub fn metadata(&self) -> &MapMetadata {
        &self.metadata
    }

    pub fn tags(&self) -> &[String] {
        &self.metadata.tags
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    /// Lowest layer of the given type.
    pub fn layer_of_type(&self, layer_type: LayerType) -> Option<&Layer> {
        self.layers.iter().find(|l| l.layer_type() == layer_type)
    }

    pub fn default_layer(&self) -> Option<&Layer> {
        self.layer(self.settings.default_layer_id)
    }

    // =========================================================================
    // Map-level edits
    // =========================================================================

    pub fn rename(&mut self, name: MapName) {
        self.name = name;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn set_scale(&mut self, scale: MapScale) {
        self.scale = scale;
    }

    pub fn set_default_view(&mut self, view: MapView) {
        self.default_view = view;
    }

    pub fn set_fog_of_war_enabled(&mut self, enabled: bool) {
        self.settings.fog_of_war_enabled = enabled;
    }

    pub fn set_default_layer(&mut self, layer_id: LayerId) -> Result<(), DomainError> {
        if self.layer(layer_id).is_none() {
            return Err(DomainError::not_found("Layer", layer_id));
        }
        self.settings.default_layer_id = layer_id;
        Ok(())
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.has_tag(&tag) {
            self.metadata.tags.push(tag);
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Record a successful save: bump the version and the update time.
    pub fn mark_saved(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.metadata.updated_at = now;
    }

    // =========================================================================
    // Layers
    // =========================================================================

    /// Append a layer on top of the stack.
    pub fn add_layer(&mut self, mut layer: Layer) -> Result<LayerId, DomainError> {
        layer.payload().validate()?;
        if self.layer(layer.id()).is_some() {
            return Err(DomainError::constraint(format!(
                "Layer {} already exists on map {}",
                layer.id(),
                self.id
            )));
        }
        layer.set_order(self.layers.len() as u32);
        let id = layer.id();
        self.layers.push(layer);
        Ok(id)
    }

    pub fn update_layer(&mut self, id: LayerId, patch: LayerPatch) -> Result<&Layer, DomainError> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.id() == id)
            .ok_or_else(|| DomainError::not_found("Layer", id))?;
        layer.apply(patch)?;
        Ok(layer)
    }

    /// Remove a layer and close the gap in the ordering.
    ///
    /// A fog-of-war layer can only go while nothing has been revealed or
    /// explored on it.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<Layer, DomainError> {
        if id == self.settings.default_layer_id {
            return Err(DomainError::constraint(
                "The default layer cannot be deleted; choose another default first",
            ));
        }
        let index = self
            .layers
            .iter()
            .position(|l| l.id() == id)
            .ok_or_else(|| DomainError::not_found("Layer", id))?;
        if let LayerPayload::FogOfWar(fog) = self.layers[index].payload() {
            if !fog.is_empty() {
                return Err(DomainError::constraint(
                    "A fog of war layer with revealed or explored areas cannot be deleted",
                ));
            }
        }
        let removed = self.layers.remove(index);
        self.renumber_layers();
        Ok(removed)
    }

    /// Move a layer to `new_order`, shifting the layers in between.
    pub fn move_layer(&mut self, id: LayerId, new_order: u32) -> Result<(), DomainError> {
        if new_order as usize >= self.layers.len() {
            return Err(DomainError::validation(format!(
                "Layer order {} is out of range (map has {} layers)",
                new_order,
                self.layers.len()
            )));
        }
        let index = self
            .layers
            .iter()
            .position(|l| l.id() == id)
            .ok_or_else(|| DomainError::not_found("Layer", id))?;
        let layer = self.layers.remove(index);
        self.layers.insert(new_order as usize, layer);
        self.renumber_layers();
        Ok(())
    }

    fn renumber_layers(&mut self) {
        for (order, layer) in self.layers.iter_mut().enumerate() {
            layer.set_order(order as u32);
        }
    }

    // =========================================================================
    // Points of interest
    // =========================================================================

    pub fn locations(&self) -> &[MapLocation] {
        self.layers
            .iter()
            .find_map(|l| match l.payload() {
                LayerPayload::PointsOfInterest { locations } => Some(locations.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn location(&self, id: MapLocationId) -> Option<&MapLocation> {
        self.locations().iter().find(|l| l.id() == id)
    }

    fn locations_mut(&mut self) -> Result<&mut Vec<MapLocation>, DomainError> {
        self.layers
            .iter_mut()
            .find_map(|l| match l.payload_mut() {
                LayerPayload::PointsOfInterest { locations } => Some(locations),
                _ => None,
            })
            .ok_or_else(|| missing_layer(LayerType::PointsOfInterest))
    }

    pub fn add_location(&mut self, location: MapLocation) -> Result<(), DomainError> {
        location.position().ensure_finite("Location")?;
        let locations = self.locations_mut()?;
        if locations.iter().any(|l| l.id() == location.id()) {
            return Err(DomainError::constraint(format!(
                "Location {} already exists on this map",
                location.id()
            )));
        }
        locations.push(location);
        Ok(())
    }

    /// Replace the stored location with the same id.
    pub fn update_location(&mut self, location: MapLocation) -> Result<(), DomainError> {
        location.position().ensure_finite("Location")?;
        let slot = self
            .locations_mut()?
            .iter_mut()
            .find(|l| l.id() == location.id())
            .ok_or_else(|| DomainError::not_found("MapLocation", location.id()))?;
        *slot = location;
        Ok(())
    }

    /// Remove a location and any connections pointing at it.
    pub fn remove_location(&mut self, id: MapLocationId) -> Result<MapLocation, DomainError> {
        let locations = self.locations_mut()?;
        let index = locations
            .iter()
            .position(|l| l.id() == id)
            .ok_or_else(|| DomainError::not_found("MapLocation", id))?;
        let removed = locations.remove(index);
        for other in locations.iter_mut() {
            other.disconnect_from(id);
        }
        Ok(removed)
    }

    // =========================================================================
    // Routes
    // =========================================================================

    pub fn routes(&self) -> &[MapRoute] {
        self.layers
            .iter()
            .find_map(|l| match l.payload() {
                LayerPayload::Routes { routes } => Some(routes.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn route(&self, id: RouteId) -> Option<&MapRoute> {
        self.routes().iter().find(|r| r.id() == id)
    }

    fn routes_mut(&mut self) -> Result<&mut Vec<MapRoute>, DomainError> {
        self.layers
            .iter_mut()
            .find_map(|l| match l.payload_mut() {
                LayerPayload::Routes { routes } => Some(routes),
                _ => None,
            })
            .ok_or_else(|| missing_layer(LayerType::Routes))
    }

    pub fn add_route(&mut self, route: MapRoute) -> Result<(), DomainError> {
        let routes = self.routes_mut()?;
        if routes.iter().any(|r| r.id() == route.id()) {
            return Err(DomainError::constraint(format!(
                "Route {} already exists on this map",
                route.id()
            )));
        }
        routes.push(route);
        Ok(())
    }

    /// Apply `edited` to the stored route with the same id. Travel time is
    /// only recomputed when the points differ.
    pub fn update_route(&mut self, edited: MapRoute) -> Result<&MapRoute, DomainError> {
        let route = self
            .routes_mut()?
            .iter_mut()
            .find(|r| r.id() == edited.id())
            .ok_or_else(|| DomainError::not_found("MapRoute", edited.id()))?;
        route.apply_edit(edited)?;
        Ok(route)
    }

    pub fn remove_route(&mut self, id: RouteId) -> Result<MapRoute, DomainError> {
        let routes = self.routes_mut()?;
        let index = routes
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| DomainError::not_found("MapRoute", id))?;
        Ok(routes.remove(index))
    }

    // =========================================================================
    // Notes
    // =========================================================================

    pub fn annotations(&self) -> &[MapAnnotation] {
        self.layers
            .iter()
            .find_map(|l| match l.payload() {
                LayerPayload::Notes { notes } => Some(notes.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    fn annotations_mut(&mut self) -> Result<&mut Vec<MapAnnotation>, DomainError> {
        self.layers
            .iter_mut()
            .find_map(|l| match l.payload_mut() {
                LayerPayload::Notes { notes } => Some(notes),
                _ => None,
            })
            .ok_or_else(|| missing_layer(LayerType::Notes))
    }

    pub fn add_annotation(&mut self, annotation: MapAnnotation) -> Result<(), DomainError> {
        annotation.position().ensure_finite("Annotation")?;
        let notes = self.annotations_mut()?;
        if notes.iter().any(|n| n.id() == annotation.id()) {
            return Err(DomainError::constraint(format!(
                "Annotation {} already exists on this map",
                annotation.id()
            )));
        }
        notes.push(annotation);
        Ok(())
    }

    pub fn update_annotation(&mut self, edited: MapAnnotation) -> Result<&MapAnnotation, DomainError> {
        edited.position().ensure_finite("Annotation")?;
        let note = self
            .annotations_mut()?
            .iter_mut()
            .find(|n| n.id() == edited.id())
            .ok_or_else(|| DomainError::not_found("MapAnnotation", edited.id()))?;
        note.apply_edit(edited);
        Ok(note)
    }

    pub fn remove_annotation(&mut self, id: AnnotationId) -> Result<MapAnnotation, DomainError> {
        let notes = self.annotations_mut()?;
        let index = notes
            .iter()
            .position(|n| n.id() == id)
            .ok_or_else(|| DomainError::not_found("MapAnnotation", id))?;
        Ok(notes.remove(index))
    }

    // =========================================================================
    // Terrain and borders
    // =========================================================================

    pub fn terrain_features(&self) -> &[TerrainFeature] {
        self.layers
            .iter()
            .find_map(|l| match l.payload() {
                LayerPayload::Terrain { features } => Some(features.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    fn terrain_features_mut(&mut self) -> Result<&mut Vec<TerrainFeature>, DomainError> {
        self.layers
            .iter_mut()
            .find_map(|l| match l.payload_mut() {
                LayerPayload::Terrain { features } => Some(features),
                _ => None,
            })
            .ok_or_else(|| missing_layer(LayerType::Terrain))
    }

    pub fn add_terrain_feature(&mut self, feature: TerrainFeature) -> Result<(), DomainError> {
        feature.validate()?;
        let features = self.terrain_features_mut()?;
        if features.iter().any(|f| f.id == feature.id) {
            return Err(DomainError::constraint(format!(
                "Terrain feature {} already exists on this map",
                feature.id
            )));
        }
        features.push(feature);
        Ok(())
    }

    pub fn remove_terrain_feature(
        &mut self,
        id: TerrainFeatureId,
    ) -> Result<TerrainFeature, DomainError> {
        let features = self.terrain_features_mut()?;
        let index = features
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| DomainError::not_found("TerrainFeature", id))?;
        Ok(features.remove(index))
    }

    /// Terrain under `point`. Where features overlap, the one added last
    /// wins.
    pub fn terrain_at(&self, point: Point) -> Option<TerrainKind> {
        self.terrain_features()
            .iter()
            .rev()
            .find(|f| f.contains(point))
            .map(|f| f.kind)
    }

    pub fn political_regions(&self) -> &[PoliticalRegion] {
        self.layers
            .iter()
            .find_map(|l| match l.payload() {
                LayerPayload::Political { regions } => Some(regions.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    fn political_regions_mut(&mut self) -> Result<&mut Vec<PoliticalRegion>, DomainError> {
        self.layers
            .iter_mut()
            .find_map(|l| match l.payload_mut() {
                LayerPayload::Political { regions } => Some(regions),
                _ => None,
            })
            .ok_or_else(|| missing_layer(LayerType::Political))
    }

    pub fn add_political_region(&mut self, region: PoliticalRegion) -> Result<(), DomainError> {
        region.validate()?;
        let regions = self.political_regions_mut()?;
        if regions.iter().any(|r| r.id == region.id) {
            return Err(DomainError::constraint(format!(
                "Region {} already exists on this map",
                region.id
            )));
        }
        regions.push(region);
        Ok(())
    }

    pub fn remove_political_region(
        &mut self,
        id: PoliticalRegionId,
    ) -> Result<PoliticalRegion, DomainError> {
        let regions = self.political_regions_mut()?;
        let index = regions
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DomainError::not_found("PoliticalRegion", id))?;
        Ok(regions.remove(index))
    }

    /// Every region whose border encloses `point`.
    pub fn regions_at(&self, point: Point) -> Vec<&PoliticalRegion> {
        self.political_regions()
            .iter()
            .filter(|r| r.contains(point))
            .collect()
    }

    // =========================================================================
    // Grid
    // =========================================================================

    pub fn grid(&self) -> Option<&GridSettings> {
        self.layers.iter().find_map(|l| match l.payload() {
            LayerPayload::Grid(grid) => Some(grid),
            _ => None,
        })
    }

    pub fn configure_grid(&mut self, settings: GridSettings, enabled: bool) -> Result<(), DomainError> {
        settings.validate()?;
        let grid = self
            .layers
            .iter_mut()
            .find_map(|l| match l.payload_mut() {
                LayerPayload::Grid(grid) => Some(grid),
                _ => None,
            })
            .ok_or_else(|| missing_layer(LayerType::Grid))?;
        *grid = settings;
        self.settings.grid_enabled = enabled;
        Ok(())
    }

    // =========================================================================
    // Fog of war
    // =========================================================================

    pub fn fog(&self) -> Option<&FogState> {
        self.layers.iter().find_map(|l| match l.payload() {
            LayerPayload::FogOfWar(fog) => Some(fog),
            _ => None,
        })
    }

    fn fog_mut(&mut self) -> Result<&mut FogState, DomainError> {
        self.layers
            .iter_mut()
            .find_map(|l| match l.payload_mut() {
                LayerPayload::FogOfWar(fog) => Some(fog),
                _ => None,
            })
            .ok_or_else(|| missing_layer(LayerType::FogOfWar))
    }

    pub fn reveal_area(&mut self, area: FogArea) -> Result<(), DomainError> {
        self.fog_mut()?.reveal(area);
        Ok(())
    }

    pub fn explore_area(&mut self, area: FogArea) -> Result<(), DomainError> {
        self.fog_mut()?.explore(area);
        Ok(())
    }
}

fn missing_layer(layer_type: LayerType) -> DomainError {
    DomainError::not_found("Layer", layer_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{MapLocationType, RouteType};
    use crate::value_objects::{LocationName, NoteText, Point, RouteName};
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    fn test_map() -> WorldMap {
        WorldMap::new(MapName::new("T").unwrap(), 1000.0, 1000.0, now()).unwrap()
    }

    fn location(name: &str, x: f64, y: f64) -> MapLocation {
        MapLocation::new(
            LocationName::new(name).unwrap(),
            MapLocationType::Town,
            Point::new(x, y),
        )
    }

    fn assert_orders_contiguous(map: &WorldMap) {
        let orders: Vec<u32> = map.layers().iter().map(Layer::order).collect();
        let expected: Vec<u32> = (0..map.layers().len() as u32).collect();
        assert_eq!(orders, expected);
    }

    #[test]
    fn new_map_has_canonical_layers() {
        let map = test_map();
        assert_eq!(map.layers().len(), 8);
        assert_orders_contiguous(&map);

        let ids: HashSet<LayerId> = map.layers().iter().map(Layer::id).collect();
        assert_eq!(ids.len(), 8);

        let types: Vec<LayerType> = map.layers().iter().map(Layer::layer_type).collect();
        assert_eq!(types, LayerType::CANONICAL.to_vec());

        let poi = map.layer_of_type(LayerType::PointsOfInterest).unwrap();
        assert_eq!(map.settings().default_layer_id, poi.id());
        assert_eq!(map.version(), 1);
    }

    #[test]
    fn grid_and_fog_start_hidden() {
        let map = test_map();
        for layer in map.layers() {
            let hidden = matches!(layer.layer_type(), LayerType::Grid | LayerType::FogOfWar);
            assert_eq!(layer.is_visible(), !hidden, "{}", layer.layer_type());
        }
        for layer_type in [LayerType::Base, LayerType::PointsOfInterest, LayerType::Routes, LayerType::Notes] {
            assert_eq!(map.layer_of_type(layer_type).unwrap().opacity(), 1.0);
        }
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        let name = MapName::new("Bad").unwrap();
        assert!(WorldMap::new(name.clone(), 0.0, 10.0, now()).is_err());
        assert!(WorldMap::new(name.clone(), 10.0, -1.0, now()).is_err());
        assert!(WorldMap::new(name, f64::INFINITY, 10.0, now()).is_err());
    }

    #[test]
    fn duplicate_location_ids_are_rejected() {
        let mut map = test_map();
        let loc = location("Millbrook", 10.0, 10.0);
        map.add_location(loc.clone()).unwrap();
        let err = map.add_location(loc).unwrap_err();
        assert!(matches!(err, DomainError::Constraint(_)));
        assert_eq!(map.locations().len(), 1);
    }

    #[test]
    fn removing_location_drops_connections_to_it() {
        let mut map = test_map();
        let a = location("A", 0.0, 0.0);
        let mut b = location("B", 5.0, 5.0);
        b.connect_to(a.id());
        let a_id = a.id();
        let b_id = b.id();
        map.add_location(a).unwrap();
        map.add_location(b).unwrap();

        map.remove_location(a_id).unwrap();
        assert!(map.location(a_id).is_none());
        assert!(map.location(b_id).unwrap().connections().is_empty());
        assert!(matches!(
            map.remove_location(a_id),
            Err(DomainError::NotFound { entity_type: "MapLocation", .. })
        ));
    }

    #[test]
    fn removing_layer_renumbers() {
        let mut map = test_map();
        let political = map.layer_of_type(LayerType::Political).unwrap().id();
        map.remove_layer(political).unwrap();
        assert_eq!(map.layers().len(), 7);
        assert_orders_contiguous(&map);
        assert!(map.layer(political).is_none());
    }

    #[test]
    fn default_layer_cannot_be_removed() {
        let mut map = test_map();
        let default_layer = map.settings().default_layer_id;
        assert!(matches!(
            map.remove_layer(default_layer),
            Err(DomainError::Constraint(_))
        ));
        assert_eq!(map.layers().len(), 8);
    }

    #[test]
    fn added_layers_go_on_top_and_can_move() {
        let mut map = test_map();
        let custom = Layer::new(
            LayerName::new("Ley Lines").unwrap(),
            LayerType::Custom.empty_payload(),
        );
        let id = map.add_layer(custom).unwrap();
        assert_eq!(map.layer(id).unwrap().order(), 8);

        map.move_layer(id, 1).unwrap();
        assert_eq!(map.layer(id).unwrap().order(), 1);
        assert_eq!(map.layers()[1].id(), id);
        assert_orders_contiguous(&map);

        assert!(map.move_layer(id, 9).is_err());
    }

    #[test]
    fn entity_operations_fail_without_their_layer() {
        let mut map = test_map();
        let routes_layer = map.layer_of_type(LayerType::Routes).unwrap().id();
        map.remove_layer(routes_layer).unwrap();

        let route = MapRoute::new(
            RouteName::new("Old Road").unwrap(),
            RouteType::Road,
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
        )
        .unwrap();
        assert!(matches!(
            map.add_route(route),
            Err(DomainError::NotFound { entity_type: "Layer", .. })
        ));
        assert!(map.routes().is_empty());
    }

    #[test]
    fn annotations_keep_creation_time_on_edit() {
        let mut map = test_map();
        let note = MapAnnotation::new(NoteText::new("Dragon lair?").unwrap(), Point::new(1.0, 2.0), now());
        let id = note.id();
        map.add_annotation(note.clone()).unwrap();

        let later = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let edited = MapAnnotation::new(NoteText::new("Dragon lair!").unwrap(), Point::new(3.0, 4.0), later)
            .with_id(id);
        let updated = map.update_annotation(edited).unwrap();
        assert_eq!(updated.text().as_str(), "Dragon lair!");
        assert_eq!(updated.created_at(), now());
    }

    #[test]
    fn mark_saved_bumps_version() {
        let mut map = test_map();
        let later = Utc.with_ymd_and_hms(2025, 5, 2, 0, 0, 0).unwrap();
        map.mark_saved(later);
        assert_eq!(map.version(), 2);
        assert_eq!(map.metadata().updated_at, later);
        assert_eq!(map.metadata().created_at, now());
    }

    #[test]
    fn non_finite_positions_never_reach_the_map() {
        let mut map = test_map();
        let err = map.add_location(location("Nowhere", f64::NAN, 1.0)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(map.locations().is_empty());

        let harbor = location("Harbor", 1.0, 1.0);
        map.add_location(harbor.clone()).unwrap();
        let mut drifted = harbor.clone();
        drifted.move_to(Point::new(1.0, f64::INFINITY));
        assert!(map.update_location(drifted).is_err());
        assert_eq!(map.location(harbor.id()).unwrap().position(), Point::new(1.0, 1.0));

        let note = MapAnnotation::new(
            NoteText::new("Here be dragons").unwrap(),
            Point::new(f64::NAN, f64::NAN),
            now(),
        );
        assert!(map.add_annotation(note).is_err());
        assert!(map.annotations().is_empty());

        // Whatever the map holds still serialises to a loadable document.
        let json = serde_json::to_value(&map).unwrap();
        assert!(serde_json::from_value::<WorldMap>(json).is_ok());
    }

    #[test]
    fn layer_payloads_are_checked_on_add() {
        let mut map = test_map();
        let payload = LayerPayload::PointsOfInterest {
            locations: vec![location("Lost", f64::NEG_INFINITY, 0.0)],
        };
        let layer = Layer::new(LayerName::new("Extra POI").unwrap(), payload);
        assert!(map.add_layer(layer).is_err());
        assert_eq!(map.layers().len(), 8);
    }

    fn triangle() -> Vec<Point> {
        vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)]
    }

    #[test]
    fn fog_layer_with_history_cannot_be_removed() {
        let mut map = test_map();
        let fog_layer = map.layer_of_type(LayerType::FogOfWar).unwrap().id();
        map.reveal_area(FogArea::new(triangle(), None, now()).unwrap())
            .unwrap();

        assert!(matches!(
            map.remove_layer(fog_layer),
            Err(DomainError::Constraint(_))
        ));
        assert_eq!(map.fog().unwrap().revealed_areas().len(), 1);
    }

    #[test]
    fn untouched_fog_layer_can_be_removed() {
        let mut map = test_map();
        let fog_layer = map.layer_of_type(LayerType::FogOfWar).unwrap().id();
        map.remove_layer(fog_layer).unwrap();
        assert!(map.fog().is_none());
    }

    #[test]
    fn terrain_lookup_prefers_latest_feature() {
        let mut map = test_map();
        let forest = TerrainFeature::new(
            TerrainKind::Forest,
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(0.0, 100.0),
            ],
        )
        .unwrap();
        let hills = TerrainFeature::new(TerrainKind::Hills, triangle()).unwrap();
        let hills_id = hills.id;
        map.add_terrain_feature(forest).unwrap();
        map.add_terrain_feature(hills).unwrap();

        assert_eq!(map.terrain_at(Point::new(2.0, 2.0)), Some(TerrainKind::Hills));
        assert_eq!(map.terrain_at(Point::new(90.0, 90.0)), Some(TerrainKind::Forest));
        assert_eq!(map.terrain_at(Point::new(500.0, 500.0)), None);

        map.remove_terrain_feature(hills_id).unwrap();
        assert_eq!(map.terrain_at(Point::new(2.0, 2.0)), Some(TerrainKind::Forest));
        assert!(matches!(
            map.remove_terrain_feature(hills_id),
            Err(DomainError::NotFound { entity_type: "TerrainFeature", .. })
        ));
    }

    #[test]
    fn regions_can_overlap() {
        let mut map = test_map();
        let kingdom = PoliticalRegion::new(
            "Gondor",
            vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 50.0),
                Point::new(0.0, 50.0),
            ],
        )
        .unwrap();
        let fief = PoliticalRegion::new("Dol Amroth", triangle()).unwrap();
        map.add_political_region(kingdom.clone()).unwrap();
        map.add_political_region(fief).unwrap();

        let names: Vec<&str> = map
            .regions_at(Point::new(1.0, 1.0))
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Gondor", "Dol Amroth"]);
        assert!(matches!(
            map.add_political_region(kingdom),
            Err(DomainError::Constraint(_))
        ));
    }

    #[test]
    fn aggregate_survives_json_round_trip() {
        let mut map = test_map();
        map.add_location(location("Harbor", 100.0, 200.0)).unwrap();
        map.add_tag("campaign-1");
        let json = serde_json::to_value(&map).unwrap();
        let restored: WorldMap = serde_json::from_value(json).unwrap();
        assert_eq!(restored, map);
    }
}
