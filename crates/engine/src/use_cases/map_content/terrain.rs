//! Terrain features and political borders.

use wrldbldr_map_domain::{
    MapEventData, MapId, Point, PoliticalRegion, PoliticalRegionId, TerrainFeature,
    TerrainFeatureId, TerrainKind,
};

use super::MapContent;
use crate::error::MapError;

impl MapContent {
    /// Add a terrain polygon to the Terrain layer.
    ///
    /// # Errors
    ///
    /// `Validation` for an outline with fewer than three finite points, or
    /// when a feature with the same id already exists.
    pub async fn add_terrain_feature(
        &self,
        map_id: MapId,
        feature: TerrainFeature,
    ) -> Result<TerrainFeature, MapError> {
        let stored = feature.clone();
        self.maps
            .modify(map_id, move |map| map.add_terrain_feature(feature))
            .await?;

        tracing::info!(map_id = %map_id, feature_id = %stored.id, kind = ?stored.kind, "Added terrain feature");
        self.maps.publish(
            map_id,
            MapEventData::TerrainFeatureCreated {
                feature: stored.clone(),
            },
        );
        Ok(stored)
    }

    pub async fn delete_terrain_feature(
        &self,
        map_id: MapId,
        feature_id: TerrainFeatureId,
    ) -> Result<(), MapError> {
        self.maps
            .modify(map_id, |map| map.remove_terrain_feature(feature_id))
            .await?;

        self.maps
            .publish(map_id, MapEventData::TerrainFeatureDeleted { id: feature_id });
        Ok(())
    }

    pub async fn get_terrain_features(&self, map_id: MapId) -> Result<Vec<TerrainFeature>, MapError> {
        Ok(self.maps.get_map(map_id).await?.terrain_features().to_vec())
    }

    /// Kind of terrain at `point`, `None` where no feature covers it.
    pub async fn get_terrain_at(
        &self,
        map_id: MapId,
        point: Point,
    ) -> Result<Option<TerrainKind>, MapError> {
        Ok(self.maps.get_map(map_id).await?.terrain_at(point))
    }

    /// Add a border to the Political layer.
    pub async fn add_political_region(
        &self,
        map_id: MapId,
        region: PoliticalRegion,
    ) -> Result<PoliticalRegion, MapError> {
        let stored = region.clone();
        self.maps
            .modify(map_id, move |map| map.add_political_region(region))
            .await?;

        tracing::info!(map_id = %map_id, region_id = %stored.id, name = %stored.name, "Added political region");
        self.maps.publish(
            map_id,
            MapEventData::PoliticalRegionCreated {
                region: stored.clone(),
            },
        );
        Ok(stored)
    }

    pub async fn delete_political_region(
        &self,
        map_id: MapId,
        region_id: PoliticalRegionId,
    ) -> Result<(), MapError> {
        self.maps
            .modify(map_id, |map| map.remove_political_region(region_id))
            .await?;

        self.maps
            .publish(map_id, MapEventData::PoliticalRegionDeleted { id: region_id });
        Ok(())
    }

    pub async fn get_political_regions(&self, map_id: MapId) -> Result<Vec<PoliticalRegion>, MapError> {
        Ok(self.maps.get_map(map_id).await?.political_regions().to_vec())
    }

    /// Every region whose border encloses `point`, oldest first.
    pub async fn get_regions_at(
        &self,
        map_id: MapId,
        point: Point,
    ) -> Result<Vec<PoliticalRegion>, MapError> {
        let map = self.maps.get_map(map_id).await?;
        Ok(map.regions_at(point).into_iter().cloned().collect())
    }
}
