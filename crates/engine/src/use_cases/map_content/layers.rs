//! Generic layer management and the grid overlay.

use wrldbldr_map_domain::{
    GridSettings, Layer, LayerId, LayerName, LayerPatch, LayerPayload, MapEventData, MapId,
};

use super::MapContent;
use crate::error::MapError;

impl MapContent {
    /// Add a layer on top of the stack. `appearance` overrides the type's
    /// default visibility and opacity.
    pub async fn create_layer(
        &self,
        map_id: MapId,
        name: &str,
        payload: LayerPayload,
        appearance: LayerPatch,
    ) -> Result<Layer, MapError> {
        let mut layer = Layer::new(LayerName::new(name)?, payload);
        layer.apply(appearance)?;
        let layer_id = layer.id();
        let layer_type = layer.layer_type();

        let (map, _) = self
            .maps
            .modify(map_id, move |map| map.add_layer(layer))
            .await?;
        let created = map
            .layer(layer_id)
            .cloned()
            .ok_or_else(|| MapError::not_found("Layer", layer_id))?;

        tracing::info!(map_id = %map_id, layer_id = %layer_id, layer_type = %layer_type, "Created layer");
        self.maps.publish(
            map_id,
            MapEventData::LayerCreated {
                id: layer_id,
                layer_type,
            },
        );
        Ok(created)
    }

    /// Change a layer's name, visibility or opacity.
    ///
    /// # Errors
    ///
    /// `Validation` for an opacity outside `[0, 1]`; nothing is changed.
    pub async fn update_layer(
        &self,
        map_id: MapId,
        layer_id: LayerId,
        patch: LayerPatch,
    ) -> Result<Layer, MapError> {
        let (_, updated) = self
            .maps
            .modify(map_id, move |map| map.update_layer(layer_id, patch).cloned())
            .await?;

        self.maps
            .publish(map_id, MapEventData::LayerUpdated { id: layer_id });
        Ok(updated)
    }

    /// Remove a layer and renumber the rest. The default layer cannot be
    /// removed.
    pub async fn delete_layer(&self, map_id: MapId, layer_id: LayerId) -> Result<(), MapError> {
        self.maps
            .modify(map_id, |map| map.remove_layer(layer_id))
            .await?;

        tracing::info!(map_id = %map_id, layer_id = %layer_id, "Deleted layer");
        self.maps
            .publish(map_id, MapEventData::LayerDeleted { id: layer_id });
        Ok(())
    }

    /// Move a layer to `new_order`. Returns the reordered stack.
    pub async fn move_layer(
        &self,
        map_id: MapId,
        layer_id: LayerId,
        new_order: u32,
    ) -> Result<Vec<Layer>, MapError> {
        let (map, _) = self
            .maps
            .modify(map_id, |map| map.move_layer(layer_id, new_order))
            .await?;

        self.maps
            .publish(map_id, MapEventData::LayerUpdated { id: layer_id });
        Ok(map.layers().to_vec())
    }

    /// Layers ordered bottom to top.
    pub async fn get_layers(&self, map_id: MapId) -> Result<Vec<Layer>, MapError> {
        Ok(self.maps.get_map(map_id).await?.layers().to_vec())
    }

    /// Replace the grid overlay settings and toggle the grid.
    pub async fn configure_grid(
        &self,
        map_id: MapId,
        grid: GridSettings,
        enabled: bool,
    ) -> Result<GridSettings, MapError> {
        let stored = grid.clone();
        self.maps
            .modify(map_id, move |map| map.configure_grid(grid, enabled))
            .await?;

        self.maps.publish(
            map_id,
            MapEventData::GridUpdated {
                grid: stored.clone(),
                enabled,
            },
        );
        Ok(stored)
    }
}
