//! Layer and entity management within a map.
//!
//! Every mutation loads the latest stored map, applies one aggregate method,
//! persists the whole map and then publishes exactly one event describing
//! the change. Reads go through the repository cache.

mod layers;
mod locations;
mod notes;
mod routes;
mod terrain;

pub use routes::NewRoute;

use std::sync::Arc;

use crate::repositories::MapRepository;

/// Editing operations for the contents of a map's layers.
pub struct MapContent {
    maps: Arc<MapRepository>,
}

impl MapContent {
    pub fn new(maps: Arc<MapRepository>) -> Self {
        Self { maps }
    }
}
