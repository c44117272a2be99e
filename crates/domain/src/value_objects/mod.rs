//! Value objects - Immutable objects defined by their attributes

mod geometry;
mod names;

pub use geometry::{
    ensure_finite_points, ensure_polygon, polygon_contains, MapScale, MapView, Point,
};
pub use names::{LayerName, LocationName, MapName, NoteText, RouteName};
