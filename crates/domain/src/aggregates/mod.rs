//! Aggregate roots - domain objects that own their related data
//!
//! The world map is the only aggregate: layers and everything drawn on them
//! are reachable only through it, so ownership enforces that every change
//! passes the aggregate's invariant checks.

pub mod world_map;

pub use world_map::{MapMetadata, MapSettings, WorldMap};
