//! Repository modules - Data access wrappers around the document store port.
//!
//! Each repository owns one slice of the stored documents and gives use
//! cases typed access to it.

pub mod character_position;
pub mod world_map;

pub use character_position::CharacterPositionRepository;
pub use world_map::MapRepository;
