//! Use cases - User story orchestration.
//!
//! Each module covers one area of map editing or tracking and works through
//! the repositories, never the document store directly.

pub mod fog;
pub mod map_content;
pub mod movement;
pub mod travel;

pub use fog::FogOfWar;
pub use map_content::{MapContent, NewRoute};
pub use movement::{CharacterMovement, MoveResult};
pub use travel::TravelEstimator;
