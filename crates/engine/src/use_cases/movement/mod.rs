//! Character movement use cases.

mod character_movement;

pub use character_movement::{CharacterMovement, MoveResult};
