//! Engine-level error type.

use wrldbldr_map_domain::{DomainError, MapId};

use crate::infrastructure::ports::RepoError;

/// Error returned by every map engine operation.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The map was saved by someone else since it was loaded.
    #[error("Map {map_id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict {
        map_id: MapId,
        expected: u64,
        found: u64,
    },

    #[error("Persistence error: {0}")]
    Persistence(#[from] RepoError),
}

impl MapError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn map_not_found(id: MapId) -> Self {
        Self::not_found("WorldMap", id)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<DomainError> for MapError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            DomainError::Validation(message)
            | DomainError::Constraint(message)
            | DomainError::InvalidId(message)
            | DomainError::Parse(message) => Self::Validation(message),
        }
    }
}
