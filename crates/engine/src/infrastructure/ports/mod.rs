//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Document persistence (in-memory, SQLite, or anything keyed by collection + id)
//! - Clock (for testing)

mod error;
mod repos;
mod testing;

pub use error::RepoError;
pub use repos::{Collection, DocumentStore};
pub use testing::ClockPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::MockDocumentStore;

#[cfg(test)]
pub use testing::MockClockPort;
