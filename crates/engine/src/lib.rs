//! WrldBldr map engine library.
//!
//! Layered world maps, character positions, travel history and fog of war,
//! persisted through an abstract document store.
//!
//! ## Structure
//!
//! - `repositories/` - Typed access to stored maps and positions
//! - `use_cases/` - Map editing, movement, travel and fog operations
//! - `infrastructure/` - Ports, store adapters, cache, event bus, config
//! - `app` - Application composition

pub mod app;
pub mod error;
pub mod infrastructure;
pub mod repositories;
pub mod use_cases;

/// Shared test wiring.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
pub use error::MapError;
pub use infrastructure::config::EngineConfig;
pub use infrastructure::event_bus::{ListenerError, ListenerId, MapEventListener};
