//! Infrastructure implementations.
//!
//! Contains port trait implementations and the shared runtime pieces
//! (cache, event bus, configuration) the repositories are built on.

pub mod cache;
pub mod clock;
pub mod config;
pub mod event_bus;
pub mod locks;
pub mod memory_store;
pub mod ports;
pub mod sqlite_store;
