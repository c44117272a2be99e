//! In-process publish/subscribe for map events.
//!
//! Dispatch is synchronous and isolated: listeners run in registration order,
//! and a listener that returns an error or panics is logged and skipped
//! without affecting the others. Publishing never fails.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use wrldbldr_map_domain::MapEvent;

/// Handle returned by [`MapEventBus::add_listener`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Failure reported by a listener. Logged, never propagated.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Receiver of map events
pub trait MapEventListener: Send + Sync {
    fn on_event(&self, event: &MapEvent) -> Result<(), ListenerError>;
}

impl<F> MapEventListener for F
where
    F: Fn(&MapEvent) -> Result<(), ListenerError> + Send + Sync,
{
    fn on_event(&self, event: &MapEvent) -> Result<(), ListenerError> {
        self(event)
    }
}

type Registration = (ListenerId, Arc<dyn MapEventListener>);

#[derive(Default)]
pub struct MapEventBus {
    listeners: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
}

impl MapEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Arc<dyn MapEventListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((id, listener));
        id
    }

    /// Unsubscribe. Returns false if the id was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut guard = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = guard.len();
        guard.retain(|(registered, _)| *registered != id);
        before != guard.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Deliver `event` to every listener registered at call time.
    pub fn publish(&self, event: &MapEvent) {
        // Snapshot so listeners may (un)subscribe from inside a callback.
        let snapshot: Vec<Registration> = self
            .listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        tracing::debug!(
            map_id = %event.map_id,
            event_type = event.event_type(),
            listeners = snapshot.len(),
            "Publishing map event"
        );

        for (id, listener) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| listener.on_event(event))) {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    tracing::error!(
                        listener = id.0,
                        map_id = %event.map_id,
                        event_type = event.event_type(),
                        error = %error,
                        "Map event listener failed"
                    );
                }
                Err(_) => {
                    tracing::error!(
                        listener = id.0,
                        map_id = %event.map_id,
                        event_type = event.event_type(),
                        "Map event listener panicked"
                    );
                }
            }
        }
    }
}

/// Listener that keeps every event it sees (tests only).
#[cfg(test)]
#[derive(Default)]
pub struct RecordingListener {
    events: std::sync::Mutex<Vec<MapEvent>>,
}

#[cfg(test)]
impl RecordingListener {
    pub fn events(&self) -> Vec<MapEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events().iter().map(MapEvent::event_type).collect()
    }

    pub fn count_of(&self, event_type: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .count()
    }
}

#[cfg(test)]
impl MapEventListener for RecordingListener {
    fn on_event(&self, event: &MapEvent) -> Result<(), ListenerError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
