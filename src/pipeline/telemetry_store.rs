//! Telemetry State Store
//!
//! The one piece of mutable state shared by the two producers: the telemetry
//! pump writes it, the fusion loop reads it once per frame.
//!
//! The state record lives behind an [`ArcSwap`]. Writers build a new record
//! from the current one and swap it in with read-copy-update, retrying if
//! another writer got there first; readers load a complete immutable
//! snapshot. A reader can therefore never observe half of an update, and
//! concurrent writers never lose each other's events.

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::acquisition::parse_payload;
use crate::types::{TelemetryEvent, TelemetryState};

/// Cheaply cloneable handle to the shared telemetry state.
#[derive(Debug, Clone, Default)]
pub struct TelemetryStore {
    inner: Arc<ArcSwap<TelemetryState>>,
}

impl TelemetryStore {
    /// Start in the `Connecting` / unknown-height state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the field the event refers to.
    pub fn apply_event(&self, event: TelemetryEvent) {
        self.inner.rcu(|current| current.with_event(&event));
    }

    /// Parse a raw notification and apply it.
    ///
    /// Returns `false` when the payload was not a recognised token; such
    /// payloads are dropped without touching the state.
    pub fn apply_payload(&self, payload: &[u8]) -> bool {
        match parse_payload(payload) {
            Some(kind) => {
                self.apply_event(TelemetryEvent::now(kind));
                true
            }
            None => {
                tracing::trace!(payload = %String::from_utf8_lossy(payload).trim(), "Ignoring unrecognised telemetry payload");
                false
            }
        }
    }

    /// Consistent snapshot of the latest state.
    pub fn current_state(&self) -> TelemetryState {
        **self.inner.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MountStatus, TelemetryEventKind};

    #[test]
    fn test_ok_mounts() {
        let store = TelemetryStore::new();
        assert!(store.apply_payload(b"OK"));
        assert_eq!(store.current_state().mount_status, MountStatus::Mounted);
    }

    #[test]
    fn test_height_report() {
        let store = TelemetryStore::new();
        assert!(store.apply_payload(b"Height:15"));
        assert_eq!(store.current_state().height_cm, Some(15));
    }

    #[test]
    fn test_malformed_height_leaves_previous_value() {
        let store = TelemetryStore::new();
        store.apply_payload(b"Height:12");
        assert!(!store.apply_payload(b"Height:abc"));

        let state = store.current_state();
        assert_eq!(state.height_cm, Some(12));
        assert_eq!(state.revision, 1);
    }

    #[test]
    fn test_garbage_is_a_no_op() {
        let store = TelemetryStore::new();
        let before = store.current_state();
        assert!(!store.apply_payload(b"garbage"));
        assert_eq!(store.current_state(), before);
    }

    #[test]
    fn test_status_and_height_are_independent() {
        let store = TelemetryStore::new();
        store.apply_payload(b"Height:18");
        store.apply_payload(b"ScrollLoose");
        store.apply_payload(b"ViolinTilted");

        let state = store.current_state();
        assert_eq!(state.mount_status, MountStatus::Tilted);
        assert_eq!(state.height_cm, Some(18));
        assert_eq!(state.revision, 3);
    }

    #[test]
    fn test_clones_share_state() {
        let writer = TelemetryStore::new();
        let reader = writer.clone();
        writer.apply_event(TelemetryEvent::now(TelemetryEventKind::Mounted));
        assert_eq!(reader.current_state().mount_status, MountStatus::Mounted);
        assert!(reader.current_state().last_event_at.is_some());
    }
}
