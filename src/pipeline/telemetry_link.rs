//! Telemetry pump
//!
//! Connects a [`TelemetrySource`] once and forwards every payload into the
//! shared [`TelemetryStore`] from a spawned task. Failures stay on this side
//! of the boundary: the fusion loop keeps running on the last known values.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::TelemetryStore;
use crate::acquisition::TelemetrySource;

/// Outcome of the single startup connection attempt.
#[derive(Debug)]
pub enum TelemetryLink {
    /// Pump task running; resolves to the number of payloads applied.
    Connected(JoinHandle<u64>),
    /// Connection failed; the session runs vision-only.
    Unavailable(String),
}

impl TelemetryLink {
    pub const fn is_online(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    /// Wait for the pump to finish (after cancellation or stream end).
    ///
    /// Returns the number of payloads applied, or `None` if the link never
    /// came up or the task panicked.
    pub async fn join(self) -> Option<u64> {
        match self {
            Self::Connected(handle) => match handle.await {
                Ok(applied) => Some(applied),
                Err(e) => {
                    warn!("[Telemetry] Pump task failed: {}", e);
                    None
                }
            },
            Self::Unavailable(_) => None,
        }
    }
}

/// Connect `source` and spawn the pump.
///
/// Makes exactly one connection attempt; there is no reconnection.
pub async fn spawn_telemetry<S: TelemetrySource>(
    mut source: S,
    store: TelemetryStore,
    cancel: CancellationToken,
) -> TelemetryLink {
    if let Err(e) = source.connect().await {
        warn!(
            "[Telemetry] Could not connect to {}: {} (continuing vision-only)",
            source.source_name(),
            e
        );
        return TelemetryLink::Unavailable(e.to_string());
    }

    info!("[Telemetry] Connected to {}", source.source_name());
    TelemetryLink::Connected(tokio::spawn(pump(source, store, cancel)))
}

async fn pump<S: TelemetrySource>(mut source: S, store: TelemetryStore, cancel: CancellationToken) -> u64 {
    let mut applied = 0u64;

    loop {
        let payload = tokio::select! {
            () = cancel.cancelled() => {
                info!("[Telemetry] Shutdown signal received");
                break;
            }
            result = source.next_payload() => match result {
                Ok(Some(payload)) => payload,
                Ok(None) => {
                    warn!("[Telemetry] {} closed the stream; keeping last known values", source.source_name());
                    break;
                }
                Err(e) => {
                    warn!("[Telemetry] Read error from {}: {}; keeping last known values", source.source_name(), e);
                    break;
                }
            }
        };

        if store.apply_payload(&payload) {
            applied += 1;
        }
    }

    info!("[Telemetry] Pump stopped after {} events", applied);
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::{AcquisitionError, LineTelemetrySource};
    use crate::types::MountStatus;
    use async_trait::async_trait;
    use tokio::io::BufReader;

    struct Unreachable;

    #[async_trait]
    impl TelemetrySource for Unreachable {
        async fn connect(&mut self) -> Result<(), AcquisitionError> {
            Err(AcquisitionError::ConnectionFailed("device not found".to_string()))
        }

        async fn next_payload(&mut self) -> Result<Option<Vec<u8>>, AcquisitionError> {
            Err(AcquisitionError::NotConnected)
        }

        fn source_name(&self) -> &str {
            "unreachable"
        }
    }

    #[tokio::test]
    async fn test_failed_connect_is_unavailable() {
        let store = TelemetryStore::new();
        let link = spawn_telemetry(Unreachable, store.clone(), CancellationToken::new()).await;

        assert!(!link.is_online());
        assert!(matches!(&link, TelemetryLink::Unavailable(reason) if reason.contains("device not found")));
        assert_eq!(store.current_state().revision, 0);
        assert_eq!(link.join().await, None);
    }

    #[tokio::test]
    async fn test_pump_applies_payloads_until_stream_end() {
        let store = TelemetryStore::new();
        let reader = BufReader::new(&b"OK\ngarbage\nHeight:15\nScrollLoose\n"[..]);
        let source = LineTelemetrySource::new(reader, "inline");

        let link = spawn_telemetry(source, store.clone(), CancellationToken::new()).await;
        assert!(link.is_online());
        assert_eq!(link.join().await, Some(3));

        let state = store.current_state();
        assert_eq!(state.mount_status, MountStatus::Loose);
        assert_eq!(state.height_cm, Some(15));
    }

    #[tokio::test]
    async fn test_pump_stops_on_cancel() {
        let store = TelemetryStore::new();
        let (_client, server) = tokio::io::duplex(64);
        let source = LineTelemetrySource::new(BufReader::new(server), "idle");
        let cancel = CancellationToken::new();

        let link = spawn_telemetry(source, store, cancel.clone()).await;
        cancel.cancel();
        assert_eq!(link.join().await, Some(0));
    }
}
