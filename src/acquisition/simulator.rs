//! Simulated scroll-mount telemetry
//!
//! Deterministic, seedable stand-in for the accessory. Every interval it picks
//! one of the four reports the hardware sends (mounted, scroll loose, violin
//! tilted, or a height between 10 and 20 cm) with equal probability.
//!
//! Two ways to use it:
//! - as a [`TelemetrySource`], paced by the configured interval, for offline
//!   sessions (`--telemetry simulate`);
//! - via [`SimulatedTelemetry::feed`], which applies events straight to a
//!   [`TelemetryStore`] with no transport or pacing, for tests.

use super::{AcquisitionError, TelemetrySource};
use crate::config::defaults::SIMULATOR_HEIGHT_RANGE_CM;
use crate::pipeline::TelemetryStore;
use crate::types::{TelemetryEvent, TelemetryEventKind};
use async_trait::async_trait;
use rand::prelude::*;
use std::time::Duration;

/// Seedable accessory simulator.
pub struct SimulatedTelemetry {
    rng: StdRng,
    interval: Duration,
    /// Stop after this many events (`None` = run forever)
    limit: Option<u64>,
    emitted: u64,
}

impl SimulatedTelemetry {
    /// Create a simulator. `seed = None` draws from OS entropy.
    pub fn new(seed: Option<u64>, interval: Duration) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            interval,
            limit: None,
            emitted: 0,
        }
    }

    /// End the stream after `limit` events.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Draw the next simulated report.
    pub fn next_event(&mut self) -> TelemetryEventKind {
        match self.rng.gen_range(0..4) {
            0 => TelemetryEventKind::Mounted,
            1 => TelemetryEventKind::ScrollLoose,
            2 => TelemetryEventKind::ViolinTilted,
            _ => TelemetryEventKind::HeightReport(self.rng.gen_range(SIMULATOR_HEIGHT_RANGE_CM)),
        }
    }

    /// Apply `count` simulated events directly to `store`.
    ///
    /// Returns the events in the order they were applied.
    pub fn feed(&mut self, store: &TelemetryStore, count: usize) -> Vec<TelemetryEventKind> {
        (0..count)
            .map(|_| {
                let kind = self.next_event();
                store.apply_event(TelemetryEvent::now(kind));
                kind
            })
            .collect()
    }
}

#[async_trait]
impl TelemetrySource for SimulatedTelemetry {
    async fn connect(&mut self) -> Result<(), AcquisitionError> {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Telemetry simulator started");
        Ok(())
    }

    async fn next_payload(&mut self) -> Result<Option<Vec<u8>>, AcquisitionError> {
        if self.limit.is_some_and(|limit| self.emitted >= limit) {
            return Ok(None);
        }
        tokio::time::sleep(self.interval).await;
        let kind = self.next_event();
        self.emitted += 1;
        tracing::debug!(payload = %kind.to_payload(), "Simulated telemetry report");
        Ok(Some(kind.to_payload().into_bytes()))
    }

    fn source_name(&self) -> &str {
        "simulator"
    }
}
