//! Scroll-mount telemetry acquisition
//!
//! Provides a unified trait for reading raw accessory notifications from
//! different transports. The wireless link itself lives outside this crate;
//! sources here read tokens that a bridge forwards (any line stream, e.g.
//! stdin) or synthesize them for offline sessions.

mod line_source;
pub mod simulator;
pub mod telemetry_parser;

pub use line_source::LineTelemetrySource;
pub use simulator::SimulatedTelemetry;
pub use telemetry_parser::{parse_payload, parse_token};

use async_trait::async_trait;
use thiserror::Error;

/// Telemetry acquisition errors
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Not connected")]
    NotConnected,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait abstracting where accessory notifications come from.
///
/// `connect()` is attempted exactly once at startup. After that the pump task
/// calls [`next_payload`](TelemetrySource::next_payload) until it returns
/// `Ok(None)` (stream closed) or an error.
#[async_trait]
pub trait TelemetrySource: Send + 'static {
    /// Establish the subscription.
    async fn connect(&mut self) -> Result<(), AcquisitionError>;

    /// Wait for the next raw notification payload.
    ///
    /// Returns `Ok(None)` when the stream has ended.
    async fn next_payload(&mut self) -> Result<Option<Vec<u8>>, AcquisitionError>;

    /// Human-readable name for logging (e.g. "stdin", "simulator").
    fn source_name(&self) -> &str;
}
