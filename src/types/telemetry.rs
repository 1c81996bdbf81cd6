//! Scroll-mount telemetry types: TelemetryEvent, MountStatus, TelemetryState

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Inbound Events
// ============================================================================

/// Discrete status report from the scroll-mount accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetryEventKind {
    /// Violin is seated in the mount ("OK")
    Mounted,
    /// Scroll has come loose from the mount
    ScrollLoose,
    /// Violin is tilted in the mount
    ViolinTilted,
    /// Scroll height above the rest (cm)
    HeightReport(i32),
}

impl TelemetryEventKind {
    /// Wire token the accessory sends for this event.
    pub fn to_payload(&self) -> String {
        match self {
            TelemetryEventKind::Mounted => "OK".to_string(),
            TelemetryEventKind::ScrollLoose => "ScrollLoose".to_string(),
            TelemetryEventKind::ViolinTilted => "ViolinTilted".to_string(),
            TelemetryEventKind::HeightReport(cm) => format!("Height:{cm}"),
        }
    }
}

/// A telemetry event stamped with its arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub kind: TelemetryEventKind,
    pub received_at: DateTime<Utc>,
}

impl TelemetryEvent {
    /// Stamp an event with the current wall-clock time.
    pub fn now(kind: TelemetryEventKind) -> Self {
        Self {
            kind,
            received_at: Utc::now(),
        }
    }
}

// ============================================================================
// Derived State
// ============================================================================

/// Attachment state of the scroll mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum MountStatus {
    /// No status received yet
    #[default]
    Connecting,
    Mounted,
    Loose,
    Tilted,
}

impl MountStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            MountStatus::Connecting => "Connecting...",
            MountStatus::Mounted => "Mounted",
            MountStatus::Loose => "Loose Scroll",
            MountStatus::Tilted => "Tilted Violin",
        }
    }
}

impl std::fmt::Display for MountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Latest known accessory state.
///
/// Mount status and height are independent: each is overwritten only by
/// events of its own category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TelemetryState {
    pub mount_status: MountStatus,

    /// Last reported scroll height (cm), `None` until the first report
    pub height_cm: Option<i32>,

    /// Number of events applied since startup
    pub revision: u64,

    /// Arrival time of the most recently applied event
    pub last_event_at: Option<DateTime<Utc>>,
}

impl TelemetryState {
    /// Return the state after applying `event`.
    pub fn with_event(&self, event: &TelemetryEvent) -> Self {
        let mut next = *self;
        match event.kind {
            TelemetryEventKind::Mounted => next.mount_status = MountStatus::Mounted,
            TelemetryEventKind::ScrollLoose => next.mount_status = MountStatus::Loose,
            TelemetryEventKind::ViolinTilted => next.mount_status = MountStatus::Tilted,
            TelemetryEventKind::HeightReport(cm) => next.height_cm = Some(cm),
        }
        next.revision = self.revision + 1;
        next.last_event_at = Some(event.received_at);
        next
    }
}
