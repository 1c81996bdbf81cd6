//! System-wide default constants.
//!
//! Centralises timing and sizing values that are not operator calibration.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Fusion Loop
// ============================================================================

/// Pacing between replayed frames when none is given on the command line (ms).
///
/// 33 ms is roughly a 30 fps camera.
pub const REPLAY_FRAME_INTERVAL_MS: u64 = 33;

/// Frames between progress log lines.
pub const PROGRESS_LOG_EVERY_FRAMES: u64 = 300;

// ============================================================================
// Telemetry
// ============================================================================

/// Interval between simulated scroll-mount reports (ms).
pub const SIMULATOR_INTERVAL_MS: u64 = 2_000;

/// Inclusive range of simulated scroll heights (cm).
pub const SIMULATOR_HEIGHT_RANGE_CM: std::ops::RangeInclusive<i32> = 10..=20;
