//! Shared data structures for the posture fusion pipeline
//!
//! This module defines the core types flowing through each frame:
//! - Pose: Point2D, Joint, JointSample (pose detector output)
//! - Telemetry: TelemetryEvent, MountStatus, TelemetryState (scroll mount)
//! - Feedback: FeedbackLabel, Severity, Rgb (classifier vocabulary)
//! - Verdict: AngleSet, PostureAssessment, FrameVerdict, Readout (renderer input)

mod pose;
mod telemetry;
mod feedback;
mod verdict;
// Public so the constant groups stay reachable as `types::thresholds::*`.
pub mod thresholds;

pub use pose::*;
pub use telemetry::*;
pub use feedback::*;
pub use verdict::*;
pub use thresholds::*;
