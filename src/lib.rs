//! Violin Posture Monitor
//!
//! Real-time posture feedback for violinists, fusing two independent streams:
//!
//! - **Pose**: per-frame landmarks from an external pose estimator, turned
//!   into joint angles and classified into one feedback message
//! - **Telemetry**: low-rate reports from a scroll-mount accessory (mount
//!   status, violin height) that arrive whenever the device sends them
//!
//! ## Architecture
//!
//! - **Kinematics**: angle at a vertex from three landmarks
//! - **Classifier**: ordered posture rules, first match wins
//! - **Acquisition**: telemetry sources and the payload grammar
//! - **Pipeline**: telemetry store, pump task, fusion loop, renderers

pub mod config;
pub mod types;
pub mod kinematics;
pub mod classifier;
pub mod acquisition;
pub mod pipeline;

// Re-export monitor configuration
pub use config::{MonitorConfig, PostureThresholds};

// Re-export commonly used types
pub use types::{
    AngleSet, FeedbackLabel, FrameVerdict, Joint, JointSample, MountStatus, Point2D,
    PostureAssessment, Readout, Rgb, Severity, TelemetryEvent, TelemetryEventKind, TelemetryState,
};

// Re-export the core algorithms
pub use classifier::{Classification, PostureClassifier};
pub use kinematics::{angle, derive_angles};

// Re-export pipeline components
pub use pipeline::{
    build_verdict, spawn_telemetry, FusionLoop, LoopStats, PoseSource, Renderer, TelemetryLink,
    TelemetryStore,
};
