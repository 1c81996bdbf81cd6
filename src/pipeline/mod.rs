//! Fusion Pipeline
//!
//! ```text
//! TelemetrySource ──(pump task)──► TelemetryStore ──snapshot──┐
//!                                                             ▼
//! PoseSource ──► kinematics ──► classifier ──► FusionLoop ──► Renderer
//! ```
//!
//! Telemetry arrives every few seconds, frames tens of times per second.
//! Neither side waits on the other: the pump writes the store whenever a
//! payload lands and the loop reads whatever is current.

mod telemetry_store;
pub mod fusion_loop;
pub mod render;
pub mod source;
pub mod telemetry_link;

pub use fusion_loop::{build_verdict, FusionLoop, LoopStats, StopReason};
pub use render::{JsonRenderer, LogRenderer, RenderControl, Renderer};
pub use source::{FrameEvent, JsonlPoseSource, PoseSource, PoseSourceError, ReplaySource};
pub use telemetry_link::{spawn_telemetry, TelemetryLink};
pub use telemetry_store::TelemetryStore;
