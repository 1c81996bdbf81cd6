//! Per-frame derived values: AngleSet, PostureAssessment, FrameVerdict

use serde::{Deserialize, Serialize};

use super::{palette, FeedbackLabel, Point2D, Rgb, Severity, TelemetryState};

/// Angles and offsets derived from one [`JointSample`](super::JointSample).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleSet {
    /// Shoulder-elbow-wrist angle at the right elbow (degrees)
    pub right_arm_angle: f64,
    /// Ear-shoulder-hip angle at the right shoulder (degrees)
    pub back_angle: f64,
    /// Vertical offset between shoulders (normalized units)
    pub shoulder_y_diff: f64,
}

/// Classifier output for a frame in which a pose was detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureAssessment {
    pub label: FeedbackLabel,
    pub severity: Severity,
    pub color: Rgb,
    pub angles: AngleSet,
    /// Skeleton segments for the overlay
    pub skeleton: Vec<(Point2D, Point2D)>,
}

/// One overlay text line and the colour it is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Readout<'a> {
    pub text: &'a str,
    pub color: Rgb,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameVerdict {
    /// Zero-based index of the frame within the session
    pub frame_index: u64,

    /// `None` when no usable pose was detected in this frame
    pub posture: Option<PostureAssessment>,

    /// Telemetry as it stood when this frame was fused
    pub telemetry: TelemetryState,

    /// Whether a telemetry link was established at startup
    pub telemetry_online: bool,

    /// e.g. `"Scroll: Mounted"`
    pub mount_text: String,

    /// e.g. `"Height: 15 cm"`
    pub height_text: String,

    /// e.g. `"Arm Angle: 95°"`, absent without a pose
    pub arm_angle_text: Option<String>,
}

impl FrameVerdict {
    pub fn label(&self) -> Option<FeedbackLabel> {
        self.posture.as_ref().map(|p| p.label)
    }

    pub fn feedback_text(&self) -> Option<&'static str> {
        self.label().map(|l| l.message())
    }

    /// Overlay readouts in drawing order. The arm angle only appears when a
    /// pose was detected.
    pub fn readouts(&self) -> Vec<Readout<'_>> {
        let mut readouts = Vec::with_capacity(3);
        if let Some(text) = &self.arm_angle_text {
            readouts.push(Readout {
                text,
                color: palette::ARM_ANGLE_TEXT,
            });
        }
        readouts.push(Readout {
            text: &self.mount_text,
            color: palette::MOUNT_TEXT,
        });
        readouts.push(Readout {
            text: &self.height_text,
            color: palette::HEIGHT_TEXT,
        });
        readouts
    }
}
