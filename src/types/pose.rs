//! Pose landmark types: Point2D, Joint, JointSample

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Landmark Geometry
// ============================================================================

/// Normalized image coordinates, each component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Named anatomical landmark reported by the pose detector.
///
/// The first six variants are required for posture classification; the
/// left-side arm/hip/ear landmarks only feed the skeleton overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    RightShoulder,
    RightElbow,
    RightWrist,
    RightHip,
    RightEar,
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    LeftHip,
    LeftEar,
}

impl Joint {
    /// Landmarks that must be present for an [`AngleSet`](super::AngleSet) to be derived.
    pub const REQUIRED: [Joint; 6] = [
        Joint::RightShoulder,
        Joint::RightElbow,
        Joint::RightWrist,
        Joint::RightHip,
        Joint::RightEar,
        Joint::LeftShoulder,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Joint::RightShoulder => "right shoulder",
            Joint::RightElbow => "right elbow",
            Joint::RightWrist => "right wrist",
            Joint::RightHip => "right hip",
            Joint::RightEar => "right ear",
            Joint::LeftShoulder => "left shoulder",
            Joint::LeftElbow => "left elbow",
            Joint::LeftWrist => "left wrist",
            Joint::LeftHip => "left hip",
            Joint::LeftEar => "left ear",
        }
    }
}

impl std::fmt::Display for Joint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Skeleton segments drawn by the overlay (pairs of landmarks).
pub const SKELETON_CONNECTIONS: [(Joint, Joint); 9] = [
    // Head to shoulders
    (Joint::RightEar, Joint::RightShoulder),
    (Joint::LeftEar, Joint::LeftShoulder),
    // Shoulder line
    (Joint::LeftShoulder, Joint::RightShoulder),
    // Bowing arm
    (Joint::RightShoulder, Joint::RightElbow),
    (Joint::RightElbow, Joint::RightWrist),
    // Left arm
    (Joint::LeftShoulder, Joint::LeftElbow),
    (Joint::LeftElbow, Joint::LeftWrist),
    // Torso
    (Joint::RightShoulder, Joint::RightHip),
    (Joint::LeftShoulder, Joint::LeftHip),
];

// ============================================================================
// Per-Frame Sample
// ============================================================================

/// Landmarks detected in a single video frame.
///
/// Produced once per frame by the pose source and dropped as soon as the
/// frame's verdict has been computed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JointSample {
    /// Detection confidence reported by the pose model (0-1)
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Landmark positions keyed by joint
    #[serde(default)]
    pub joints: BTreeMap<Joint, Point2D>,
}

fn default_confidence() -> f64 {
    1.0
}

impl JointSample {
    pub fn new(confidence: f64) -> Self {
        Self {
            confidence,
            joints: BTreeMap::new(),
        }
    }

    /// Builder-style insert used by replay fixtures and tests.
    pub fn with_joint(mut self, joint: Joint, point: Point2D) -> Self {
        self.joints.insert(joint, point);
        self
    }

    pub fn get(&self, joint: Joint) -> Option<Point2D> {
        self.joints.get(&joint).copied()
    }

    /// Required joints that the detector did not report.
    pub fn missing_required(&self) -> Vec<Joint> {
        Joint::REQUIRED
            .iter()
            .copied()
            .filter(|j| !self.joints.contains_key(j))
            .collect()
    }

    /// Segments of [`SKELETON_CONNECTIONS`] whose endpoints are both present.
    pub fn skeleton_segments(&self) -> Vec<(Point2D, Point2D)> {
        SKELETON_CONNECTIONS
            .iter()
            .filter_map(|&(a, b)| Some((self.get(a)?, self.get(b)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_json_uses_snake_case_joints() {
        let json = r#"{"confidence":0.92,"joints":{"right_shoulder":{"x":0.4,"y":0.3},"left_shoulder":{"x":0.6,"y":0.31}}}"#;
        let sample: JointSample = serde_json::from_str(json).unwrap();

        assert_eq!(sample.confidence, 0.92);
        assert_eq!(sample.get(Joint::RightShoulder), Some(Point2D::new(0.4, 0.3)));
        assert_eq!(sample.get(Joint::LeftShoulder), Some(Point2D::new(0.6, 0.31)));
        assert!(sample.get(Joint::RightEar).is_none());
    }

    #[test]
    fn test_missing_confidence_defaults_to_full() {
        let sample: JointSample = serde_json::from_str(r#"{"joints":{}}"#).unwrap();
        assert_eq!(sample.confidence, 1.0);
        assert_eq!(sample.missing_required().len(), Joint::REQUIRED.len());
    }

    #[test]
    fn test_skeleton_segments_skip_absent_joints() {
        let sample = JointSample::new(1.0)
            .with_joint(Joint::RightShoulder, Point2D::new(0.4, 0.3))
            .with_joint(Joint::RightElbow, Point2D::new(0.4, 0.5))
            .with_joint(Joint::RightWrist, Point2D::new(0.6, 0.5));

        let segments = sample.skeleton_segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].0, Point2D::new(0.4, 0.3));
    }
}
