//! Joint Kinematics
//!
//! Deterministic geometry over pose landmarks. All math here is plain
//! trigonometry on normalized image coordinates - no model involved.
//!
//! - `angle()` - Angle at a vertex formed by three landmarks
//! - `derive_angles()` - The per-frame [`AngleSet`] used by the classifier

use crate::types::{AngleSet, Joint, JointSample, Point2D};

/// Angle in degrees at vertex `b` between rays `b→a` and `b→c`.
///
/// The difference of the two ray headings is folded into `[0, 180]`, so the
/// result does not depend on which side of the vertex is `a` and which is `c`.
/// NaN coordinates propagate to a NaN angle.
pub fn angle(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let degrees = radians.to_degrees().abs();
    if degrees > 180.0 {
        360.0 - degrees
    } else {
        degrees
    }
}

/// Derive the classifier inputs from a sample.
///
/// Returns `None` when any required landmark is missing; the caller renders
/// that frame as "no pose detected".
pub fn derive_angles(sample: &JointSample) -> Option<AngleSet> {
    let r_shoulder = sample.get(Joint::RightShoulder)?;
    let r_elbow = sample.get(Joint::RightElbow)?;
    let r_wrist = sample.get(Joint::RightWrist)?;
    let r_hip = sample.get(Joint::RightHip)?;
    let r_ear = sample.get(Joint::RightEar)?;
    let l_shoulder = sample.get(Joint::LeftShoulder)?;

    Some(AngleSet {
        right_arm_angle: angle(r_shoulder, r_elbow, r_wrist),
        back_angle: angle(r_ear, r_shoulder, r_hip),
        shoulder_y_diff: (r_shoulder.y - l_shoulder.y).abs(),
    })
}
