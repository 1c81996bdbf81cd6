//! Posture Classifier - ordered-rule feedback policy
//!
//! Maps one frame's [`AngleSet`] to exactly one feedback message. Rules are
//! evaluated in a fixed order and the first match wins:
//!
//! 1. Bowing-arm angle outside `[bow_arm_min_deg, bow_arm_max_deg]` → Adjust Bowing Arm
//! 2. Shoulder height difference above `shoulder_level_max` → Level Shoulders
//! 3. Back angle above `back_angle_max_deg` → Sit Straight
//! 4. Otherwise → Good Posture
//!
//! The order is a tie-break policy: a bad bowing arm is reported even when the
//! shoulders and back are also off.

use crate::config::PostureThresholds;
use crate::types::{AngleSet, FeedbackLabel, Rgb, Severity};

/// Result of classifying one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub label: FeedbackLabel,
    pub severity: Severity,
    pub color: Rgb,
}

impl From<FeedbackLabel> for Classification {
    fn from(label: FeedbackLabel) -> Self {
        Self {
            label,
            severity: label.severity(),
            color: label.color(),
        }
    }
}

/// Stateless classifier holding its calibration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostureClassifier {
    thresholds: PostureThresholds,
}

impl PostureClassifier {
    pub fn new(thresholds: PostureThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &PostureThresholds {
        &self.thresholds
    }

    /// Select the feedback label for a frame. Total over all inputs.
    pub fn classify(&self, angles: &AngleSet) -> Classification {
        classify_label(angles, &self.thresholds).into()
    }
}

/// Rule evaluation, separated from the color lookup for direct testing.
///
/// A NaN arm angle fails the range check and is reported as rule 1.
pub fn classify_label(angles: &AngleSet, t: &PostureThresholds) -> FeedbackLabel {
    let arm_in_range = (t.bow_arm_min_deg..=t.bow_arm_max_deg).contains(&angles.right_arm_angle);

    if !arm_in_range {
        FeedbackLabel::AdjustBowingArm
    } else if angles.shoulder_y_diff > t.shoulder_level_max {
        FeedbackLabel::LevelShoulders
    } else if angles.back_angle > t.back_angle_max_deg {
        FeedbackLabel::SitStraight
    } else {
        FeedbackLabel::GoodPosture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angles(arm: f64, back: f64, shoulder: f64) -> AngleSet {
        AngleSet {
            right_arm_angle: arm,
            back_angle: back,
            shoulder_y_diff: shoulder,
        }
    }

    fn label(arm: f64, back: f64, shoulder: f64) -> FeedbackLabel {
        PostureClassifier::default().classify(&angles(arm, back, shoulder)).label
    }

    #[test]
    fn test_arm_rule_wins_over_everything() {
        assert_eq!(label(30.0, 150.0, 0.2), FeedbackLabel::AdjustBowingArm);
        assert_eq!(label(140.0, 150.0, 0.2), FeedbackLabel::AdjustBowingArm);
    }

    #[test]
    fn test_shoulder_rule_wins_over_back() {
        assert_eq!(label(90.0, 150.0, 0.2), FeedbackLabel::LevelShoulders);
    }

    #[test]
    fn test_back_rule() {
        assert_eq!(label(90.0, 130.0, 0.02), FeedbackLabel::SitStraight);
    }

    #[test]
    fn test_good_posture_fallback() {
        assert_eq!(label(95.0, 95.0, 0.02), FeedbackLabel::GoodPosture);
    }

    #[test]
    fn test_arm_bounds_are_inclusive() {
        assert_eq!(label(60.0, 95.0, 0.02), FeedbackLabel::GoodPosture);
        assert_eq!(label(110.0, 95.0, 0.02), FeedbackLabel::GoodPosture);
        assert_eq!(label(59.99, 95.0, 0.02), FeedbackLabel::AdjustBowingArm);
        assert_eq!(label(110.01, 95.0, 0.02), FeedbackLabel::AdjustBowingArm);
    }

    #[test]
    fn test_shoulder_and_back_limits_are_exclusive() {
        assert_eq!(label(90.0, 95.0, 0.08), FeedbackLabel::GoodPosture);
        assert_eq!(label(90.0, 110.0, 0.02), FeedbackLabel::GoodPosture);
        assert_eq!(label(90.0, 110.5, 0.02), FeedbackLabel::SitStraight);
    }

    #[test]
    fn test_nan_arm_angle_is_out_of_range() {
        assert_eq!(label(f64::NAN, 95.0, 0.02), FeedbackLabel::AdjustBowingArm);
    }

    #[test]
    fn test_overridden_thresholds() {
        let classifier = PostureClassifier::new(PostureThresholds {
            back_angle_max_deg: 140.0,
            ..PostureThresholds::default()
        });
        let result = classifier.classify(&angles(90.0, 130.0, 0.02));
        assert_eq!(result.label, FeedbackLabel::GoodPosture);
        assert_eq!(result.severity, Severity::Nominal);
    }

    #[test]
    fn test_classification_carries_color_table() {
        let result = PostureClassifier::default().classify(&angles(30.0, 95.0, 0.02));
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.color, Rgb::new(255, 0, 0));
    }
}
