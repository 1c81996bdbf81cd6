//! Feedback labels, severity tiers, and the display color table

use serde::{Deserialize, Serialize};

/// Display color (RGB).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel order expected by BGR drawing surfaces.
    pub const fn to_bgr(self) -> (u8, u8, u8) {
        (self.b, self.g, self.r)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Overlay colors, grouped by what they annotate.
pub mod palette {
    use super::Rgb;

    pub const SEVERITY_HIGH: Rgb = Rgb::new(255, 0, 0);
    pub const SEVERITY_MEDIUM_HIGH: Rgb = Rgb::new(180, 0, 0);
    pub const SEVERITY_MEDIUM: Rgb = Rgb::new(0, 0, 255);
    pub const SEVERITY_NOMINAL: Rgb = Rgb::new(0, 255, 0);

    /// "Arm Angle" readout
    pub const ARM_ANGLE_TEXT: Rgb = Rgb::new(100, 255, 150);
    /// "Scroll" status readout
    pub const MOUNT_TEXT: Rgb = Rgb::new(100, 200, 255);
    /// "Height" readout
    pub const HEIGHT_TEXT: Rgb = Rgb::new(150, 255, 255);
}

/// How urgently the player should react to a feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Nominal = 0,
    Medium = 1,
    MediumHigh = 2,
    High = 3,
}

impl Severity {
    pub const fn color(&self) -> Rgb {
        match self {
            Severity::High => palette::SEVERITY_HIGH,
            Severity::MediumHigh => palette::SEVERITY_MEDIUM_HIGH,
            Severity::Medium => palette::SEVERITY_MEDIUM,
            Severity::Nominal => palette::SEVERITY_NOMINAL,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::High => write!(f, "HIGH"),
            Severity::MediumHigh => write!(f, "MEDIUM-HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Nominal => write!(f, "NOMINAL"),
        }
    }
}

/// One actionable message shown per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeedbackLabel {
    AdjustBowingArm,
    LevelShoulders,
    SitStraight,
    GoodPosture,
}

impl FeedbackLabel {
    /// All labels in rule-priority order.
    pub const ALL: [FeedbackLabel; 4] = [
        FeedbackLabel::AdjustBowingArm,
        FeedbackLabel::LevelShoulders,
        FeedbackLabel::SitStraight,
        FeedbackLabel::GoodPosture,
    ];

    pub fn message(&self) -> &'static str {
        match self {
            FeedbackLabel::AdjustBowingArm => "Adjust Bowing Arm",
            FeedbackLabel::LevelShoulders => "Avoid Leaning, Level Shoulders",
            FeedbackLabel::SitStraight => "Sit Straight, Avoid Slouching",
            FeedbackLabel::GoodPosture => "Good Posture",
        }
    }

    pub const fn severity(&self) -> Severity {
        match self {
            FeedbackLabel::AdjustBowingArm => Severity::High,
            FeedbackLabel::LevelShoulders => Severity::MediumHigh,
            FeedbackLabel::SitStraight => Severity::Medium,
            FeedbackLabel::GoodPosture => Severity::Nominal,
        }
    }

    pub const fn color(&self) -> Rgb {
        self.severity().color()
    }
}

impl std::fmt::Display for FeedbackLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_table() {
        assert_eq!(FeedbackLabel::AdjustBowingArm.color(), Rgb::new(255, 0, 0));
        assert_eq!(FeedbackLabel::LevelShoulders.color(), Rgb::new(180, 0, 0));
        assert_eq!(FeedbackLabel::SitStraight.color(), Rgb::new(0, 0, 255));
        assert_eq!(FeedbackLabel::GoodPosture.color(), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_severity_ordering_follows_rule_priority() {
        let severities: Vec<Severity> = FeedbackLabel::ALL.iter().map(|l| l.severity()).collect();
        assert!(severities.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", FeedbackLabel::SitStraight), "Sit Straight, Avoid Slouching");
        assert_eq!(format!("{}", Rgb::new(0, 255, 0)), "#00FF00");
        assert_eq!(Rgb::new(255, 0, 0).to_bgr(), (0, 0, 255));
    }
}
