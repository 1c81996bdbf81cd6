//! Posture classification thresholds and detection constants

/// Default calibration for the posture rules.
///
/// These seed [`PostureThresholds`](crate::config::PostureThresholds); the
/// operator can override every one of them in `posture_config.toml`.
pub mod posture_thresholds {
    /// Lower bound of the acceptable bowing-arm elbow angle (degrees, inclusive)
    pub const BOW_ARM_MIN_DEG: f64 = 60.0;
    /// Upper bound of the acceptable bowing-arm elbow angle (degrees, inclusive)
    pub const BOW_ARM_MAX_DEG: f64 = 110.0;
    /// Vertical shoulder offset above which the player is leaning (normalized units)
    pub const SHOULDER_LEVEL_MAX: f64 = 0.08;
    /// Ear-shoulder-hip angle above which the player is slouching (degrees)
    pub const BACK_ANGLE_MAX_DEG: f64 = 110.0;
}

/// Pose detector gating.
pub mod detection {
    /// Samples below this confidence are rendered as "no pose detected"
    pub const MIN_DETECTION_CONFIDENCE: f64 = 0.7;
}
