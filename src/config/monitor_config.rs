//! Monitor Configuration - posture calibration and collaborator settings as TOML
//!
//! Every threshold the classifier uses is a field here. Each struct implements
//! `Default` with values matching the constants in `types::thresholds`, so the
//! monitor behaves identically when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::types::{detection, posture_thresholds};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "POSTURE_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "posture_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a monitoring session.
///
/// Load with `MonitorConfig::load()` which searches:
/// 1. `$POSTURE_CONFIG` env var
/// 2. `./posture_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Posture rule thresholds
    #[serde(default)]
    pub thresholds: PostureThresholds,

    /// Pose detector gating
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Scroll-mount telemetry link
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Overlay text
    #[serde(default)]
    pub display: DisplayConfig,
}

impl MonitorConfig {
    /// Load configuration using the standard search order:
    /// 1. `$POSTURE_CONFIG` environment variable
    /// 2. `./posture_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded monitor config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./posture_config.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded monitor config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys are logged as warnings; range violations are errors.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Syntax(inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(ConfigError::Syntax)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the configuration to disk.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))
    }

    /// Validate internal consistency of thresholds.
    ///
    /// All problems are collected so the operator can fix them in one pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = super::validation::validate_ranges(self);

        let t = &self.thresholds;
        if t.bow_arm_min_deg.is_finite()
            && t.bow_arm_max_deg.is_finite()
            && t.bow_arm_min_deg >= t.bow_arm_max_deg
        {
            errors.push(format!(
                "thresholds.bow_arm_min_deg ({:.1}) must be less than bow_arm_max_deg ({:.1})",
                t.bow_arm_min_deg, t.bow_arm_max_deg
            ));
        }

        if self.telemetry.simulator_interval_ms == 0 {
            errors.push("telemetry.simulator_interval_ms must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),

    /// Parse failure in a document that did not come from a file
    #[error("Config parse error: {0}")]
    Syntax(toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Posture Thresholds
// ============================================================================

/// Calibration of the ordered posture rules.
///
/// Rule order is fixed (arm, shoulders, back); only the limits are tunable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureThresholds {
    /// Lowest acceptable bowing-arm elbow angle (degrees, inclusive).
    #[serde(default = "default_bow_arm_min")]
    pub bow_arm_min_deg: f64,

    /// Highest acceptable bowing-arm elbow angle (degrees, inclusive).
    #[serde(default = "default_bow_arm_max")]
    pub bow_arm_max_deg: f64,

    /// Shoulder height difference above which the player is leaning.
    #[serde(default = "default_shoulder_level_max")]
    pub shoulder_level_max: f64,

    /// Ear-shoulder-hip angle above which the player is slouching (degrees).
    #[serde(default = "default_back_angle_max")]
    pub back_angle_max_deg: f64,
}

fn default_bow_arm_min() -> f64 {
    posture_thresholds::BOW_ARM_MIN_DEG
}
fn default_bow_arm_max() -> f64 {
    posture_thresholds::BOW_ARM_MAX_DEG
}
fn default_shoulder_level_max() -> f64 {
    posture_thresholds::SHOULDER_LEVEL_MAX
}
fn default_back_angle_max() -> f64 {
    posture_thresholds::BACK_ANGLE_MAX_DEG
}

impl Default for PostureThresholds {
    fn default() -> Self {
        Self {
            bow_arm_min_deg: default_bow_arm_min(),
            bow_arm_max_deg: default_bow_arm_max(),
            shoulder_level_max: default_shoulder_level_max(),
            back_angle_max_deg: default_back_angle_max(),
        }
    }
}

// ============================================================================
// Detection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Samples reported below this confidence count as "no pose detected".
    #[serde(default = "default_min_detection_confidence")]
    pub min_detection_confidence: f64,
}

fn default_min_detection_confidence() -> f64 {
    detection::MIN_DETECTION_CONFIDENCE
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: default_min_detection_confidence(),
        }
    }
}

// ============================================================================
// Telemetry Link
// ============================================================================

/// Identity of the scroll-mount accessory.
///
/// The address and characteristic are opaque to the monitor; they are handed
/// to the transport bridge and echoed in logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Accessory device address
    #[serde(default = "default_device_address")]
    pub device_address: String,

    /// Notification characteristic carrying status tokens
    #[serde(default = "default_characteristic_uuid")]
    pub characteristic_uuid: String,

    /// Interval between simulated status reports (ms)
    #[serde(default = "default_simulator_interval_ms")]
    pub simulator_interval_ms: u64,
}

fn default_device_address() -> String {
    "F8:24:41:A3:1C:5B".to_string()
}
fn default_characteristic_uuid() -> String {
    "cba1d466-344c-4be3-ab3f-189f80dd7518".to_string()
}
fn default_simulator_interval_ms() -> u64 {
    super::defaults::SIMULATOR_INTERVAL_MS
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            device_address: default_device_address(),
            characteristic_uuid: default_characteristic_uuid(),
            simulator_interval_ms: default_simulator_interval_ms(),
        }
    }
}

// ============================================================================
// Display
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Shown in place of the height until the first report arrives
    #[serde(default = "default_height_placeholder")]
    pub height_placeholder: String,
}

fn default_height_placeholder() -> String {
    "...".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            height_placeholder: default_height_placeholder(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config: MonitorConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config.thresholds.bow_arm_min_deg, 60.0);
        assert_eq!(config.thresholds.bow_arm_max_deg, 110.0);
        assert_eq!(config.thresholds.shoulder_level_max, 0.08);
        assert_eq!(config.thresholds.back_angle_max_deg, 110.0);
        assert_eq!(config.detection.min_detection_confidence, 0.7);
        assert_eq!(config.display.height_placeholder, "...");
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[thresholds]
back_angle_max_deg = 120.0

[telemetry]
device_address = "AA:BB:CC:DD:EE:FF"
"#;
        let config = MonitorConfig::from_toml_str(toml_str).expect("partial TOML should parse");
        // Overridden values
        assert_eq!(config.thresholds.back_angle_max_deg, 120.0);
        assert_eq!(config.telemetry.device_address, "AA:BB:CC:DD:EE:FF");
        // Non-overridden values retain defaults
        assert_eq!(config.thresholds.bow_arm_min_deg, 60.0);
        assert_eq!(
            config.telemetry.characteristic_uuid,
            "cba1d466-344c-4be3-ab3f-189f80dd7518"
        );
    }

    #[test]
    fn test_inverted_arm_range_rejected() {
        let toml_str = r#"
[thresholds]
bow_arm_min_deg = 120.0
bow_arm_max_deg = 90.0
"#;
        let result = MonitorConfig::from_toml_str(toml_str);
        match result {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("bow_arm_min_deg")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_inline_syntax_error_has_no_path() {
        let err = MonitorConfig::from_toml_str("[thresholds\n").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax(_)));
        let message = err.to_string();
        assert!(message.starts_with("Config parse error: "), "{message}");
        assert!(!message.contains("()"), "{message}");
    }

    #[test]
    fn test_toml_roundtrip_preserves_overrides() {
        let mut config = MonitorConfig::default();
        config.thresholds.shoulder_level_max = 0.05;
        let text = config.to_toml().unwrap();
        let parsed = MonitorConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed.thresholds, config.thresholds);
    }
}
