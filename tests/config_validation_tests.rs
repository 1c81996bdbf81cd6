//! Config Validation Tests
//!
//! Typo detection and range validation for posture_config.toml, exercised
//! through real files on disk.

use std::io::Write;

use violin_posture::config::validation::{known_config_keys, suggest_correction, validate_unknown_keys};
use violin_posture::config::{ConfigError, MonitorConfig};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_threshold_warns_with_suggestion() {
    let toml_str = r#"
[thresholds]
back_angle_max_dg = 105.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("back_angle_max_dg"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("thresholds.back_angle_max_deg")
    );
}

#[test]
fn unrelated_key_gets_no_suggestion() {
    let warnings = validate_unknown_keys("[display]\ncompletely_unrelated_setting = true\n");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].suggestion.is_none());
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[thresholds]
bow_arm_min_deg = 55.0
bow_arm_max_deg = 115.0

[detection]
min_detection_confidence = 0.6

[telemetry]
simulator_interval_ms = 500
"#;
    assert!(validate_unknown_keys(toml_str).is_empty());
}

#[test]
fn suggestion_uses_known_keys() {
    let known = known_config_keys();
    assert_eq!(
        suggest_correction("detection.min_detection_confidance", &known).as_deref(),
        Some("detection.min_detection_confidence")
    );
}

// ============================================================================
// Loading From Disk
// ============================================================================

#[test]
fn partial_file_keeps_defaults_for_missing_fields() {
    let file = write_config("[thresholds]\nshoulder_level_max = 0.05\n");
    let config = MonitorConfig::load_from_file(file.path()).unwrap();

    assert_eq!(config.thresholds.shoulder_level_max, 0.05);
    assert_eq!(config.thresholds.bow_arm_min_deg, 60.0);
    assert_eq!(config.thresholds.bow_arm_max_deg, 110.0);
    assert_eq!(config.thresholds.back_angle_max_deg, 110.0);
    assert_eq!(config.detection.min_detection_confidence, 0.7);
}

#[test]
fn typo_does_not_prevent_loading() {
    let file = write_config("[thresholds]\nbow_arm_mni_deg = 50.0\n");
    let config = MonitorConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.thresholds.bow_arm_min_deg, 60.0);
}

#[test]
fn inverted_arm_range_is_rejected() {
    let file = write_config("[thresholds]\nbow_arm_min_deg = 120.0\nbow_arm_max_deg = 100.0\n");
    match MonitorConfig::load_from_file(file.path()) {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("bow_arm_min_deg")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn all_range_problems_reported_together() {
    let file = write_config(
        r#"
[thresholds]
back_angle_max_deg = 200.0
shoulder_level_max = 1.5

[detection]
min_detection_confidence = -0.1

[telemetry]
simulator_interval_ms = 0
"#,
    );
    match MonitorConfig::load_from_file(file.path()) {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 4, "{errors:?}"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn malformed_toml_reports_the_path() {
    let file = write_config("[thresholds\nbow_arm_min_deg = 60");
    match MonitorConfig::load_from_file(file.path()) {
        Err(ConfigError::Parse(path, _)) => assert_eq!(path, file.path()),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = MonitorConfig::load_from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io(..))));
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("posture_config.toml");

    let mut config = MonitorConfig::default();
    config.thresholds.back_angle_max_deg = 100.0;
    config.telemetry.device_address = "AA:BB:CC:DD:EE:FF".to_string();
    config.save_to_file(&path).unwrap();

    let loaded = MonitorConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.thresholds, config.thresholds);
    assert_eq!(loaded.telemetry, config.telemetry);
}

#[test]
fn shipped_example_config_matches_defaults() {
    let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("posture_config.example.toml");
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(validate_unknown_keys(&contents).is_empty());

    let config = MonitorConfig::load_from_file(&path).unwrap();
    let defaults = MonitorConfig::default();
    assert_eq!(config.thresholds, defaults.thresholds);
    assert_eq!(config.telemetry, defaults.telemetry);
    assert_eq!(config.display, defaults.display);
}
