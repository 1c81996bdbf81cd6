//! Config validation: unknown-key detection with Levenshtein suggestions
//! and calibration range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::MonitorConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for MonitorConfig.
///
/// Maintained by hand to match the structs in monitor_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [thresholds]
        "thresholds",
        "thresholds.bow_arm_min_deg",
        "thresholds.bow_arm_max_deg",
        "thresholds.shoulder_level_max",
        "thresholds.back_angle_max_deg",
        // [detection]
        "detection",
        "detection.min_detection_confidence",
        // [telemetry]
        "telemetry",
        "telemetry.device_address",
        "telemetry.characteristic_uuid",
        "telemetry.simulator_interval_ms",
        // [display]
        "display",
        "display.height_placeholder",
    ];
    keys.iter().copied().collect()
}

/// Recursively collect dotted key paths from a TOML value.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the lexicographically smallest key so output is stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|&(dist, _)| dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys; it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are reported by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Check every calibration value against the range it can meaningfully take.
///
/// Returns one message per violation; an empty vector means the ranges are fine.
pub fn validate_ranges(config: &MonitorConfig) -> Vec<String> {
    let mut errors = Vec::new();
    let t = &config.thresholds;

    for (name, value) in [
        ("thresholds.bow_arm_min_deg", t.bow_arm_min_deg),
        ("thresholds.bow_arm_max_deg", t.bow_arm_max_deg),
        ("thresholds.back_angle_max_deg", t.back_angle_max_deg),
    ] {
        // Joint angles are folded into (0, 180]
        if !value.is_finite() || value <= 0.0 || value > 180.0 {
            errors.push(format!("{name} = {value} is outside the joint-angle range (0-180 degrees)"));
        }
    }

    let shoulder = t.shoulder_level_max;
    if !shoulder.is_finite() || shoulder <= 0.0 || shoulder >= 1.0 {
        errors.push(format!(
            "thresholds.shoulder_level_max = {shoulder} must lie strictly between 0 and 1 (normalized image height)"
        ));
    }

    let confidence = config.detection.min_detection_confidence;
    if !(0.0..=1.0).contains(&confidence) {
        errors.push(format!(
            "detection.min_detection_confidence = {confidence} must lie within 0-1"
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn test_every_known_key_is_reachable_from_defaults() {
        let text = toml::to_string(&MonitorConfig::default()).unwrap();
        let value: toml::Value = text.parse().unwrap();
        let found: HashSet<String> = walk_toml_keys(&value, "").into_iter().collect();
        for key in known_config_keys() {
            assert!(found.contains(key), "known key {key} is not produced by MonitorConfig");
        }
    }

    #[test]
    fn test_nan_threshold_is_a_range_error() {
        let mut config = MonitorConfig::default();
        config.thresholds.back_angle_max_deg = f64::NAN;
        let errors = validate_ranges(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("back_angle_max_deg"));
    }
}
