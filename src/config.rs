//! Run configuration.
//!
//! A run can be configured entirely from CLI flags or loaded from a JSON
//! document:
//!
//! ```json
//! {
//!   "templates": { "msh": "MSH|...", "pid": "PID|...", "pv1": "PV1|..." },
//!   "rate_hz": 2.0,
//!   "stop": { "count": 100, "seconds": null },
//!   "corpus": ["samples/a.hl7"],
//!   "out_dir": "outbox",
//!   "patient": "TEST^JOHN"
//! }
//! ```

use crate::engine::{RunPlan, StopLimits};
use crate::patients::find_patient;
use crate::source::Corpus;
use crate::template::TemplateSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Operator-facing rate bounds, msg/sec.
pub const MIN_RATE_HZ: f64 = 0.1;
pub const MAX_RATE_HZ: f64 = 10.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Rate out of range: {0} msg/sec (allowed: {MIN_RATE_HZ}-{MAX_RATE_HZ})")]
    RateOutOfRange(f64),
    #[error("Unknown test patient: {0}")]
    PatientNotFound(String),
}

/// A complete run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Segment templates for synthetic mode.
    pub templates: TemplateSet,
    /// Emission rate, msg/sec.
    pub rate_hz: f64,
    /// Stop limits.
    pub stop: StopLimits,
    /// Replay corpus paths; empty means synthetic mode.
    pub corpus: Vec<PathBuf>,
    /// Destination directory for persisted messages.
    pub out_dir: Option<PathBuf>,
    /// Name of a builtin test patient to substitute into the templates.
    pub patient: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            templates: TemplateSet::default(),
            rate_hz: 1.0,
            stop: StopLimits::none(),
            corpus: Vec::new(),
            out_dir: None,
            patient: None,
        }
    }
}

impl RunConfig {
    /// Load from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&content)?;
        validate_rate(config.rate_hz)?;
        Ok(config)
    }

    /// Build the immutable plan handed to the engine.
    pub fn plan(&self) -> Result<RunPlan, ConfigError> {
        validate_rate(self.rate_hz)?;

        let mut templates = self.templates.clone();
        if let Some(name) = &self.patient {
            let patient = find_patient(name)
                .ok_or_else(|| ConfigError::PatientNotFound(name.clone()))?;
            templates = templates.with_patient(&patient);
        }

        let mut plan = RunPlan::new(templates)
            .with_corpus(Corpus::new(self.corpus.clone()))
            .with_limits(self.stop);
        if let Some(dir) = &self.out_dir {
            plan = plan.with_out_dir(dir);
        }
        Ok(plan)
    }
}

/// Check the operator rate range (one decimal place, 0.1 to 10.0).
pub fn validate_rate(rate_hz: f64) -> Result<(), ConfigError> {
    if !rate_hz.is_finite() || !(MIN_RATE_HZ..=MAX_RATE_HZ).contains(&rate_hz) {
        return Err(ConfigError::RateOutOfRange(rate_hz));
    }
    Ok(())
}

/// Parse a stop-duration argument.
///
/// Accepts `off`, the preset durations `10s`, `30s`, `1m` and `5m`, or a
/// literal number of seconds. Anything unparseable degrades to "no limit"
/// with a warning rather than failing the run.
pub fn parse_stop_after(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "off" => return None,
        "10s" => return Some(10.0),
        "30s" => return Some(30.0),
        "1m" => return Some(60.0),
        "5m" => return Some(300.0),
        _ => {}
    }
    match trimmed.parse::<f64>() {
        Ok(seconds) if seconds > 0.0 && seconds.is_finite() => Some(seconds),
        _ => {
            warn!("Invalid stop duration {trimmed:?}; running until stopped manually");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.rate_hz, 1.0);
        assert!(config.corpus.is_empty());
        assert_eq!(config.stop, StopLimits::none());
    }

    #[test]
    fn test_validate_rate_bounds() {
        assert!(validate_rate(0.1).is_ok());
        assert!(validate_rate(10.0).is_ok());
        assert!(validate_rate(2.5).is_ok());
        assert!(validate_rate(0.0).is_err());
        assert!(validate_rate(-1.0).is_err());
        assert!(validate_rate(10.1).is_err());
        assert!(validate_rate(f64::NAN).is_err());
    }

    #[test]
    fn test_parse_stop_after_presets() {
        assert_eq!(parse_stop_after("off"), None);
        assert_eq!(parse_stop_after("Off"), None);
        assert_eq!(parse_stop_after("10s"), Some(10.0));
        assert_eq!(parse_stop_after("30s"), Some(30.0));
        assert_eq!(parse_stop_after("1m"), Some(60.0));
        assert_eq!(parse_stop_after("5m"), Some(300.0));
    }

    #[test]
    fn test_parse_stop_after_literal_seconds() {
        assert_eq!(parse_stop_after("45"), Some(45.0));
        assert_eq!(parse_stop_after("0.5"), Some(0.5));
        assert_eq!(parse_stop_after(" 120 "), Some(120.0));
    }

    #[test]
    fn test_parse_stop_after_invalid_means_no_limit() {
        assert_eq!(parse_stop_after("soon"), None);
        assert_eq!(parse_stop_after(""), None);
        assert_eq!(parse_stop_after("-5"), None);
        assert_eq!(parse_stop_after("0"), None);
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"rate_hz": 2.0, "stop": {{"count": 5, "seconds": null}}, "patient": "TEST^JOHN"}}"#
        )
        .unwrap();

        let config = RunConfig::from_file(&path).unwrap();
        assert_eq!(config.rate_hz, 2.0);
        assert_eq!(config.stop.count, Some(5));
        assert_eq!(config.patient.as_deref(), Some("TEST^JOHN"));
        // Unspecified fields fall back to defaults.
        assert_eq!(config.templates, TemplateSet::default());
    }

    #[test]
    fn test_from_file_rejects_out_of_range_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"rate_hz": 50.0}"#).unwrap();

        assert!(matches!(
            RunConfig::from_file(&path),
            Err(ConfigError::RateOutOfRange(_))
        ));
    }

    #[test]
    fn test_plan_applies_patient() {
        let config = RunConfig {
            templates: TemplateSet::new("MSH|{TIMESTAMP}", "PID|{PATIENT_ID}", "PV1|"),
            patient: Some("TEST^EMILY".to_string()),
            ..Default::default()
        };
        // Substitution happens on the snapshot inside the plan; an unknown
        // name is the only failure mode.
        assert!(config.plan().is_ok());

        let unknown = RunConfig {
            patient: Some("TEST^NOBODY".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            unknown.plan(),
            Err(ConfigError::PatientNotFound(_))
        ));
    }

    #[test]
    fn test_plan_with_empty_corpus_is_synthetic() {
        let config = RunConfig::default();
        // An empty corpus list is not an error; the plan simply stays in
        // synthetic mode.
        assert!(config.plan().is_ok());
    }
}
