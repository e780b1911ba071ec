//! Configuration for scoring and calibration

use crate::calibrate::CalibrationSettings;
use crate::combine::CombineSettings;
use crate::scorer::WeightConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tunetag_core::Result;

/// Everything that shapes a score, loaded once per run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Feature weights
    pub weights: WeightConfig,

    /// How input and output scores are merged
    pub combine: CombineSettings,

    /// Calibration sample bounds
    pub calibration: CalibrationSettings,
}

impl ScoringConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        self.combine.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::CombineMethod;
    use std::io::Write;
    use tunetag_core::Error;

    #[test]
    fn test_defaults() {
        let config = ScoringConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ScoringConfig::default());
        assert_eq!(config.calibration.sample_limit, 2000);
        assert_eq!(config.combine.method, CombineMethod::Max);
        assert_eq!(config.weights.unique_pitches, 1.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scoring_config_yaml() {
        let yaml = r#"
weights:
  note_count: 0.05
  tempo: 0.1
combine:
  method: weighted
  input_weight: 0.25
  output_weight: 0.75
calibration:
  sample_limit: 500
"#;
        let config = ScoringConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.weights.note_count, 0.05);
        assert_eq!(config.weights.tempo, 0.1);
        assert_eq!(config.weights.accidentals, 1.3);
        assert_eq!(config.combine.method, CombineMethod::Weighted);
        assert_eq!(config.combine.output_weight, 0.75);
        assert_eq!(config.calibration.sample_limit, 500);
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let config = ScoringConfig::from_yaml("weights:\n  ornaments: -1.0\n").unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "combine:\n  method: avg").unwrap();

        let config = ScoringConfig::from_file(file.path()).unwrap();
        assert_eq!(config.combine.method, CombineMethod::Avg);

        assert!(ScoringConfig::from_file("/nonexistent/tunetag.yaml").is_err());
    }
}
