//! Pipeline configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use tunetag_core::{Error, Result};
use tunetag_scoring::{CombineMethod, ScoringConfig};

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Weights, combine policy, and calibration bounds
    #[serde(flatten)]
    pub scoring: ScoringConfig,

    /// Dataset name written into records that lack one
    #[serde(default = "default_dataset_name")]
    pub dataset_default: String,
}

/// Values given on the command line, applied over the file configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub sample_limit: Option<usize>,
    pub combine_method: Option<CombineMethod>,
    pub input_weight: Option<f64>,
    pub output_weight: Option<f64>,
    pub dataset_default: Option<String>,
}

impl PipelineConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from file and CLI overrides
    pub fn load(config_path: impl AsRef<Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let config_path = config_path.as_ref();

        // Try to load from file, or use defaults
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_yaml(&content)?
        } else {
            debug!("No configuration at {}, using defaults", config_path.display());
            Self::default()
        };

        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(limit) = overrides.sample_limit {
            self.scoring.calibration.sample_limit = limit;
        }

        if let Some(method) = overrides.combine_method {
            self.scoring.combine.method = method;
        }

        if let Some(weight) = overrides.input_weight {
            self.scoring.combine.input_weight = weight;
        }

        if let Some(weight) = overrides.output_weight {
            self.scoring.combine.output_weight = weight;
        }

        if let Some(name) = &overrides.dataset_default {
            self.dataset_default = name.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        if self.dataset_default.trim().is_empty() {
            return Err(Error::config("dataset_default must not be empty"));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            dataset_default: default_dataset_name(),
        }
    }
}

fn default_dataset_name() -> String {
    "ABC Notation".to_string()
}
