//! Merging input-side and output-side scores

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;
use tunetag_core::{Error, Result};

/// Policy for merging the two side scores of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CombineMethod {
    /// Larger of the two scores
    #[default]
    Max,
    /// Arithmetic mean
    Avg,
    /// Mean weighted by the per-side weights
    Weighted,
}

impl CombineMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Avg => "avg",
            Self::Weighted => "weighted",
        }
    }

    /// Parse a method name; anything unrecognised behaves as `max`
    pub fn parse_lenient(name: &str) -> Self {
        match name {
            "max" => Self::Max,
            "avg" => Self::Avg,
            "weighted" => Self::Weighted,
            other => {
                warn!("Unknown combine method '{}', falling back to max", other);
                Self::Max
            }
        }
    }
}

impl From<&str> for CombineMethod {
    fn from(name: &str) -> Self {
        Self::parse_lenient(name)
    }
}

impl From<String> for CombineMethod {
    fn from(name: String) -> Self {
        Self::parse_lenient(&name)
    }
}

impl From<CombineMethod> for String {
    fn from(method: CombineMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for CombineMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merge two optional side scores.
///
/// An absent side never drags the result down: with one side absent the
/// other is returned unchanged, with both absent the result is absent.
pub fn combine(
    score_in: Option<f64>,
    score_out: Option<f64>,
    method: CombineMethod,
    w_in: f64,
    w_out: f64,
) -> Option<f64> {
    match (score_in, score_out) {
        (None, None) => None,
        (Some(score), None) | (None, Some(score)) => Some(score),
        (Some(a), Some(b)) => Some(match method {
            CombineMethod::Max => a.max(b),
            CombineMethod::Avg => 0.5 * (a + b),
            CombineMethod::Weighted => {
                let total = w_in + w_out;
                if total == 0.0 {
                    0.5 * (a + b)
                } else {
                    (w_in * a + w_out * b) / total
                }
            }
        }),
    }
}

/// Combine method plus the side weights used by `weighted`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineSettings {
    pub method: CombineMethod,
    pub input_weight: f64,
    pub output_weight: f64,
}

impl Default for CombineSettings {
    fn default() -> Self {
        Self {
            method: CombineMethod::Max,
            input_weight: 0.5,
            output_weight: 0.5,
        }
    }
}

impl CombineSettings {
    pub fn combine(&self, score_in: Option<f64>, score_out: Option<f64>) -> Option<f64> {
        combine(
            score_in,
            score_out,
            self.method,
            self.input_weight,
            self.output_weight,
        )
    }

    /// Side weights must be finite; zero is allowed
    pub fn validate(&self) -> Result<()> {
        if !self.input_weight.is_finite() || !self.output_weight.is_finite() {
            return Err(Error::config(format!(
                "combine weights must be finite, got input={} output={}",
                self.input_weight, self.output_weight
            )));
        }
        Ok(())
    }
}
