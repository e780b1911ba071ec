//! Linear difficulty scoring over extracted features

use crate::features::{FeatureExtractor, FeatureVector};
use crate::notation::NotationDetector;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tunetag_core::{Error, Record, Result};

/// Per-feature multipliers, fixed for a whole run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub unique_pitches: f64,
    pub unique_rhythms: f64,
    pub accidentals: f64,
    pub ornaments: f64,
    pub note_count: f64,
    pub tempo: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            unique_pitches: 1.5,
            unique_rhythms: 1.2,
            accidentals: 1.3,
            ornaments: 1.5,
            note_count: 0.01,
            tempo: 0.02,
        }
    }
}

impl WeightConfig {
    /// Weighted sum of a feature vector; tempo contributes only above the baseline
    pub fn weigh(&self, features: &FeatureVector) -> f64 {
        features.unique_pitches as f64 * self.unique_pitches
            + features.unique_rhythms as f64 * self.unique_rhythms
            + features.accidentals as f64 * self.accidentals
            + features.ornaments as f64 * self.ornaments
            + features.note_count as f64 * self.note_count
            + features.tempo_factor() * self.tempo
    }

    /// Named weights, in feature order
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("unique_pitches", self.unique_pitches),
            ("unique_rhythms", self.unique_rhythms),
            ("accidentals", self.accidentals),
            ("ornaments", self.ornaments),
            ("note_count", self.note_count),
            ("tempo", self.tempo),
        ]
    }

    /// Every weight must be a finite positive number
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in self.entries() {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(Error::config(format!(
                    "weight '{}' must be a finite positive number, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }
}

/// Scores of both sides of one record.
///
/// `Ok(None)` means the side has no notation; `Err` means it could not be
/// scored at all. Both count as absent when combining.
#[derive(Debug)]
pub struct SideScores {
    pub input: Result<Option<f64>>,
    pub output: Result<Option<f64>>,
}

impl SideScores {
    /// Scores with failed sides treated as absent
    pub fn resolved(&self) -> (Option<f64>, Option<f64>) {
        (
            self.input.as_ref().ok().copied().flatten(),
            self.output.as_ref().ok().copied().flatten(),
        )
    }

    /// Scoring failures, input side first
    pub fn errors(&self) -> impl Iterator<Item = &Error> {
        self.input
            .as_ref()
            .err()
            .into_iter()
            .chain(self.output.as_ref().err())
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.input
            .err()
            .into_iter()
            .chain(self.output.err())
            .collect()
    }
}

/// Turns notation text into a scalar difficulty score
#[derive(Debug, Clone)]
pub struct DifficultyScorer {
    extractor: FeatureExtractor,
    detector: NotationDetector,
    weights: WeightConfig,
}

impl DifficultyScorer {
    pub fn new(weights: WeightConfig) -> Result<Self> {
        Ok(Self {
            extractor: FeatureExtractor::new()?,
            detector: NotationDetector::new()?,
            weights,
        })
    }

    pub fn weights(&self) -> &WeightConfig {
        &self.weights
    }

    pub fn detector(&self) -> &NotationDetector {
        &self.detector
    }

    pub fn extract(&self, text: &str) -> FeatureVector {
        self.extractor.extract(text)
    }

    /// Score `text` unconditionally
    pub fn score(&self, text: &str) -> f64 {
        self.weights.weigh(&self.extract(text))
    }

    /// Score `text` only if it contains notation
    pub fn score_text(&self, text: &str) -> Option<f64> {
        self.detector
            .contains_notation(text)
            .then(|| self.score(text))
    }

    /// Score one raw field value; missing and null read as empty text
    pub fn score_field(&self, name: &str, value: Option<&Value>) -> Result<Option<f64>> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(self.score_text(text)),
            Some(_) => Err(Error::scoring(format!("field '{}' is not text", name))),
        }
    }

    /// Score the `input` and `output` sides of a record independently
    pub fn score_record(&self, record: &Record) -> SideScores {
        SideScores {
            input: self.score_field("input", record.get("input")),
            output: self.score_field("output", record.get("output")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> DifficultyScorer {
        DifficultyScorer::new(WeightConfig::default()).unwrap()
    }

    #[test]
    fn test_linear_combination() {
        let features = FeatureVector {
            unique_pitches: 2,
            unique_rhythms: 1,
            accidentals: 3,
            ornaments: 0,
            note_count: 100,
            tempo: 110,
        };
        let score = WeightConfig::default().weigh(&features);
        // 3.0 + 1.2 + 3.9 + 0 + 1.0 + 1.0
        assert!((score - 10.1).abs() < 1e-9);
    }

    #[test]
    fn test_slow_tempo_adds_nothing() {
        let s = scorer();
        assert_eq!(s.score("Q:60 X"), s.score("Q:30 X"));
        assert!(s.score("Q:61 X") > s.score("Q:60 X"));
    }

    #[test]
    fn test_score_is_deterministic() {
        let s = scorer();
        let text = "X:1\nT:Reel\nM:4/4\nK:D\n|:d2fd ^cdec|BAFA ~B3c:|";
        assert_eq!(s.score(text), s.score(text));
    }

    #[test]
    fn test_gated_scoring() {
        let s = scorer();
        assert_eq!(s.score_text(""), None);
        assert_eq!(s.score_text("1234"), None);
        assert!(s.score_text("K:G\nGABc").is_some());
    }

    #[test]
    fn test_record_sides() {
        let s = scorer();
        let record = Record::from_json_line(r#"{"input": 42, "output": "K:G\nGAB"}"#).unwrap();
        let scores = s.score_record(&record);

        assert!(matches!(scores.input, Err(Error::Scoring(_))));
        assert!(matches!(scores.output, Ok(Some(_))));
        assert_eq!(scores.errors().count(), 1);

        let (input, output) = scores.resolved();
        assert_eq!(input, None);
        assert!(output.is_some());
    }

    #[test]
    fn test_validate_weights() {
        assert!(WeightConfig::default().validate().is_ok());

        let zero = WeightConfig {
            tempo: 0.0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(Error::Config(_))));

        let nan = WeightConfig {
            accidentals: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }
}
