//! Threshold calibration from a bounded sample of a dataset
//!
//! The calibrator makes one sequential pass over a source, collecting up to
//! `sample_limit` combined scores, and derives the easy/medium cut points
//! from the 33rd and 66th percentiles of that sample. Only the scores are
//! held in memory, never the records. Weights pass through unchanged.

use crate::combine::CombineSettings;
use crate::scorer::{DifficultyScorer, WeightConfig};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead};
use tracing::{debug, info, warn};
use tunetag_core::{DatasetLine, DatasetLines, Record, ThresholdPair};

/// Percentile bounding the easy band
pub const EASY_PERCENTILE: f64 = 33.0;

/// Percentile bounding the medium band
pub const MEDIUM_PERCENTILE: f64 = 66.0;

/// How much of the source calibration may read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSettings {
    /// Maximum number of scores to collect; 0 scans the whole source
    pub sample_limit: usize,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self { sample_limit: 2000 }
    }
}

impl CalibrationSettings {
    fn is_full(&self, collected: usize) -> bool {
        self.sample_limit != 0 && collected >= self.sample_limit
    }
}

/// Outcome of a calibration pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calibration {
    pub weights: WeightConfig,
    pub thresholds: ThresholdPair,
    /// Number of combined scores in the sample
    pub sample_size: usize,
    /// Source lines read before stopping
    pub lines_scanned: usize,
    /// Lines skipped because they were not JSON objects
    pub malformed_lines: usize,
    /// Record sides that could not be scored
    pub scoring_errors: usize,
    /// Whether the fixed fallback thresholds were used
    pub used_fallback: bool,
}

/// Learns thresholds from a streamed source
pub struct Calibrator<'a> {
    scorer: &'a DifficultyScorer,
    combine: CombineSettings,
    settings: CalibrationSettings,
}

impl<'a> Calibrator<'a> {
    pub fn new(
        scorer: &'a DifficultyScorer,
        combine: CombineSettings,
        settings: CalibrationSettings,
    ) -> Self {
        Self {
            scorer,
            combine,
            settings,
        }
    }

    /// Scan `reader` and derive thresholds.
    ///
    /// Malformed lines and unscoreable sides are skipped; only a failure of
    /// the reader itself is an error.
    pub fn calibrate<R: BufRead>(&self, reader: R) -> io::Result<Calibration> {
        let mut sample = Vec::new();
        let mut lines_scanned = 0;
        let mut malformed_lines = 0;
        let mut scoring_errors = 0;

        for line in DatasetLines::new(reader) {
            let line = line?;
            lines_scanned += 1;

            let text = match &line {
                _ if line.is_blank() => continue,
                DatasetLine::Text(text) => text,
                DatasetLine::InvalidUtf8 => {
                    malformed_lines += 1;
                    continue;
                }
            };

            let record = match Record::from_json_line(text) {
                Ok(record) => record,
                Err(e) => {
                    debug!("Skipping line {} during calibration: {}", lines_scanned, e);
                    malformed_lines += 1;
                    continue;
                }
            };

            let sides = self.scorer.score_record(&record);
            scoring_errors += sides.errors().count();

            let (score_in, score_out) = sides.resolved();
            if let Some(score) = self.combine.combine(score_in, score_out) {
                sample.push(score);
            }

            if self.settings.is_full(sample.len()) {
                break;
            }
        }

        let sample_size = sample.len();
        let (thresholds, used_fallback) = match thresholds_from_sample(sample) {
            Some(thresholds) => (thresholds, false),
            None => {
                warn!(
                    "No scoreable records found in {} lines, using fallback thresholds",
                    lines_scanned
                );
                (ThresholdPair::FALLBACK, true)
            }
        };

        info!(
            "Calibrated on {} scores: easy <= {:.4}, medium <= {:.4}",
            sample_size, thresholds.easy_max, thresholds.medium_max
        );

        Ok(Calibration {
            weights: *self.scorer.weights(),
            thresholds,
            sample_size,
            lines_scanned,
            malformed_lines,
            scoring_errors,
            used_fallback,
        })
    }
}

/// 33rd/66th percentile thresholds, `None` for an empty sample
pub fn thresholds_from_sample(mut sample: Vec<f64>) -> Option<ThresholdPair> {
    sample.sort_by(f64::total_cmp);
    let easy_max = percentile(&sample, EASY_PERCENTILE)?;
    let medium_max = percentile(&sample, MEDIUM_PERCENTILE)?;
    Some(ThresholdPair::new(easy_max, medium_max))
}

/// Percentile of sorted data, interpolating linearly between ranks
pub fn percentile(sorted: &[f64], pct: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (pct / 100.0).clamp(0.0, 1.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
