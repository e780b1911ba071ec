//! tunetag Scoring
//!
//! Deterministic difficulty scoring for ABC notation training data.
//!
//! The pieces compose leaves first:
//! - `features`: counts pitch, rhythm, accidental, ornament, and tempo signals
//! - `scorer`: weighs a feature vector into one scalar score
//! - `combine`: merges the input-side and output-side scores of a record
//! - `calibrate`: learns percentile thresholds from a streamed sample
//! - `tagger`: maps a score onto the easy/medium/hard bands
//! - `task`: infers a missing task category from marker tokens
//!
//! Nothing in this crate opens files; sources are handed in as readers.

pub mod calibrate;
pub mod combine;
pub mod config;
pub mod features;
pub mod notation;
pub mod scorer;
pub mod tagger;
pub mod task;

pub use calibrate::{percentile, thresholds_from_sample, Calibration, CalibrationSettings, Calibrator};
pub use combine::{combine, CombineMethod, CombineSettings};
pub use config::ScoringConfig;
pub use features::{FeatureExtractor, FeatureVector};
pub use notation::NotationDetector;
pub use scorer::{DifficultyScorer, SideScores, WeightConfig};
pub use tagger::{prepend_marker, tag, tag_marker};
pub use task::TaskInferencer;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::calibrate::{Calibration, CalibrationSettings, Calibrator};
    pub use crate::combine::{CombineMethod, CombineSettings};
    pub use crate::config::ScoringConfig;
    pub use crate::scorer::{DifficultyScorer, WeightConfig};
    pub use crate::tagger::tag;
    pub use crate::task::TaskInferencer;
}
