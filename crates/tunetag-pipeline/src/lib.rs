//! tunetag Pipeline
//!
//! Calibrates difficulty thresholds on a JSONL dataset of ABC notation
//! records and writes a normalized, difficulty-tagged copy of it.

pub mod config;
pub mod latest;
pub mod pipeline;
pub mod stats;
pub mod writer;

pub use config::{ConfigOverrides, PipelineConfig};
pub use latest::{latest_notation, pick_latest, read_latest, GenerationResponse};
pub use pipeline::{LineOutcome, PipelineReport, TaggedRecord, Tagging, TaggingPipeline};
pub use stats::PipelineStats;
pub use writer::JsonlWriter;
