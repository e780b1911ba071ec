//! tunetag Core
//!
//! Core types and error handling shared across tunetag components.
//!
//! This crate provides:
//! - The `Record` model for one line of a line-delimited JSON dataset
//! - Difficulty bands, threshold pairs, and task kinds
//! - Error types and result handling
//! - A line reader that tolerates undecodable input

pub mod error;
pub mod lines;
pub mod types;

pub use error::{Error, Result};
pub use lines::{DatasetLine, DatasetLines};
pub use types::{is_truthy, DifficultyBand, Record, TaskKind, ThresholdPair};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{DifficultyBand, Record, TaskKind, ThresholdPair};
}
