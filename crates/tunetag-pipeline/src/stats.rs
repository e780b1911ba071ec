//! Run statistics and counters

use metrics::{counter, describe_counter};
use serde::Serialize;
use tunetag_core::DifficultyBand;

const LINES_COUNTER: &str = "tunetag_lines_total";
const TAGGED_COUNTER: &str = "tunetag_records_tagged_total";
const SCORING_ERRORS_COUNTER: &str = "tunetag_scoring_errors_total";

/// Register counter descriptions with whatever recorder is installed
pub fn describe_metrics() {
    describe_counter!(LINES_COUNTER, "Dataset lines read by the tagging pass");
    describe_counter!(TAGGED_COUNTER, "Records given a difficulty marker");
    describe_counter!(SCORING_ERRORS_COUNTER, "Record sides that could not be scored");
}

/// Counts gathered by the tagging pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub lines_seen: u64,
    pub blank_lines: u64,
    pub malformed_lines: u64,
    pub records_written: u64,
    /// Records whose input already carried a marker
    pub markers_preserved: u64,
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
    /// Tagged records with no scoreable side
    pub unscored_records: u64,
    pub scoring_errors: u64,
}

impl PipelineStats {
    pub fn record_line(&mut self) {
        self.lines_seen += 1;
    }

    pub fn record_blank(&mut self) {
        self.blank_lines += 1;
        counter!(LINES_COUNTER, "kind" => "blank").increment(1);
    }

    pub fn record_malformed(&mut self) {
        self.malformed_lines += 1;
        counter!(LINES_COUNTER, "kind" => "malformed").increment(1);
    }

    pub fn record_preserved(&mut self) {
        self.records_written += 1;
        self.markers_preserved += 1;
        counter!(LINES_COUNTER, "kind" => "record").increment(1);
    }

    pub fn record_tagged(&mut self, band: DifficultyBand, scored: bool) {
        self.records_written += 1;
        match band {
            DifficultyBand::Easy => self.easy += 1,
            DifficultyBand::Medium => self.medium += 1,
            DifficultyBand::Hard => self.hard += 1,
        }
        if !scored {
            self.unscored_records += 1;
        }
        counter!(LINES_COUNTER, "kind" => "record").increment(1);
        counter!(TAGGED_COUNTER, "band" => band.as_str()).increment(1);
    }

    pub fn record_scoring_errors(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.scoring_errors += count as u64;
        counter!(SCORING_ERRORS_COUNTER).increment(count as u64);
    }

    /// Records tagged in `band` by this run
    pub fn band_count(&self, band: DifficultyBand) -> u64 {
        match band {
            DifficultyBand::Easy => self.easy,
            DifficultyBand::Medium => self.medium,
            DifficultyBand::Hard => self.hard,
        }
    }

    /// Records newly tagged by this run
    pub fn tagged_records(&self) -> u64 {
        self.easy + self.medium + self.hard
    }
}
