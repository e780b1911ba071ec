//! Two-pass calibrate-then-tag orchestration
//!
//! Pass one reads a bounded sample of the source and learns thresholds.
//! Pass two reopens the source from the beginning and streams every record
//! through normalization and tagging into the destination. Records are
//! never held in memory beyond the line being processed.

use crate::config::PipelineConfig;
use crate::stats::PipelineStats;
use crate::writer::JsonlWriter;
use serde::Serialize;
use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tunetag_core::{DatasetLine, DatasetLines, DifficultyBand, Error, Record, Result, ThresholdPair};
use tunetag_scoring::{
    prepend_marker, tag, Calibration, Calibrator, DifficultyScorer, TaskInferencer,
};

/// Lines between progress messages
pub const PROGRESS_INTERVAL: u64 = 10_000;

/// How a record's difficulty marker was decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tagging {
    /// The input already carried a marker and was left alone
    Preserved { band: DifficultyBand },
    /// A marker was prepended from the combined score
    Assigned {
        band: DifficultyBand,
        score: Option<f64>,
    },
}

/// A normalized record ready to be written
#[derive(Debug)]
pub struct TaggedRecord {
    pub record: Record,
    pub tagging: Tagging,
    /// Sides that could not be scored; the record is still written
    pub scoring_errors: Vec<Error>,
}

/// Result of processing one source line
#[derive(Debug)]
pub enum LineOutcome {
    Blank,
    Malformed(Error),
    Record(TaggedRecord),
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub calibration: Calibration,
    pub stats: PipelineStats,
    pub destination: PathBuf,
}

impl PipelineReport {
    pub fn summary(&self) -> String {
        format!(
            "Finished. Processed {} lines, wrote {} records to {}",
            self.stats.lines_seen,
            self.stats.records_written,
            self.destination.display()
        )
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Calibrates thresholds on a source and writes a tagged copy of it
pub struct TaggingPipeline {
    config: PipelineConfig,
    scorer: DifficultyScorer,
    inferencer: TaskInferencer,
}

impl TaggingPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scorer: DifficultyScorer::new(config.scoring.weights)?,
            inferencer: TaskInferencer::new()?,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// First pass: learn thresholds from a bounded sample of `source`
    pub fn calibrate_source(&self, source: &Path) -> Result<Calibration> {
        info!(
            "Auto-calibrating from {} (sampling up to {})",
            source.display(),
            match self.config.scoring.calibration.sample_limit {
                0 => "all".to_string(),
                limit => limit.to_string(),
            }
        );

        let reader = open_source(source)?;
        Calibrator::new(
            &self.scorer,
            self.config.scoring.combine,
            self.config.scoring.calibration,
        )
        .calibrate(reader)
        .map_err(|e| Error::source_unreadable(source, e))
    }

    /// Calibrate on `source`, then write every record of it, tagged, to
    /// `destination`.
    pub fn run(&self, source: &Path, destination: &Path) -> Result<PipelineReport> {
        ensure_distinct(source, destination)?;

        let calibration = self.calibrate_source(source)?;
        let thresholds = calibration.thresholds;

        let reader = open_source(source)?;
        let mut writer = JsonlWriter::create(destination)?;
        let mut stats = PipelineStats::default();

        info!("Tagging {} into {}", source.display(), destination.display());

        for line in DatasetLines::new(reader) {
            let line = line.map_err(|e| Error::source_unreadable(source, e))?;
            stats.record_line();

            match self.process_line(&line, &thresholds) {
                LineOutcome::Blank => stats.record_blank(),
                LineOutcome::Malformed(e) => {
                    debug!("Skipping line {}: {}", stats.lines_seen, e);
                    stats.record_malformed();
                }
                LineOutcome::Record(tagged) => {
                    for e in &tagged.scoring_errors {
                        debug!("Line {}: {}", stats.lines_seen, e);
                    }
                    stats.record_scoring_errors(tagged.scoring_errors.len());

                    writer.write_record(&tagged.record)?;
                    match tagged.tagging {
                        Tagging::Preserved { band } => {
                            debug!("Line {}: keeping existing {} marker", stats.lines_seen, band);
                            stats.record_preserved()
                        }
                        Tagging::Assigned { band, score } => {
                            stats.record_tagged(band, score.is_some())
                        }
                    }
                }
            }

            if stats.lines_seen % PROGRESS_INTERVAL == 0 {
                debug!(
                    "Processed {} lines, wrote {} records",
                    stats.lines_seen, stats.records_written
                );
            }
        }

        let bytes_written = writer.bytes_written();
        writer.finish()?;

        if stats.malformed_lines > 0 {
            warn!("Skipped {} malformed lines", stats.malformed_lines);
        }
        if stats.records_written == 0 && stats.lines_seen > stats.blank_lines {
            warn!("No records written from {}", source.display());
        }

        let report = PipelineReport {
            calibration,
            stats,
            destination: destination.to_path_buf(),
        };
        info!(
            easy = report.stats.easy,
            medium = report.stats.medium,
            hard = report.stats.hard,
            preserved = report.stats.markers_preserved,
            bytes = bytes_written,
            "{}",
            report.summary()
        );
        Ok(report)
    }

    /// Decode and tag one source line
    pub fn process_line(&self, line: &DatasetLine, thresholds: &ThresholdPair) -> LineOutcome {
        let text = match line {
            _ if line.is_blank() => return LineOutcome::Blank,
            DatasetLine::Text(text) => text,
            DatasetLine::InvalidUtf8 => {
                return LineOutcome::Malformed(Error::parse("line is not valid UTF-8"))
            }
        };

        match Record::from_json_line(text) {
            Ok(record) => LineOutcome::Record(self.tag_record(record, thresholds)),
            Err(e) => LineOutcome::Malformed(e),
        }
    }

    /// Fill missing metadata and give the record a difficulty marker.
    ///
    /// A record whose input already carries a marker keeps its input as is.
    /// A truthy non-string input is marked in its JSON text form.
    pub fn tag_record(&self, mut record: Record, thresholds: &ThresholdPair) -> TaggedRecord {
        if !record.has_truthy("dataset") {
            record.insert("dataset", self.config.dataset_default.clone());
        }

        if !record.has_truthy("task") {
            let task = self
                .inferencer
                .infer(&record, record.text_or_empty("output"));
            record.insert("task", task);
        }

        let input = if record.has_truthy("input") {
            record.display_text("input").unwrap_or_default()
        } else {
            String::new()
        };

        let (tagging, scoring_errors) = match self.scorer.detector().find_marker(&input) {
            Some(band) => (Tagging::Preserved { band }, Vec::new()),
            None => {
                let sides = self.scorer.score_record(&record);
                let (score_in, score_out) = sides.resolved();
                let score = self.config.scoring.combine.combine(score_in, score_out);
                let band = tag(score, thresholds);
                record.insert("input", prepend_marker(band, &input));
                (Tagging::Assigned { band, score }, sides.into_errors())
            }
        };

        if !record.has_truthy("output") {
            record.insert("output", "");
        }

        TaggedRecord {
            record,
            tagging,
            scoring_errors,
        }
    }
}

fn open_source(source: &Path) -> Result<BufReader<File>> {
    let file = File::open(source).map_err(|e| Error::source_unreadable(source, e))?;
    Ok(BufReader::new(file))
}

/// Refuse to write over the file being read
fn ensure_distinct(source: &Path, destination: &Path) -> Result<()> {
    let source = fs::canonicalize(source).map_err(|e| Error::source_unreadable(source, e))?;
    match fs::canonicalize(destination) {
        Ok(destination) if destination == source => Err(Error::config(format!(
            "destination {} is the same file as the source",
            destination.display()
        ))),
        _ => Ok(()),
    }
}
