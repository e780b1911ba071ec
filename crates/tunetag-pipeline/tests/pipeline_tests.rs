//! End-to-end runs of the two-pass tagging pipeline over real files

use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use tunetag_core::{Error, ThresholdPair};
use tunetag_pipeline::{ConfigOverrides, PipelineConfig, TaggingPipeline};

const EASY_TUNE: &str = "X:1\nK:C\nCDEC";
const HARD_TUNE: &str = "X:2\nQ:180\nM:7/8\nL:1/16\nK:F#m\n^f2_e3 ~g4 (3abc' ^c'6 _B,8 |: ~G2 TA3 ^D5 :|";

fn pipeline() -> TaggingPipeline {
    TaggingPipeline::new(PipelineConfig::default()).unwrap()
}

fn write_lines(path: &Path, lines: &[String]) {
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(path, content).unwrap();
}

fn read_records(path: &Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_blank_and_malformed_lines_are_dropped() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("train.jsonl");
    let destination = temp_dir.path().join("train_tagged.jsonl");
    write_lines(
        &source,
        &[
            json!({ "output": EASY_TUNE }).to_string(),
            String::new(),
            "{\"input\": \"unterminated".to_string(),
        ],
    );

    let report = pipeline().run(&source, &destination).unwrap();

    assert_eq!(report.stats.lines_seen, 3);
    assert_eq!(report.stats.blank_lines, 1);
    assert_eq!(report.stats.malformed_lines, 1);
    assert_eq!(report.stats.records_written, 1);
    assert_eq!(report.calibration.sample_size, 1);

    let records = read_records(&destination);
    assert_eq!(records.len(), 1);
    // A single sample makes both thresholds equal to its score
    assert_eq!(records[0]["input"], "<difficulty=easy> ");
    assert_eq!(records[0]["dataset"], "ABC Notation");
    assert_eq!(records[0]["task"], "cataloging");
    assert_eq!(records[0]["output"], EASY_TUNE);
    assert_eq!(
        report.summary(),
        format!(
            "Finished. Processed 3 lines, wrote 1 records to {}",
            destination.display()
        )
    );
}

#[test]
fn test_runs_are_byte_identical_and_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("train.jsonl");
    let first = temp_dir.path().join("first.jsonl");
    let second = temp_dir.path().join("second.jsonl");
    let retagged = temp_dir.path().join("retagged.jsonl");

    let lines: Vec<_> = (0..12)
        .map(|i| {
            let tune = if i % 2 == 0 { EASY_TUNE } else { HARD_TUNE };
            json!({ "input": format!("prompt {}", i), "output": tune, "id": i }).to_string()
        })
        .collect();
    write_lines(&source, &lines);

    let p = pipeline();
    p.run(&source, &first).unwrap();
    p.run(&source, &second).unwrap();
    let first_bytes = std::fs::read(&first).unwrap();
    assert_eq!(first_bytes, std::fs::read(&second).unwrap());

    // Every input already carries a marker, so nothing changes
    let report = p.run(&first, &retagged).unwrap();
    assert_eq!(report.stats.markers_preserved, 12);
    assert_eq!(report.stats.tagged_records(), 0);
    assert_eq!(first_bytes, std::fs::read(&retagged).unwrap());
}

#[test]
fn test_pass_through_numbers_are_byte_exact() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("train.jsonl");
    let destination = temp_dir.path().join("out.jsonl");
    std::fs::write(
        &source,
        "{\"input\":\"\",\"output\":\"K:C\\nCDE\",\"id\":123456789012345678901234567890,\"w\":1.50}\n",
    )
    .unwrap();

    pipeline().run(&source, &destination).unwrap();

    assert_eq!(
        std::fs::read_to_string(&destination).unwrap(),
        "{\"input\":\"<difficulty=easy> \",\"output\":\"K:C\\nCDE\",\"id\":123456789012345678901234567890,\"w\":1.50,\"dataset\":\"ABC Notation\",\"task\":\"cataloging\"}\n"
    );
}

#[test]
fn test_destination_truncated_between_runs() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("train.jsonl");
    let destination = temp_dir.path().join("out.jsonl");
    write_lines(&source, &[json!({ "output": EASY_TUNE }).to_string()]);
    std::fs::write(&destination, "old\nold\nold\n").unwrap();

    pipeline().run(&source, &destination).unwrap();

    assert_eq!(read_records(&destination).len(), 1);
}

#[test]
fn test_existing_metadata_and_markers_kept() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("train.jsonl");
    let destination = temp_dir.path().join("out.jsonl");
    write_lines(
        &source,
        &[
            json!({
                "input": "<difficulty=hard> Write a jig",
                "output": EASY_TUNE,
                "task": "generation",
                "dataset": "Nottingham",
            })
            .to_string(),
            json!({ "input": "", "output": HARD_TUNE, "label": "segmentation" }).to_string(),
        ],
    );

    let report = pipeline().run(&source, &destination).unwrap();
    let records = read_records(&destination);

    assert_eq!(report.stats.markers_preserved, 1);
    assert_eq!(records[0]["input"], "<difficulty=hard> Write a jig");
    assert_eq!(records[0]["task"], "generation");
    assert_eq!(records[0]["dataset"], "Nottingham");
    assert_eq!(records[1]["task"], "segmentation");
    assert!(records[1]["input"].as_str().unwrap().starts_with("<difficulty="));
}

#[test]
fn test_empty_source_uses_fallback_thresholds() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("train.jsonl");
    let destination = temp_dir.path().join("out.jsonl");
    write_lines(
        &source,
        &[json!({ "input": "12", "output": "" }).to_string(), "[1, 2]".to_string()],
    );

    let report = pipeline().run(&source, &destination).unwrap();

    assert!(report.calibration.used_fallback);
    assert_eq!(report.calibration.thresholds, ThresholdPair::FALLBACK);
    assert_eq!(report.stats.unscored_records, 1);
    assert_eq!(report.stats.malformed_lines, 1);
    assert_eq!(read_records(&destination)[0]["input"], "<difficulty=medium> 12");
}

#[test]
fn test_configured_dataset_name() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("train.jsonl");
    let destination = temp_dir.path().join("out.jsonl");
    write_lines(&source, &[json!({ "output": EASY_TUNE }).to_string()]);

    let overrides = ConfigOverrides {
        dataset_default: Some("Folk Corpus".to_string()),
        ..Default::default()
    };
    let config = PipelineConfig::load(temp_dir.path().join("absent.yaml"), &overrides).unwrap();
    TaggingPipeline::new(config)
        .unwrap()
        .run(&source, &destination)
        .unwrap();

    assert_eq!(read_records(&destination)[0]["dataset"], "Folk Corpus");
}

#[test]
fn test_missing_source_is_unreadable() {
    let temp_dir = TempDir::new().unwrap();
    let result = pipeline().run(
        &temp_dir.path().join("missing.jsonl"),
        &temp_dir.path().join("out.jsonl"),
    );

    assert!(matches!(result, Err(Error::SourceUnreadable { .. })));
    assert!(!temp_dir.path().join("out.jsonl").exists());
}

#[test]
fn test_destination_must_differ_from_source() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("train.jsonl");
    write_lines(&source, &[json!({ "output": EASY_TUNE }).to_string()]);
    let before = std::fs::read(&source).unwrap();

    let result = pipeline().run(&source, &source);

    assert!(matches!(result, Err(Error::Config(_))));
    assert_eq!(std::fs::read(&source).unwrap(), before);
}

#[test]
fn test_unwritable_destination() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("train.jsonl");
    write_lines(&source, &[json!({ "output": EASY_TUNE }).to_string()]);

    let result = pipeline().run(&source, &temp_dir.path().join("no_dir").join("out.jsonl"));

    assert!(matches!(result, Err(Error::DestinationUnwritable { .. })));
}
