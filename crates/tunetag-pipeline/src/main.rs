//! tunetag
//!
//! Calibrates easy/medium/hard thresholds on a JSONL dataset of ABC notation
//! records and writes a tagged copy with a difficulty marker on every input.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::info;
use tunetag_pipeline::{read_latest, stats, ConfigOverrides, PipelineConfig, TaggingPipeline};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    stats::describe_metrics();

    match cli.command {
        Commands::Tag {
            input,
            output,
            scoring,
            dataset_name,
        } => {
            let pipeline = build_pipeline(&cli.config, &scoring.overrides(dataset_name))?;
            let report = pipeline
                .run(&input, &output)
                .with_context(|| format!("Failed to tag {}", input.display()))?;
            println!("{}", report.summary());
        }
        Commands::Calibrate { input, scoring } => {
            let pipeline = build_pipeline(&cli.config, &scoring.overrides(None))?;
            let calibration = pipeline
                .calibrate_source(&input)
                .with_context(|| format!("Failed to calibrate on {}", input.display()))?;
            println!("{}", serde_json::to_string_pretty(&calibration)?);
        }
        Commands::Latest { dir } => {
            let response = read_latest(&dir)?;
            println!("{}", serde_json::to_string(&response)?);
        }
    }

    Ok(())
}

fn build_pipeline(config_path: &Path, overrides: &ConfigOverrides) -> Result<TaggingPipeline> {
    let config = PipelineConfig::load(config_path, overrides)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    info!(
        "Combining with {} (w_in={}, w_out={})",
        config.scoring.combine.method,
        config.scoring.combine.input_weight,
        config.scoring.combine.output_weight
    );
    Ok(TaggingPipeline::new(config)?)
}

/// Logs go to stderr so stdout carries only the command's result
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("tunetag=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tunetag=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
