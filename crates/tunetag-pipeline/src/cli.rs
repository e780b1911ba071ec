use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tunetag_pipeline::ConfigOverrides;
use tunetag_scoring::CombineMethod;

#[derive(Parser, Debug)]
#[command(name = "tunetag")]
#[command(
    author,
    version,
    about = "Difficulty tagging for ABC notation training data"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        env = "TUNETAG_CONFIG",
        default_value = "tunetag.yaml"
    )]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Calibrate thresholds and write a tagged copy of the dataset
    Tag {
        /// Source JSONL dataset
        #[arg(short, long, default_value = "train.jsonl")]
        input: PathBuf,

        /// Destination for the tagged dataset
        #[arg(short, long, default_value = "train_tagged.jsonl")]
        output: PathBuf,

        #[command(flatten)]
        scoring: ScoringArgs,

        /// Dataset name for records that lack one
        #[arg(long)]
        dataset_name: Option<String>,
    },

    /// Run calibration only and print the learned thresholds as JSON
    Calibrate {
        /// Source JSONL dataset
        #[arg(short, long, default_value = "train.jsonl")]
        input: PathBuf,

        #[command(flatten)]
        scoring: ScoringArgs,
    },

    /// Print the newest generated .abc file as a JSON response
    Latest {
        /// Directory holding generated tunes
        #[arg(short, long, default_value = "output_tunes")]
        dir: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct ScoringArgs {
    /// Number of combined scores to sample for calibration (0 = all)
    #[arg(long)]
    pub sample_calib: Option<usize>,

    /// How input and output scores are merged
    #[arg(long, value_parser = ["max", "avg", "weighted"])]
    pub combine_method: Option<String>,

    /// Input weight for the weighted method
    #[arg(long)]
    pub w_input: Option<f64>,

    /// Output weight for the weighted method
    #[arg(long)]
    pub w_output: Option<f64>,
}

impl ScoringArgs {
    pub fn overrides(&self, dataset_name: Option<String>) -> ConfigOverrides {
        ConfigOverrides {
            sample_limit: self.sample_calib,
            combine_method: self.combine_method.as_deref().map(CombineMethod::from),
            input_weight: self.w_input,
            output_weight: self.w_output,
            dataset_default: dataset_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_defaults() {
        let cli = Cli::try_parse_from(["tunetag", "tag"]).unwrap();
        match cli.command {
            Commands::Tag {
                input,
                output,
                scoring,
                dataset_name,
            } => {
                assert_eq!(input, PathBuf::from("train.jsonl"));
                assert_eq!(output, PathBuf::from("train_tagged.jsonl"));
                assert!(scoring.sample_calib.is_none());
                assert!(dataset_name.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_scoring_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "tunetag",
            "tag",
            "--sample-calib",
            "50",
            "--combine-method",
            "weighted",
            "--w-input",
            "0.25",
            "--dataset-name",
            "Folk",
        ])
        .unwrap();

        let Commands::Tag {
            scoring,
            dataset_name,
            ..
        } = cli.command
        else {
            panic!("expected tag");
        };
        let overrides = scoring.overrides(dataset_name);

        assert_eq!(overrides.sample_limit, Some(50));
        assert_eq!(overrides.combine_method, Some(CombineMethod::Weighted));
        assert_eq!(overrides.input_weight, Some(0.25));
        assert_eq!(overrides.output_weight, None);
        assert_eq!(overrides.dataset_default.as_deref(), Some("Folk"));
    }

    #[test]
    fn test_unknown_method_rejected() {
        let result = Cli::try_parse_from(["tunetag", "tag", "--combine-method", "median"]);
        assert!(result.is_err());
    }
}
