//! CLI argument definitions.

use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Acoustic event timeline analysis for audio files.
#[derive(Debug, Parser)]
#[command(name = "soundline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input files or directories to analyze.
    pub inputs: Vec<PathBuf>,

    /// Common options for analysis.
    #[command(flatten)]
    pub analyze: AnalyzeArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the analyze command.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Path to ONNX model file (overrides config).
    #[arg(short = 'm', long, env = "SOUNDLINE_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Path to labels file, one label per line in model output order.
    #[arg(long, env = "SOUNDLINE_LABELS")]
    pub labels: Option<PathBuf>,

    /// Sample rate the model expects, in Hz.
    #[arg(long, env = "SOUNDLINE_SAMPLE_RATE")]
    pub sample_rate: Option<u32>,

    /// Window length in seconds.
    #[arg(short = 'd', long, env = "SOUNDLINE_SEGMENT_DURATION")]
    pub segment_duration: Option<f32>,

    /// Window overlap as a fraction of the window length (0.0 to <1.0).
    #[arg(long, value_parser = parse_overlap, env = "SOUNDLINE_OVERLAP")]
    pub overlap: Option<f32>,

    /// Predictions kept per window.
    #[arg(short = 'k', long, env = "SOUNDLINE_TOP_K")]
    pub top_k: Option<usize>,

    /// Minimum score for a prediction to appear (0.0-1.0).
    #[arg(long, value_parser = parse_score, env = "SOUNDLINE_MIN_SCORE")]
    pub min_score: Option<f32>,

    /// Entries in the most-common-events summary.
    #[arg(long, env = "SOUNDLINE_TOP_EVENTS")]
    pub top_events: Option<usize>,

    /// Zero-pad and analyze the partial tail window instead of dropping it.
    #[arg(long)]
    pub pad_tail: bool,

    /// Skip peak normalization before analysis.
    #[arg(long)]
    pub no_normalize: bool,

    /// Classify each file as a single clip instead of a timeline.
    #[arg(long)]
    pub whole_clip: bool,

    /// Per-file time budget in seconds; remaining windows are skipped.
    #[arg(long, env = "SOUNDLINE_TIME_BUDGET")]
    pub time_budget: Option<f32>,

    /// Output format.
    #[arg(short, long, value_enum, env = "SOUNDLINE_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output directory (default: same as input).
    #[arg(short, long, env = "SOUNDLINE_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Reprocess files even if output exists.
    #[arg(long)]
    pub force: bool,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace, -vvv: trace with ORT).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable the progress bar without changing log levels.
    #[arg(long)]
    pub no_progress: bool,
}

/// Parse and validate an overlap fraction.
fn parse_overlap(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(0.0..1.0).contains(&value) {
        return Err(format!(
            "overlap must be at least 0.0 and below 1.0, got {value}"
        ));
    }

    Ok(value)
}

/// Parse and validate a score threshold.
fn parse_score(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(format!("score must be between 0.0 and 1.0, got {value}"));
    }

    Ok(value)
}
