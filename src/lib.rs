//! Soundline - acoustic event timeline analysis CLI.
//!
//! Decodes audio files, slides a fixed-length window over the waveform,
//! classifies each window with an ONNX audio-classification model and
//! writes a per-file timeline report with summary statistics.

#![warn(missing_docs)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod timeline;

use clap::{CommandFactory, Parser};
use cli::{AnalyzeArgs, Cli, Command, ConfigAction};
use config::{
    config_file_path, load_default_config, save_default_config, validate_analysis, Config,
};
use inference::{EventClassifier, LabelResolver, OnnxBackend};
use output::progress;
use pipeline::{collect_input_files, process_file, ProcessOptions, ProcessOutcome};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for the soundline CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.analyze.verbose, cli.analyze.quiet);

    // Config subcommands must stay usable when the config file itself is
    // broken, so the file is only loaded for analysis runs.
    if let Some(command) = cli.command {
        return handle_command(command);
    }

    if cli.inputs.is_empty() {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    let config = load_default_config()?;
    analyze_files(&cli.inputs, &cli.analyze, &config)
}

/// Analyze input files with the given options.
fn analyze_files(inputs: &[PathBuf], args: &AnalyzeArgs, config: &Config) -> Result<()> {
    let total_start = Instant::now();

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidAudioFiles);
    }
    info!("Found {} audio file(s) to process", files.len());

    // Command line overrides config file values.
    let mut analysis = config.analysis.clone();
    if let Some(v) = args.segment_duration {
        analysis.segment_duration = v;
    }
    if let Some(v) = args.overlap {
        analysis.overlap = v;
    }
    if let Some(v) = args.top_k {
        analysis.top_k = v;
    }
    if let Some(v) = args.min_score {
        analysis.min_score = v;
    }
    if let Some(v) = args.top_events {
        analysis.top_events = v;
    }
    if args.pad_tail {
        analysis.pad_tail = true;
    }
    if args.no_normalize {
        analysis.normalize = false;
    }
    validate_analysis(&analysis)?;

    let model_path = args
        .model_path
        .clone()
        .or_else(|| config.model.path.clone())
        .ok_or(Error::NoModelConfigured)?;
    let model_sample_rate = args.sample_rate.unwrap_or_else(|| config.model.sample_rate());

    let labels = match args.labels.as_ref().or(config.model.labels.as_ref()) {
        Some(path) => {
            info!("Loading labels: {}", path.display());
            LabelResolver::from_file(path)?
        }
        None => {
            warn!("No labels file configured, falling back to built-in AudioSet labels");
            LabelResolver::empty()
        }
    };

    info!("Loading model: {}", model_path.display());
    let backend = OnnxBackend::from_file(&model_path)?;
    let mut classifier =
        EventClassifier::new(backend, labels, analysis.top_k, analysis.min_score)?;

    let model_name = model_path
        .file_name()
        .map_or_else(|| model_path.display().to_string(), |n| n.to_string_lossy().to_string());
    let format = args.format.unwrap_or_default();
    let time_budget = args.time_budget.map(Duration::from_secs_f32);

    let progress_enabled = !args.quiet && !args.no_progress;
    let file_progress = progress::create_file_progress(files.len(), progress_enabled);

    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut errors = 0usize;
    let mut total_segments = 0usize;

    for file in &files {
        let options = ProcessOptions {
            analysis: analysis.clone(),
            model_sample_rate,
            model_name: model_name.clone(),
            format,
            output_dir: args
                .output_dir
                .clone()
                .or_else(|| config.output.directory.clone()),
            force: args.force,
            deadline: time_budget.map(|budget| Instant::now() + budget),
            whole_clip: args.whole_clip,
            progress: progress_enabled,
        };

        match process_file(&mut classifier, file, &options) {
            Ok(ProcessOutcome::Written { path, analysis }) => {
                processed += 1;
                total_segments += analysis.summary.total_segments;
                info!(
                    "Wrote {} ({} segments, {} failed, {} skipped)",
                    path.display(),
                    analysis.summary.total_segments,
                    analysis.summary.failed_segments,
                    analysis.summary.skipped_segments
                );
            }
            Ok(ProcessOutcome::SkippedExisting) => skipped += 1,
            Err(e) => {
                error!("Failed to process {}: {}", file.display(), e);
                errors += 1;
                if args.fail_fast {
                    progress::finish_progress(file_progress, "Failed");
                    return Err(e);
                }
            }
        }
        progress::inc_progress(file_progress.as_ref());
    }

    progress::finish_progress(file_progress, "Complete");

    let total_duration = total_start.elapsed().as_secs_f64();
    info!(
        "Complete: {} processed, {} skipped, {} errors, {} segments in {:.2}s",
        processed, skipped, errors, total_segments, total_duration
    );

    if errors > 0 {
        warn!("{errors} file(s) had errors");
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    // ORT logging is noisy at startup; only surface it at -vvv.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    fmt().with_env_filter(filter).init();
}

fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
    }
}

fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nSet model.path and model.labels, then analyze:");
                println!("  soundline recording.wav");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
