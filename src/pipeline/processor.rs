//! Per-file analysis: decode, prepare, classify, aggregate, write.

use crate::audio::{decode_audio, normalize_peak, resample, Segmenter, TailPolicy};
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::inference::{EventClassifier, ScoreBackend};
use crate::output::progress;
use crate::output::{write_csv, write_json, AudioInfo, OutputFormat, TimelineReport};
use crate::pipeline::{output_dir_for, output_path_for, should_process};
use crate::timeline::{Aggregator, Analysis};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Options controlling a single analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Segmentation and ranking settings.
    pub analysis: AnalysisConfig,
    /// Stop classifying new windows once this instant passes. Windows
    /// never attempted are reported as skipped in the summary.
    pub deadline: Option<Instant>,
    /// Classify the entire clip as one window instead of segmenting.
    pub whole_clip: bool,
    /// Show a per-window progress bar.
    pub progress: bool,
}

/// Options for processing one file end to end.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Analysis settings shared with [`AnalyzeOptions`].
    pub analysis: AnalysisConfig,
    /// Sample rate the model expects, in Hz.
    pub model_sample_rate: u32,
    /// Model name recorded in the report.
    pub model_name: String,
    /// Result file format.
    pub format: OutputFormat,
    /// Output directory (None = same as input).
    pub output_dir: Option<PathBuf>,
    /// Overwrite existing result files.
    pub force: bool,
    /// Per-file deadline.
    pub deadline: Option<Instant>,
    /// Whole-clip mode.
    pub whole_clip: bool,
    /// Show per-window progress bars.
    pub progress: bool,
}

/// Outcome of processing one file.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// Analysis ran and the result file was written.
    Written {
        /// Path of the result file.
        path: PathBuf,
        /// The analysis, for logging at the call site.
        analysis: Analysis,
    },
    /// Output already existed and `force` was not set.
    SkippedExisting,
}

/// Run timeline analysis over prepared mono samples.
///
/// Window inference failures never abort the run: the window keeps an
/// empty timeline entry and the failure is counted in the summary.
/// Samples shorter than one window produce an empty analysis.
pub fn analyze_samples<B: ScoreBackend>(
    classifier: &mut EventClassifier<B>,
    samples: &[f32],
    sample_rate: u32,
    options: &AnalyzeOptions,
) -> Result<Analysis> {
    if options.whole_clip {
        return analyze_whole_clip(classifier, samples, sample_rate, options);
    }

    let tail = if options.analysis.pad_tail {
        TailPolicy::ZeroPad
    } else {
        TailPolicy::Drop
    };
    let segmenter = Segmenter::new(
        sample_rate,
        options.analysis.segment_duration,
        options.analysis.overlap,
        tail,
    )?;

    let total = segmenter.window_count(samples.len());
    debug!(
        windows = total,
        segment_len = segmenter.segment_len(),
        hop_len = segmenter.hop_len(),
        "segmented input"
    );

    let mut aggregator = Aggregator::new(
        options.analysis.segment_duration,
        options.analysis.overlap,
        options.analysis.top_events,
    );

    let bar = progress::create_segment_progress(total, options.progress);

    for window in segmenter.windows(samples) {
        if let Some(deadline) = options.deadline {
            if Instant::now() >= deadline {
                let remaining = total - aggregator.len();
                warn!(skipped = remaining, "deadline reached, skipping remaining windows");
                aggregator.mark_skipped(remaining);
                break;
            }
        }

        let time = segmenter.offset_secs(window.start);
        match classifier.classify(&window.samples) {
            Ok(events) => aggregator.push(time, events),
            Err(e) => {
                warn!(time, error = %e, "window inference failed");
                aggregator.push_failed(time);
            }
        }
        progress::inc_progress(bar.as_ref());
    }

    progress::clear_progress(bar);
    Ok(aggregator.finish())
}

/// Classify the full clip as a single window.
fn analyze_whole_clip<B: ScoreBackend>(
    classifier: &mut EventClassifier<B>,
    samples: &[f32],
    sample_rate: u32,
    options: &AnalyzeOptions,
) -> Result<Analysis> {
    #[allow(clippy::cast_precision_loss)]
    let duration = samples.len() as f32 / sample_rate as f32;

    let mut aggregator = Aggregator::new(duration, 0.0, options.analysis.top_events);
    match classifier.classify(samples) {
        Ok(events) => aggregator.push(0.0, events),
        Err(e) => {
            warn!(error = %e, "whole-clip inference failed");
            aggregator.push_failed(0.0);
        }
    }
    Ok(aggregator.finish())
}

/// Process one audio file: decode, resample, normalize, analyze, write.
pub fn process_file<B: ScoreBackend>(
    classifier: &mut EventClassifier<B>,
    input: &Path,
    options: &ProcessOptions,
) -> Result<ProcessOutcome> {
    let output_dir = output_dir_for(input, options.output_dir.as_deref());
    std::fs::create_dir_all(&output_dir).map_err(|e| Error::OutputDirCreate {
        path: output_dir.clone(),
        source: e,
    })?;

    if !should_process(input, &output_dir, options.format, options.force) {
        info!("Skipping {} (output exists)", input.display());
        return Ok(ProcessOutcome::SkippedExisting);
    }

    let decoded = decode_audio(input)?;
    debug!(
        sample_rate = decoded.sample_rate,
        channels = decoded.channels,
        duration = decoded.duration_secs,
        "decoded {}",
        input.display()
    );

    let mut samples = resample(
        decoded.samples,
        decoded.sample_rate,
        options.model_sample_rate,
    )?;
    if options.analysis.normalize {
        normalize_peak(&mut samples);
    }

    let analyze_options = AnalyzeOptions {
        analysis: options.analysis.clone(),
        deadline: options.deadline,
        whole_clip: options.whole_clip,
        progress: options.progress,
    };
    let analysis = analyze_samples(
        classifier,
        &samples,
        options.model_sample_rate,
        &analyze_options,
    )?;

    let filename = input
        .file_name()
        .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().to_string());

    let path = output_path_for(input, &output_dir, options.format);
    match options.format {
        OutputFormat::Json => {
            let report = TimelineReport {
                source_file: filename.clone(),
                analysis_date: Utc::now(),
                model: options.model_name.clone(),
                audio_info: AudioInfo {
                    filename,
                    duration_seconds: round2(decoded.duration_secs),
                    sample_rate: decoded.sample_rate,
                    channels: decoded.channels,
                },
                timeline: analysis.timeline.clone(),
                summary: analysis.summary.clone(),
            };
            write_json(&path, &report)?;
        }
        OutputFormat::Csv => {
            write_csv(&path, &filename, &analysis.timeline)?;
        }
    }

    Ok(ProcessOutcome::Written { path, analysis })
}

#[allow(clippy::cast_possible_truncation)]
fn round2(value: f32) -> f32 {
    ((f64::from(value) * 100.0).round() / 100.0) as f32
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::inference::LabelResolver;
    use std::time::Duration;

    struct FixedScores(Vec<f32>);

    impl ScoreBackend for FixedScores {
        fn scores(&mut self, _window: &[f32]) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    /// Fails on every call after the first `ok_calls`.
    struct FlakyBackend {
        ok_calls: usize,
        calls: usize,
    }

    impl ScoreBackend for FlakyBackend {
        fn scores(&mut self, _window: &[f32]) -> Result<Vec<f32>> {
            self.calls += 1;
            if self.calls <= self.ok_calls {
                Ok(vec![0.9, 0.1])
            } else {
                Err(Error::Inference {
                    reason: "simulated failure".to_string(),
                })
            }
        }
    }

    fn classifier<B: ScoreBackend>(backend: B) -> EventClassifier<B> {
        let labels = LabelResolver::from_table(vec!["Speech".into(), "Music".into()]);
        EventClassifier::new(backend, labels, 2, 0.0).unwrap()
    }

    fn options() -> AnalyzeOptions {
        AnalyzeOptions {
            analysis: AnalysisConfig::default(),
            deadline: None,
            whole_clip: false,
            progress: false,
        }
    }

    #[test]
    fn window_count_matches_timeline_entries() {
        // 3.2s at 16kHz with 1.0s windows at 50% overlap: 5 windows.
        let samples = vec![0.1; 51_200];
        let mut clf = classifier(FixedScores(vec![0.7, 0.3]));
        let analysis = analyze_samples(&mut clf, &samples, 16_000, &options()).unwrap();
        assert_eq!(analysis.timeline.len(), 5);
        assert_eq!(analysis.summary.total_segments, 5);
        assert_eq!(analysis.summary.failed_segments, 0);
        assert_eq!(analysis.timeline[1].time, 0.5);
        assert_eq!(analysis.summary.most_common_events[0].label, "Speech");
        assert_eq!(analysis.summary.most_common_events[0].occurrences, 5);
    }

    #[test]
    fn short_clip_yields_empty_analysis() {
        let samples = vec![0.1; 1_000];
        let mut clf = classifier(FixedScores(vec![0.7, 0.3]));
        let analysis = analyze_samples(&mut clf, &samples, 16_000, &options()).unwrap();
        assert!(analysis.timeline.is_empty());
        assert_eq!(analysis.summary.total_segments, 0);
    }

    #[test]
    fn window_failures_do_not_abort() {
        let samples = vec![0.1; 51_200];
        let mut clf = classifier(FlakyBackend {
            ok_calls: 2,
            calls: 0,
        });
        let analysis = analyze_samples(&mut clf, &samples, 16_000, &options()).unwrap();
        assert_eq!(analysis.summary.total_segments, 5);
        assert_eq!(analysis.summary.failed_segments, 3);
        assert!(analysis.timeline[0].events.len() == 2);
        assert!(analysis.timeline[2].events.is_empty());
    }

    #[test]
    fn past_deadline_skips_all_windows() {
        let samples = vec![0.1; 51_200];
        let mut clf = classifier(FixedScores(vec![0.7, 0.3]));
        let mut opts = options();
        opts.deadline = Some(Instant::now() - Duration::from_secs(1));
        let analysis = analyze_samples(&mut clf, &samples, 16_000, &opts).unwrap();
        assert_eq!(analysis.summary.total_segments, 0);
        assert_eq!(analysis.summary.skipped_segments, 5);
    }

    #[test]
    fn whole_clip_is_one_entry() {
        let samples = vec![0.1; 32_000];
        let mut clf = classifier(FixedScores(vec![0.7, 0.3]));
        let mut opts = options();
        opts.whole_clip = true;
        let analysis = analyze_samples(&mut clf, &samples, 16_000, &opts).unwrap();
        assert_eq!(analysis.timeline.len(), 1);
        assert_eq!(analysis.timeline[0].time, 0.0);
        assert_eq!(analysis.summary.segment_duration, 2.0);
    }

    #[test]
    fn pad_tail_adds_a_window() {
        let samples = vec![0.1; 20_000];
        let mut clf = classifier(FixedScores(vec![0.7, 0.3]));
        let mut opts = options();
        opts.analysis.overlap = 0.0;
        let dropped = analyze_samples(&mut clf, &samples, 16_000, &opts).unwrap();
        assert_eq!(dropped.timeline.len(), 1);

        opts.analysis.pad_tail = true;
        let padded = analyze_samples(&mut clf, &samples, 16_000, &opts).unwrap();
        assert_eq!(padded.timeline.len(), 2);
        assert_eq!(padded.timeline[1].time, 1.0);
    }

    #[test]
    fn segment_progress_leaves_results_unchanged() {
        let samples = vec![0.1; 51_200];
        let mut clf = classifier(FixedScores(vec![0.7, 0.3]));
        let mut opts = options();
        opts.progress = true;
        let analysis = analyze_samples(&mut clf, &samples, 16_000, &opts).unwrap();
        assert_eq!(analysis.timeline.len(), 5);
        assert_eq!(analysis.summary.failed_segments, 0);
    }

    #[test]
    fn invalid_overlap_is_rejected() {
        let samples = vec![0.1; 32_000];
        let mut clf = classifier(FixedScores(vec![0.7, 0.3]));
        let mut opts = options();
        opts.analysis.overlap = 1.0;
        assert!(matches!(
            analyze_samples(&mut clf, &samples, 16_000, &opts),
            Err(Error::InvalidConfiguration { .. })
        ));
    }
}
