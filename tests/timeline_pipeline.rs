//! End-to-end pipeline tests over real WAV files with a stub backend.

use soundline::audio::{decode_audio, normalize_peak, resample};
use soundline::config::AnalysisConfig;
use soundline::error::Result;
use soundline::inference::{EventClassifier, LabelResolver, ScoreBackend};
use soundline::pipeline::{analyze_samples, AnalyzeOptions};
use std::path::Path;

/// Scores class 0 high for loud windows and class 1 for quiet ones.
struct LoudnessBackend;

impl ScoreBackend for LoudnessBackend {
    fn scores(&mut self, window: &[f32]) -> Result<Vec<f32>> {
        let energy: f32 = window.iter().map(|s| s * s).sum::<f32>() / window.len() as f32;
        if energy > 0.01 {
            Ok(vec![0.9, 0.1])
        } else {
            Ok(vec![0.2, 0.8])
        }
    }
}

fn write_wav(path: &Path, sample_rate: u32, samples: &[f32]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer
            .write_sample((s.clamp(-1.0, 1.0) * 32767.0) as i16)
            .unwrap();
    }
    writer.finalize().unwrap();
}

fn classifier() -> EventClassifier<LoudnessBackend> {
    let labels = LabelResolver::from_table(vec!["Loud".into(), "Quiet".into()]);
    EventClassifier::new(LoudnessBackend, labels, 1, 0.0).unwrap()
}

fn default_options() -> AnalyzeOptions {
    AnalyzeOptions {
        analysis: AnalysisConfig {
            normalize: false,
            ..AnalysisConfig::default()
        },
        deadline: None,
        whole_clip: false,
        progress: false,
    }
}

#[test]
fn decode_segment_classify_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("clip.wav");

    // 3.2 seconds at 16 kHz: loud first half, quiet second half.
    let samples: Vec<f32> = (0..51_200)
        .map(|i| {
            let tone = (i as f32 * 0.2).sin();
            if i < 25_600 { tone * 0.8 } else { tone * 0.01 }
        })
        .collect();
    write_wav(&wav, 16_000, &samples);

    let decoded = decode_audio(&wav).unwrap();
    assert_eq!(decoded.sample_rate, 16_000);
    assert_eq!(decoded.channels, 1);
    assert!((decoded.duration_secs - 3.2).abs() < 0.01);

    let mut clf = classifier();
    let analysis = analyze_samples(&mut clf, &decoded.samples, 16_000, &default_options()).unwrap();

    // 1.0s windows at 50% overlap over 3.2s: 5 windows.
    assert_eq!(analysis.timeline.len(), 5);
    assert_eq!(analysis.summary.total_segments, 5);
    assert_eq!(analysis.summary.failed_segments, 0);

    // The first windows land in the loud half, the last in the quiet half.
    assert_eq!(analysis.timeline[0].events[0].label, "Loud");
    assert_eq!(analysis.timeline[4].events[0].label, "Quiet");

    // Times advance by the hop.
    let times: Vec<f32> = analysis.timeline.iter().map(|e| e.time).collect();
    assert_eq!(times, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
}

#[test]
fn resampled_input_produces_expected_window_count() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("clip48k.wav");

    // 2 seconds at 48 kHz.
    let samples: Vec<f32> = (0..96_000).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
    write_wav(&wav, 48_000, &samples);

    let decoded = decode_audio(&wav).unwrap();
    let mut mono = resample(decoded.samples, decoded.sample_rate, 16_000).unwrap();
    normalize_peak(&mut mono);

    // Roughly 2 seconds at 16 kHz after conversion.
    assert!(mono.len() > 31_000 && mono.len() < 33_000);
    let peak = mono.iter().fold(0.0f32, |a, &s| a.max(s.abs()));
    assert!((peak - 1.0).abs() < 1e-6);

    // Pin the length so the expected window count is exact.
    mono.resize(32_000, 0.0);
    let mut clf = classifier();
    let analysis = analyze_samples(&mut clf, &mono, 16_000, &default_options()).unwrap();
    assert_eq!(analysis.timeline.len(), 3);
}

#[test]
fn repeated_analysis_gives_equal_timelines() {
    // Same waveform and options twice through the same classifier.
    let samples: Vec<f32> = (0..51_200)
        .map(|i| {
            let tone = (i as f32 * 0.13).sin();
            if i < 25_600 { tone * 0.6 } else { tone * 0.005 }
        })
        .collect();

    let mut clf = classifier();
    let opts = default_options();
    let first = analyze_samples(&mut clf, &samples, 16_000, &opts).unwrap();
    let second = analyze_samples(&mut clf, &samples, 16_000, &opts).unwrap();

    assert_eq!(first.timeline.len(), second.timeline.len());
    for (a, b) in first.timeline.iter().zip(&second.timeline) {
        assert_eq!(a.time, b.time);
        assert_eq!(a.events.len(), b.events.len());
        for (x, y) in a.events.iter().zip(&b.events) {
            assert_eq!(x.label, y.label);
            assert!((x.score - y.score).abs() <= 1e-3, "{} vs {}", x.score, y.score);
        }
    }
    assert_eq!(
        first.summary.total_segments,
        second.summary.total_segments
    );
}

#[test]
fn summary_counts_match_timeline() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("quiet.wav");

    let samples: Vec<f32> = (0..32_000).map(|i| (i as f32 * 0.1).sin() * 0.005).collect();
    write_wav(&wav, 16_000, &samples);

    let decoded = decode_audio(&wav).unwrap();
    let mut clf = classifier();
    let analysis = analyze_samples(&mut clf, &decoded.samples, 16_000, &default_options()).unwrap();

    assert_eq!(analysis.timeline.len(), 3);
    let top = &analysis.summary.most_common_events;
    assert_eq!(top[0].label, "Quiet");
    assert_eq!(top[0].occurrences, 3);
    assert!(top[0].average_score > 0.7);
}
