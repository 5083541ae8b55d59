//! Configuration type definitions.

use crate::constants::{
    DEFAULT_MODEL_SAMPLE_RATE, DEFAULT_OVERLAP, DEFAULT_SEGMENT_DURATION, DEFAULT_TOP_EVENTS,
    DEFAULT_TOP_K,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Classification model settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the ONNX model file.
    pub path: Option<PathBuf>,

    /// Path to the labels file, one label per line in output order.
    pub labels: Option<PathBuf>,

    /// Sample rate the model expects, in Hz.
    pub sample_rate: Option<u32>,
}

impl ModelConfig {
    /// Sample rate to resample to before inference.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.unwrap_or(DEFAULT_MODEL_SAMPLE_RATE)
    }
}

/// Timeline analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Window length in seconds.
    pub segment_duration: f32,

    /// Window overlap as a fraction of the window length, `[0.0, 1.0)`.
    pub overlap: f32,

    /// Predictions kept per window.
    pub top_k: usize,

    /// Minimum score for a prediction to appear on the timeline.
    pub min_score: f32,

    /// Entries in the most-common-events summary.
    pub top_events: usize,

    /// Zero-pad and analyze the partial tail window instead of
    /// dropping it.
    pub pad_tail: bool,

    /// Peak-normalize the waveform before segmentation.
    pub normalize: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            segment_duration: DEFAULT_SEGMENT_DURATION,
            overlap: DEFAULT_OVERLAP,
            top_k: DEFAULT_TOP_K,
            min_score: 0.0,
            top_events: DEFAULT_TOP_EVENTS,
            pad_tail: false,
            normalize: true,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for result files. Defaults to each input's directory.
    pub directory: Option<PathBuf>,
}
