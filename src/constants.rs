//! Application-wide constants.
//!
//! All magic numbers and strings live here so defaults stay consistent
//! between the CLI, the config layer and the tests.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "soundline";

/// Default window length in seconds.
pub const DEFAULT_SEGMENT_DURATION: f32 = 1.0;

/// Default window overlap as a fraction of the window length.
pub const DEFAULT_OVERLAP: f32 = 0.5;

/// Default number of top predictions kept per window.
pub const DEFAULT_TOP_K: usize = 3;

/// Default number of entries in the most-common-events summary.
pub const DEFAULT_TOP_EVENTS: usize = 5;

/// Sample rate expected by AudioSet-style classification models, in Hz.
pub const DEFAULT_MODEL_SAMPLE_RATE: u32 = 16_000;

/// Decimal places used when serializing prediction scores.
pub const SCORE_DECIMAL_PLACES: u32 = 4;

/// Output file extensions by format.
pub mod output_extensions {
    /// JSON timeline report extension.
    pub const JSON: &str = ".timeline.json";
    /// CSV timeline extension.
    pub const CSV: &str = ".timeline.csv";
}

/// Score value bounds.
pub mod score {
    /// Minimum valid score value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid score value.
    pub const MAX: f32 = 1.0;
}
