//! Result file writers.

mod csv;
mod json;
pub mod progress;

pub use csv::write_csv;
pub use json::{write_json, AudioInfo, TimelineReport};

/// Output file format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Structured report with timeline and summary.
    #[default]
    Json,
    /// Flat per-event rows, one line per prediction.
    Csv,
}

impl OutputFormat {
    /// File extension for this format, including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => crate::constants::output_extensions::JSON,
            Self::Csv => crate::constants::output_extensions::CSV,
        }
    }
}
