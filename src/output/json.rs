//! JSON report writer.

use crate::error::{Error, Result};
use crate::timeline::{Summary, TimelineEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Properties of the analyzed audio file.
#[derive(Debug, Clone, Serialize)]
pub struct AudioInfo {
    /// Source file name without directory.
    pub filename: String,
    /// Clip length in seconds, rounded to two decimal places.
    pub duration_seconds: f32,
    /// Sample rate of the source file in Hz.
    pub sample_rate: u32,
    /// Channel count of the source file.
    pub channels: usize,
}

/// Complete JSON report for one audio file.
#[derive(Debug, Serialize)]
pub struct TimelineReport {
    /// Source audio file name.
    pub source_file: String,
    /// Analysis timestamp.
    pub analysis_date: DateTime<Utc>,
    /// Model file used for classification.
    pub model: String,
    /// Source audio properties.
    pub audio_info: AudioInfo,
    /// Per-window timeline entries.
    pub timeline: Vec<TimelineEntry>,
    /// Aggregate statistics.
    pub summary: Summary,
}

/// Write a report as pretty-printed JSON.
pub fn write_json(path: &Path, report: &TimelineReport) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report).map_err(|e| Error::JsonWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
