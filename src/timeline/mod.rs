//! Timeline types and aggregation of per-window predictions.

use crate::constants::SCORE_DECIMAL_PLACES;
use serde::Serialize;
use std::collections::HashMap;

/// One classified event within a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Resolved event label.
    pub label: String,
    /// Probability in `[0.0, 1.0]`.
    #[serde(serialize_with = "round_score")]
    pub score: f32,
}

/// Predictions for one analysis window, keyed by its start time.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    /// Window start offset in seconds.
    #[serde(serialize_with = "round_time")]
    pub time: f32,
    /// Top-k events for this window, highest score first. Empty when
    /// inference on the window failed.
    pub events: Vec<Prediction>,
}

/// One row of the most-common-events summary.
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    /// Event label.
    pub label: String,
    /// Number of windows the event appeared in.
    pub occurrences: usize,
    /// Mean score across those windows.
    #[serde(serialize_with = "round_score")]
    pub average_score: f32,
}

/// Whole-clip statistics derived from the timeline.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Number of windows analyzed, including failed ones.
    pub total_segments: usize,
    /// Windows where inference failed and produced an empty entry.
    pub failed_segments: usize,
    /// Windows never attempted because the deadline passed.
    pub skipped_segments: usize,
    /// Window length in seconds.
    pub segment_duration: f32,
    /// Window overlap fraction.
    pub overlap: f32,
    /// Most frequent events, ordered by count descending. Ties keep the
    /// order in which the events first appeared on the timeline.
    pub most_common_events: Vec<EventSummary>,
}

/// A complete analysis: the timeline plus its summary.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Per-window entries in time order.
    pub timeline: Vec<TimelineEntry>,
    /// Aggregate statistics.
    pub summary: Summary,
}

struct Tally {
    count: usize,
    total_score: f32,
    first_seen: usize,
}

/// Accumulates per-window predictions into an [`Analysis`].
///
/// Windows are pushed in time order. Failed windows still occupy a
/// timeline slot so the entry count matches the window count.
pub struct Aggregator {
    segment_duration: f32,
    overlap: f32,
    top_events: usize,
    timeline: Vec<TimelineEntry>,
    failed: usize,
    skipped: usize,
    tallies: HashMap<String, Tally>,
    next_seen: usize,
}

impl Aggregator {
    /// Create an aggregator; `top_events` caps the summary list.
    pub fn new(segment_duration: f32, overlap: f32, top_events: usize) -> Self {
        Self {
            segment_duration,
            overlap,
            top_events,
            timeline: Vec::new(),
            failed: 0,
            skipped: 0,
            tallies: HashMap::new(),
            next_seen: 0,
        }
    }

    /// Record a successfully classified window.
    pub fn push(&mut self, time: f32, events: Vec<Prediction>) {
        for event in &events {
            let seen = self.next_seen;
            let tally = self.tallies.entry(event.label.clone()).or_insert(Tally {
                count: 0,
                total_score: 0.0,
                first_seen: seen,
            });
            tally.count += 1;
            tally.total_score += event.score;
            self.next_seen += 1;
        }
        self.timeline.push(TimelineEntry { time, events });
    }

    /// Record a window whose inference failed. The timeline keeps an
    /// empty entry at its position.
    pub fn push_failed(&mut self, time: f32) {
        self.failed += 1;
        self.timeline.push(TimelineEntry {
            time,
            events: Vec::new(),
        });
    }

    /// Record windows never attempted because the deadline passed.
    pub fn mark_skipped(&mut self, count: usize) {
        self.skipped += count;
    }

    /// Number of windows recorded so far.
    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    /// Whether no windows have been recorded.
    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Finish aggregation and produce the analysis.
    pub fn finish(self) -> Analysis {
        let mut ranked: Vec<(String, Tally)> = self.tallies.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        ranked.truncate(self.top_events);

        #[allow(clippy::cast_precision_loss)]
        let most_common_events = ranked
            .into_iter()
            .map(|(label, tally)| EventSummary {
                label,
                occurrences: tally.count,
                average_score: tally.total_score / tally.count as f32,
            })
            .collect();

        let summary = Summary {
            total_segments: self.timeline.len(),
            failed_segments: self.failed,
            skipped_segments: self.skipped,
            segment_duration: self.segment_duration,
            overlap: self.overlap,
            most_common_events,
        };

        Analysis {
            timeline: self.timeline,
            summary,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round_to(value: f32, places: u32) -> f32 {
    let factor = 10f64.powi(places as i32);
    ((f64::from(value) * factor).round() / factor) as f32
}

fn round_score<S: serde::Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f32(round_to(*value, SCORE_DECIMAL_PLACES))
}

fn round_time<S: serde::Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f32(round_to(*value, 1))
}
