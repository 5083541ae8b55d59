//! Top-k event classification over a score backend.

use crate::constants::score;
use crate::error::{Error, Result};
use crate::inference::{LabelResolver, ScoreBackend};
use crate::timeline::Prediction;

/// Turns raw per-class scores into ranked, labeled predictions.
pub struct EventClassifier<B> {
    backend: B,
    labels: LabelResolver,
    top_k: usize,
    min_score: f32,
}

impl<B: ScoreBackend> EventClassifier<B> {
    /// Build a classifier. `top_k` must be at least 1; `min_score`
    /// drops predictions below the threshold after ranking.
    pub fn new(backend: B, labels: LabelResolver, top_k: usize, min_score: f32) -> Result<Self> {
        if top_k == 0 {
            return Err(Error::InvalidConfiguration {
                message: "top-k must be at least 1".to_string(),
            });
        }
        if !(score::MIN..=score::MAX).contains(&min_score) {
            return Err(Error::InvalidConfiguration {
                message: format!("min-score must be in [0.0, 1.0], got {min_score}"),
            });
        }
        Ok(Self {
            backend,
            labels,
            top_k,
            min_score,
        })
    }

    /// Classify one window: run the backend, rank by score descending,
    /// keep at most `top_k` entries above the score threshold.
    ///
    /// `top_k` larger than the class count is clamped rather than
    /// rejected, so small models work with default settings.
    pub fn classify(&mut self, window: &[f32]) -> Result<Vec<Prediction>> {
        let scores = self.backend.scores(window)?;

        let mut ranked: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let keep = self.top_k.min(ranked.len());
        let predictions = ranked
            .into_iter()
            .take(keep)
            .filter(|&(_, s)| s >= self.min_score)
            .map(|(index, s)| Prediction {
                label: self.labels.resolve(index),
                score: s.clamp(score::MIN, score::MAX),
            })
            .collect();

        Ok(predictions)
    }
}
