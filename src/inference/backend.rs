//! Inference backends producing per-class scores for an audio window.

use crate::error::{Error, Result};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use tracing::{debug, info};

/// A model that scores one audio window.
///
/// Implementations return one probability per class, in model output
/// order. `run` takes `&mut self` because ONNX Runtime sessions require
/// exclusive access during inference.
pub trait ScoreBackend {
    /// Score a single window of mono samples. Returns class probabilities.
    fn scores(&mut self, window: &[f32]) -> Result<Vec<f32>>;
}

/// ONNX Runtime backend for waveform-input classification models.
///
/// The model is expected to take a `[1, samples]` f32 tensor and emit a
/// `[1, classes]` tensor of logits; scores are softmaxed before they are
/// returned, so exports that already emit probabilities should disable
/// it via [`OnnxBackend::with_softmax`].
pub struct OnnxBackend {
    session: Session,
    input_name: String,
    apply_softmax: bool,
}

impl OnnxBackend {
    /// Load a model from an ONNX file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(1))
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| Error::ModelLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| Error::ModelLoad {
                path: path.to_path_buf(),
                reason: "model has no inputs".to_string(),
            })?;

        info!(model = %path.display(), input = %input_name, "loaded ONNX model");

        Ok(Self {
            session,
            input_name,
            apply_softmax: true,
        })
    }

    /// Control whether raw outputs are softmaxed into probabilities.
    pub fn with_softmax(mut self, apply: bool) -> Self {
        self.apply_softmax = apply;
        self
    }
}

impl ScoreBackend for OnnxBackend {
    fn scores(&mut self, window: &[f32]) -> Result<Vec<f32>> {
        let input =
            Array2::from_shape_vec((1, window.len()), window.to_vec()).map_err(|e| {
                Error::Inference {
                    reason: format!("input shape error: {e}"),
                }
            })?;

        let tensor = Tensor::from_array(input).map_err(|e| Error::Inference {
            reason: format!("tensor creation error: {e}"),
        })?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| Error::Inference {
                reason: e.to_string(),
            })?;

        let (_, value) = outputs.iter().next().ok_or_else(|| Error::Inference {
            reason: "model produced no outputs".to_string(),
        })?;

        let (shape, data) = value
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference {
                reason: format!("output extraction error: {e}"),
            })?;
        debug!(?shape, "extracted model output");

        let mut scores = data.to_vec();
        if self.apply_softmax {
            softmax_in_place(&mut scores);
        }
        Ok(scores)
    }
}

/// Numerically stable softmax.
fn softmax_in_place(logits: &mut [f32]) {
    let max = logits.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    if !max.is_finite() {
        return;
    }
    let mut sum = 0.0f32;
    for v in logits.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    if sum > 0.0 {
        for v in logits.iter_mut() {
            *v /= sum;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one() {
        let mut logits = vec![1.0, 2.0, 3.0];
        softmax_in_place(&mut logits);
        let total: f32 = logits.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(logits[2] > logits[1] && logits[1] > logits[0]);
    }

    #[test]
    fn softmax_handles_large_logits() {
        let mut logits = vec![1000.0, 1001.0];
        softmax_in_place(&mut logits);
        assert!(logits.iter().all(|v| v.is_finite()));
        let total: f32 = logits.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn softmax_on_empty_is_noop() {
        let mut logits: Vec<f32> = Vec::new();
        softmax_in_place(&mut logits);
        assert!(logits.is_empty());
    }

    #[test]
    fn missing_model_file_is_load_error() {
        let result = OnnxBackend::from_file(Path::new("/nonexistent/model.onnx"));
        assert!(matches!(result, Err(Error::ModelLoad { .. })));
    }
}
