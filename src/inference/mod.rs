//! Model loading and per-window event classification.

mod backend;
mod classifier;
mod labels;

pub use backend::{OnnxBackend, ScoreBackend};
pub use classifier::EventClassifier;
pub use labels::LabelResolver;
