//! Churn Inference Engine
//!
//! Applies the pre-fitted scaler and the trained churn classifier to an
//! encoded feature vector. Both artifacts are loaded once at start-up and
//! are read-only afterwards.

mod pipeline;
mod predictor;
mod scaler;

pub use pipeline::{ArtifactInfo, ChurnPipeline, InferenceResult};
pub use predictor::{load_predictor, ChurnPredictor, LogisticPredictor, ModelKind, OnnxPredictor};
pub use scaler::Scaler;

use thiserror::Error;

/// Errors during artifact loading or inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
}

fn check_width(expected: usize, actual: usize) -> Result<(), InferenceError> {
    if expected != actual {
        return Err(InferenceError::InvalidInputShape { expected, actual });
    }
    Ok(())
}
