//! Scale-then-predict Pipeline

use crate::predictor::{load_predictor, ChurnPredictor, ModelKind};
use crate::scaler::Scaler;
use crate::{check_width, InferenceError};
use feature_engine::{FeatureSet, FEATURE_DIMENSION};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Result of one scoring call
#[derive(Debug, Clone, Copy)]
pub struct InferenceResult {
    /// Raw churn probability in [0, 1]
    pub probability: f64,
    /// Time spent scaling and predicting
    pub latency: Duration,
}

/// Loaded artifact summary, reported by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactInfo {
    pub scaler_width: usize,
    pub model: String,
}

/// The scaler and classifier, loaded once and shared read-only
pub struct ChurnPipeline {
    scaler: Scaler,
    predictor: Box<dyn ChurnPredictor>,
}

impl ChurnPipeline {
    /// Bundle already loaded artifacts, checking they agree on the vector width
    pub fn new(scaler: Scaler, predictor: Box<dyn ChurnPredictor>) -> Result<Self, InferenceError> {
        if scaler.width() != FEATURE_DIMENSION || predictor.input_width() != FEATURE_DIMENSION {
            return Err(InferenceError::Config(format!(
                "artifact width mismatch: scaler={} model={} features={}",
                scaler.width(),
                predictor.input_width(),
                FEATURE_DIMENSION
            )));
        }
        Ok(Self { scaler, predictor })
    }

    /// Load both artifacts from disk
    pub fn load(
        scaler_path: impl AsRef<Path>,
        model_path: impl AsRef<Path>,
        model_kind: Option<ModelKind>,
    ) -> Result<Self, InferenceError> {
        let scaler = Scaler::load(scaler_path)?;
        let predictor = load_predictor(model_path, model_kind)?;
        let pipeline = Self::new(scaler, predictor)?;
        info!("Churn pipeline ready ({})", pipeline.predictor.describe());
        Ok(pipeline)
    }

    /// Score an encoded customer
    pub fn score(&self, features: &FeatureSet) -> Result<InferenceResult, InferenceError> {
        debug!(features = ?features.iter().collect::<Vec<_>>(), "Scoring customer");
        self.score_vector(features.as_slice())
    }

    /// Score a raw vector in canonical order
    pub fn score_vector(&self, values: &[f64]) -> Result<InferenceResult, InferenceError> {
        let start = Instant::now();
        check_width(FEATURE_DIMENSION, values.len())?;

        debug!("Input features: {:?}", values);
        let scaled = self.scaler.transform(values)?;
        let probability = self.predictor.predict(&scaled)?;
        debug!("Model prediction: {}", probability);

        let latency = start.elapsed();
        debug!("Inference completed in {}us", latency.as_micros());

        Ok(InferenceResult {
            probability,
            latency,
        })
    }

    pub fn artifacts(&self) -> ArtifactInfo {
        ArtifactInfo {
            scaler_width: self.scaler.width(),
            model: self.predictor.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::LogisticPredictor;
    use feature_engine::{encode, CustomerRecord, Feature};

    fn pipeline_with(weights: Vec<f64>, bias: f64) -> ChurnPipeline {
        let scaler = Scaler::new(vec![0.0; FEATURE_DIMENSION], vec![1.0; FEATURE_DIMENSION]).unwrap();
        let predictor = LogisticPredictor::new(weights, bias).unwrap();
        ChurnPipeline::new(scaler, Box::new(predictor)).unwrap()
    }

    #[test]
    fn test_score_uses_feature_order() {
        let mut weights = vec![0.0; FEATURE_DIMENSION];
        weights[Feature::Tenure.index()] = -1.0;
        let pipeline = pipeline_with(weights, 0.0);

        let mut loyal = FeatureSet::defaults();
        loyal.set(Feature::Tenure, 60.0);
        let mut fresh = FeatureSet::defaults();
        fresh.set(Feature::Tenure, 0.0);

        let loyal = pipeline.score(&loyal).unwrap().probability;
        let fresh = pipeline.score(&fresh).unwrap().probability;
        assert!(loyal < 0.01);
        assert!((fresh - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_score_encoded_record() {
        let pipeline = pipeline_with(vec![0.0; FEATURE_DIMENSION], 0.0);
        let features = encode(&CustomerRecord::default());
        let result = pipeline.score(&features).unwrap();
        assert!((result.probability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_malformed_vector() {
        let pipeline = pipeline_with(vec![0.0; FEATURE_DIMENSION], 0.0);
        assert!(matches!(
            pipeline.score_vector(&[1.0; 10]),
            Err(InferenceError::InvalidInputShape { expected: 26, actual: 10 })
        ));
    }

    #[test]
    fn test_describes_artifacts() {
        let pipeline = pipeline_with(vec![0.0; FEATURE_DIMENSION], 0.0);
        let info = pipeline.artifacts();
        assert_eq!(info.scaler_width, FEATURE_DIMENSION);
        assert_eq!(info.model, "logistic:inline");
    }

    #[test]
    fn test_load_fails_without_artifacts() {
        let err = ChurnPipeline::load("/nonexistent/scaler.json", "/nonexistent/model.json", None)
            .err()
            .unwrap();
        assert!(matches!(err, InferenceError::Config(_)));
    }
}
