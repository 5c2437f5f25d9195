//! Churn Classifier Adapters

use crate::{check_width, InferenceError};
use feature_engine::FEATURE_DIMENSION;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tract_onnx::prelude::*;
use tracing::{debug, info};

/// A pre-trained binary classifier producing a churn probability
pub trait ChurnPredictor: Send + Sync {
    /// Probability of churn in [0, 1] for one scaled vector
    fn predict(&self, scaled: &[f64]) -> Result<f64, InferenceError>;

    /// Expected input width
    fn input_width(&self) -> usize;

    /// Short human readable description for health output
    fn describe(&self) -> String;
}

/// Model artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Network exported to ONNX, run with tract
    Onnx,
    /// Logistic regression coefficients in JSON
    Logistic,
}

impl ModelKind {
    /// Guess the artifact format from its file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("onnx") => ModelKind::Onnx,
            _ => ModelKind::Logistic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Onnx => "onnx",
            ModelKind::Logistic => "logistic",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load a predictor, using `kind` when given and the file extension otherwise
pub fn load_predictor(
    path: impl AsRef<Path>,
    kind: Option<ModelKind>,
) -> Result<Box<dyn ChurnPredictor>, InferenceError> {
    let path = path.as_ref();
    let kind = kind.unwrap_or_else(|| ModelKind::from_path(path));
    info!("Loading {} churn model from {}", kind, path.display());

    match kind {
        ModelKind::Onnx => Ok(Box::new(OnnxPredictor::load(path)?)),
        ModelKind::Logistic => Ok(Box::new(LogisticPredictor::load(path)?)),
    }
}

fn finish(raw: f64) -> Result<f64, InferenceError> {
    if !raw.is_finite() {
        return Err(InferenceError::InferenceFailed(format!(
            "model produced non-finite output {}",
            raw
        )));
    }
    Ok(raw.clamp(0.0, 1.0))
}

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// Trained network exported to ONNX, executed with tract
pub struct OnnxPredictor {
    plan: OnnxPlan,
    source: String,
}

impl OnnxPredictor {
    /// Load and optimize the ONNX model for a `[1, 26]` f32 input
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(InferenceError::ModelLoadError(format!(
                "model file {} not found",
                path.display()
            )));
        }

        let proto = tract_onnx::onnx().proto_model_for_path(path).map_err(|e| {
            InferenceError::ModelLoadError(format!("{}: {}", path.display(), e))
        })?;

        let model = Self::from_proto(&proto, path.display().to_string())?;
        info!("ONNX model loaded successfully");
        Ok(model)
    }

    /// Build from an already decoded ONNX graph
    fn from_proto(proto: &tract_onnx::pb::ModelProto, source: String) -> Result<Self, InferenceError> {
        let plan = build_plan(proto)
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", source, e)))?;
        Ok(Self { plan, source })
    }
}

fn build_plan(proto: &tract_onnx::pb::ModelProto) -> TractResult<OnnxPlan> {
    tract_onnx::onnx()
        .model_for_proto_model(proto)?
        .with_input_fact(0, f32::fact([1, FEATURE_DIMENSION]).into())?
        .into_optimized()?
        .into_runnable()
}

impl ChurnPredictor for OnnxPredictor {
    fn predict(&self, scaled: &[f64]) -> Result<f64, InferenceError> {
        check_width(FEATURE_DIMENSION, scaled.len())?;

        let input: Tensor = tract_ndarray::Array2::from_shape_vec(
            (1, FEATURE_DIMENSION),
            scaled.iter().map(|v| *v as f32).collect(),
        )
        .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?
        .into();

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model returned no outputs".into()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        // Sigmoid head: [1, 1]. Softmax head: [1, 2], positive class last.
        let raw = match view.len() {
            1 => view.iter().next().copied(),
            2 => view.iter().nth(1).copied(),
            n => {
                return Err(InferenceError::InferenceFailed(format!(
                    "unexpected output size {}",
                    n
                )))
            }
        }
        .unwrap_or(f32::NAN);

        debug!("ONNX raw output: {}", raw);
        finish(raw as f64)
    }

    fn input_width(&self) -> usize {
        FEATURE_DIMENSION
    }

    fn describe(&self) -> String {
        format!("onnx:{}", self.source)
    }
}

/// Logistic regression coefficients as exported from scikit-learn
#[derive(Debug, Deserialize)]
struct LogisticArtifact {
    #[serde(alias = "coef")]
    weights: Vec<f64>,
    #[serde(alias = "intercept")]
    bias: f64,
}

/// Linear churn model `sigmoid(w . x + b)`
#[derive(Debug, Clone)]
pub struct LogisticPredictor {
    weights: Vec<f64>,
    bias: f64,
    source: String,
}

impl LogisticPredictor {
    pub fn new(weights: Vec<f64>, bias: f64) -> Result<Self, InferenceError> {
        if weights.len() != FEATURE_DIMENSION {
            return Err(InferenceError::Config(format!(
                "model expects {} weights, got {}",
                FEATURE_DIMENSION,
                weights.len()
            )));
        }
        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(InferenceError::Config("model coefficients are not finite".into()));
        }
        Ok(Self {
            weights,
            bias,
            source: "inline".to_string(),
        })
    }

    /// Load the JSON coefficient artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|e| {
            InferenceError::ModelLoadError(format!("cannot read model {}: {}", path.display(), e))
        })?;
        let artifact: LogisticArtifact = serde_json::from_slice(&raw).map_err(|e| {
            InferenceError::ModelLoadError(format!("corrupt model {}: {}", path.display(), e))
        })?;

        let mut model = Self::new(artifact.weights, artifact.bias)?;
        model.source = path.display().to_string();
        Ok(model)
    }
}

impl ChurnPredictor for LogisticPredictor {
    fn predict(&self, scaled: &[f64]) -> Result<f64, InferenceError> {
        check_width(self.weights.len(), scaled.len())?;

        let logit: f64 = self
            .weights
            .iter()
            .zip(scaled)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;

        finish(1.0 / (1.0 + (-logit).exp()))
    }

    fn input_width(&self) -> usize {
        self.weights.len()
    }

    fn describe(&self) -> String {
        format!("logistic:{}", self.source)
    }
}
