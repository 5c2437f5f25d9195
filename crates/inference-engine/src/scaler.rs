//! Pre-fitted Feature Scaler

use crate::{check_width, InferenceError};
use feature_engine::{Feature, FEATURE_DIMENSION};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Scaler parameters as exported from the training notebook
/// (`StandardScaler.mean_` / `StandardScaler.scale_`).
#[derive(Debug, Deserialize)]
struct ScalerArtifact {
    #[serde(alias = "mean_")]
    mean: Vec<f64>,
    #[serde(alias = "scale_")]
    scale: Vec<f64>,
    #[serde(default, alias = "feature_names_in_")]
    feature_names: Option<Vec<String>>,
}

/// Per-feature standardization `(x - mean) / scale`.
///
/// No fitting happens here; parameters come from the artifact only.
#[derive(Debug, Clone)]
pub struct Scaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl Scaler {
    /// Build a scaler from explicit parameters
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, InferenceError> {
        if mean.len() != FEATURE_DIMENSION || scale.len() != FEATURE_DIMENSION {
            return Err(InferenceError::Config(format!(
                "scaler expects {} features, artifact has mean={} scale={}",
                FEATURE_DIMENSION,
                mean.len(),
                scale.len()
            )));
        }
        if let Some(i) = mean.iter().chain(&scale).position(|v| !v.is_finite()) {
            return Err(InferenceError::Config(format!(
                "scaler parameter {} is not finite",
                i % FEATURE_DIMENSION
            )));
        }

        // Constant columns were fitted with a zero variance.
        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();

        Ok(Self { mean, scale })
    }

    /// Load the JSON scaler artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        info!("Loading scaler from {}", path.display());

        let raw = std::fs::read(path).map_err(|e| {
            InferenceError::Config(format!("cannot read scaler {}: {}", path.display(), e))
        })?;
        let artifact: ScalerArtifact = serde_json::from_slice(&raw).map_err(|e| {
            InferenceError::Config(format!("corrupt scaler {}: {}", path.display(), e))
        })?;

        if let Some(names) = &artifact.feature_names {
            let layout = names.iter().map(|n| Feature::from_name(n));
            if names.len() != FEATURE_DIMENSION || !layout.eq(Feature::ALL.into_iter().map(Some)) {
                return Err(InferenceError::Config(format!(
                    "scaler {} was fitted on a different feature layout",
                    path.display()
                )));
            }
        } else {
            warn!("Scaler artifact has no feature names, assuming canonical order");
        }

        Self::new(artifact.mean, artifact.scale)
    }

    /// Number of features this scaler was fitted on
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Apply the fitted transform to one vector
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, InferenceError> {
        check_width(self.width(), values.len())?;

        Ok(values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}
