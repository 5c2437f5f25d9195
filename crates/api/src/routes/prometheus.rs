//! Prometheus Exposition

use axum::extract::State;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

pub const PREDICTIONS_TOTAL: &str = "churn_predictions_total";
pub const PREDICTION_ERRORS_TOTAL: &str = "churn_prediction_errors_total";
pub const INFERENCE_SECONDS: &str = "churn_inference_seconds";

/// Install the global Prometheus recorder and describe the service metrics
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    metrics::describe_counter!(PREDICTIONS_TOTAL, "Churn predictions served, by risk level");
    metrics::describe_counter!(PREDICTION_ERRORS_TOTAL, "Churn predictions that failed");
    metrics::describe_histogram!(INFERENCE_SECONDS, "Scaler plus model latency");

    info!("Prometheus recorder installed");
    Ok(handle)
}

/// Render current metrics
pub async fn render(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .ok_or(ApiError::MetricsDisabled)
}
