//! Prediction Route

use axum::{body::Bytes, extract::State, Json};
use feature_engine::{encode, CustomerRecord};
use risk_report::ChurnReport;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::routes::prometheus::{INFERENCE_SECONDS, PREDICTIONS_TOTAL, PREDICTION_ERRORS_TOTAL};
use crate::AppState;

/// Score one customer.
///
/// The body is parsed leniently: malformed JSON, non-object bodies and
/// non-numeric fields all fall back to defaults rather than a 4xx.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ChurnReport>, ApiError> {
    let record = CustomerRecord::from_slice(&body);
    let features = encode(&record);

    let result = state.pipeline.score(&features).map_err(|e| {
        metrics::counter!(PREDICTION_ERRORS_TOTAL).increment(1);
        e
    })?;
    metrics::histogram!(INFERENCE_SECONDS).record(result.latency.as_secs_f64());

    let report = ChurnReport::build(result.probability, &features, &state.report);
    metrics::counter!(PREDICTIONS_TOTAL, "risk_level" => report.risk_level.as_str()).increment(1);

    info!(
        probability = result.probability,
        risk = %report.risk_level,
        latency_us = result.latency.as_micros() as u64,
        "Churn prediction served"
    );

    Ok(Json(report))
}
