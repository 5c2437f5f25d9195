//! Churn Scoring API Server
//!
//! REST API that scores customer churn risk for the insights dashboard.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use inference_engine::ChurnPipeline;
use metrics_exporter_prometheus::PrometheusHandle;
use risk_report::ReportConfig;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod error;
pub mod routes;
mod settings;

pub use error::ApiError;
pub use settings::{
    ArtifactSettings, LoggingSettings, MetricsSettings, ServerSettings, Settings, SettingsError,
    DEFAULT_CONFIG_FILE,
};

/// Application state shared across handlers.
///
/// Nothing in here changes after start-up, so handlers share it without
/// locking.
pub struct AppState {
    /// Scaler and churn model
    pub pipeline: ChurnPipeline,
    /// Risk thresholds and confidence for responses
    pub report: ReportConfig,
    /// Prometheus handle when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(pipeline: ChurnPipeline) -> Self {
        Self {
            pipeline,
            report: ReportConfig::default(),
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn with_report(mut self, report: ReportConfig) -> Self {
        self.report = report;
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Oversized bodies are scored like any other, never rejected
        .route(
            "/api/predict",
            post(routes::predict::predict).layer(DefaultBodyLimit::disable()),
        )
        .route("/api/health", get(routes::health::health))
        .route("/metrics", get(routes::prometheus::render))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Initialize logging. `RUST_LOG` wins over the configured level.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), SettingsError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| SettingsError::Logging(e.to_string()))?;

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true);

    let result = if settings.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| SettingsError::Logging(e.to_string()))
}

/// Load artifacts and run the server until ctrl-c.
///
/// Artifact failures abort before the listener is bound.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let pipeline = ChurnPipeline::load(
        &settings.artifacts.scaler_path,
        &settings.artifacts.model_path,
        settings.artifacts.model_kind,
    )?;

    let mut state = AppState::new(pipeline).with_report(settings.report);
    if settings.metrics.enabled {
        state = state.with_metrics(routes::prometheus::install_recorder()?);
    }
    let app = create_router(Arc::new(state));

    info!("Starting API server on {}", settings.server.addr);

    let listener = tokio::net::TcpListener::bind(&settings.server.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
