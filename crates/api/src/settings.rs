//! Service Configuration
//!
//! Layered: built-in defaults, then an optional TOML file (`churn.toml`, or
//! the path in `CHURN_CONFIG`), then `CHURN__SECTION__KEY` environment
//! variables.

use config::{Config, ConfigError, Environment, File};
use inference_engine::ModelKind;
use risk_report::ReportConfig;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Config file used when `CHURN_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "churn.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Full service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub artifacts: ArtifactSettings,
    pub logging: LoggingSettings,
    pub metrics: MetricsSettings,
    /// Risk thresholds and reported confidence
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Listen address
    pub addr: String,
}

/// Start-up artifacts
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactSettings {
    /// JSON scaler parameters
    pub scaler_path: PathBuf,
    /// Trained classifier
    pub model_path: PathBuf,
    /// Model format; guessed from the file extension when absent
    #[serde(default)]
    pub model_kind: Option<ModelKind>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// Install the Prometheus recorder and expose `/metrics`
    pub enabled: bool,
}

impl Settings {
    /// Load from the default locations
    pub fn load() -> Result<Self, SettingsError> {
        let path = std::env::var("CHURN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Load with an explicit config file path (which may not exist)
    pub fn load_from(path: &str) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .set_default("server.addr", "0.0.0.0:5000")?
            .set_default("artifacts.scaler_path", "artifacts/scaler.json")?
            .set_default("artifacts.model_path", "artifacts/model.onnx")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("metrics.enabled", true)?
            .set_default("report.high_threshold", 0.7)?
            .set_default("report.medium_threshold", 0.4)?
            .set_default("report.confidence", 80.0)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("CHURN").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load_from("/nonexistent/churn.toml").unwrap();
        assert_eq!(settings.server.addr, "0.0.0.0:5000");
        assert_eq!(settings.artifacts.scaler_path, PathBuf::from("artifacts/scaler.json"));
        assert_eq!(settings.artifacts.model_path, PathBuf::from("artifacts/model.onnx"));
        assert_eq!(settings.artifacts.model_kind, None);
        assert_eq!(settings.logging.level, "info");
        assert!(!settings.logging.json);
        assert!(settings.metrics.enabled);
        assert_eq!(settings.report.high_threshold, 0.7);
        assert_eq!(settings.report.medium_threshold, 0.4);
        assert_eq!(settings.report.confidence, 80.0);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
addr = "127.0.0.1:9000"

[artifacts]
model_path = "/srv/churn/model.json"
model_kind = "logistic"

[metrics]
enabled = false
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path().to_str().unwrap()).unwrap();
        assert_eq!(settings.server.addr, "127.0.0.1:9000");
        assert_eq!(settings.artifacts.model_kind, Some(ModelKind::Logistic));
        assert_eq!(settings.artifacts.scaler_path, PathBuf::from("artifacts/scaler.json"));
        assert!(!settings.metrics.enabled);
    }

    #[test]
    fn test_report_section() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[report]\nhigh_threshold = 0.8\nconfidence = 75.5").unwrap();

        let settings = Settings::load_from(file.path().to_str().unwrap()).unwrap();
        assert_eq!(settings.report.high_threshold, 0.8);
        assert_eq!(settings.report.medium_threshold, 0.4);
        assert_eq!(settings.report.confidence, 75.5);
    }

    #[test]
    fn test_rejects_unknown_model_kind() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[artifacts]\nmodel_kind = \"h5\"").unwrap();
        assert!(Settings::load_from(file.path().to_str().unwrap()).is_err());
    }
}
