//! Churn Report Builder

use feature_engine::{Feature, FeatureSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Probability above which risk is High (default: 0.7)
    pub high_threshold: f64,
    /// Probability above which risk is Medium (default: 0.4)
    pub medium_threshold: f64,
    /// Reported confidence, a fixed placeholder (default: 80.0)
    pub confidence: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            high_threshold: 0.7,
            medium_threshold: 0.4,
            confidence: 80.0,
        }
    }
}

/// Churn risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Strict comparisons: with the default thresholds exactly 0.7 is
    /// Medium and exactly 0.4 is Low
    pub fn from_probability(p: f64, config: &ReportConfig) -> Self {
        if p > config.high_threshold {
            RiskLevel::High
        } else if p > config.medium_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named contributing factor with a display weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    pub impact: u32,
    pub value: f64,
}

/// Display weights; fixed, not computed per request
const FACTORS: [(&str, u32, Feature); 2] = [
    ("Tenure", 65, Feature::Tenure),
    ("MonthlyCharges", 25, Feature::MonthlyCharges),
];

/// Prediction payload returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnReport {
    /// Probability as a percentage, two decimals
    pub churn_probability: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub factors: Vec<Factor>,
}

impl ChurnReport {
    pub fn build(probability: f64, features: &FeatureSet, config: &ReportConfig) -> Self {
        let report = Self {
            churn_probability: percent(probability),
            risk_level: RiskLevel::from_probability(probability, config),
            confidence: config.confidence,
            factors: FACTORS
                .iter()
                .map(|(name, impact, feature)| Factor {
                    name: name.to_string(),
                    impact: *impact,
                    value: features.get(*feature),
                })
                .collect(),
        };
        debug!(
            "Report: {}% -> {}",
            report.churn_probability, report.risk_level
        );
        report
    }
}

/// `p * 100` rounded to two decimals.
///
/// Rounds the exact binary value, ties to even, so `0.02675` gives `2.67`
/// and `0.00125` gives `0.12`.
fn percent(probability: f64) -> f64 {
    let scaled = probability * 100.0;
    format!("{:.2}", scaled).parse().unwrap_or(scaled)
}
