//! Churn Risk Reporting
//!
//! Turns a raw churn probability into the risk level, confidence and
//! factor list returned to the dashboard.

mod report;

pub use report::{ChurnReport, Factor, ReportConfig, RiskLevel};
