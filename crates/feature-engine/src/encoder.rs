//! Customer Record Encoding

use crate::categorical::CategoricalGroup;
use crate::features::{Feature, FeatureSet};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Raw customer attributes as posted by the dashboard.
///
/// Every field is kept as an untyped JSON value so that numbers sent as
/// strings, nulls and outright garbage all reach the encoder instead of
/// failing deserialization. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    /// Months the customer has been subscribed
    #[serde(default)]
    pub tenure: Option<Value>,
    /// Current monthly bill
    #[serde(default)]
    pub monthly_charges: Option<Value>,
    /// Contract term, e.g. "One year"
    #[serde(default)]
    pub contract: Option<Value>,
    /// Payment method, e.g. "Electronic check"
    #[serde(default)]
    pub payment_method: Option<Value>,
}

impl CustomerRecord {
    /// Build a record from any JSON value. Non-objects yield an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            other => {
                debug!("Request body is not an object ({}), using empty record", kind(&other));
                Self::default()
            }
        }
    }

    /// Parse a request body leniently. Malformed JSON yields an empty record.
    ///
    /// Numbers are kept in their textual form (`arbitrary_precision`), so an
    /// out-of-range literal such as `1e400` only affects its own field.
    pub fn from_slice(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                debug!("Unparseable request body ({}), using empty record", e);
                Self::default()
            }
        }
    }

    fn contract_str(&self) -> Option<&str> {
        self.contract.as_ref().and_then(Value::as_str)
    }

    fn payment_method_str(&self) -> Option<&str> {
        self.payment_method.as_ref().and_then(Value::as_str)
    }
}

/// Coerce a loosely typed JSON value into a finite `f64`.
///
/// Missing, null, unparseable and non-finite values all become 0.0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Encode a customer record into the full canonical feature set.
///
/// Only tenure, monthly charges, contract and payment method come from the
/// request; every other feature keeps its static default. Note that an
/// absent contract zeroes all three contract columns even though the
/// default profile is month-to-month.
pub fn encode(record: &CustomerRecord) -> FeatureSet {
    let mut features = FeatureSet::defaults();

    features.set(Feature::Tenure, coerce_number(record.tenure.as_ref()));
    features.set(
        Feature::MonthlyCharges,
        coerce_number(record.monthly_charges.as_ref()),
    );

    CategoricalGroup::CONTRACT.apply(&mut features, record.contract_str());
    CategoricalGroup::PAYMENT_METHOD.apply(&mut features, record.payment_method_str());

    features
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
