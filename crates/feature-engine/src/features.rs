//! Canonical Feature Layout

use std::fmt;

/// Number of features in the vector (training order of the churn model)
pub const FEATURE_DIMENSION: usize = 26;

/// A single model input, in canonical (training) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Gender,
    SeniorCitizen,
    Partner,
    Dependents,
    Tenure,
    PhoneService,
    MultipleLines,
    OnlineSecurity,
    OnlineBackup,
    DeviceProtection,
    TechSupport,
    StreamingTv,
    StreamingMovies,
    PaperlessBilling,
    MonthlyCharges,
    TotalCharges,
    InternetServiceDsl,
    InternetServiceFiberOptic,
    InternetServiceNo,
    ContractMonthToMonth,
    ContractOneYear,
    ContractTwoYear,
    PaymentBankTransfer,
    PaymentCreditCard,
    PaymentElectronicCheck,
    PaymentMailedCheck,
}

impl Feature {
    /// Every feature, in the order the model expects them
    pub const ALL: [Feature; FEATURE_DIMENSION] = [
        Feature::Gender,
        Feature::SeniorCitizen,
        Feature::Partner,
        Feature::Dependents,
        Feature::Tenure,
        Feature::PhoneService,
        Feature::MultipleLines,
        Feature::OnlineSecurity,
        Feature::OnlineBackup,
        Feature::DeviceProtection,
        Feature::TechSupport,
        Feature::StreamingTv,
        Feature::StreamingMovies,
        Feature::PaperlessBilling,
        Feature::MonthlyCharges,
        Feature::TotalCharges,
        Feature::InternetServiceDsl,
        Feature::InternetServiceFiberOptic,
        Feature::InternetServiceNo,
        Feature::ContractMonthToMonth,
        Feature::ContractOneYear,
        Feature::ContractTwoYear,
        Feature::PaymentBankTransfer,
        Feature::PaymentCreditCard,
        Feature::PaymentElectronicCheck,
        Feature::PaymentMailedCheck,
    ];

    /// Column name used by the training data
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Gender => "gender",
            Feature::SeniorCitizen => "SeniorCitizen",
            Feature::Partner => "Partner",
            Feature::Dependents => "Dependents",
            Feature::Tenure => "tenure",
            Feature::PhoneService => "PhoneService",
            Feature::MultipleLines => "MultipleLines",
            Feature::OnlineSecurity => "OnlineSecurity",
            Feature::OnlineBackup => "OnlineBackup",
            Feature::DeviceProtection => "DeviceProtection",
            Feature::TechSupport => "TechSupport",
            Feature::StreamingTv => "StreamingTV",
            Feature::StreamingMovies => "StreamingMovies",
            Feature::PaperlessBilling => "PaperlessBilling",
            Feature::MonthlyCharges => "MonthlyCharges",
            Feature::TotalCharges => "TotalCharges",
            Feature::InternetServiceDsl => "InternetService_DSL",
            Feature::InternetServiceFiberOptic => "InternetService_Fiber optic",
            Feature::InternetServiceNo => "InternetService_No",
            Feature::ContractMonthToMonth => "Contract_Month-to-month",
            Feature::ContractOneYear => "Contract_One year",
            Feature::ContractTwoYear => "Contract_Two year",
            Feature::PaymentBankTransfer => "PaymentMethod_Bank transfer (automatic)",
            Feature::PaymentCreditCard => "PaymentMethod_Credit card (automatic)",
            Feature::PaymentElectronicCheck => "PaymentMethod_Electronic check",
            Feature::PaymentMailedCheck => "PaymentMethod_Mailed check",
        }
    }

    /// Position in the model input vector
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Value of this feature for a "typical" customer profile, derived
    /// offline from the (already min-max scaled) training set.
    pub fn default_value(&self) -> f64 {
        match self {
            Feature::Tenure => 0.282,
            Feature::MonthlyCharges => 0.560,
            Feature::TotalCharges => 0.131,
            Feature::PhoneService
            | Feature::PaperlessBilling
            | Feature::InternetServiceFiberOptic
            | Feature::ContractMonthToMonth => 1.0,
            _ => 0.0,
        }
    }

    /// Look up a feature by its training column name
    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dense feature values for one customer, always complete and in
/// canonical order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSet {
    values: [f64; FEATURE_DIMENSION],
}

impl FeatureSet {
    /// The static default profile
    pub fn defaults() -> Self {
        let mut values = [0.0; FEATURE_DIMENSION];
        for feature in Feature::ALL {
            values[feature.index()] = feature.default_value();
        }
        Self { values }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        self.values[feature.index()] = value;
    }

    /// Values in canonical order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// `(column name, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Feature::ALL.iter().map(move |f| (f.name(), self.get(*f)))
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        assert_eq!(Feature::ALL.len(), FEATURE_DIMENSION);
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
        assert_eq!(Feature::ALL[0].name(), "gender");
        assert_eq!(Feature::ALL[4].name(), "tenure");
        assert_eq!(Feature::ALL[14].name(), "MonthlyCharges");
        assert_eq!(Feature::ALL[25].name(), "PaymentMethod_Mailed check");
    }

    #[test]
    fn test_names_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_name(feature.name()), Some(feature));
        }
        assert_eq!(Feature::from_name("Churn"), None);
    }

    #[test]
    fn test_default_profile() {
        let defaults = FeatureSet::defaults();
        assert_eq!(defaults.get(Feature::Tenure), 0.282);
        assert_eq!(defaults.get(Feature::MonthlyCharges), 0.560);
        assert_eq!(defaults.get(Feature::TotalCharges), 0.131);
        assert_eq!(defaults.get(Feature::ContractMonthToMonth), 1.0);
        assert_eq!(defaults.get(Feature::InternetServiceFiberOptic), 1.0);
        assert_eq!(defaults.get(Feature::Gender), 0.0);

        let ones = defaults.as_slice().iter().filter(|v| **v == 1.0).count();
        assert_eq!(ones, 4);
    }

}
