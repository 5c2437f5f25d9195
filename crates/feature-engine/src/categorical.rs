//! One-hot Categorical Groups

use crate::features::{Feature, FeatureSet};
use tracing::debug;

/// A set of mutually exclusive one-hot features fed from a single raw
/// string field.
#[derive(Debug, Clone, Copy)]
pub struct CategoricalGroup {
    /// Group name (prefix of the member columns)
    pub name: &'static str,
    /// Raw value to member feature
    mapping: &'static [(&'static str, Feature)],
}

impl CategoricalGroup {
    /// Contract term
    pub const CONTRACT: CategoricalGroup = CategoricalGroup {
        name: "Contract",
        mapping: &[
            ("Month-to-month", Feature::ContractMonthToMonth),
            ("One year", Feature::ContractOneYear),
            ("Two year", Feature::ContractTwoYear),
        ],
    };

    /// Billing payment method
    pub const PAYMENT_METHOD: CategoricalGroup = CategoricalGroup {
        name: "PaymentMethod",
        mapping: &[
            ("Bank transfer (automatic)", Feature::PaymentBankTransfer),
            ("Credit card (automatic)", Feature::PaymentCreditCard),
            ("Electronic check", Feature::PaymentElectronicCheck),
            ("Mailed check", Feature::PaymentMailedCheck),
        ],
    };

    /// Member features in canonical order
    pub fn members(&self) -> impl Iterator<Item = Feature> + '_ {
        self.mapping.iter().map(|(_, feature)| *feature)
    }

    /// Member feature for an exact raw value
    pub fn feature_for(&self, value: &str) -> Option<Feature> {
        self.mapping
            .iter()
            .find(|(raw, _)| *raw == value)
            .map(|(_, feature)| *feature)
    }

    /// Zero every member, then switch on the one matching `value`.
    ///
    /// An absent or unrecognised value leaves the whole group at zero.
    pub fn apply(&self, features: &mut FeatureSet, value: Option<&str>) {
        for member in self.members() {
            features.set(member, 0.0);
        }

        match value.and_then(|v| self.feature_for(v)) {
            Some(feature) => features.set(feature, 1.0),
            None => debug!("{}: no match for {:?}, group left at zero", self.name, value),
        }
    }

    /// Number of members currently set to 1
    pub fn active_count(&self, features: &FeatureSet) -> usize {
        self.members().filter(|f| features.get(*f) == 1.0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_sizes() {
        assert_eq!(CategoricalGroup::CONTRACT.members().count(), 3);
        assert_eq!(CategoricalGroup::PAYMENT_METHOD.members().count(), 4);
    }

    #[test]
    fn test_members_share_prefix() {
        for group in [CategoricalGroup::CONTRACT, CategoricalGroup::PAYMENT_METHOD] {
            for (value, member) in group.mapping {
                assert_eq!(member.name(), format!("{}_{}", group.name, value));
            }
        }
    }

    #[test]
    fn test_apply_is_exclusive() {
        let mut features = FeatureSet::defaults();
        CategoricalGroup::CONTRACT.apply(&mut features, Some("One year"));
        assert_eq!(features.get(Feature::ContractMonthToMonth), 0.0);
        assert_eq!(features.get(Feature::ContractOneYear), 1.0);
        assert_eq!(features.get(Feature::ContractTwoYear), 0.0);
    }

    #[test]
    fn test_match_is_exact() {
        assert_eq!(CategoricalGroup::CONTRACT.feature_for("two year"), None);
        assert_eq!(CategoricalGroup::PAYMENT_METHOD.feature_for("Bank transfer"), None);
        assert_eq!(
            CategoricalGroup::PAYMENT_METHOD.feature_for("Mailed check"),
            Some(Feature::PaymentMailedCheck)
        );
    }

    #[test]
    fn test_unknown_value_zeroes_group() {
        let mut features = FeatureSet::defaults();
        CategoricalGroup::CONTRACT.apply(&mut features, Some("Three year"));
        assert_eq!(CategoricalGroup::CONTRACT.active_count(&features), 0);
    }
}
