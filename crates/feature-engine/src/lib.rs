//! Feature Engineering Engine
//!
//! Turns a loosely typed customer record into the dense, ordered feature
//! vector the churn model was trained on.

mod categorical;
mod encoder;
mod features;

pub use categorical::CategoricalGroup;
pub use encoder::{coerce_number, encode, CustomerRecord};
pub use features::{Feature, FeatureSet, FEATURE_DIMENSION};
