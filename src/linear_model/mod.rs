//! Linear models
//!
//! The `linfa` backed linear learners and the linear additive counterfactually
//! fair classifier built on top of them.
pub mod counterfactually_fair;
pub mod linear;
pub mod logistic;

use serde::{Deserialize, Serialize};

pub use counterfactually_fair::{LinearACFClassifier, ResidualType};
pub use linear::LinearRegression;
pub use logistic::LogisticRegression;

/// Fitted coefficients of a linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearCoefficients {
    /// One weight per feature column.
    pub coef: Vec<f64>,
    pub intercept: f64,
}
