//! Metrics
//!
//! Group-disparity metrics for auditing discrimination, and the classification
//! metrics used internally by the learners and ensembles.
pub mod classification;
pub mod fairness;

pub use fairness::{
    abs_mean_difference_delta, abs_normalized_mean_difference_delta, mean_difference, mean_difference_ci,
    normalized_mean_difference, normalized_mean_difference_ci, MeanDifference,
};
