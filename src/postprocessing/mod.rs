//! Postprocessing
//!
//! Techniques that make the predictions of an already trained model fairer.
pub mod reject_option;

pub use reject_option::{MultipleROClassifier, SingleROClassifier, WeightingPolicy};
