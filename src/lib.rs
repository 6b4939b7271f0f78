// Modules
pub mod checks;
pub mod constants;
pub mod data;
pub mod errors;
pub mod estimator;
pub mod io;
pub mod linear_model;
pub mod meta_estimator;
pub mod metrics;
pub mod postprocessing;
pub mod preprocessing;
pub mod stats;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use data::Matrix;
pub use errors::FairnessError;
pub use estimator::{BaseEstimator, Capabilities, Estimator, FairEstimator};
pub use io::ModelIO;
pub use linear_model::{LinearACFClassifier, LinearRegression, LogisticRegression, ResidualType};
pub use meta_estimator::FairnessAwareMetaEstimator;
pub use metrics::{
    abs_mean_difference_delta, abs_normalized_mean_difference_delta, mean_difference, mean_difference_ci,
    normalized_mean_difference, normalized_mean_difference_ci, MeanDifference,
};
pub use postprocessing::{MultipleROClassifier, SingleROClassifier, WeightingPolicy};
pub use preprocessing::Relabeller;
pub use tree::DecisionTreeClassifier;
