//! Errors
//!
//! Custom error types used throughout the `fairml` crate.
use thiserror::Error;

/// Errors that can occur while fitting, predicting or scoring.
#[derive(Debug, Error)]
pub enum FairnessError {
    /// A target or protected attribute contained a value outside of {0, 1}.
    #[error("`{0}` must be a binary variable, but found value {1}.")]
    NotBinary(String, f64),
    /// First value is the name of the argument, second is expected length, third is what was passed.
    #[error("`{0}` must have length {1}, but has length {2}.")]
    LengthMismatch(String, usize, usize),
    /// Column count at predict time differs from column count at fit time.
    #[error("Input has {found} columns, but {estimator} was fit with {expected} columns.")]
    ColumnMismatch {
        estimator: String,
        expected: usize,
        found: usize,
    },
    /// Buffer length does not match the declared matrix shape.
    #[error("Invalid shape ({0}, {1}) for buffer of length {2}.")]
    InvalidShape(usize, usize, usize),
    /// One of the protected groups has no observations.
    #[error("Protected group s={0} has no observations.")]
    EmptyGroup(u8),
    /// A feature column is neither binary nor a finite continuous variable.
    #[error("Column {0} of X contains non-finite values.")]
    NonFinite(usize),
    /// No rows were provided.
    #[error("`{0}` requires at least one observation.")]
    EmptyData(String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
    /// A predict or transform method was called before fit.
    #[error("{0} is not fitted yet, call `fit` before `{1}`.")]
    NotFitted(String, String),
    /// The estimator requires the protected attribute but none was passed.
    #[error("`s` is required by {0} `{1}`, but was not provided.")]
    ProtectedAttributeRequired(String, String),
    /// The protected attribute was passed to an estimator that does not accept it.
    #[error("`s` was provided, but {0} `{1}` doesn't accept `s`.")]
    ProtectedAttributeNotAccepted(String, String),
    /// Probabilities were requested from an estimator that cannot produce them.
    #[error("{0} has no method `predict_proba`.")]
    ProbabilityUnsupported(String),
    /// Relabelling is only defined on the data it was fit with.
    #[error("`transform` input X must be equal to input X to `fit`.")]
    TransformInputMismatch,
    /// The wrapped learner failed to fit, second value is its error message.
    #[error("{0} failed to fit: {1}")]
    LearnerFailed(String, String),
    /// Unable to write model to file.
    #[error("Unable to write model to file: {0}")]
    UnableToWrite(String),
    /// Unable to read model from file.
    #[error("Unable to read model from a file {0}")]
    UnableToRead(String),
}
