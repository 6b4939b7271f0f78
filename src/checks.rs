//! Checks
//!
//! Input validation shared by every estimator. All checks run eagerly at the
//! start of the public call so nothing fails halfway through a fit.
use crate::data::Matrix;
use crate::errors::FairnessError;
use serde::{Deserialize, Serialize};

/// Type of a feature column, decided once at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Every value is 0 or 1.
    Binary,
    /// Anything numeric that is not binary.
    Continuous,
}

/// Whether every value is in {0, 1}.
pub fn is_binary(x: &[f64]) -> bool {
    x.iter().all(|v| *v == 0.0 || *v == 1.0)
}

/// Whether the values are finite numbers that are not binary.
pub fn is_continuous(x: &[f64]) -> bool {
    !is_binary(x) && x.iter().all(|v| v.is_finite())
}

/// Fail fast if `x` contains anything other than 0 or 1.
///
/// * `x` - Values to check.
/// * `name` - Argument name reported in the error.
pub fn check_binary(x: &[f64], name: &str) -> Result<(), FairnessError> {
    match x.iter().find(|v| !(**v == 0.0 || **v == 1.0)) {
        Some(v) => Err(FairnessError::NotBinary(name.to_string(), *v)),
        None => Ok(()),
    }
}

/// Fail if `x` does not have the expected length.
pub fn check_length(x: &[f64], expected: usize, name: &str) -> Result<(), FairnessError> {
    if x.len() != expected {
        Err(FairnessError::LengthMismatch(name.to_string(), expected, x.len()))
    } else {
        Ok(())
    }
}

/// Validate the training triple shared by every fairness-aware fit.
///
/// `y` must be binary and aligned with the rows of `x`, and when provided
/// `s` must be binary and aligned as well.
pub fn check_x_y_s(x: &Matrix<f64>, y: &[f64], s: Option<&[f64]>) -> Result<(), FairnessError> {
    if x.rows == 0 {
        return Err(FairnessError::EmptyData("X".to_string()));
    }
    if x.rows * x.cols != x.data.len() {
        return Err(FairnessError::InvalidShape(x.rows, x.cols, x.data.len()));
    }
    check_length(y, x.rows, "y")?;
    check_binary(y, "y")?;
    if let Some(s) = s {
        check_length(s, y.len(), "s")?;
        check_binary(s, "s")?;
    }
    Ok(())
}

/// Validate a prediction input against the number of columns seen at fit time.
pub fn check_predict_input(
    x: &Matrix<f64>,
    s: Option<&[f64]>,
    n_features: usize,
    estimator: &str,
) -> Result<(), FairnessError> {
    if x.rows * x.cols != x.data.len() {
        return Err(FairnessError::InvalidShape(x.rows, x.cols, x.data.len()));
    }
    if x.cols != n_features {
        return Err(FairnessError::ColumnMismatch {
            estimator: estimator.to_string(),
            expected: n_features,
            found: x.cols,
        });
    }
    if let Some(s) = s {
        check_length(s, x.rows, "s")?;
        check_binary(s, "s")?;
    }
    Ok(())
}
