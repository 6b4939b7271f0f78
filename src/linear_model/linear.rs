use crate::checks::check_predict_input;
use crate::data::Matrix;
use crate::errors::FairnessError;
use crate::estimator::Estimator;
use crate::linear_model::LinearCoefficients;
use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_linear::{FittedLinearRegression, LinearRegression as LinfaLinear};
use log::debug;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Ordinary least squares regression, fit by `linfa-linear`.
///
/// Used as the default residual model for continuous features, so the
/// target is any real value and no probabilities are produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    pub fit_intercept: bool,
    fitted: Option<FittedLinearRegression<f64>>,
}

impl Default for LinearRegression {
    fn default() -> Self {
        LinearRegression {
            fit_intercept: true,
            fitted: None,
        }
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether an intercept is fit.
    pub fn set_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Fitted coefficients, `None` before `fit`.
    pub fn coefficients(&self) -> Option<LinearCoefficients> {
        self.fitted.as_ref().map(|f| LinearCoefficients {
            coef: f.params().to_vec(),
            intercept: f.intercept(),
        })
    }
}

impl Estimator for LinearRegression {
    fn fit(&mut self, x: &Matrix<f64>, y: &[f64]) -> Result<(), FairnessError> {
        if x.rows == 0 {
            return Err(FairnessError::EmptyData("X".to_string()));
        }
        if x.rows * x.cols != x.data.len() {
            return Err(FairnessError::InvalidShape(x.rows, x.cols, x.data.len()));
        }
        if y.len() != x.rows {
            return Err(FairnessError::LengthMismatch("y".to_string(), x.rows, y.len()));
        }

        let dataset = Dataset::new(x.to_array()?, Array1::from(y.to_vec()));
        let fitted = LinfaLinear::new()
            .with_intercept(self.fit_intercept)
            .fit(&dataset)
            .map_err(|e| FairnessError::LearnerFailed(self.name().to_string(), e.to_string()))?;
        debug!(
            "LinearRegression fit on {} rows, intercept {:.6}.",
            x.rows,
            fitted.intercept()
        );
        self.fitted = Some(fitted);
        Ok(())
    }

    fn predict(&self, x: &Matrix<f64>) -> Result<Vec<f64>, FairnessError> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| FairnessError::NotFitted(self.name().to_string(), "predict".to_string()))?;
        check_predict_input(x, None, fitted.params().len(), self.name())?;
        let records: Array2<f64> = x.to_array()?;
        let pred: Array1<f64> = fitted.predict(&records);
        Ok(pred.to_vec())
    }

    fn name(&self) -> &str {
        "LinearRegression"
    }

    fn boxed_clone(&self) -> Box<dyn Estimator> {
        Box::new(self.clone())
    }
}
