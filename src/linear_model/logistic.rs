use crate::checks::{check_predict_input, check_x_y_s};
use crate::constants::DECISION_THRESHOLD;
use crate::data::{to_labels, Matrix};
use crate::errors::FairnessError;
use crate::estimator::Estimator;
use crate::linear_model::LinearCoefficients;
use crate::metrics::classification::log_loss;
use crate::utils::validate_float_parameter;
use linfa::traits::Fit;
use linfa::Dataset;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression as LinfaLogistic};
use log::debug;
use serde::{Deserialize, Serialize};

/// L2 regularized logistic regression, fit by `linfa-logistic`.
///
/// Minimizes `0.5 * ||w||^2 + c * sum(log_loss)` with an unpenalized
/// intercept. The positive class is `1.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Inverse regularization strength.
    pub c: f64,
    pub fit_intercept: bool,
    pub max_iter: u64,
    fitted: Option<FittedLogisticRegression<f64, usize>>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        LogisticRegression {
            c: 1.0,
            fit_intercept: true,
            max_iter: 100,
            fitted: None,
        }
    }
}

impl LogisticRegression {
    /// Create an unfitted model with inverse regularization strength `c`.
    pub fn new(c: f64) -> Result<Self, FairnessError> {
        validate_float_parameter(c, f64::MIN_POSITIVE, f64::INFINITY, "c")?;
        Ok(LogisticRegression {
            c,
            ..Default::default()
        })
    }

    /// Set whether an intercept is fit.
    pub fn set_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Set the maximum number of solver iterations.
    pub fn set_max_iter(mut self, max_iter: u64) -> Self {
        self.max_iter = max_iter;
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

impl Estimator for LogisticRegression {
    fn fit(&mut self, x: &Matrix<f64>, y: &[f64]) -> Result<(), FairnessError> {
        check_x_y_s(x, y, None)?;
        let dataset = Dataset::new(x.to_array()?, to_labels(y));
        let fitted = LinfaLogistic::default()
            .alpha(1.0 / self.c)
            .with_intercept(self.fit_intercept)
            .max_iterations(self.max_iter)
            .fit(&dataset)
            .map_err(|e| FairnessError::LearnerFailed(self.name().to_string(), e.to_string()))?;

        let proba = fitted.predict_probabilities(dataset.records()).to_vec();
        debug!(
            "LogisticRegression fit on {} rows, training log loss {:.6}.",
            x.rows,
            log_loss(y, &proba)
        );
        self.fitted = Some(fitted);
        Ok(())
    }

    fn predict(&self, x: &Matrix<f64>) -> Result<Vec<f64>, FairnessError> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| if p > DECISION_THRESHOLD { 1.0 } else { 0.0 })
            .collect())
    }

    fn predict_proba(&self, x: &Matrix<f64>) -> Result<Vec<f64>, FairnessError> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| FairnessError::NotFitted(self.name().to_string(), "predict".to_string()))?;
        check_predict_input(x, None, fitted.params().len(), self.name())?;
        Ok(fitted.predict_probabilities(&x.to_array()?).to_vec())
    }

    fn has_predict_proba(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "LogisticRegression"
    }

    fn boxed_clone(&self) -> Box<dyn Estimator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data() -> (Vec<f64>, Vec<f64>) {
        let mut data: Vec<f64> = (0..10).map(f64::from).collect();
        data.extend((11..21).map(f64::from));
        let y = vec![0., 0., 0., 0., 0., 1., 1., 1., 1., 1.];
        (data, y)
    }

    #[test]
    fn test_fit_separable_data() {
        let (data, y) = linear_data();
        let x = Matrix::new(&data, 10, 2);
        let mut lr = LogisticRegression::default();
        lr.fit(&x, &y).unwrap();
        let c = lr.coefficients().unwrap();
        // the penalty keeps the weights finite, collinear columns share them
        assert!(c.coef.iter().all(|w| *w > 0.0 && w.is_finite()));
        assert!((c.coef[0] - c.coef[1]).abs() < 1e-2);
        assert!((c.coef[0] - 0.7565).abs() < 5e-2);
        assert!(c.intercept < 0.0);
        assert_eq!(lr.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_probabilities_are_monotone() {
        let (data, y) = linear_data();
        let x = Matrix::new(&data, 10, 2);
        let mut lr = LogisticRegression::default();
        lr.fit(&x, &y).unwrap();
        let p = lr.predict_proba(&x).unwrap();
        assert!(p.windows(2).all(|w| w[0] < w[1]));
        assert!((p[4] - 0.3194).abs() < 2e-2);
        assert!((p[5] - 0.6806).abs() < 2e-2);
    }

    #[test]
    fn test_without_intercept() {
        let (data, y) = linear_data();
        let x = Matrix::new(&data, 10, 2);
        let mut lr = LogisticRegression::default().set_fit_intercept(false);
        lr.fit(&x, &y).unwrap();
        assert_eq!(lr.coefficients().unwrap().intercept, 0.0);
    }

    #[test]
    fn test_not_fitted() {
        let (data, _) = linear_data();
        let x = Matrix::new(&data, 10, 2);
        let lr = LogisticRegression::default();
        assert!(lr.coefficients().is_none());
        assert!(matches!(lr.predict(&x), Err(FairnessError::NotFitted(_, _))));
    }

    #[test]
    fn test_column_mismatch() {
        let (data, y) = linear_data();
        let x = Matrix::new(&data, 10, 2);
        let mut lr = LogisticRegression::default();
        lr.fit(&x, &y).unwrap();
        let x1 = Matrix::new(&data[..10], 10, 1);
        assert!(matches!(lr.predict_proba(&x1), Err(FairnessError::ColumnMismatch { .. })));
    }

    #[test]
    fn test_invalid_c() {
        assert!(LogisticRegression::new(0.0).is_err());
        assert!(LogisticRegression::new(f64::NAN).is_err());
        assert_eq!(LogisticRegression::new(2.0).unwrap().c, 2.0);
    }

    #[test]
    fn test_non_binary_target() {
        let (data, _) = linear_data();
        let x = Matrix::new(&data, 10, 2);
        let y = vec![0., 0., 0., 0., 0., 1., 1., 1., 1., 2.];
        let mut lr = LogisticRegression::default();
        assert!(matches!(lr.fit(&x, &y), Err(FairnessError::NotBinary(_, _))));
    }

    #[test]
    fn test_single_class_target() {
        let (data, _) = linear_data();
        let x = Matrix::new(&data, 10, 2);
        let mut lr = LogisticRegression::default();
        assert!(matches!(lr.fit(&x, &[1.0; 10]), Err(FairnessError::LearnerFailed(_, _))));
    }
}
