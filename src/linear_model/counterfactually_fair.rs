//! Counterfactually fair models
//!
//! A linear additive counterfactually fair classifier. Every input feature
//! is regressed on the protected attribute `s` and replaced by its residual,
//! so the target model only sees the part of each feature that `s` cannot
//! explain.
//!
//! Reference:
//! Kusner, M. J., Loftus, J. R., Russell, C., & Silva, R. (2017).
//! Counterfactual Fairness. arXiv preprint arXiv:1703.06856.
use crate::checks::{check_predict_input, check_x_y_s, is_binary, is_continuous, ColumnKind};
use crate::data::Matrix;
use crate::errors::FairnessError;
use crate::estimator::{require_s, BaseEstimator, Capabilities, Estimator, FairEstimator};
use crate::linear_model::{LinearRegression, LogisticRegression};
use crate::stats::{deviance_residuals, pearson_residuals};
use crate::utils::items_to_strings;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Residual used for binary features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidualType {
    /// `y - p`
    Absolute,
    /// `(y - p) / sqrt(p * (1 - p))`
    #[default]
    Pearson,
    /// Signed square root of the binomial deviance.
    Deviance,
}

impl FromStr for ResidualType {
    type Err = FairnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "absolute" => Ok(ResidualType::Absolute),
            "pearson" => Ok(ResidualType::Pearson),
            "deviance" => Ok(ResidualType::Deviance),
            _ => Err(FairnessError::ParseString(
                s.to_string(),
                "ResidualType".to_string(),
                items_to_strings(vec!["absolute", "pearson", "deviance"]),
            )),
        }
    }
}

impl ResidualType {
    /// Residuals of binary values `y` given the predicted class-1 probabilities.
    pub fn residuals(&self, y: &[f64], proba: &[f64]) -> Vec<f64> {
        match self {
            ResidualType::Absolute => y.iter().zip(proba).map(|(y_, p_)| y_ - p_).collect(),
            ResidualType::Pearson => pearson_residuals(y, proba),
            ResidualType::Deviance => deviance_residuals(y, proba),
        }
    }
}

/// How one feature column is residualized.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum ResidualSlot {
    /// Regressor on `s`, residual is `x - prediction`.
    Continuous(BaseEstimator),
    /// Classifier on `s`, residual from the configured [`ResidualType`].
    Binary(BaseEstimator),
    /// A binary column with a single observed class, residual fixed at 0.
    Degenerate,
}

impl ResidualSlot {
    fn residuals(
        &self,
        residual_type: ResidualType,
        s: &Matrix<f64>,
        column: &[f64],
    ) -> Result<Vec<f64>, FairnessError> {
        match self {
            ResidualSlot::Continuous(estimator) => {
                let pred = Estimator::predict(estimator, s)?;
                Ok(column.iter().zip(pred).map(|(x_, p_)| x_ - p_).collect())
            }
            ResidualSlot::Binary(estimator) => {
                let proba = Estimator::predict_proba(estimator, s)?;
                Ok(residual_type.residuals(column, &proba))
            }
            ResidualSlot::Degenerate => Ok(vec![0.0; column.len()]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FittedState {
    column_kinds: Vec<ColumnKind>,
    slots: Vec<ResidualSlot>,
    /// Column-major `n_rows x n_features` residuals of the training data.
    fit_residuals: Vec<f64>,
    n_rows: usize,
    target: BaseEstimator,
}

/// Linear additive counterfactually fair classifier.
///
/// At fit time every column of `X` is classified as binary or continuous.
/// Continuous columns are residualized with `continuous_estimator` fit on
/// `s`, binary columns with `binary_estimator` and the binary residual type.
/// The target estimator is then fit on the residual matrix. Both `fit` and
/// `predict` require `s`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearACFClassifier {
    /// Classifier mapping residuals to the target.
    pub target_estimator: BaseEstimator,
    /// Regressor used to residualize continuous columns.
    pub continuous_estimator: BaseEstimator,
    /// Classifier used to residualize binary columns. Must produce probabilities.
    pub binary_estimator: BaseEstimator,
    pub binary_residual_type: ResidualType,
    /// Fit and apply residual estimators in parallel.
    pub parallel: bool,
    fitted: Option<FittedState>,
}

impl Default for LinearACFClassifier {
    fn default() -> Self {
        LinearACFClassifier {
            target_estimator: LogisticRegression::default().into(),
            continuous_estimator: LinearRegression::default().into(),
            binary_estimator: LogisticRegression::default().into(),
            binary_residual_type: ResidualType::default(),
            parallel: true,
            fitted: None,
        }
    }
}

impl LinearACFClassifier {
    /// Create an unfitted classifier.
    ///
    /// * `target_estimator` - Classifier fit on the residuals and the target.
    /// * `continuous_estimator` - Regressor for continuous columns.
    /// * `binary_estimator` - Probabilistic classifier for binary columns.
    /// * `binary_residual_type` - One of `absolute`, `pearson` or `deviance`.
    pub fn new(
        target_estimator: BaseEstimator,
        continuous_estimator: BaseEstimator,
        binary_estimator: BaseEstimator,
        binary_residual_type: &str,
    ) -> Result<Self, FairnessError> {
        let binary_residual_type = ResidualType::from_str(binary_residual_type)?;
        if !Estimator::has_predict_proba(&binary_estimator) {
            return Err(FairnessError::ProbabilityUnsupported(
                Estimator::name(&binary_estimator).to_string(),
            ));
        }
        Ok(LinearACFClassifier {
            target_estimator,
            continuous_estimator,
            binary_estimator,
            binary_residual_type,
            parallel: true,
            fitted: None,
        })
    }

    /// Set whether residual estimators run in parallel.
    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Indices of the columns classified as binary at fit time.
    pub fn binary_index(&self) -> Option<Vec<usize>> {
        self.column_index(ColumnKind::Binary)
    }

    /// Indices of the columns classified as continuous at fit time.
    pub fn continuous_index(&self) -> Option<Vec<usize>> {
        self.column_index(ColumnKind::Continuous)
    }

    /// Residual matrix the target estimator was trained on.
    pub fn fit_residuals(&self) -> Option<Matrix<'_, f64>> {
        self.fitted.as_ref().map(|f| {
            Matrix::new(
                &f.fit_residuals,
                f.n_rows,
                f.column_kinds.len(),
            )
        })
    }

    fn column_index(&self, kind: ColumnKind) -> Option<Vec<usize>> {
        self.fitted.as_ref().map(|f| {
            f.column_kinds
                .iter()
                .enumerate()
                .filter(|(_, k)| **k == kind)
                .map(|(j, _)| j)
                .collect()
        })
    }

    fn fitted(&self, method: &str) -> Result<&FittedState, FairnessError> {
        self.fitted
            .as_ref()
            .ok_or_else(|| FairnessError::NotFitted(FairEstimator::name(self).to_string(), method.to_string()))
    }

    fn fit_column(
        &self,
        j: usize,
        column: &[f64],
        s: &Matrix<f64>,
    ) -> Result<(ColumnKind, ResidualSlot, Vec<f64>), FairnessError> {
        let (kind, slot) = if is_binary(column) {
            if column.iter().all(|v| *v == column[0]) {
                debug!("Column {} has a single class, residual fixed at 0.", j);
                (ColumnKind::Binary, ResidualSlot::Degenerate)
            } else {
                let mut estimator = self.binary_estimator.clone();
                Estimator::fit(&mut estimator, s, column)?;
                (ColumnKind::Binary, ResidualSlot::Binary(estimator))
            }
        } else if is_continuous(column) {
            let mut estimator = self.continuous_estimator.clone();
            Estimator::fit(&mut estimator, s, column)?;
            (ColumnKind::Continuous, ResidualSlot::Continuous(estimator))
        } else {
            return Err(FairnessError::NonFinite(j));
        };
        let residuals = slot.residuals(self.binary_residual_type, s, column)?;
        Ok((kind, slot, residuals))
    }

    fn predict_residuals(&self, fitted: &FittedState, x: &Matrix<f64>, s: &[f64]) -> Result<Vec<f64>, FairnessError> {
        let s_matrix = Matrix::new(s, s.len(), 1);
        let residual_type = self.binary_residual_type;
        let compute = |j: usize| fitted.slots[j].residuals(residual_type, &s_matrix, x.get_col(j));
        let columns = if self.parallel {
            (0..x.cols).into_par_iter().map(compute).collect::<Result<Vec<_>, _>>()?
        } else {
            (0..x.cols).map(compute).collect::<Result<Vec<_>, _>>()?
        };
        Ok(columns.concat())
    }
}

impl FairEstimator for LinearACFClassifier {
    const CAPABILITIES: Capabilities = Capabilities {
        s_on_fit: true,
        s_on_predict: true,
    };

    fn fit(&mut self, x: &Matrix<f64>, y: &[f64], s: Option<&[f64]>) -> Result<(), FairnessError> {
        let s = require_s(s, FairEstimator::name(self), "fit")?;
        check_x_y_s(x, y, Some(s))?;
        let s_matrix = Matrix::new(s, s.len(), 1);

        let columns = if self.parallel {
            (0..x.cols)
                .into_par_iter()
                .map(|j| self.fit_column(j, x.get_col(j), &s_matrix))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            (0..x.cols)
                .map(|j| self.fit_column(j, x.get_col(j), &s_matrix))
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut column_kinds = Vec::with_capacity(x.cols);
        let mut slots = Vec::with_capacity(x.cols);
        let mut fit_residuals = Vec::with_capacity(x.data.len());
        for (kind, slot, residuals) in columns {
            column_kinds.push(kind);
            slots.push(slot);
            fit_residuals.extend(residuals);
        }

        let mut target = self.target_estimator.clone();
        Estimator::fit(&mut target, &Matrix::new(&fit_residuals, x.rows, x.cols), y)?;

        let n_binary = column_kinds.iter().filter(|k| **k == ColumnKind::Binary).count();
        info!(
            "LinearACFClassifier fit on {} rows with {} binary and {} continuous columns.",
            x.rows,
            n_binary,
            x.cols - n_binary
        );
        self.fitted = Some(FittedState {
            column_kinds,
            slots,
            fit_residuals,
            n_rows: x.rows,
            target,
        });
        Ok(())
    }

    fn predict(&self, x: &Matrix<f64>, s: Option<&[f64]>) -> Result<Vec<f64>, FairnessError> {
        let s = require_s(s, FairEstimator::name(self), "predict")?;
        let fitted = self.fitted("predict")?;
        check_predict_input(x, Some(s), fitted.column_kinds.len(), FairEstimator::name(self))?;
        let residuals = self.predict_residuals(fitted, x, s)?;
        Estimator::predict(&fitted.target, &Matrix::new(&residuals, x.rows, x.cols))
    }

    fn predict_proba(&self, x: &Matrix<f64>, s: Option<&[f64]>) -> Result<Vec<f64>, FairnessError> {
        let s = require_s(s, FairEstimator::name(self), "predict_proba")?;
        let fitted = self.fitted("predict_proba")?;
        check_predict_input(x, Some(s), fitted.column_kinds.len(), FairEstimator::name(self))?;
        let residuals = self.predict_residuals(fitted, x, s)?;
        Estimator::predict_proba(&fitted.target, &Matrix::new(&residuals, x.rows, x.cols))
    }

    fn has_predict_proba(&self) -> bool {
        Estimator::has_predict_proba(&self.target_estimator)
    }

    fn name(&self) -> &str {
        "LinearACFClassifier"
    }
}
