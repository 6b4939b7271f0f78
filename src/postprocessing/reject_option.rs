//! Reject option classification
//!
//! Predictions inside the critical region `|p - 0.5| < theta` around the
//! decision boundary are the ones a classifier is least sure about. Within
//! that region the disadvantaged group (`s = 1`) is moved towards the
//! positive outcome and, when demoting, the advantaged group towards the
//! negative outcome, by flipping `p` to `1 - p`.
//!
//! Reference:
//! Kamiran, F., Karim, A., & Zhang, X. (2012). Decision theory for
//! discrimination-aware classification. IEEE ICDM.
use crate::checks::{check_binary, check_length, check_x_y_s};
use crate::constants::{DECISION_THRESHOLD, DEFAULT_THETA};
use crate::data::Matrix;
use crate::errors::FairnessError;
use crate::estimator::{require_s, BaseEstimator, Capabilities, Estimator, FairEstimator};
use crate::linear_model::LogisticRegression;
use crate::metrics::classification::accuracy_score;
use crate::tree::DecisionTreeClassifier;
use crate::utils::{fmt_vec_output, items_to_strings, validate_float_parameter};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How ensemble members are weighted in the averaged probability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightingPolicy {
    /// Every member has weight 1.
    Uniform,
    /// Every member is weighted by its training accuracy.
    #[default]
    Accuracy,
}

impl FromStr for WeightingPolicy {
    type Err = FairnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uniform" => Ok(WeightingPolicy::Uniform),
            "accuracy" => Ok(WeightingPolicy::Accuracy),
            _ => Err(FairnessError::ParseString(
                s.to_string(),
                "WeightingPolicy".to_string(),
                items_to_strings(vec!["uniform", "accuracy"]),
            )),
        }
    }
}

fn validate_theta(theta: f64) -> Result<(), FairnessError> {
    validate_float_parameter(theta, 0.0, 0.5, "theta")
}

fn check_s(s: &[f64], rows: usize) -> Result<(), FairnessError> {
    check_length(s, rows, "s")?;
    check_binary(s, "s")
}

fn reject_s_on_fit(s: Option<&[f64]>, estimator: &str) -> Result<(), FairnessError> {
    match s {
        Some(_) => Err(FairnessError::ProtectedAttributeNotAccepted(
            estimator.to_string(),
            "fit".to_string(),
        )),
        None => Ok(()),
    }
}

/// Flip the probabilities of candidate rows inside the critical region.
///
/// Every row is a candidate when `demote` is set, otherwise only rows of the
/// disadvantaged group are.
pub fn flip_predictions(mut proba: Vec<f64>, s: &[f64], theta: f64, demote: bool) -> Vec<f64> {
    for (p, s_) in proba.iter_mut().zip(s) {
        let candidate = demote || *s_ == 1.0;
        if candidate && (*p - 0.5).abs() < theta {
            *p = 1.0 - *p;
        }
    }
    proba
}

fn threshold(proba: Vec<f64>) -> Vec<f64> {
    proba
        .into_iter()
        .map(|p| if p > DECISION_THRESHOLD { 1.0 } else { 0.0 })
        .collect()
}

fn check_probabilistic(estimator: &BaseEstimator) -> Result<(), FairnessError> {
    if Estimator::has_predict_proba(estimator) {
        Ok(())
    } else {
        Err(FairnessError::ProbabilityUnsupported(Estimator::name(estimator).to_string()))
    }
}

/// Reject option classifier around a single base estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleROClassifier {
    /// Probabilistic base classifier, cloned on every fit.
    pub estimator: BaseEstimator,
    /// Half width of the critical region around 0.5.
    pub theta: f64,
    /// Also demote advantaged observations inside the critical region.
    pub demote: bool,
    fitted: Option<BaseEstimator>,
}

impl Default for SingleROClassifier {
    fn default() -> Self {
        SingleROClassifier {
            estimator: LogisticRegression::default().into(),
            theta: DEFAULT_THETA,
            demote: true,
            fitted: None,
        }
    }
}

impl SingleROClassifier {
    /// Create an unfitted classifier, `theta` must be in [0, 0.5].
    pub fn new(estimator: BaseEstimator, theta: f64, demote: bool) -> Result<Self, FairnessError> {
        validate_theta(theta)?;
        check_probabilistic(&estimator)?;
        Ok(SingleROClassifier {
            estimator,
            theta,
            demote,
            fitted: None,
        })
    }

    /// Fitted base estimator, `None` before `fit`.
    pub fn fitted_estimator(&self) -> Option<&BaseEstimator> {
        self.fitted.as_ref()
    }

    /// Class-1 probability of the base estimator, before any flipping.
    pub fn raw_predict_proba(&self, x: &Matrix<f64>, s: &[f64]) -> Result<Vec<f64>, FairnessError> {
        let estimator = self
            .fitted
            .as_ref()
            .ok_or_else(|| FairnessError::NotFitted(FairEstimator::name(self).to_string(), "predict".to_string()))?;
        check_s(s, x.rows)?;
        Estimator::predict_proba(estimator, x)
    }
}

impl FairEstimator for SingleROClassifier {
    const CAPABILITIES: Capabilities = Capabilities {
        s_on_fit: false,
        s_on_predict: true,
    };

    fn fit(&mut self, x: &Matrix<f64>, y: &[f64], s: Option<&[f64]>) -> Result<(), FairnessError> {
        reject_s_on_fit(s, FairEstimator::name(self))?;
        check_x_y_s(x, y, None)?;
        let mut estimator = self.estimator.clone();
        Estimator::fit(&mut estimator, x, y)?;
        info!(
            "SingleROClassifier fit {} on {} rows.",
            Estimator::name(&estimator),
            x.rows
        );
        self.fitted = Some(estimator);
        Ok(())
    }

    fn predict(&self, x: &Matrix<f64>, s: Option<&[f64]>) -> Result<Vec<f64>, FairnessError> {
        let s = require_s(s, FairEstimator::name(self), "predict")?;
        Ok(threshold(FairEstimator::predict_proba(self, x, Some(s))?))
    }

    fn predict_proba(&self, x: &Matrix<f64>, s: Option<&[f64]>) -> Result<Vec<f64>, FairnessError> {
        let s = require_s(s, FairEstimator::name(self), "predict_proba")?;
        let raw = self.raw_predict_proba(x, s)?;
        Ok(flip_predictions(raw, s, self.theta, self.demote))
    }

    fn name(&self) -> &str {
        "SingleROClassifier"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EnsembleState {
    estimators: Vec<BaseEstimator>,
    pred_weights: Vec<f64>,
}

/// Reject option classifier around a weighted ensemble of base estimators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipleROClassifier {
    /// Probabilistic base classifiers, cloned on every fit.
    pub estimators: Vec<BaseEstimator>,
    /// Half width of the critical region around 0.5.
    pub theta: f64,
    /// Also demote advantaged observations inside the critical region.
    pub demote: bool,
    pub weighting: WeightingPolicy,
    /// Fit ensemble members in parallel.
    pub parallel: bool,
    fitted: Option<EnsembleState>,
}

impl Default for MultipleROClassifier {
    fn default() -> Self {
        MultipleROClassifier {
            estimators: vec![
                LogisticRegression::default().into(),
                DecisionTreeClassifier::default().into(),
            ],
            theta: DEFAULT_THETA,
            demote: true,
            weighting: WeightingPolicy::default(),
            parallel: true,
            fitted: None,
        }
    }
}

impl MultipleROClassifier {
    /// Create an unfitted ensemble classifier.
    ///
    /// * `estimators` - At least one probabilistic base classifier.
    /// * `theta` - Half width of the critical region, in [0, 0.5].
    /// * `demote` - Also demote advantaged observations.
    /// * `weighting` - One of `uniform` or `accuracy`.
    pub fn new(
        estimators: Vec<BaseEstimator>,
        theta: f64,
        demote: bool,
        weighting: &str,
    ) -> Result<Self, FairnessError> {
        validate_theta(theta)?;
        let weighting = WeightingPolicy::from_str(weighting)?;
        if estimators.is_empty() {
            return Err(FairnessError::InvalidParameter(
                "estimators".to_string(),
                "at least one estimator".to_string(),
                "0".to_string(),
            ));
        }
        for estimator in &estimators {
            check_probabilistic(estimator)?;
        }
        Ok(MultipleROClassifier {
            estimators,
            theta,
            demote,
            weighting,
            parallel: true,
            fitted: None,
        })
    }

    /// Set whether ensemble members are fit in parallel.
    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fitted ensemble members, `None` before `fit`.
    pub fn fitted_estimators(&self) -> Option<&[BaseEstimator]> {
        self.fitted.as_ref().map(|f| f.estimators.as_slice())
    }

    /// Weight of every ensemble member, `None` before `fit`.
    pub fn pred_weights(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.pred_weights.as_slice())
    }

    fn fit_member(&self, prototype: &BaseEstimator, x: &Matrix<f64>, y: &[f64]) -> Result<(BaseEstimator, f64), FairnessError> {
        let mut estimator = prototype.clone();
        Estimator::fit(&mut estimator, x, y)?;
        let weight = match self.weighting {
            WeightingPolicy::Uniform => 1.0,
            WeightingPolicy::Accuracy => accuracy_score(y, &Estimator::predict(&estimator, x)?),
        };
        Ok((estimator, weight))
    }

    /// Weighted average of the members' class-1 probabilities, before any flipping.
    pub fn raw_predict_proba(&self, x: &Matrix<f64>, s: &[f64]) -> Result<Vec<f64>, FairnessError> {
        let state = self
            .fitted
            .as_ref()
            .ok_or_else(|| FairnessError::NotFitted(FairEstimator::name(self).to_string(), "predict".to_string()))?;
        check_s(s, x.rows)?;
        let mut proba = vec![0.0; x.rows];
        for (estimator, weight) in state.estimators.iter().zip(&state.pred_weights) {
            let member = Estimator::predict_proba(estimator, x)?;
            for (p, m) in proba.iter_mut().zip(member) {
                *p += m * weight;
            }
        }
        let total: f64 = state.pred_weights.iter().sum();
        Ok(proba.into_iter().map(|p| p / total).collect())
    }
}

impl FairEstimator for MultipleROClassifier {
    const CAPABILITIES: Capabilities = Capabilities {
        s_on_fit: false,
        s_on_predict: true,
    };

    fn fit(&mut self, x: &Matrix<f64>, y: &[f64], s: Option<&[f64]>) -> Result<(), FairnessError> {
        reject_s_on_fit(s, FairEstimator::name(self))?;
        check_x_y_s(x, y, None)?;
        if self.estimators.is_empty() {
            return Err(FairnessError::InvalidParameter(
                "estimators".to_string(),
                "at least one estimator".to_string(),
                "0".to_string(),
            ));
        }
        let members = if self.parallel {
            self.estimators
                .par_iter()
                .map(|e| self.fit_member(e, x, y))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            self.estimators
                .iter()
                .map(|e| self.fit_member(e, x, y))
                .collect::<Result<Vec<_>, _>>()?
        };
        let (estimators, mut pred_weights): (Vec<_>, Vec<_>) = members.into_iter().unzip();
        if pred_weights.iter().sum::<f64>() <= 0.0 {
            warn!("Every ensemble member has zero training accuracy, falling back to uniform weights.");
            pred_weights = vec![1.0; estimators.len()];
        }
        info!(
            "MultipleROClassifier fit {} estimators on {} rows with weights [{}].",
            estimators.len(),
            x.rows,
            fmt_vec_output(&pred_weights)
        );
        self.fitted = Some(EnsembleState {
            estimators,
            pred_weights,
        });
        Ok(())
    }

    fn predict(&self, x: &Matrix<f64>, s: Option<&[f64]>) -> Result<Vec<f64>, FairnessError> {
        let s = require_s(s, FairEstimator::name(self), "predict")?;
        Ok(threshold(FairEstimator::predict_proba(self, x, Some(s))?))
    }

    fn predict_proba(&self, x: &Matrix<f64>, s: Option<&[f64]>) -> Result<Vec<f64>, FairnessError> {
        let s = require_s(s, FairEstimator::name(self), "predict_proba")?;
        let raw = self.raw_predict_proba(x, s)?;
        Ok(flip_predictions(raw, s, self.theta, self.demote))
    }

    fn name(&self) -> &str {
        "MultipleROClassifier"
    }
}
