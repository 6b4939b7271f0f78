//! Estimator
//!
//! The contracts binding the crate together: [`Estimator`] is what a
//! pluggable base learner has to provide, and [`FairEstimator`] is the
//! protected-attribute aware contract the meta estimator dispatches on.
use crate::data::Matrix;
use crate::errors::FairnessError;
use crate::linear_model::{LinearRegression, LogisticRegression};
use crate::tree::DecisionTreeClassifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A pluggable base learner.
///
/// Implementations are used as prototypes: fairness-aware estimators clone
/// them with [`Estimator::boxed_clone`] on every fit, so a prototype is
/// never mutated by the estimators that were configured with it.
pub trait Estimator: Send + Sync + fmt::Debug {
    /// Fit the learner on column-major features `x` and target `y`.
    fn fit(&mut self, x: &Matrix<f64>, y: &[f64]) -> Result<(), FairnessError>;

    /// Predict labels, or values for regressors.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vec<f64>, FairnessError>;

    /// Predict the probability of the positive class.
    fn predict_proba(&self, _x: &Matrix<f64>) -> Result<Vec<f64>, FairnessError> {
        Err(FairnessError::ProbabilityUnsupported(self.name().to_string()))
    }

    /// Whether [`Estimator::predict_proba`] is implemented.
    fn has_predict_proba(&self) -> bool {
        false
    }

    /// Human readable name used in errors and logs.
    fn name(&self) -> &str;

    /// Clone into a new box, used to copy prototypes before fitting.
    fn boxed_clone(&self) -> Box<dyn Estimator>;
}

impl Clone for Box<dyn Estimator> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// The base learners an estimator can be configured with.
///
/// The built-in learners can be persisted with the rest of a fitted model,
/// any other [`Estimator`] can be used through `Custom`, which is skipped
/// during serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BaseEstimator {
    LogisticRegression(LogisticRegression),
    LinearRegression(LinearRegression),
    DecisionTree(DecisionTreeClassifier),
    #[serde(skip)]
    Custom(Box<dyn Estimator>),
}

impl BaseEstimator {
    /// Wrap a user provided learner.
    pub fn custom<T>(estimator: T) -> Self
    where
        T: Estimator + 'static,
    {
        BaseEstimator::Custom(Box::new(estimator))
    }

    fn inner(&self) -> &dyn Estimator {
        match self {
            BaseEstimator::LogisticRegression(e) => e,
            BaseEstimator::LinearRegression(e) => e,
            BaseEstimator::DecisionTree(e) => e,
            BaseEstimator::Custom(e) => e.as_ref(),
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Estimator {
        match self {
            BaseEstimator::LogisticRegression(e) => e,
            BaseEstimator::LinearRegression(e) => e,
            BaseEstimator::DecisionTree(e) => e,
            BaseEstimator::Custom(e) => e.as_mut(),
        }
    }
}

impl From<LogisticRegression> for BaseEstimator {
    fn from(value: LogisticRegression) -> Self {
        BaseEstimator::LogisticRegression(value)
    }
}

impl From<LinearRegression> for BaseEstimator {
    fn from(value: LinearRegression) -> Self {
        BaseEstimator::LinearRegression(value)
    }
}

impl From<DecisionTreeClassifier> for BaseEstimator {
    fn from(value: DecisionTreeClassifier) -> Self {
        BaseEstimator::DecisionTree(value)
    }
}

impl Estimator for BaseEstimator {
    fn fit(&mut self, x: &Matrix<f64>, y: &[f64]) -> Result<(), FairnessError> {
        self.inner_mut().fit(x, y)
    }

    fn predict(&self, x: &Matrix<f64>) -> Result<Vec<f64>, FairnessError> {
        self.inner().predict(x)
    }

    fn predict_proba(&self, x: &Matrix<f64>) -> Result<Vec<f64>, FairnessError> {
        self.inner().predict_proba(x)
    }

    fn has_predict_proba(&self) -> bool {
        self.inner().has_predict_proba()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn boxed_clone(&self) -> Box<dyn Estimator> {
        Box::new(self.clone())
    }
}

/// Whether an estimator needs the protected attribute `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// `s` must be passed to `fit`.
    pub s_on_fit: bool,
    /// `s` must be passed to `predict` and `predict_proba`.
    pub s_on_predict: bool,
}

/// Protected-attribute aware estimator contract.
///
/// Every estimator declares through [`FairEstimator::CAPABILITIES`] whether
/// it consumes `s`. The meta estimator only forwards `s` to calls that
/// declare it, so implementations receive `Some(s)` exactly when their
/// capability flag is set.
pub trait FairEstimator: fmt::Debug {
    const CAPABILITIES: Capabilities;

    fn fit(&mut self, x: &Matrix<f64>, y: &[f64], s: Option<&[f64]>) -> Result<(), FairnessError>;

    fn predict(&self, x: &Matrix<f64>, s: Option<&[f64]>) -> Result<Vec<f64>, FairnessError>;

    /// Probability of the positive class.
    fn predict_proba(&self, x: &Matrix<f64>, s: Option<&[f64]>) -> Result<Vec<f64>, FairnessError>;

    fn has_predict_proba(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

/// Unwrap `s` for estimators that declared they need it.
pub(crate) fn require_s<'a>(s: Option<&'a [f64]>, estimator: &str, method: &str) -> Result<&'a [f64], FairnessError> {
    s.ok_or_else(|| FairnessError::ProtectedAttributeRequired(estimator.to_string(), method.to_string()))
}

impl FairEstimator for BaseEstimator {
    const CAPABILITIES: Capabilities = Capabilities {
        s_on_fit: false,
        s_on_predict: false,
    };

    fn fit(&mut self, x: &Matrix<f64>, y: &[f64], _s: Option<&[f64]>) -> Result<(), FairnessError> {
        Estimator::fit(self, x, y)
    }

    fn predict(&self, x: &Matrix<f64>, _s: Option<&[f64]>) -> Result<Vec<f64>, FairnessError> {
        Estimator::predict(self, x)
    }

    fn predict_proba(&self, x: &Matrix<f64>, _s: Option<&[f64]>) -> Result<Vec<f64>, FairnessError> {
        Estimator::predict_proba(self, x)
    }

    fn has_predict_proba(&self) -> bool {
        Estimator::has_predict_proba(self)
    }

    fn name(&self) -> &str {
        Estimator::name(self)
    }
}
