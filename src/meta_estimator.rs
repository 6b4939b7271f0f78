//! Meta estimator
//!
//! Compose a fairness-aware estimator with an optional relabelling
//! preprocessing step behind a single `fit` / `predict` interface that
//! routes the protected attribute `s` according to what the estimator
//! declares in [`FairEstimator::CAPABILITIES`].
use crate::checks::check_x_y_s;
use crate::data::Matrix;
use crate::errors::FairnessError;
use crate::estimator::{require_s, FairEstimator};
use crate::metrics::classification::accuracy_score;
use crate::preprocessing::Relabeller;
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MetaState<E> {
    estimator: E,
    relabeller: Option<Relabeller>,
}

/// Fairness-aware meta estimator.
///
/// ```ignore
/// let mut clf = FairnessAwareMetaEstimator::new(LinearACFClassifier::default(), None);
/// clf.fit(&x, &y, Some(&s))?;
/// let pred = clf.predict(&x, Some(&s))?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairnessAwareMetaEstimator<E> {
    /// Estimator prototype, cloned on every fit.
    pub estimator: E,
    /// Relabeller prototype applied to `y` before the estimator is fit.
    pub relabeller: Option<Relabeller>,
    fitted: Option<MetaState<E>>,
}

impl<E> FairnessAwareMetaEstimator<E>
where
    E: FairEstimator + Clone,
{
    pub fn new(estimator: E, relabeller: Option<Relabeller>) -> Self {
        FairnessAwareMetaEstimator {
            estimator,
            relabeller,
            fitted: None,
        }
    }

    /// The fitted estimator, `None` before `fit`.
    pub fn fitted_estimator(&self) -> Option<&E> {
        self.fitted.as_ref().map(|f| &f.estimator)
    }

    /// The fitted relabeller, `None` before `fit` or when none is configured.
    pub fn fitted_relabeller(&self) -> Option<&Relabeller> {
        self.fitted.as_ref().and_then(|f| f.relabeller.as_ref())
    }

    /// Fit the relabeller, if any, and the estimator.
    ///
    /// `s` is only forwarded to the estimator when it declares `s_on_fit`.
    /// Passing `s` is an error when neither the estimator nor a relabeller
    /// uses it.
    pub fn fit(&mut self, x: &Matrix<f64>, y: &[f64], s: Option<&[f64]>) -> Result<(), FairnessError> {
        check_x_y_s(x, y, s)?;
        let name = self.estimator.name().to_string();

        let mut relabeller = self.relabeller.clone();
        let relabelled = match relabeller.as_mut() {
            Some(r) => {
                let s = require_s(s, "Relabeller", "fit")?;
                Some(r.fit_transform(x, y, s)?)
            }
            None => None,
        };
        let y = relabelled.as_deref().unwrap_or(y);

        let mut estimator = self.estimator.clone();
        if E::CAPABILITIES.s_on_fit {
            let s = require_s(s, &name, "fit")?;
            estimator.fit(x, y, Some(s))?;
        } else {
            if relabeller.is_none() && s.is_some() {
                return Err(FairnessError::ProtectedAttributeNotAccepted(name, "fit".to_string()));
            }
            estimator.fit(x, y, None)?;
        }
        info!(
            "FairnessAwareMetaEstimator fit {} on {} rows{}.",
            name,
            x.rows,
            if relabeller.is_some() { " after relabelling" } else { "" }
        );
        self.fitted = Some(MetaState { estimator, relabeller });
        Ok(())
    }

    fn route_predict_s<'a>(&self, s: Option<&'a [f64]>, method: &str) -> Result<Option<&'a [f64]>, FairnessError> {
        let name = self.estimator.name();
        if E::CAPABILITIES.s_on_predict {
            Ok(Some(require_s(s, name, method)?))
        } else if s.is_some() {
            Err(FairnessError::ProtectedAttributeNotAccepted(
                name.to_string(),
                method.to_string(),
            ))
        } else {
            Ok(None)
        }
    }

    fn state(&self, method: &str) -> Result<&MetaState<E>, FairnessError> {
        self.fitted.as_ref().ok_or_else(|| {
            FairnessError::NotFitted(
                "FairnessAwareMetaEstimator".to_string(),
                method.to_string(),
            )
        })
    }

    /// Predict labels, forwarding `s` when the estimator declares `s_on_predict`.
    pub fn predict(&self, x: &Matrix<f64>, s: Option<&[f64]>) -> Result<Vec<f64>, FairnessError> {
        let state = self.state("predict")?;
        let s = self.route_predict_s(s, "predict")?;
        state.estimator.predict(x, s)
    }

    /// Predict class-1 probabilities, routing `s` like [`Self::predict`].
    pub fn predict_proba(&self, x: &Matrix<f64>, s: Option<&[f64]>) -> Result<Vec<f64>, FairnessError> {
        if !self.estimator.has_predict_proba() {
            return Err(FairnessError::ProbabilityUnsupported(self.estimator.name().to_string()));
        }
        let state = self.state("predict_proba")?;
        let s = self.route_predict_s(s, "predict_proba")?;
        state.estimator.predict_proba(x, s)
    }

    /// Accuracy of the predictions against `y`.
    pub fn score(&self, x: &Matrix<f64>, y: &[f64], s: Option<&[f64]>) -> Result<f64, FairnessError> {
        let pred = self.predict(x, s)?;
        Ok(accuracy_score(y, &pred))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::BaseEstimator;
    use crate::linear_model::{LinearACFClassifier, LinearRegression, LogisticRegression};
    use crate::postprocessing::{MultipleROClassifier, SingleROClassifier};

    fn linear_data() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut data: Vec<f64> = (0..10).map(f64::from).collect();
        data.extend((11..21).map(f64::from));
        let y = vec![0., 0., 0., 0., 0., 1., 1., 1., 1., 1.];
        let s = vec![1., 1., 1., 1., 1., 0., 0., 0., 0., 0.];
        (data, y, s)
    }

    #[test]
    fn test_plain_estimator() {
        let (data, y, s) = linear_data();
        let x = Matrix::new(&data, 10, 2);
        let mut clf = FairnessAwareMetaEstimator::new(BaseEstimator::from(LogisticRegression::default()), None);
        assert!(matches!(clf.predict(&x, None), Err(FairnessError::NotFitted(_, _))));
        clf.fit(&x, &y, None).unwrap();
        assert_eq!(clf.predict(&x, None).unwrap(), y);
        assert_eq!(clf.predict_proba(&x, None).unwrap().len(), 10);
        assert_eq!(clf.score(&x, &y, None).unwrap(), 1.0);
        // the estimator doesn't accept s and no relabeller uses it
        assert!(matches!(
            clf.fit(&x, &y, Some(&s)),
            Err(FairnessError::ProtectedAttributeNotAccepted(_, _))
        ));
        assert!(matches!(
            clf.predict(&x, Some(&s)),
            Err(FairnessError::ProtectedAttributeNotAccepted(_, _))
        ));
    }

    #[test]
    fn test_counterfactually_fair_estimator() {
        let (data, y, s) = linear_data();
        let x = Matrix::new(&data, 10, 2);
        let acf = LinearACFClassifier::new(
            LogisticRegression::default().into(),
            LinearRegression::default().into(),
            LogisticRegression::default().into(),
            "absolute",
        )
        .unwrap();
        let mut clf = FairnessAwareMetaEstimator::new(acf, None);
        clf.fit(&x, &y, Some(&s)).unwrap();
        assert_eq!(clf.predict(&x, Some(&s)).unwrap().len(), 10);
        assert_eq!(clf.predict_proba(&x, Some(&s)).unwrap().len(), 10);

        assert!(matches!(
            clf.fit(&x, &y, None),
            Err(FairnessError::ProtectedAttributeRequired(_, _))
        ));
        assert!(matches!(
            clf.predict(&x, None),
            Err(FairnessError::ProtectedAttributeRequired(_, _))
        ));
        assert!(matches!(
            clf.predict_proba(&x, None),
            Err(FairnessError::ProtectedAttributeRequired(_, _))
        ));
    }

    #[test]
    fn test_relabeller() {
        let (data, y, s) = linear_data();
        let x = Matrix::new(&data, 10, 2);
        let mut clf = FairnessAwareMetaEstimator::new(
            BaseEstimator::from(LogisticRegression::default()),
            Some(Relabeller::default()),
        );
        clf.fit(&x, &y, Some(&s)).unwrap();
        assert_eq!(clf.fitted_relabeller().unwrap().n_relabels(), Some(3));
        // the configured relabeller stays a prototype
        assert!(clf.relabeller.as_ref().unwrap().n_relabels().is_none());
        assert_eq!(clf.predict(&x, None).unwrap().len(), 10);
        assert_eq!(clf.predict_proba(&x, None).unwrap().len(), 10);
        assert!(matches!(
            clf.predict(&x, Some(&s)),
            Err(FairnessError::ProtectedAttributeNotAccepted(_, _))
        ));
        assert!(matches!(
            clf.predict_proba(&x, Some(&s)),
            Err(FairnessError::ProtectedAttributeNotAccepted(_, _))
        ));
        // relabelling needs s
        assert!(matches!(
            clf.fit(&x, &y, None),
            Err(FairnessError::ProtectedAttributeRequired(_, _))
        ));
    }

    #[test]
    fn test_reject_option_estimators() {
        let (data, y, s) = linear_data();
        let x = Matrix::new(&data, 10, 2);

        let mut single = FairnessAwareMetaEstimator::new(SingleROClassifier::default(), None);
        single.fit(&x, &y, None).unwrap();
        assert_eq!(single.predict(&x, Some(&s)).unwrap().len(), 10);
        assert_eq!(single.predict_proba(&x, Some(&s)).unwrap().len(), 10);
        assert!(single.fit(&x, &y, Some(&s)).is_err());
        assert!(single.predict(&x, None).is_err());
        assert!(single.predict_proba(&x, None).is_err());

        let mut multiple = FairnessAwareMetaEstimator::new(MultipleROClassifier::default(), None);
        multiple.fit(&x, &y, None).unwrap();
        assert_eq!(multiple.predict(&x, Some(&s)).unwrap().len(), 10);
        assert_eq!(multiple.predict_proba(&x, Some(&s)).unwrap().len(), 10);
        assert!(multiple.fit(&x, &y, Some(&s)).is_err());
        assert!(multiple.predict(&x, None).is_err());
        assert!(multiple.predict_proba(&x, None).is_err());
    }

    #[test]
    fn test_estimator_without_probabilities() {
        let (data, _, _) = linear_data();
        let x = Matrix::new(&data, 10, 2);
        let target: Vec<f64> = (0..10).map(f64::from).map(|v| if v > 4.0 { 1.0 } else { 0.0 }).collect();
        let mut clf = FairnessAwareMetaEstimator::new(BaseEstimator::from(LinearRegression::default()), None);
        clf.fit(&x, &target, None).unwrap();
        assert!(matches!(
            clf.predict_proba(&x, None),
            Err(FairnessError::ProbabilityUnsupported(_))
        ));
    }
}
