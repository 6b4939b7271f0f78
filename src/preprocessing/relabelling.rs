//! Relabelling
//!
//! Flip the fewest training labels needed to equalize the positive outcome
//! rate of both protected groups. Labels closest to the decision boundary of
//! a ranker are flipped first: the highest ranked negatives of the
//! disadvantaged group are promoted and the lowest ranked positives of the
//! advantaged group are demoted.
//!
//! Reference:
//! Kamiran, F., & Calders, T. (2012). Data preprocessing techniques for
//! classification without discrimination. Knowledge and Information Systems.
use crate::checks::check_x_y_s;
use crate::constants::{TRANSFORM_ATOL, TRANSFORM_RTOL};
use crate::data::Matrix;
use crate::errors::FairnessError;
use crate::estimator::{BaseEstimator, Estimator};
use crate::linear_model::LogisticRegression;
use crate::utils::is_close;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Number of promotions, and of demotions, that equalize the group rates.
///
/// `ceil((n_s1 * n_s0_positive - n_s0 * n_s1_positive) / n)`
pub fn n_relabels(y: &[f64], s: &[f64]) -> i64 {
    let total = s.len() as f64;
    let s1 = s.iter().sum::<f64>();
    let s0 = total - s1;
    let (s0_positive, s1_positive) = y.iter().zip(s).fold((0.0, 0.0), |(p0, p1), (y_, s_)| {
        if *y_ == 1.0 && *s_ == 0.0 {
            (p0 + 1.0, p1)
        } else if *y_ == 1.0 {
            (p0, p1 + 1.0)
        } else {
            (p0, p1)
        }
    });
    ((s1 * s0_positive - s0 * s1_positive) / total).ceil() as i64
}

/// Indices of `candidates` ordered by ascending rank, ties keep index order.
fn ordered_by_rank(candidates: Vec<usize>, ranks: &[f64]) -> Vec<usize> {
    let mut candidates = candidates;
    candidates.sort_by(|a, b| ranks[*a].total_cmp(&ranks[*b]));
    candidates
}

/// Flip the labels selected by `ranks`.
fn relabel_targets(y: &[f64], s: &[f64], ranks: &[f64], n_relabels: i64) -> Vec<f64> {
    let mut relabelled = y.to_vec();
    if n_relabels <= 0 {
        return relabelled;
    }
    let n = n_relabels as usize;

    let promote = ordered_by_rank(
        (0..y.len()).filter(|i| s[*i] == 1.0 && y[*i] == 0.0).collect(),
        ranks,
    );
    let demote = ordered_by_rank(
        (0..y.len()).filter(|i| s[*i] == 0.0 && y[*i] == 1.0).collect(),
        ranks,
    );
    for i in promote.iter().rev().take(n) {
        relabelled[*i] = 1.0;
    }
    for i in demote.iter().take(n) {
        relabelled[*i] = 0.0;
    }
    relabelled
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RelabellerState {
    n_relabels: i64,
    ranks: Vec<f64>,
    /// Column-major copy of the fit input.
    x: Vec<f64>,
    rows: usize,
    cols: usize,
    y: Vec<f64>,
    s: Vec<f64>,
}

/// Relabel training targets for fairness-aware model training.
///
/// `transform` is only defined on the data the relabeller was fit with, so
/// it is normally used through [`Relabeller::fit_transform`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relabeller {
    /// Estimator ranking observations by their class-1 probability.
    pub ranker: BaseEstimator,
    fitted: Option<RelabellerState>,
}

impl Default for Relabeller {
    fn default() -> Self {
        Relabeller {
            ranker: LogisticRegression::default().into(),
            fitted: None,
        }
    }
}

impl Relabeller {
    /// Create a relabeller with a ranker that produces probabilities.
    pub fn new(ranker: BaseEstimator) -> Result<Self, FairnessError> {
        if !ranker.has_predict_proba() {
            return Err(FairnessError::ProbabilityUnsupported(ranker.name().to_string()));
        }
        Ok(Relabeller { ranker, fitted: None })
    }

    /// Compute the number of relabels and rank every training row.
    pub fn fit(&mut self, x: &Matrix<f64>, y: &[f64], s: &[f64]) -> Result<(), FairnessError> {
        check_x_y_s(x, y, Some(s))?;
        let n_relabels = n_relabels(y, s);
        let mut ranker = self.ranker.clone();
        ranker.fit(x, y)?;
        let ranks = ranker.predict_proba(x)?;

        if n_relabels <= 0 {
            warn!(
                "Positive rate of s=1 is not below s=0 (n_relabels = {}), no labels will be flipped.",
                n_relabels
            );
        }
        info!("Relabeller fit on {} rows, n_relabels = {}.", x.rows, n_relabels);
        self.fitted = Some(RelabellerState {
            n_relabels,
            ranks,
            x: x.data.to_vec(),
            rows: x.rows,
            cols: x.cols,
            y: y.to_vec(),
            s: s.to_vec(),
        });
        Ok(())
    }

    /// Relabelled targets of the fit data. `x` must equal the fit input.
    pub fn transform(&self, x: &Matrix<f64>) -> Result<Vec<f64>, FairnessError> {
        let state = self
            .fitted
            .as_ref()
            .ok_or_else(|| FairnessError::NotFitted("Relabeller".to_string(), "transform".to_string()))?;
        let same_input = x.rows == state.rows
            && x.cols == state.cols
            && x.data.len() == state.x.len()
            && x
                .data
                .iter()
                .zip(&state.x)
                .all(|(a, b)| is_close(*a, *b, TRANSFORM_RTOL, TRANSFORM_ATOL));
        if !same_input {
            return Err(FairnessError::TransformInputMismatch);
        }
        Ok(relabel_targets(&state.y, &state.s, &state.ranks, state.n_relabels))
    }

    /// Fit and relabel `y` in one call.
    pub fn fit_transform(&mut self, x: &Matrix<f64>, y: &[f64], s: &[f64]) -> Result<Vec<f64>, FairnessError> {
        self.fit(x, y, s)?;
        self.transform(x)
    }

    /// Number of promotions and demotions, `None` before `fit`.
    pub fn n_relabels(&self) -> Option<i64> {
        self.fitted.as_ref().map(|f| f.n_relabels)
    }

    /// Class-1 probability of every training row, `None` before `fit`.
    pub fn ranks(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.ranks.as_slice())
    }
}
