//! Fairness metrics
//!
//! Discrimination scores of a binary outcome with respect to a binary
//! protected attribute `s`, where `s = 0` marks the advantaged group and
//! `s = 1` the disadvantaged group.
//!
//! Reference:
//! Zliobaite, I. (2015). A survey on measuring indirect discrimination in
//! machine learning. arXiv preprint arXiv:1511.00148.
use crate::checks::{check_binary, check_length};
use crate::constants::DEFAULT_CONFIDENCE;
use crate::errors::FairnessError;
use crate::stats::pooled_t_margin;
use log::warn;
use serde::{Deserialize, Serialize};

/// Point estimate of a mean difference and its two-sided confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanDifference {
    /// `p(y+ | s0) - p(y+ | s1)`.
    pub point: f64,
    /// Lower confidence bound.
    pub lower: f64,
    /// Upper confidence bound.
    pub upper: f64,
}

fn split_groups(y: &[f64], s: &[f64]) -> Result<(Vec<f64>, Vec<f64>), FairnessError> {
    let (advantaged, disadvantaged): (Vec<_>, Vec<_>) = y.iter().zip(s).partition(|(_, s_)| **s_ == 0.0);
    if advantaged.is_empty() {
        return Err(FairnessError::EmptyGroup(0));
    }
    if disadvantaged.is_empty() {
        return Err(FairnessError::EmptyGroup(1));
    }
    Ok((
        advantaged.into_iter().map(|(y_, _)| *y_).collect(),
        disadvantaged.into_iter().map(|(y_, _)| *y_).collect(),
    ))
}

fn check_y_s(y: &[f64], s: &[f64]) -> Result<(), FairnessError> {
    if y.is_empty() {
        return Err(FairnessError::EmptyData("y".to_string()));
    }
    check_length(s, y.len(), "s")?;
    check_binary(y, "y")?;
    check_binary(s, "s")
}

#[inline]
fn mean(x: &[f64]) -> f64 {
    x.iter().sum::<f64>() / x.len() as f64
}

/// Compute the mean difference in `y` with respect to protected class `s`.
///
/// For a binary target the mean difference is the gap in positive-outcome
/// rates between the groups:
///
/// `mean_difference = p(y+ | s0) - p(y+ | s1)`
///
/// A value of 1 means every advantaged observation and no disadvantaged
/// observation has the positive outcome, -1 is the reverse, and 0 means both
/// groups have the same rate. The interval is the pooled-variance t interval
/// at the default 95% two-sided level.
///
/// * `y` - Binary target, 1 is the desirable outcome.
/// * `s` - Binary protected class, 0 advantaged and 1 disadvantaged.
pub fn mean_difference(y: &[f64], s: &[f64]) -> Result<MeanDifference, FairnessError> {
    mean_difference_ci(y, s, DEFAULT_CONFIDENCE)
}

/// Same as [`mean_difference`] with a custom one-sided `confidence` quantile.
pub fn mean_difference_ci(y: &[f64], s: &[f64], confidence: f64) -> Result<MeanDifference, FairnessError> {
    check_y_s(y, s)?;
    let (y0, y1) = split_groups(y, s)?;
    let point = mean(&y0) - mean(&y1);
    let margin = pooled_t_margin(&y0, &y1, confidence)?;
    Ok(MeanDifference {
        point,
        lower: point - margin,
        upper: point + margin,
    })
}

/// Compute the normalized mean difference in `y` with respect to `s`.
///
/// The mean difference divided by the largest difference attainable at the
/// observed positive rate and group sizes:
///
/// `d_max = min(p(y+) / p(s0), p(y-) / p(s1))`
///
/// so the score reaches ±1 whenever discrimination is as large as the data
/// allows. `norm_y` selects the outcome used for `d_max`, which defaults to
/// `y`; passing the ground truth lets predictions be normalized against the
/// observed base rate. Confidence bounds are clipped to [-1, 1]. When
/// `d_max` is zero there is no room for discrimination and the unnormalized
/// mean difference is returned.
pub fn normalized_mean_difference(
    y: &[f64],
    s: &[f64],
    norm_y: Option<&[f64]>,
) -> Result<MeanDifference, FairnessError> {
    normalized_mean_difference_ci(y, s, norm_y, DEFAULT_CONFIDENCE)
}

/// Same as [`normalized_mean_difference`] with a custom one-sided `confidence` quantile.
pub fn normalized_mean_difference_ci(
    y: &[f64],
    s: &[f64],
    norm_y: Option<&[f64]>,
    confidence: f64,
) -> Result<MeanDifference, FairnessError> {
    let norm_y = norm_y.unwrap_or(y);
    check_length(norm_y, y.len(), "norm_y")?;
    check_binary(norm_y, "norm_y")?;
    let md = mean_difference_ci(y, s, confidence)?;

    let y_rate = mean(norm_y);
    let s_rate = mean(s);
    let d_max = f64::min(y_rate / (1.0 - s_rate), (1.0 - y_rate) / s_rate);
    if d_max == 0.0 {
        warn!("Normalization factor is 0, returning the unnormalized mean difference.");
        return Ok(md);
    }
    Ok(MeanDifference {
        point: md.point / d_max,
        lower: (md.lower / d_max).clamp(-1.0, 1.0),
        upper: (md.upper / d_max).clamp(-1.0, 1.0),
    })
}

/// Reduction in absolute mean difference achieved by predictions.
///
/// `|mean_difference(y, s)| - |mean_difference(pred, s)|`, positive when the
/// predictions are less discriminatory than the observed labels.
pub fn abs_mean_difference_delta(y: &[f64], pred: &[f64], s: &[f64]) -> Result<f64, FairnessError> {
    check_length(pred, y.len(), "pred")?;
    let observed = mean_difference(y, s)?;
    let predicted = mean_difference(pred, s)?;
    Ok(observed.point.abs() - predicted.point.abs())
}

/// Reduction in absolute normalized mean difference achieved by predictions.
///
/// The prediction score is normalized with the base rate of `y`, so both
/// terms share the same `d_max`.
pub fn abs_normalized_mean_difference_delta(y: &[f64], pred: &[f64], s: &[f64]) -> Result<f64, FairnessError> {
    check_length(pred, y.len(), "pred")?;
    let observed = normalized_mean_difference(y, s, None)?;
    let predicted = normalized_mean_difference(pred, s, Some(y))?;
    Ok(observed.point.abs() - predicted.point.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::precision_round;

    const S: [f64; 8] = [0., 0., 0., 0., 1., 1., 1., 1.];

    #[test]
    fn test_mean_difference_full_discrimination() {
        let y = vec![1., 1., 1., 1., 0., 0., 0., 0.];
        let md = mean_difference(&y, &S).unwrap();
        assert_eq!(md.point, 1.0);
        // no variance within either group
        assert_eq!(md.lower, 1.0);
        assert_eq!(md.upper, 1.0);
        assert_eq!(normalized_mean_difference(&y, &S, None).unwrap().point, 1.0);
    }

    #[test]
    fn test_mean_difference_partial_discrimination() {
        let y = vec![1., 1., 1., 1., 0., 0., 1., 1.];
        assert_eq!(mean_difference(&y, &S).unwrap().point, 0.5);
        assert_eq!(normalized_mean_difference(&y, &S, None).unwrap().point, 1.0);
    }

    #[test]
    fn test_mean_difference_no_discrimination() {
        let y = vec![0., 0., 1., 1., 0., 0., 1., 1.];
        assert_eq!(mean_difference(&y, &S).unwrap().point, 0.0);
        assert_eq!(normalized_mean_difference(&y, &S, None).unwrap().point, 0.0);
    }

    #[test]
    fn test_mean_difference_reverse_discrimination() {
        let partial = vec![1., 1., 0., 0., 1., 1., 1., 1.];
        assert_eq!(mean_difference(&partial, &S).unwrap().point, -0.5);
        assert_eq!(normalized_mean_difference(&partial, &S, None).unwrap().point, -1.0);

        let full = vec![0., 0., 0., 0., 1., 1., 1., 1.];
        assert_eq!(mean_difference(&full, &S).unwrap().point, -1.0);
        assert_eq!(normalized_mean_difference(&full, &S, None).unwrap().point, -1.0);
    }

    #[test]
    fn test_confidence_interval_contains_point() {
        let y = vec![1., 1., 0., 1., 0., 1., 0., 0.];
        let md = mean_difference(&y, &S).unwrap();
        assert_eq!(md.point, 0.5);
        assert!(md.lower < md.point && md.point < md.upper);
        assert_eq!(precision_round(md.upper - md.point, 10), precision_round(md.point - md.lower, 10));

        let wide = mean_difference_ci(&y, &S, 0.995).unwrap();
        assert!(wide.lower < md.lower);
    }

    #[test]
    fn test_normalized_bounds_are_clipped() {
        let y = vec![1., 1., 0., 1., 0., 1., 0., 0.];
        let nmd = normalized_mean_difference(&y, &S, None).unwrap();
        assert!(nmd.lower >= -1.0 && nmd.upper <= 1.0);
        assert!(nmd.lower <= nmd.point && nmd.point <= nmd.upper);
    }

    #[test]
    fn test_zero_normalization_factor() {
        // every outcome positive, d_max = min(1 / 0.5, 0 / 0.5) = 0
        let y = vec![1.; 8];
        let md = mean_difference(&y, &S).unwrap();
        let nmd = normalized_mean_difference(&y, &S, None).unwrap();
        assert_eq!(md, nmd);
        assert_eq!(nmd.point, 0.0);
    }

    #[test]
    fn test_error_non_binary_protected_class() {
        let y = vec![0., 0., 0., 0., 1., 1., 1., 1.];
        let s = vec![1., 0., 0., 1., 2., 3., 1., 0.];
        assert!(matches!(mean_difference(&y, &s), Err(FairnessError::NotBinary(_, _))));
        assert!(normalized_mean_difference(&y, &s, None).is_err());
    }

    #[test]
    fn test_error_non_binary_target() {
        let y = vec![0.5, 0., 0., 0., 1., 1., 1., 1.];
        assert!(matches!(mean_difference(&y, &S), Err(FairnessError::NotBinary(_, _))));
        assert!(mean_difference(&[f64::NAN, 1.0], &[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_error_length_and_groups() {
        assert!(matches!(
            mean_difference(&[1., 0.], &[0., 1., 1.]),
            Err(FairnessError::LengthMismatch(_, 2, 3))
        ));
        assert!(matches!(
            mean_difference(&[1., 0.], &[1., 1.]),
            Err(FairnessError::EmptyGroup(0))
        ));
        assert!(matches!(mean_difference(&[], &[]), Err(FairnessError::EmptyData(_))));
    }

    #[test]
    fn test_abs_mean_difference_delta() {
        let y = vec![1., 1., 1., 1., 0., 0., 0., 0.];
        let fair_pred = vec![0., 0., 1., 1., 0., 0., 1., 1.];
        assert_eq!(abs_mean_difference_delta(&y, &fair_pred, &S).unwrap(), 1.0);
        assert_eq!(abs_mean_difference_delta(&y, &y, &S).unwrap(), 0.0);
        assert_eq!(abs_normalized_mean_difference_delta(&y, &fair_pred, &S).unwrap(), 1.0);
    }

    #[test]
    fn test_abs_normalized_delta_uses_observed_base_rate() {
        let y = vec![1., 1., 1., 1., 0., 0., 1., 1.];
        let pred = vec![1., 1., 1., 1., 0., 0., 0., 0.];
        // d_max from y is 0.5, so the prediction scores 1 / 0.5 = 2
        let delta = abs_normalized_mean_difference_delta(&y, &pred, &S).unwrap();
        assert_eq!(delta, 1.0 - 2.0);
    }
}
