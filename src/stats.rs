//! Stats
//!
//! Residual functions for binary outcomes and the pooled-variance t interval
//! used by the discrimination metrics.
//!
//! Reference for the residual definitions:
//! <https://web.as.uky.edu/statistics/users/pbreheny/760/S11/notes/4-12.pdf>
use crate::constants::PROBABILITY_EPS;
use crate::errors::FairnessError;
use crate::utils::validate_float_parameter;
use statrs::distribution::{ContinuousCDF, StudentsT};

#[inline]
fn clip_probability(p: f64) -> f64 {
    p.clamp(PROBABILITY_EPS, 1.0 - PROBABILITY_EPS)
}

/// Pearson residual of a single binary observation.
///
/// `(y - p) / sqrt(p * (1 - p))`
#[inline]
pub fn pearson_residual(y: f64, p: f64) -> f64 {
    let p = clip_probability(p);
    (y - p) / (p * (1.0 - p)).sqrt()
}

/// Deviance residual of a single binary observation.
///
/// `sign * sqrt(-2 * (y * ln(p) + (1 - y) * ln(1 - p)))`, where sign is +1
/// when `y = 1` and -1 otherwise.
#[inline]
pub fn deviance_residual(y: f64, p: f64) -> f64 {
    let p = clip_probability(p);
    let sign = if y == 1.0 { 1.0 } else { -1.0 };
    sign * (-2.0 * (y * p.ln() + (1.0 - y) * (1.0 - p).ln())).sqrt()
}

/// Compute Pearson residuals for binary labels `y` and predicted probabilities `pred`.
pub fn pearson_residuals(y: &[f64], pred: &[f64]) -> Vec<f64> {
    y.iter().zip(pred).map(|(y_, p_)| pearson_residual(*y_, *p_)).collect()
}

/// Compute Deviance residuals for binary labels `y` and predicted probabilities `pred`.
pub fn deviance_residuals(y: &[f64], pred: &[f64]) -> Vec<f64> {
    y.iter().zip(pred).map(|(y_, p_)| deviance_residual(*y_, *p_)).collect()
}

/// Mean and unbiased sample variance. The variance is 0 for fewer than two values.
pub fn mean_variance(x: &[f64]) -> (f64, f64) {
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    if x.len() < 2 {
        return (mean, 0.0);
    }
    let ss = x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
    (mean, ss / (n - 1.0))
}

/// Half-width of the confidence interval for a difference in two group means.
///
/// Uses the pooled standard deviation of both groups and the Student t
/// quantile at `confidence` with `n0 + n1 - 2` degrees of freedom. Returns NaN
/// when there are not enough observations to estimate the pooled variance.
///
/// * `group0` - Observations of the first group.
/// * `group1` - Observations of the second group.
/// * `confidence` - One-sided quantile, `0.975` gives a 95% two-sided interval.
pub fn pooled_t_margin(group0: &[f64], group1: &[f64], confidence: f64) -> Result<f64, FairnessError> {
    validate_float_parameter(confidence, 0.5, 1.0, "confidence")?;
    if confidence >= 1.0 {
        return Err(FairnessError::InvalidParameter(
            "confidence".to_string(),
            "real value below 1".to_string(),
            confidence.to_string(),
        ));
    }
    let n0 = group0.len() as f64;
    let n1 = group1.len() as f64;
    let dof = n0 + n1 - 2.0;
    if group0.is_empty() || group1.is_empty() || dof < 1.0 {
        return Ok(f64::NAN);
    }
    let (_, var0) = mean_variance(group0);
    let (_, var1) = mean_variance(group1);
    let pooled_sd = (((n0 - 1.0) * var0 + (n1 - 1.0) * var1) / dof).sqrt();
    let standard_error = pooled_sd * (1.0 / n0 + 1.0 / n1).sqrt();
    let t = StudentsT::new(0.0, 1.0, dof)
        .map_err(|e| FairnessError::InvalidParameter("degrees of freedom".to_string(), "> 0".to_string(), e.to_string()))?
        .inverse_cdf(confidence);
    Ok(t * standard_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::precision_round;

    fn label_pred_data() -> (Vec<f64>, Vec<f64>) {
        (
            vec![1., 1., 1., 1., 0., 0., 0., 0.],
            vec![0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1],
        )
    }

    #[test]
    fn test_pearson_residuals_sign() {
        let (y, pred) = label_pred_data();
        let r = pearson_residuals(&y, &pred);
        assert!(r[..4].iter().all(|v| *v > 0.0));
        assert!(r[4..].iter().all(|v| *v < 0.0));
        // (1 - 0.5) / sqrt(0.25)
        assert_eq!(precision_round(r[3], 10), 1.0);
    }

    #[test]
    fn test_deviance_residuals_sign() {
        let (y, pred) = label_pred_data();
        let d = deviance_residuals(&y, &pred);
        assert!(d[..4].iter().all(|v| *v > 0.0));
        assert!(d[4..].iter().all(|v| *v < 0.0));
        // sqrt(-2 ln 0.5)
        assert_eq!(precision_round(d[3], 6), precision_round((2.0 * 2f64.ln()).sqrt(), 6));
    }

    #[test]
    fn test_residuals_are_finite_at_the_boundary() {
        assert!(pearson_residual(1.0, 1.0).is_finite());
        assert!(deviance_residual(0.0, 1.0).is_finite());
        assert!(deviance_residual(1.0, 0.0).is_finite());
    }

    #[test]
    fn test_mean_variance() {
        let (m, v) = mean_variance(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m, 2.5);
        assert_eq!(precision_round(v, 6), 1.666667);
        assert_eq!(mean_variance(&[3.0]), (3.0, 0.0));
    }

    #[test]
    fn test_pooled_t_margin() {
        let g0 = vec![1., 1., 0., 0.];
        let g1 = vec![1., 0., 0., 0.];
        let m = pooled_t_margin(&g0, &g1, 0.975).unwrap();
        // pooled sd = sqrt((3 * 1/3 + 3 * 1/4) / 6), t(0.975, 6) = 2.446912
        let expected = 2.446912 * ((1.0 + 0.75) / 6.0f64).sqrt() * 0.5f64.sqrt();
        assert_eq!(precision_round(m, 4), precision_round(expected, 4));
    }

    #[test]
    fn test_pooled_t_margin_degenerate() {
        assert!(pooled_t_margin(&[1.0], &[0.0], 0.975).unwrap().is_nan());
        assert_eq!(pooled_t_margin(&[1.0, 1.0], &[0.0, 0.0], 0.975).unwrap(), 0.0);
        assert!(pooled_t_margin(&[1.0, 1.0], &[0.0, 0.0], 1.0).is_err());
        assert!(pooled_t_margin(&[1.0, 1.0], &[0.0, 0.0], 0.2).is_err());
    }
}
