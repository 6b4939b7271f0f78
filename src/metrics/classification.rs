use crate::constants::PROBABILITY_EPS;

/// Fraction of predictions equal to the labels.
pub fn accuracy_score(y: &[f64], yhat: &[f64]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let correct = y.iter().zip(yhat).filter(|(y_, yhat_)| y_ == yhat_).count();
    correct as f64 / y.len() as f64
}

/// Mean binary cross entropy of class-1 probabilities.
pub fn log_loss(y: &[f64], proba: &[f64]) -> f64 {
    let res = y
        .iter()
        .zip(proba)
        .map(|(y_, p_)| {
            let p_ = p_.clamp(PROBABILITY_EPS, 1.0 - PROBABILITY_EPS);
            -(*y_ * p_.ln() + (1.0 - *y_) * (1.0 - p_).ln())
        })
        .sum::<f64>();
    res / y.len() as f64
}
