/// Probabilities strictly above this value are predicted as the positive class.
pub const DECISION_THRESHOLD: f64 = 0.5;
/// Default width of the reject-option critical region around the decision threshold.
pub const DEFAULT_THETA: f64 = 0.1;
/// Default one-sided confidence level, giving a 95% two-sided interval.
pub const DEFAULT_CONFIDENCE: f64 = 0.975;
/// Probabilities are clipped into [EPS, 1 - EPS] before logs and square roots.
pub const PROBABILITY_EPS: f64 = 1e-15;
/// Relative tolerance used when comparing the transform input with the fit input.
pub const TRANSFORM_RTOL: f64 = 1e-5;
/// Absolute tolerance used when comparing the transform input with the fit input.
pub const TRANSFORM_ATOL: f64 = 1e-8;
