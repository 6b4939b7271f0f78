use crate::errors::FairnessError;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    let mut s = String::new();
    for i in items {
        s.push_str(i);
        s.push_str(&String::from(", "));
    }
    s
}

pub fn fmt_vec_output(v: &[f64]) -> String {
    let mut res = String::new();
    if let Some(last) = v.len().checked_sub(1) {
        if last == 0 {
            return format!("{:.4}", v[0]);
        }
        for n in &v[..last] {
            res.push_str(format!("{:.4}", n).as_str());
            res.push_str(", ");
        }
        res.push_str(format!("{:.4}", &v[last]).as_str());
    }
    res
}

// Validation
pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), FairnessError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(FairnessError::InvalidParameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Element-wise closeness with numpy `isclose` semantics.
#[inline]
pub fn is_close(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
    (a - b).abs() <= atol + rtol * b.abs()
}

#[inline]
pub fn precision_round(n: f64, precision: i32) -> f64 {
    let p = (10.0_f64).powi(precision);
    (n * p).round() / p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round() {
        assert_eq!(0.3, precision_round(0.3333, 1));
        assert_eq!(0.2, precision_round(0.2222, 1));
        assert_eq!(0.833, precision_round(0.8333, 3));
    }

    #[test]
    fn test_fmt_vec_output() {
        assert_eq!(fmt_vec_output(&[0.5]), "0.5000");
        assert_eq!(fmt_vec_output(&[1.0, 0.25]), "1.0000, 0.2500");
        assert_eq!(fmt_vec_output(&[]), "");
    }

    #[test]
    fn test_validate_float_parameter() {
        assert!(validate_float_parameter(0.1, 0.0, 0.5, "theta").is_ok());
        assert!(validate_float_parameter(0.6, 0.0, 0.5, "theta").is_err());
        assert!(validate_float_parameter(f64::NAN, 0.0, 0.5, "theta").is_err());
    }
}
