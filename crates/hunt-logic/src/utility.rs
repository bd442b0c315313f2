//! Risk-adjusted utility and arg-max helpers shared by the decision policies

/// Constant-absolute-risk-aversion utility of a payoff `value`.
///
/// Identity when `risk_aversion` is zero, otherwise
/// `(1 - exp(-risk_aversion * value)) / risk_aversion`. Negative
/// coefficients model risk seeking.
pub fn cara_utility(risk_aversion: f64, value: f64) -> f64 {
    if risk_aversion == 0.0 {
        value
    } else {
        (1.0 - (-risk_aversion * value).exp()) / risk_aversion
    }
}

/// Index of the largest non-NaN value, first occurrence on ties.
///
/// `None` when `values` is empty or every entry is NaN.
pub fn nan_argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the largest value, where NaN outranks everything.
///
/// The first NaN wins if one is present, otherwise the first maximum.
/// `None` only for an empty slice.
pub fn argmax(values: &[f64]) -> Option<usize> {
    if let Some(i) = values.iter().position(|v| v.is_nan()) {
        return Some(i);
    }
    nan_argmax(values)
}

/// Smallest non-NaN value, or NaN if there is none
pub fn nan_min(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, |acc, v| if acc.is_nan() || v < acc { v } else { acc })
}
