// Numeric helpers shared across the scoring models

/// Divide `num / den`, defaulting to 0.0 when the result would be
/// NaN or infinite (zero/negative denominator, non-finite inputs).
pub fn safe_ratio(num: f64, den: f64) -> f64 {
    if !num.is_finite() || !den.is_finite() || den <= 0.0 {
        return 0.0;
    }
    let ratio = num / den;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// Clamp a score into the [0, 1] range.
pub fn clamp_unit(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}
