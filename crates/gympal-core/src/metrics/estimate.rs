//! One-rep-max estimation.

/// Divisor of the Epley formula.
const EPLEY_DIVISOR: f64 = 30.0;

/// Estimate a one-rep max from a single set using the Epley formula.
///
/// Returns `0.0` when the set carries no signal: weight absent, zero,
/// negative or NaN, or reps absent, zero or negative. The result is not
/// rounded; callers round at output time.
pub fn estimate_one_rep_max(weight: Option<f64>, reps: Option<i64>) -> f64 {
    let (Some(weight), Some(reps)) = (weight, reps) else {
        return 0.0;
    };
    // `!(weight > 0.0)` also rejects NaN.
    if !(weight > 0.0) || reps <= 0 {
        return 0.0;
    }
    weight * (1.0 + reps as f64 / EPLEY_DIVISOR)
}

/// Round to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
