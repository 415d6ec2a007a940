// src/services/calculations.rs

/// Round to `decimals` places. Halves go to the even neighbour, so a rank
/// of 1 in 32 (3.125%) reports as 3.12.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

pub fn calculate_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Percentage change from `base` to `value`; 0 when the base is not usable.
pub fn pct_change(base: f64, value: f64) -> f64 {
    if base == 0.0 || !base.is_finite() || !value.is_finite() {
        0.0
    } else {
        (value - base) / base * 100.0
    }
}
