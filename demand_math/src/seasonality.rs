//! Seasonality and changepoint helpers
//!
//! Contains the Fourier basis used for periodic components and the
//! evenly spaced index grid used to place trend changepoints.

use std::f64::consts::PI;

/// Fourier terms for a periodic component.
///
/// Returns `[sin(2π·1·t/P), cos(2π·1·t/P), ..., sin(2π·N·t/P), cos(2π·N·t/P)]`
/// where `t` is measured in days since the Unix epoch.
pub fn fourier_terms(days_since_epoch: f64, period: f64, order: usize) -> Vec<f64> {
    let mut terms = Vec::with_capacity(order * 2);
    for k in 1..=order {
        let angle = 2.0 * PI * k as f64 * days_since_epoch / period;
        terms.push(angle.sin());
        terms.push(angle.cos());
    }
    terms
}

/// `count` evenly spaced indices over `[0, last_index]`.
///
/// Positions are rounded half to even, so `linspace_indices(3, 4)` is
/// `[0, 1, 2, 3]` and `linspace_indices(4, 3)` is `[0, 2, 4]`.
pub fn linspace_indices(last_index: usize, count: usize) -> Vec<usize> {
    match count {
        0 => Vec::new(),
        1 => vec![0],
        _ => {
            let step = last_index as f64 / (count - 1) as f64;
            (0..count)
                .map(|i| (i as f64 * step).round_ties_even() as usize)
                .collect()
        }
    }
}
