//! Summary statistics over samples

use crate::{MathError, Result};
use statrs::statistics::{Data, OrderStatistics, Statistics};

/// Sample quantile of `samples` at probability `tau`
///
/// Uses statrs' median-unbiased estimator (Hyndman and Fan type 8), not
/// the linear type 7 of numpy's default percentile. The two agree closely
/// on large samples such as simulated forecast draws.
pub fn quantile(samples: &[f64], tau: f64) -> Result<f64> {
    if samples.is_empty() {
        return Err(MathError::InsufficientData(
            "Quantile of an empty sample".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&tau) {
        return Err(MathError::InvalidInput(format!(
            "Quantile probability {} is outside [0, 1]",
            tau
        )));
    }

    let mut data = Data::new(samples.to_vec());
    Ok(data.quantile(tau))
}

/// Sample standard deviation; 0.0 when it is undefined
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let sd = values.iter().std_dev();
    if sd.is_finite() {
        sd
    } else {
        0.0
    }
}

/// Centers and scales a regressor column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standardizer {
    /// Column mean
    pub mean: f64,
    /// Column standard deviation, or 1.0 for a constant column
    pub scale: f64,
}

impl Standardizer {
    /// Estimate mean and scale from the training column
    pub fn fit(values: &[f64]) -> Self {
        let mean = if values.is_empty() {
            0.0
        } else {
            values.iter().mean()
        };

        let sd = std_dev(values);
        let scale = if sd > 0.0 { sd } else { 1.0 };

        Self { mean, scale }
    }

    /// Standardize one value
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }
}
