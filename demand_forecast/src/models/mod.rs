//! Forecasting models for dish sales histories

use crate::data::SalesHistory;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use std::fmt::Debug;

/// Forecast result containing point estimates and intervals per date
#[derive(Debug, Clone)]
pub struct ForecastResult {
    /// Forecasted dates
    dates: Vec<NaiveDate>,
    /// Point estimates
    values: Vec<f64>,
    /// Lower and upper bounds
    intervals: Vec<(f64, f64)>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>, intervals: Vec<(f64, f64)>) -> Result<Self> {
        if values.len() != dates.len() {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match dates length ({})",
                values.len(),
                dates.len()
            )));
        }

        if values.len() != intervals.len() {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match intervals length ({})",
                values.len(),
                intervals.len()
            )));
        }

        Ok(Self {
            dates,
            values,
            intervals,
        })
    }

    /// Get the forecasted dates
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Get the point estimates
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the interval bounds
    pub fn intervals(&self) -> &[(f64, f64)] {
        &self.intervals
    }

    /// Number of forecasted dates
    pub fn horizons(&self) -> usize {
        self.values.len()
    }

    /// Iterate over `(date, estimate, lower, upper)`
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, f64, f64, f64)> + '_ {
        self.dates
            .iter()
            .zip(&self.values)
            .zip(&self.intervals)
            .map(|((date, value), (lower, upper))| (*date, *value, *lower, *upper))
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Predict point estimates and intervals for the given dates
    fn predict(&self, dates: &[NaiveDate]) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a sales history
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a sales history
    fn train(&self, history: &SalesHistory) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod additive;
