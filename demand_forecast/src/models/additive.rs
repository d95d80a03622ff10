//! Additive trend and seasonality model
//!
//! Models a dish's daily sales as
//!
//! ```text
//! y(t) = trend(t) + weekly(t) + yearly(t) + beta * day_of_week(t) + noise
//! ```
//!
//! The trend is piecewise linear with changepoints spread over the first
//! part of the history. Periodic components are Fourier series, and the day
//! of week enters as a standardized extra regressor. All coefficients are
//! fitted jointly by penalised least squares on the scaled series, where
//! each penalty is `SIGMA_PRIOR² / prior_scale²`.
//!
//! Intervals come from simulation: every sample draws new trend changes
//! over the forecast horizon and adds Gaussian observation noise with the
//! residual standard deviation.

use crate::data::SalesHistory;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use chrono::{Datelike, NaiveDate};
use demand_math::{
    fourier_terms, linspace_indices, quantile, std_dev, RidgeRegression, Standardizer,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal, Poisson};
use tracing::debug;

/// Prior scale of the observation noise on the scaled series
const SIGMA_PRIOR: f64 = 0.5;

/// Weekly seasonality is fitted once the history spans two weeks
const WEEKLY_MIN_SPAN_DAYS: i64 = 14;
const WEEKLY_PERIOD: f64 = 7.0;
const WEEKLY_ORDER: usize = 3;

/// Yearly seasonality is fitted once the history spans two years
const YEARLY_MIN_SPAN_DAYS: i64 = 730;
const YEARLY_PERIOD: f64 = 365.25;
const YEARLY_ORDER: usize = 10;

/// Additive trend + seasonality model
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    /// Name of the model
    name: String,
    /// Maximum number of trend changepoints
    n_changepoints: usize,
    /// Share of the history in which changepoints may be placed
    changepoint_range: f64,
    /// Prior scale of the trend changes
    changepoint_prior_scale: f64,
    /// Prior scale of the base intercept and slope
    trend_prior_scale: f64,
    /// Prior scale of the Fourier coefficients
    seasonality_prior_scale: f64,
    /// Prior scale of the day-of-week regressor
    regressor_prior_scale: f64,
    /// Probability mass covered by the interval
    interval_width: f64,
    /// Number of simulations used for the interval
    uncertainty_samples: usize,
    /// Seed of the simulation RNG
    seed: u64,
}

/// Trained additive model
#[derive(Debug, Clone)]
pub struct TrainedAdditiveModel {
    /// Name of the model
    name: String,
    /// Regressor construction shared with training
    layout: FeatureLayout,
    /// Fitted coefficients on the scaled series
    regression: RidgeRegression,
    /// Largest absolute observation, used to scale the series
    y_scale: f64,
    /// Residual standard deviation on the scaled series
    sigma: f64,
    /// Mean absolute trend change, plus a floor
    mean_abs_delta: f64,
    /// Scaled time of the last observation
    t_end: f64,
    /// Probability mass covered by the interval
    interval_width: f64,
    /// Number of simulations used for the interval
    uncertainty_samples: usize,
    /// Seed of the simulation RNG
    seed: u64,
}

/// How a date is turned into a row of regressors
#[derive(Debug, Clone)]
struct FeatureLayout {
    start: NaiveDate,
    t_scale: f64,
    changepoints: Vec<f64>,
    weekly: bool,
    yearly: bool,
    day_of_week: Standardizer,
}

impl AdditiveModel {
    /// Create a new additive model
    pub fn new(interval_width: f64, uncertainty_samples: usize) -> Result<Self> {
        if interval_width <= 0.0 || interval_width >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Interval width must be between 0 and 1".to_string(),
            ));
        }
        if uncertainty_samples == 0 {
            return Err(ForecastError::InvalidParameter(
                "At least one uncertainty sample is required".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Additive (interval={})", interval_width),
            interval_width,
            uncertainty_samples,
            ..Self::default()
        })
    }

    /// Set the seed of the simulation RNG
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the maximum number of trend changepoints
    pub fn with_changepoints(mut self, n_changepoints: usize) -> Self {
        self.n_changepoints = n_changepoints;
        self
    }

    /// Set the prior scale of the trend changes
    pub fn with_changepoint_prior_scale(mut self, scale: f64) -> Result<Self> {
        if scale <= 0.0 || !scale.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "Changepoint prior scale must be positive".to_string(),
            ));
        }
        self.changepoint_prior_scale = scale;
        Ok(self)
    }

    /// Set the prior scale of the seasonal components
    pub fn with_seasonality_prior_scale(mut self, scale: f64) -> Result<Self> {
        if scale <= 0.0 || !scale.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "Seasonality prior scale must be positive".to_string(),
            ));
        }
        self.seasonality_prior_scale = scale;
        Ok(self)
    }

    /// Probability mass covered by the interval
    pub fn interval_width(&self) -> f64 {
        self.interval_width
    }

    /// Place changepoints on evenly spaced observations in the first part
    /// of the history, skipping the first observation
    fn changepoint_dates(&self, dates: &[NaiveDate]) -> Vec<NaiveDate> {
        let hist_size = (dates.len() as f64 * self.changepoint_range).floor() as usize;
        if hist_size < 2 {
            return Vec::new();
        }

        let count = self.n_changepoints.min(hist_size - 1);
        if count == 0 {
            return Vec::new();
        }

        linspace_indices(hist_size - 1, count + 1)
            .into_iter()
            .skip(1)
            .map(|idx| dates[idx])
            .collect()
    }

    /// Ridge penalty for every column of the layout
    fn penalties(&self, layout: &FeatureLayout) -> Vec<f64> {
        let penalty = |scale: f64| SIGMA_PRIOR.powi(2) / scale.powi(2);

        let mut penalties = vec![penalty(self.trend_prior_scale); 2];
        penalties.extend(vec![
            penalty(self.changepoint_prior_scale);
            layout.changepoints.len()
        ]);
        penalties.extend(vec![
            penalty(self.seasonality_prior_scale);
            layout.seasonal_width()
        ]);
        penalties.push(penalty(self.regressor_prior_scale));
        penalties
    }
}

impl Default for AdditiveModel {
    fn default() -> Self {
        Self {
            name: "Additive (interval=0.8)".to_string(),
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            trend_prior_scale: 5.0,
            seasonality_prior_scale: 10.0,
            regressor_prior_scale: 10.0,
            interval_width: 0.8,
            uncertainty_samples: 1000,
            seed: 0,
        }
    }
}

impl ForecastModel for AdditiveModel {
    type Trained = TrainedAdditiveModel;

    fn train(&self, history: &SalesHistory) -> Result<Self::Trained> {
        // Days with a missing count take no part in the fit
        let history = &history.observed();
        let dates = history.dates();
        let (start, end) = match (history.first_date(), history.last_date()) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(ForecastError::DataError(format!(
                    "No observed sales for {}",
                    history.dish()
                )))
            }
        };

        let span = (end - start).num_days();
        // A single-day history still needs a unit of time
        let t_scale = if span > 0 { span as f64 } else { 1.0 };

        let weekdays: Vec<f64> = dates.iter().map(|d| weekday_index(*d)).collect();
        let mut layout = FeatureLayout {
            start,
            t_scale,
            changepoints: Vec::new(),
            weekly: span >= WEEKLY_MIN_SPAN_DAYS,
            yearly: span >= YEARLY_MIN_SPAN_DAYS,
            day_of_week: Standardizer::fit(&weekdays),
        };
        layout.changepoints = self
            .changepoint_dates(dates)
            .into_iter()
            .map(|d| layout.scaled_time(d))
            .collect();

        let y_scale = history
            .values()
            .iter()
            .fold(0.0_f64, |acc, y| acc.max(y.abs()));
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };
        let targets: Vec<f64> = history.values().iter().map(|y| y / y_scale).collect();

        let rows: Vec<Vec<f64>> = dates.iter().map(|d| layout.row(*d)).collect();
        let regression = RidgeRegression::fit(&rows, &targets, &self.penalties(&layout))?;

        let residuals = rows
            .iter()
            .zip(&targets)
            .map(|(row, y)| -> Result<f64> { Ok(y - regression.predict(row)?) })
            .collect::<Result<Vec<f64>>>()?;
        let sigma = std_dev(&residuals);

        let deltas = &regression.coefficients()[2..2 + layout.changepoints.len()];
        let mean_abs_delta = match deltas.len() {
            0 => 1e-8,
            n => deltas.iter().map(|d| d.abs()).sum::<f64>() / n as f64 + 1e-8,
        };

        debug!(
            dish = history.dish(),
            observations = history.len(),
            changepoints = layout.changepoints.len(),
            weekly = layout.weekly,
            yearly = layout.yearly,
            sigma = sigma * y_scale,
            "Fitted additive model"
        );

        Ok(TrainedAdditiveModel {
            name: self.name.clone(),
            t_end: layout.scaled_time(end),
            layout,
            regression,
            y_scale,
            sigma,
            mean_abs_delta,
            interval_width: self.interval_width,
            uncertainty_samples: self.uncertainty_samples,
            seed: self.seed,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedAdditiveModel {
    /// Residual standard deviation in servings
    pub fn residual_std(&self) -> f64 {
        self.sigma * self.y_scale
    }

    /// Number of trend changepoints used by the fit
    pub fn changepoint_count(&self) -> usize {
        self.layout.changepoints.len()
    }

    /// Whether weekly seasonality was fitted
    pub fn has_weekly_seasonality(&self) -> bool {
        self.layout.weekly
    }

    /// Whether yearly seasonality was fitted
    pub fn has_yearly_seasonality(&self) -> bool {
        self.layout.yearly
    }

    /// Draw future trend changes between the end of the history and `t_max`
    fn sample_trend_changes(&self, rng: &mut StdRng, t_max: f64) -> Result<Vec<(f64, f64)>> {
        let horizon = t_max - self.t_end;
        if horizon <= 0.0 {
            return Ok(Vec::new());
        }

        // The history's changepoint frequency carries over to the future
        let frequency = self.layout.changepoints.len().max(1) as f64;
        let poisson = Poisson::new(frequency * horizon)
            .map_err(|e| ForecastError::ForecastingError(e.to_string()))?;
        let magnitude = Exp::new(1.0 / self.mean_abs_delta)
            .map_err(|e| ForecastError::ForecastingError(e.to_string()))?;

        let count: f64 = poisson.sample(rng);
        let count = count as usize;
        let mut changes = Vec::with_capacity(count);
        for _ in 0..count {
            let location = rng.gen_range(self.t_end..t_max);
            // Laplace draw: exponential magnitude with a random sign
            let size: f64 = magnitude.sample(rng);
            let delta = if rng.gen::<bool>() { size } else { -size };
            changes.push((location, delta));
        }

        Ok(changes)
    }
}

impl TrainedForecastModel for TrainedAdditiveModel {
    fn predict(&self, dates: &[NaiveDate]) -> Result<ForecastResult> {
        if dates.is_empty() {
            return ForecastResult::new(Vec::new(), Vec::new(), Vec::new());
        }

        let times: Vec<f64> = dates.iter().map(|d| self.layout.scaled_time(*d)).collect();
        let points = dates
            .iter()
            .map(|d| self.regression.predict(&self.layout.row(*d)))
            .collect::<demand_math::Result<Vec<f64>>>()?;

        let t_max = times.iter().copied().fold(f64::MIN, f64::max);
        let noise = Normal::new(0.0, self.sigma)
            .map_err(|e| ForecastError::ForecastingError(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut samples = vec![Vec::with_capacity(self.uncertainty_samples); dates.len()];
        for _ in 0..self.uncertainty_samples {
            let changes = self.sample_trend_changes(&mut rng, t_max)?;
            for (i, (&t, &point)) in times.iter().zip(&points).enumerate() {
                let shift: f64 = changes
                    .iter()
                    .map(|(location, delta)| delta * (t - location).max(0.0))
                    .sum();
                let draw = point + shift + noise.sample(&mut rng);
                samples[i].push(draw * self.y_scale);
            }
        }

        let lower_tau = (1.0 - self.interval_width) / 2.0;
        let upper_tau = 1.0 - lower_tau;
        let intervals = samples
            .iter()
            .map(|s| -> Result<(f64, f64)> {
                Ok((quantile(s, lower_tau)?, quantile(s, upper_tau)?))
            })
            .collect::<Result<Vec<(f64, f64)>>>()?;

        let values = points.iter().map(|p| p * self.y_scale).collect();

        ForecastResult::new(dates.to_vec(), values, intervals)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FeatureLayout {
    /// Time since the first observation, in units of the history span
    fn scaled_time(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64 / self.t_scale
    }

    /// Number of Fourier columns
    fn seasonal_width(&self) -> usize {
        let weekly = if self.weekly { WEEKLY_ORDER * 2 } else { 0 };
        let yearly = if self.yearly { YEARLY_ORDER * 2 } else { 0 };
        weekly + yearly
    }

    /// Regressors for one date: intercept, slope, changepoint hinges,
    /// Fourier terms and the standardized day of week
    fn row(&self, date: NaiveDate) -> Vec<f64> {
        let t = self.scaled_time(date);
        let days = days_since_epoch(date);

        let mut row = Vec::with_capacity(3 + self.changepoints.len() + self.seasonal_width());
        row.push(1.0);
        row.push(t);
        row.extend(self.changepoints.iter().map(|cp| (t - cp).max(0.0)));
        if self.weekly {
            row.extend(fourier_terms(days, WEEKLY_PERIOD, WEEKLY_ORDER));
        }
        if self.yearly {
            row.extend(fourier_terms(days, YEARLY_PERIOD, YEARLY_ORDER));
        }
        row.push(self.day_of_week.apply(weekday_index(date)));
        row
    }
}

/// Day of week with Monday as 0 and Sunday as 6
fn weekday_index(date: NaiveDate) -> f64 {
    date.weekday().num_days_from_monday() as f64
}

/// Days from 0001-01-01 to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn days_since_epoch(date: NaiveDate) -> f64 {
    (date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE) as f64
}
