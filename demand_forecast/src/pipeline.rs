//! End-to-end forecasting run over a sales table
//!
//! Groups the records by dish, skips dishes with too little history, fits
//! one model per remaining dish and flattens every dish's daily predictions
//! into one list, dishes in order of first appearance.

use crate::data::{group_by_dish, DataLoader, SalesHistory, SalesRecord};
use crate::error::{ForecastError, Result};
use crate::models::additive::AdditiveModel;
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::serving::ServingPrediction;
use crate::utils::future_dates;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Settings of a forecasting run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of days to forecast after each dish's last observation
    pub horizon: usize,
    /// Dishes with fewer rows are skipped
    pub min_history: usize,
    /// Probability mass covered by the min/max interval
    pub interval_width: f64,
    /// Simulations used to estimate the interval
    pub uncertainty_samples: usize,
    /// Seed of the interval simulation
    pub seed: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 7,
            min_history: 5,
            interval_width: 0.8,
            uncertainty_samples: 1000,
            seed: 0,
        }
    }
}

impl ForecastConfig {
    /// Check that the settings describe a runnable forecast
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Horizon must be at least one day".to_string(),
            ));
        }
        if self.min_history == 0 {
            return Err(ForecastError::InvalidParameter(
                "Minimum history must be at least one row".to_string(),
            ));
        }
        // Model construction checks the interval settings
        AdditiveModel::new(self.interval_width, self.uncertainty_samples)?;
        Ok(())
    }
}

/// Runs the per-dish forecasts
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: ForecastConfig,
    model: AdditiveModel,
}

impl ForecastPipeline {
    /// Create a pipeline from validated settings
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        let model = AdditiveModel::new(config.interval_width, config.uncertainty_samples)?
            .with_seed(config.seed);

        Ok(Self { config, model })
    }

    /// Settings of this pipeline
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Load a sales CSV and forecast every dish in it
    pub fn run_csv<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ServingPrediction>> {
        let path = path.as_ref();
        let records = DataLoader::from_csv(path)?;
        info!(path = %path.display(), rows = records.len(), "Loaded sales data");

        self.run(&records)
    }

    /// Forecast every dish with enough history
    pub fn run(&self, records: &[SalesRecord]) -> Result<Vec<ServingPrediction>> {
        let histories = group_by_dish(records);
        let mut predictions = Vec::new();
        let mut forecasted = 0;

        for history in &histories {
            if history.len() < self.config.min_history {
                warn!("Skipping {} due to insufficient data...", history.dish());
                continue;
            }

            predictions.extend(self.forecast_dish(history)?);
            forecasted += 1;
        }

        info!(
            dishes = histories.len(),
            forecasted,
            skipped = histories.len() - forecasted,
            predictions = predictions.len(),
            "Forecast run complete"
        );

        Ok(predictions)
    }

    /// Fit one dish and predict the days after its last observation
    pub fn forecast_dish(&self, history: &SalesHistory) -> Result<Vec<ServingPrediction>> {
        let last_date = history.last_date().ok_or_else(|| {
            ForecastError::DataError(format!("Empty sales history for {}", history.dish()))
        })?;

        let trained = self.model.train(history)?;
        let dates = future_dates(last_date, self.config.horizon)?;
        let forecast = trained.predict(&dates)?;

        debug!(
            dish = history.dish(),
            model = trained.name(),
            from = %dates[0],
            horizon = dates.len(),
            "Forecasted dish"
        );

        Ok(forecast
            .rows()
            .map(|(date, estimate, lower, upper)| {
                ServingPrediction::from_forecast(history.dish(), date, estimate, lower, upper)
            })
            .collect())
    }
}
