//! # Demand Forecast
//!
//! Per-dish demand forecasting for a canteen: reads daily sales counts,
//! fits one model per dish and turns each forecasted day into a serving
//! recommendation.
//!
//! ## Features
//!
//! - Sales CSV loading (`dish, DD-MM-YYYY, count`) and grouping by dish
//! - Additive trend + weekly/yearly seasonality model with simulated intervals
//! - Rounded estimates, padded serving recommendations and confidence labels
//! - A pipeline that skips dishes with too little history
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use demand_forecast::{ForecastConfig, ForecastPipeline};
//!
//! # fn main() -> demand_forecast::Result<()> {
//! let pipeline = ForecastPipeline::new(ForecastConfig::default())?;
//!
//! // Seven days per dish with at least five rows of history
//! let predictions = pipeline.run_csv("canteen_sales_data.csv")?;
//!
//! println!("{}", demand_forecast::utils::to_pretty_json(&predictions)?);
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod serving;
pub mod utils;

// Re-export commonly used types
pub use crate::data::{DataLoader, SalesHistory, SalesRecord};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::pipeline::{ForecastConfig, ForecastPipeline};
pub use crate::serving::{Confidence, ServingPrediction};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
