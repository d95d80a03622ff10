//! # Canteen Forecast
//!
//! Umbrella crate for the canteen demand forecasting workspace.
//!
//! - [`demand_math`]: penalised least squares, Fourier terms and quantiles
//! - [`demand_forecast`]: sales loading, the per-dish model and serving
//!   recommendations
//! - [`demand_server`]: the HTTP API and `canteen-forecast` binary
//!
//! ## Example
//!
//! ```
//! use canteen_forecast_workspace::demand_forecast::serving::recommended_servings;
//!
//! // 40 servings expected, up to 47: pad by half the headroom
//! assert_eq!(recommended_servings(40, 47), 44);
//! ```

pub use demand_forecast;
pub use demand_math;
pub use demand_server;
