//! # demand-server
//!
//! REST API over the canteen demand forecasts.
//!
//! - `GET /`: service banner
//! - `GET /predict`: retrain every dish on the sales file and return the
//!   next week's serving recommendations
//! - `GET /health`: liveness probe

use axum::{routing::get, Router};
use demand_forecast::ForecastPipeline;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;

pub use error::ApiError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<ForecastPipeline>,
    data_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(pipeline: ForecastPipeline, data_path: impl Into<PathBuf>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            data_path: Arc::new(data_path.into()),
        }
    }
}

/// Build the router with CORS and request tracing
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::root))
        .route("/predict", get(routes::predict))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
