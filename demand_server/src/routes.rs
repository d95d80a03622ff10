//! API route handlers

use crate::error::ApiError;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use demand_forecast::ServingPrediction;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Banner returned by the root endpoint
pub const ROOT_MESSAGE: &str = "✅ Food Demand Forecasting API running successfully";

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub forecast: Vec<ServingPrediction>,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

/// Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Train every dish's model from the sales file and return the next days
pub async fn predict(State(state): State<AppState>) -> Result<Json<PredictResponse>, ApiError> {
    // Fitting is CPU bound; keep it off the async workers
    let forecast = tokio::task::spawn_blocking(move || {
        state.pipeline.run_csv(state.data_path.as_path())
    })
    .await??;

    tracing::info!(predictions = forecast.len(), "Served forecast");
    Ok(Json(PredictResponse { forecast }))
}
