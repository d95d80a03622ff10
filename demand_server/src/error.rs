//! Error responses of the HTTP API

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use demand_forecast::ForecastError;
use serde_json::json;
use thiserror::Error;

/// Failures surfaced by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// The forecasting run failed
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// The blocking forecast task panicked or was cancelled
    #[error("Forecast task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
