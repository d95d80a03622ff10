use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use demand_forecast::{ForecastConfig, ForecastPipeline};
use demand_server::routes::ROOT_MESSAGE;
use demand_server::{app, AppState};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;
use tower::ServiceExt;

fn create_sales_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "dish_name,date,sold").unwrap();
    for day in 1..=14 {
        writeln!(file, "Upma,{:02}-02-2024,{}", day, 30 + day % 4).unwrap();
        if day <= 2 {
            writeln!(file, "Kheer,{:02}-02-2024,8", day).unwrap();
        }
    }
    file
}

fn test_app(data_path: &std::path::Path) -> Router {
    let pipeline = ForecastPipeline::new(ForecastConfig {
        uncertainty_samples: 200,
        ..ForecastConfig::default()
    })
    .unwrap();
    app(AppState::new(pipeline, data_path))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_root_banner() {
    let file = create_sales_file();
    let (status, body) = get(test_app(file.path()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], ROOT_MESSAGE);
}

#[tokio::test]
async fn test_health() {
    let file = create_sales_file();
    let (status, body) = get(test_app(file.path()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_predict_returns_flat_forecast() {
    let file = create_sales_file();
    let (status, body) = get(test_app(file.path()), "/predict").await;

    assert_eq!(status, StatusCode::OK);
    let forecast = body["forecast"].as_array().unwrap();

    // Kheer has two rows and is skipped
    assert_eq!(forecast.len(), 7);
    assert_eq!(forecast[0]["dish"], "Upma");
    assert_eq!(forecast[0]["date"], "2024-02-15");
    assert_eq!(forecast[0]["weekday"], "Thursday");
    assert_eq!(forecast[6]["date"], "2024-02-21");

    for entry in forecast {
        for key in ["predicted", "min", "max", "recommended_servings"] {
            assert!(entry[key].is_i64(), "{} should be an integer", key);
        }
        let confidence = entry["confidence"].as_str().unwrap();
        assert!(["high", "medium", "low"].contains(&confidence));
    }
}

#[tokio::test]
async fn test_predict_missing_file_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.csv");
    let (status, body) = get(test_app(&missing), "/predict").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("IO error"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let file = create_sales_file();
    let response = test_app(file.path())
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
