//! # canteen-forecast
//!
//! Serves the canteen demand forecasts over HTTP, or prints them once.

use anyhow::{Context, Result};
use clap::Parser;
use demand_forecast::utils::to_pretty_json;
use demand_forecast::ForecastPipeline;
use demand_server::config::{Args, Command};
use demand_server::{app, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logs go to stderr so `forecast` output stays clean JSON
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "demand_server=info,demand_forecast=info,tower_http=info".into()
            }),
        )
        .init();

    let pipeline = ForecastPipeline::new(args.forecast.to_config())
        .context("Invalid forecast configuration")?;

    match args.command() {
        Command::Serve => serve(&args, pipeline).await,
        Command::Forecast => {
            let predictions = pipeline
                .run_csv(&args.data)
                .with_context(|| format!("Forecast failed for {}", args.data.display()))?;
            println!("{}", to_pretty_json(&predictions)?);
            Ok(())
        }
    }
}

async fn serve(args: &Args, pipeline: ForecastPipeline) -> Result<()> {
    let addr = args.bind_addr()?;
    let state = AppState::new(pipeline, args.data.clone());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        data = %args.data.display(),
        %addr,
        "Food demand forecasting API listening"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
