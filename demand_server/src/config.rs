//! Command-line and environment configuration
//!
//! Every option can be given as a flag or through the environment; a `.env`
//! file in the working directory is loaded before parsing.

use clap::{Parser, Subcommand};
use demand_forecast::ForecastConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Canteen demand forecasting service
#[derive(Debug, Parser)]
#[command(name = "canteen-forecast", version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Sales CSV (dish, DD-MM-YYYY date, servings sold)
    #[arg(
        long,
        global = true,
        env = "FORECAST_DATA_PATH",
        default_value = "canteen_sales_data.csv",
        value_name = "FILE"
    )]
    pub data: PathBuf,

    /// Address to bind the HTTP server to
    #[arg(long, global = true, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(long, global = true, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    #[command(flatten)]
    pub forecast: ForecastArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the forecast API (default)
    Serve,
    /// Run the forecast once and print the JSON to stdout
    Forecast,
}

/// Forecasting settings
#[derive(Debug, clap::Args)]
pub struct ForecastArgs {
    /// Days to forecast per dish
    #[arg(long, global = true, env = "FORECAST_HORIZON", default_value_t = 7)]
    pub horizon: usize,

    /// Dishes with fewer rows are skipped
    #[arg(long, global = true, env = "FORECAST_MIN_HISTORY", default_value_t = 5)]
    pub min_history: usize,

    /// Probability mass covered by the min/max interval
    #[arg(long, global = true, env = "FORECAST_INTERVAL_WIDTH", default_value_t = 0.8)]
    pub interval_width: f64,

    /// Simulations used to estimate the interval
    #[arg(long, global = true, env = "FORECAST_UNCERTAINTY_SAMPLES", default_value_t = 1000)]
    pub uncertainty_samples: usize,

    /// Seed of the interval simulation
    #[arg(long, global = true, env = "FORECAST_SEED", default_value_t = 0)]
    pub seed: u64,
}

impl Args {
    /// Subcommand to run; serving when none is given
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }

    /// Socket address from `host` and `port`
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid HOST:PORT '{}': {}", addr, e))
    }
}

impl ForecastArgs {
    pub fn to_config(&self) -> ForecastConfig {
        ForecastConfig {
            horizon: self.horizon,
            min_history: self.min_history,
            interval_width: self.interval_width,
            uncertainty_samples: self.uncertainty_samples,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["canteen-forecast"]).unwrap();

        assert_eq!(args.command(), Command::Serve);
        assert_eq!(args.data, PathBuf::from("canteen_sales_data.csv"));
        assert_eq!(args.forecast.to_config(), ForecastConfig::default());
    }

    #[test]
    fn test_forecast_subcommand_with_options() {
        let args = Args::try_parse_from([
            "canteen-forecast",
            "forecast",
            "--data",
            "sales.csv",
            "--horizon",
            "3",
            "--seed",
            "11",
        ])
        .unwrap();

        assert_eq!(args.command(), Command::Forecast);
        assert_eq!(args.data, PathBuf::from("sales.csv"));
        assert_eq!(args.forecast.horizon, 3);
        assert_eq!(args.forecast.seed, 11);
    }

    #[test]
    fn test_bind_addr() {
        let args =
            Args::try_parse_from(["canteen-forecast", "--host", "127.0.0.1", "--port", "9000"])
                .unwrap();
        assert_eq!(args.bind_addr().unwrap(), "127.0.0.1:9000".parse().unwrap());

        let args = Args::try_parse_from(["canteen-forecast", "--host", "not a host"]).unwrap();
        assert!(args.bind_addr().is_err());
    }
}
