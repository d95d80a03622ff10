//! # Demand Math
//!
//! Numeric building blocks for the demand forecasting models.
//! This crate provides penalised least squares, Fourier seasonality terms
//! and the summary statistics used to turn simulations into intervals.

use thiserror::Error;

pub mod regression;
pub mod seasonality;
pub mod stats;

pub use regression::RidgeRegression;
pub use seasonality::{fourier_terms, linspace_indices};
pub use stats::{quantile, std_dev, Standardizer};

/// Errors that can occur in numeric calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
