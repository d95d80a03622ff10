//! Penalised least squares
//!
//! Fits `y ≈ Xβ` by minimising the squared error plus a per-coefficient
//! ridge penalty `Σ λ_j β_j²`. The normal equations `(XᵀX + Λ)β = Xᵀy`
//! are always positive definite when every `λ_j > 0`, so they are solved
//! with a Cholesky factorisation.

use crate::{MathError, Result};

/// Ridge regression with an individual penalty for each coefficient
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    coefficients: Vec<f64>,
}

impl RidgeRegression {
    /// Fit the regression on a row-major design matrix
    pub fn fit(rows: &[Vec<f64>], targets: &[f64], penalties: &[f64]) -> Result<Self> {
        if rows.is_empty() {
            return Err(MathError::InsufficientData(
                "Regression needs at least one observation".to_string(),
            ));
        }
        if rows.len() != targets.len() {
            return Err(MathError::InvalidInput(format!(
                "Design matrix has {} rows but {} targets were given",
                rows.len(),
                targets.len()
            )));
        }

        let width = penalties.len();
        if width == 0 {
            return Err(MathError::InvalidInput(
                "Regression needs at least one coefficient".to_string(),
            ));
        }
        if let Some(row) = rows.iter().find(|row| row.len() != width) {
            return Err(MathError::InvalidInput(format!(
                "Row width {} doesn't match {} penalties",
                row.len(),
                width
            )));
        }
        if penalties.iter().any(|&p| p <= 0.0 || !p.is_finite()) {
            return Err(MathError::InvalidInput(
                "Penalties must be positive and finite".to_string(),
            ));
        }

        // Normal equations
        let mut gram = vec![vec![0.0; width]; width];
        let mut moment = vec![0.0; width];
        for (row, &y) in rows.iter().zip(targets) {
            for i in 0..width {
                moment[i] += row[i] * y;
                for j in 0..=i {
                    gram[i][j] += row[i] * row[j];
                }
            }
        }
        for (i, &penalty) in penalties.iter().enumerate() {
            gram[i][i] += penalty;
        }

        let lower = cholesky(&gram)?;
        let coefficients = solve_cholesky(&lower, &moment);

        Ok(Self { coefficients })
    }

    /// Get the fitted coefficients
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Evaluate the fitted model on one row of regressors
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(MathError::InvalidInput(format!(
                "Row width {} doesn't match {} coefficients",
                row.len(),
                self.coefficients.len()
            )));
        }

        Ok(row
            .iter()
            .zip(&self.coefficients)
            .map(|(x, beta)| x * beta)
            .sum())
    }
}

/// Lower-triangular Cholesky factor of a symmetric matrix.
/// Only the lower triangle of `matrix` is read.
fn cholesky(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let n = matrix.len();
    let mut lower = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let partial: f64 = (0..j).map(|k| lower[i][k] * lower[j][k]).sum();

            if i == j {
                let pivot = matrix[i][i] - partial;
                if pivot <= 0.0 || pivot.is_nan() {
                    return Err(MathError::CalculationError(format!(
                        "Matrix is not positive definite (pivot {} at {})",
                        pivot, i
                    )));
                }
                lower[i][j] = pivot.sqrt();
            } else {
                lower[i][j] = (matrix[i][j] - partial) / lower[j][j];
            }
        }
    }

    Ok(lower)
}

/// Solve `L Lᵀ x = b` by forward then back substitution
fn solve_cholesky(lower: &[Vec<f64>], rhs: &[f64]) -> Vec<f64> {
    let n = rhs.len();

    let mut forward = vec![0.0; n];
    for i in 0..n {
        let partial: f64 = (0..i).map(|k| lower[i][k] * forward[k]).sum();
        forward[i] = (rhs[i] - partial) / lower[i][i];
    }

    let mut solution = vec![0.0; n];
    for i in (0..n).rev() {
        let partial: f64 = (i + 1..n).map(|k| lower[k][i] * solution[k]).sum();
        solution[i] = (forward[i] - partial) / lower[i][i];
    }

    solution
}
