//! Ordinary least squares over two equal-length sequences

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};

/// Fitted line `y = alpha + beta * x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Intercept
    pub alpha: f64,
    /// Slope
    pub beta: f64,
}

impl RegressionResult {
    /// Evaluate the fitted line at `x`
    pub fn at(&self, x: f64) -> f64 {
        self.alpha + self.beta * x
    }
}

/// Fit `y ≈ alpha + beta * x` with the two-pass OLS estimator
///
/// Fails with `InvalidInput` when the lengths differ or the input is empty,
/// and with `DegenerateInput` when `x` has no variance.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<RegressionResult> {
    if x.len() != y.len() {
        return Err(StockError::InvalidInput(format!(
            "sequences differ in length: x has {}, y has {}",
            x.len(),
            y.len()
        )));
    }
    if x.is_empty() {
        return Err(StockError::InvalidInput(
            "cannot fit a regression to empty sequences".to_string(),
        ));
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        numerator += (xi - mean_x) * (yi - mean_y);
        denominator += (xi - mean_x) * (xi - mean_x);
    }

    if denominator == 0.0 {
        return Err(StockError::DegenerateInput(format!(
            "x has zero variance over {} points",
            x.len()
        )));
    }

    let beta = numerator / denominator;
    let alpha = mean_y - beta * mean_x;

    if !alpha.is_finite() || !beta.is_finite() {
        return Err(StockError::DegenerateInput(format!(
            "non-finite coefficients (alpha={alpha}, beta={beta})"
        )));
    }

    Ok(RegressionResult { alpha, beta })
}
