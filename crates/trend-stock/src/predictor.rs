//! Price projection from a fitted return trend

use crate::error::{Result, StockError};
use crate::regression::{RegressionResult, linear_regression};
use crate::series::{ReturnSeries, SymbolSeries};
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the return series is regressed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrendModel {
    /// Returns regressed on themselves.
    ///
    /// Any series with variance fits to alpha = 0, beta = 1, so the projection
    /// is `last_price * exp(days)` regardless of the data. Kept as the default
    /// to reproduce the established forecast; see [`TrendModel::DayIndex`].
    #[default]
    SelfRegression,
    /// Returns regressed on their day offset from the latest return.
    ///
    /// The latest return sits at x = 0 and earlier ones at negative offsets, so
    /// `alpha + beta * days` is the trend value `days` sessions ahead.
    DayIndex,
}

impl TrendModel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelfRegression => "self-regression",
            Self::DayIndex => "day-index",
        }
    }

    /// Regressor sequence paired with `returns`
    fn regressor(self, returns: &[f64]) -> Vec<f64> {
        match self {
            Self::SelfRegression => returns.to_vec(),
            Self::DayIndex => {
                let last = returns.len().saturating_sub(1) as f64;
                (0..returns.len()).map(|i| i as f64 - last).collect()
            }
        }
    }
}

impl fmt::Display for TrendModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendModel {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "self-regression" | "self" => Ok(Self::SelfRegression),
            "day-index" | "day" => Ok(Self::DayIndex),
            other => Err(StockError::ConfigError(format!(
                "unknown trend model '{other}' (expected self-regression or day-index)"
            ))),
        }
    }
}

/// Fit the chosen trend model to a return series
///
/// At least two returns are needed for a slope.
pub fn fit_trend(model: TrendModel, returns: &ReturnSeries) -> Result<RegressionResult> {
    let y = returns.values();
    if y.len() < 2 {
        return Err(StockError::DegenerateInput(format!(
            "need at least 2 returns to fit a trend, got {}",
            y.len()
        )));
    }
    let x = model.regressor(y);
    linear_regression(&x, y)
}

/// `last_price * exp(alpha + beta * days)`
///
/// No bounds check is applied to the result.
pub fn predict_price(fit: &RegressionResult, last_price: f64, days: i64) -> f64 {
    last_price * fit.at(days as f64).exp()
}

/// Projected price for one symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub symbol: Symbol,
    pub model: TrendModel,
    pub horizon_days: i64,
    pub last_price: f64,
    pub fit: RegressionResult,
    pub predicted_return: f64,
    pub predicted_price: f64,
}

/// Fit `series` and project its latest close `days` ahead
pub fn predict(model: TrendModel, series: &SymbolSeries, days: i64) -> Result<Prediction> {
    let last_price = series.prices.last_price().ok_or_else(|| {
        StockError::InvalidInput(format!("no prices for {}", series.symbol))
    })?;

    let fit = fit_trend(model, &series.returns)?;
    let predicted_return = fit.at(days as f64);
    let predicted_price = predict_price(&fit, last_price, days);

    tracing::debug!(
        symbol = %series.symbol,
        %model,
        alpha = fit.alpha,
        beta = fit.beta,
        days,
        predicted_price,
        "projected price"
    );

    Ok(Prediction {
        symbol: series.symbol.clone(),
        model,
        horizon_days: days,
        last_price,
        fit,
        predicted_return,
        predicted_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{Observation, date};

    fn symbol_series(closes: &[f64]) -> SymbolSeries {
        let start = date("2024-03-01");
        let obs = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Observation::new(start + chrono::Days::new(i as u64), c))
            .collect();
        SymbolSeries::from_observations(Symbol::new("ABC").unwrap(), obs).unwrap()
    }

    #[test]
    fn test_predict_price_formula() {
        let fit = RegressionResult {
            alpha: 0.01,
            beta: 0.002,
        };
        let price = predict_price(&fit, 50.0, 5);
        assert!((price - 50.0 * (0.02_f64).exp()).abs() < 1e-9);

        // backward projection
        let price = predict_price(&fit, 50.0, -5);
        assert!((price - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_horizon_zero_returns_last_price() {
        let series = symbol_series(&[100.0, 110.0, 104.5, 112.0]);
        let prediction = predict(TrendModel::SelfRegression, &series, 0).unwrap();
        assert!(prediction.fit.alpha.abs() < 1e-12);
        assert!((prediction.predicted_price - 112.0).abs() < 1e-9);
    }

    #[test]
    fn test_self_regression_projects_exp_days() {
        let series = symbol_series(&[100.0, 105.0, 102.0, 110.0]);
        let prediction = predict(TrendModel::SelfRegression, &series, 1).unwrap();
        assert!((prediction.fit.beta - 1.0).abs() < 1e-12);
        assert!((prediction.predicted_return - 1.0).abs() < 1e-12);
        assert!((prediction.predicted_price - 110.0 * std::f64::consts::E).abs() < 1e-6);
    }

    #[test]
    fn test_single_return_is_degenerate() {
        let series = symbol_series(&[100.0, 110.0]);
        let err = predict(TrendModel::SelfRegression, &series, 0).unwrap_err();
        assert!(matches!(err, StockError::DegenerateInput(_)));
    }

    #[test]
    fn test_constant_returns_are_degenerate_for_self_regression() {
        let series = symbol_series(&[100.0, 105.0, 110.25]);
        let err = predict(TrendModel::SelfRegression, &series, 1).unwrap_err();
        assert!(matches!(err, StockError::DegenerateInput(_)));
    }

    #[test]
    fn test_day_index_trend() {
        let series = symbol_series(&[100.0, 105.0, 110.25]);
        let prediction = predict(TrendModel::DayIndex, &series, 3).unwrap();
        assert!((prediction.fit.alpha - 0.05).abs() < 1e-12);
        assert!(prediction.fit.beta.abs() < 1e-12);
        assert!((prediction.predicted_price - 110.25 * (0.05_f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn test_day_index_regressor_ends_at_zero() {
        assert_eq!(
            TrendModel::DayIndex.regressor(&[0.1, 0.2, 0.3]),
            vec![-2.0, -1.0, 0.0]
        );
    }

    #[test]
    fn test_empty_prices() {
        let series = symbol_series(&[]);
        let err = predict(TrendModel::DayIndex, &series, 1).unwrap_err();
        assert!(matches!(err, StockError::InvalidInput(_)));
    }

    #[test]
    fn test_model_parsing() {
        assert_eq!(
            "day-index".parse::<TrendModel>().unwrap(),
            TrendModel::DayIndex
        );
        assert_eq!(
            "Self-Regression".parse::<TrendModel>().unwrap(),
            TrendModel::SelfRegression
        );
        assert!("lagged".parse::<TrendModel>().is_err());
        assert_eq!(TrendModel::default(), TrendModel::SelfRegression);
    }
}
