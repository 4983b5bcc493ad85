//! Price and return series

use crate::error::{Result, StockError};
use crate::symbol::Symbol;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub close: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Chronologically ordered daily closes for one symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: Symbol,
    observations: Vec<Observation>,
}

impl PriceSeries {
    /// Build a series from observations in any order
    ///
    /// Observations are sorted by date, oldest first. Two observations on the
    /// same date are rejected.
    pub fn from_observations(symbol: Symbol, mut observations: Vec<Observation>) -> Result<Self> {
        observations.sort_by_key(|o| o.date);

        if let Some(pair) = observations.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(StockError::ParseError(format!(
                "duplicate observation for {symbol} on {}",
                pair[0].date
            )));
        }

        Ok(Self {
            symbol,
            observations,
        })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.observations.iter().map(|o| o.date)
    }

    /// Closing prices, oldest first
    pub fn closes(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.close).collect()
    }

    /// Most recent close
    pub fn last_price(&self) -> Option<f64> {
        self.observations.last().map(|o| o.close)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Simple returns derived from a [`PriceSeries`]
///
/// `values()[i - 1]` is the return from close `i - 1` to close `i`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSeries {
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Derive `(p[i] - p[i-1]) / p[i-1]` for every consecutive pair
    pub fn from_prices(prices: &PriceSeries) -> Result<Self> {
        let obs = prices.observations();
        let mut values = Vec::with_capacity(obs.len().saturating_sub(1));

        for pair in obs.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            if prev.close == 0.0 || !prev.close.is_finite() {
                return Err(StockError::DataQuality {
                    symbol: prices.symbol().to_string(),
                    reason: format!("unusable close {} on {}", prev.close, prev.date),
                });
            }
            values.push((curr.close - prev.close) / prev.close);
        }

        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Everything fetched for one symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolSeries {
    pub symbol: Symbol,
    pub prices: PriceSeries,
    pub returns: ReturnSeries,
}

impl SymbolSeries {
    /// Order the observations and derive returns
    pub fn from_observations(symbol: Symbol, observations: Vec<Observation>) -> Result<Self> {
        let prices = PriceSeries::from_observations(symbol.clone(), observations)?;
        let returns = ReturnSeries::from_prices(&prices)?;
        Ok(Self {
            symbol,
            prices,
            returns,
        })
    }
}

#[cfg(test)]
pub(crate) fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}
