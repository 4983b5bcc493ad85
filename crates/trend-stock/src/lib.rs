//! Daily close trend projection
//!
//! This crate fetches daily closing prices for a list of ticker symbols,
//! derives simple returns, fits a least-squares trend to them and projects a
//! price a number of days ahead. It includes:
//!
//! - Data fetching from Alpha Vantage's `TIME_SERIES_DAILY` endpoint
//! - Chronologically ordered price and return series, one per symbol
//! - Two-pass ordinary least squares
//! - Price projection under a selectable [`TrendModel`]
//! - CSV export of the fetched series and projections
//!
//! # Example
//!
//! ```rust,no_run
//! use trend_stock::{ForecastConfig, Symbol, pipeline};
//!
//! #[tokio::main]
//! async fn main() -> trend_stock::Result<()> {
//!     let config = ForecastConfig::builder()
//!         .with_env_api_key()
//!         .symbols(vec![Symbol::new("IBM")?])
//!         .horizon_days(5)
//!         .build()?;
//!
//!     let report = pipeline::run_alpha_vantage(&config).await?;
//!     for p in &report.predictions {
//!         println!("{}: {:.2}", p.symbol, p.predicted_price);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod pipeline;
pub mod predictor;
pub mod regression;
pub mod series;
pub mod symbol;

// Re-export main types for convenience
pub use api::AlphaVantageClient;
pub use config::{ConfigFile, ForecastConfig, OutputSize};
pub use error::{Result, StockError};
pub use fetcher::{DailySeriesSource, fetch_all};
pub use pipeline::ForecastReport;
pub use predictor::{Prediction, TrendModel, predict, predict_price};
pub use regression::{RegressionResult, linear_regression};
pub use series::{Observation, PriceSeries, ReturnSeries, SymbolSeries};
pub use symbol::Symbol;
