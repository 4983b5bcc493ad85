//! Argument parsing and configuration layering

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use trend_stock::{ConfigFile, ForecastConfig, OutputSize, Symbol, TrendModel};

#[derive(Parser, Debug)]
#[command(name = "stock-trend")]
#[command(version, about = "Fetch daily closes, fit a return trend and project a price", long_about = None)]
pub struct Args {
    /// Ticker symbols; falls back to STOCK_SYMBOLS, then the config file
    pub symbols: Vec<String>,

    /// JSON config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Projection horizon in days, negative to project backwards
    #[arg(long, value_name = "DAYS", allow_negative_numbers = true)]
    pub horizon: Option<i64>,

    /// Trend model: self-regression or day-index
    #[arg(short, long)]
    pub model: Option<TrendModel>,

    /// Series CSV path (default stockData.csv)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip the series CSV
    #[arg(long, conflicts_with = "output")]
    pub no_export: bool,

    /// Also write projections to this CSV
    #[arg(long, value_name = "FILE")]
    pub predictions: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Override the query endpoint
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// compact (latest 100 sessions) or full
    #[arg(long)]
    pub output_size: Option<OutputSize>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Layer defaults, config file, environment and flags, in that order
    pub fn into_config(self) -> Result<ForecastConfig> {
        let mut builder = ForecastConfig::builder();

        if let Some(path) = &self.config {
            let file = ConfigFile::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            builder = builder.config_file(file)?;
        }

        builder = builder.with_env_api_key().with_env_symbols()?;

        if !self.symbols.is_empty() {
            let symbols = self
                .symbols
                .iter()
                .map(Symbol::new)
                .collect::<trend_stock::Result<Vec<_>>>()?;
            builder = builder.symbols(symbols);
        }
        if let Some(days) = self.horizon {
            builder = builder.horizon_days(days);
        }
        if let Some(model) = self.model {
            builder = builder.model(model);
        }
        if let Some(secs) = self.timeout {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        if let Some(url) = self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(size) = self.output_size {
            builder = builder.output_size(size);
        }
        if self.no_export {
            builder = builder.output_path(None);
        } else if let Some(path) = self.output {
            builder = builder.output_path(Some(path));
        }
        if let Some(path) = self.predictions {
            builder = builder.predictions_path(path);
        }

        builder.build().context("invalid configuration")
    }
}
