//! Fetch, fit, project, export

use crate::api::AlphaVantageClient;
use crate::config::ForecastConfig;
use crate::error::Result;
use crate::export;
use crate::fetcher::{DailySeriesSource, fetch_all};
use crate::predictor::{Prediction, TrendModel, predict};
use crate::series::SymbolSeries;
use crate::symbol::Symbol;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct ForecastReport {
    /// Series per symbol
    pub series: BTreeMap<Symbol, SymbolSeries>,
    /// One projection per symbol, in symbol order
    pub predictions: Vec<Prediction>,
    /// Series CSV, when exported
    pub exported_to: Option<PathBuf>,
    /// Predictions CSV, when exported
    pub predictions_exported_to: Option<PathBuf>,
}

/// Run against the Alpha Vantage endpoint in `config`
pub async fn run_alpha_vantage(config: &ForecastConfig) -> Result<ForecastReport> {
    let client = AlphaVantageClient::from_config(config)?;
    run(&client, config).await
}

/// Run the whole forecast against `source`
///
/// Either every symbol is fetched and projected and the CSV files are
/// written, or the first error is returned and no file is created.
pub async fn run<S>(source: &S, config: &ForecastConfig) -> Result<ForecastReport>
where
    S: DailySeriesSource + ?Sized,
{
    if config.model == TrendModel::SelfRegression {
        tracing::warn!(
            "self-regression fits returns against themselves (alpha=0, beta=1); \
             projections equal last_price * exp(horizon). Use the day-index model for a real trend"
        );
    }

    let series = fetch_all(source, &config.symbols).await?;

    let predictions = series
        .values()
        .map(|s| predict(config.model, s, config.horizon_days))
        .collect::<Result<Vec<_>>>()?;

    // stage both files before renaming either
    let mut staged = Vec::new();
    if let Some(path) = &config.output_path {
        staged.push(export::stage_series(path, &series)?);
    }
    if let Some(path) = &config.predictions_path {
        staged.push(export::stage_predictions(path, &predictions)?);
    }
    export::commit_all(staged)?;

    let exported_to = config.output_path.clone();
    let predictions_exported_to = config.predictions_path.clone();

    Ok(ForecastReport {
        series,
        predictions,
        exported_to,
        predictions_exported_to,
    })
}
