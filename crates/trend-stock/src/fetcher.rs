//! Sequential fetching of daily series

use crate::error::Result;
use crate::series::{Observation, SymbolSeries};
use crate::symbol::Symbol;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Anything that can produce daily closes for a symbol
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DailySeriesSource: Send + Sync {
    /// Daily observations for `symbol`, in any order
    async fn fetch_daily(&self, symbol: &Symbol) -> Result<Vec<Observation>>;
}

/// Fetch every symbol, one request at a time
///
/// Each symbol gets its own [`SymbolSeries`]. The first failure aborts the
/// whole batch and nothing fetched so far is returned. A symbol listed twice
/// is requested once.
pub async fn fetch_all<S>(source: &S, symbols: &[Symbol]) -> Result<BTreeMap<Symbol, SymbolSeries>>
where
    S: DailySeriesSource + ?Sized,
{
    let mut results = BTreeMap::new();

    for symbol in symbols {
        if results.contains_key(symbol) {
            tracing::debug!(%symbol, "skipping duplicate symbol");
            continue;
        }

        tracing::info!(%symbol, "fetching daily series");
        let observations = source.fetch_daily(symbol).await.inspect_err(|e| {
            tracing::error!(%symbol, error = %e, "fetch failed, aborting run");
        })?;

        let series = SymbolSeries::from_observations(symbol.clone(), observations)?;
        tracing::info!(
            %symbol,
            prices = series.prices.len(),
            returns = series.returns.len(),
            "fetched daily series"
        );

        results.insert(symbol.clone(), series);
    }

    Ok(results)
}
