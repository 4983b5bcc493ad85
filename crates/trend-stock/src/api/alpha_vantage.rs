//! Alpha Vantage API client

use crate::config::{ForecastConfig, OutputSize};
use crate::error::{Result, StockError};
use crate::fetcher::DailySeriesSource;
use crate::series::Observation;
use crate::symbol::Symbol;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Top-level key holding the daily records
pub const DAILY_SERIES_KEY: &str = "Time Series (Daily)";

/// Field holding the closing price inside each daily record
pub const CLOSE_FIELD: &str = "4. close";

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    output_size: OutputSize,
}

impl AlphaVantageClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `base_url` - query endpoint, normally [`crate::config::DEFAULT_BASE_URL`]
    /// * `timeout` - applied to every request
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            output_size: OutputSize::default(),
        })
    }

    /// Create a client from a validated configuration
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            StockError::ConfigError("Alpha Vantage API key not configured".to_string())
        })?;

        Ok(Self::new(api_key, config.base_url.clone(), config.request_timeout)?
            .with_output_size(config.output_size))
    }

    /// Request compact or full history
    pub fn with_output_size(mut self, size: OutputSize) -> Self {
        self.output_size = size;
        self
    }

    /// Get daily closes for a symbol, in the order the provider sent them
    pub async fn get_daily(&self, symbol: &Symbol) -> Result<Vec<Observation>> {
        let params = [
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol.as_str()),
            ("outputsize", self.output_size.as_str()),
            ("apikey", self.api_key.as_str()),
        ];

        let response = self.client.get(&self.base_url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StockError::HttpStatus {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body).map_err(|e| {
            StockError::ParseError(format!("response for {symbol} is not valid JSON: {e}"))
        })?;

        parse_daily_series(symbol, &data)
    }
}

#[async_trait]
impl DailySeriesSource for AlphaVantageClient {
    async fn fetch_daily(&self, symbol: &Symbol) -> Result<Vec<Observation>> {
        self.get_daily(symbol).await
    }
}

/// Extract the daily closes from a `TIME_SERIES_DAILY` response
pub fn parse_daily_series(symbol: &Symbol, data: &Value) -> Result<Vec<Observation>> {
    // Provider-side failures still come back as 200 with a message body
    if let Some(message) = data.get("Error Message") {
        return Err(api_error(symbol, message));
    }
    for notice in ["Note", "Information"] {
        if let Some(message) = data.get(notice) {
            return Err(api_error(symbol, message));
        }
    }

    let series = data
        .get(DAILY_SERIES_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            StockError::ParseError(format!("no '{DAILY_SERIES_KEY}' object for {symbol}"))
        })?;

    series
        .iter()
        .map(|(key, record)| {
            let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").map_err(|e| {
                StockError::ParseError(format!("bad date key '{key}' for {symbol}: {e}"))
            })?;
            let close = parse_close(record).ok_or_else(|| {
                StockError::ParseError(format!("missing or invalid close for {symbol} on {date}"))
            })?;
            Ok(Observation::new(date, close))
        })
        .collect()
}

fn parse_close(record: &Value) -> Option<f64> {
    match record.get(CLOSE_FIELD)? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn api_error(symbol: &Symbol, message: &Value) -> StockError {
    StockError::ApiError {
        symbol: symbol.to_string(),
        message: message
            .as_str()
            .map_or_else(|| message.to_string(), str::to_string),
    }
}
