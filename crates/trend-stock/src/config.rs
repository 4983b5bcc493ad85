//! Configuration for stock trend runs
//!
//! Values are layered: defaults, then an optional JSON config file, then
//! environment variables, then whatever the caller sets on the builder last.

use crate::error::{Result, StockError};
use crate::predictor::TrendModel;
use crate::symbol::Symbol;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Alpha Vantage query endpoint
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

static ENV_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env reference pattern is valid")
});

/// Default CSV export path
pub const DEFAULT_OUTPUT_PATH: &str = "stockData.csv";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

/// Environment variable holding a comma separated symbol list
pub const SYMBOLS_ENV: &str = "STOCK_SYMBOLS";

/// How much history the daily endpoint returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSize {
    /// Latest 100 sessions
    #[default]
    Compact,
    /// Full history
    Full,
}

impl OutputSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for OutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputSize {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "full" => Ok(Self::Full),
            other => Err(StockError::ConfigError(format!(
                "unknown output size '{other}' (expected compact or full)"
            ))),
        }
    }
}

/// Configuration for one forecast run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Alpha Vantage API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Query endpoint
    pub base_url: String,

    /// Symbols to fetch, in request order
    pub symbols: Vec<Symbol>,

    /// Projection horizon in days; negative values project backwards
    pub horizon_days: i64,

    /// Regressor used for the return trend
    pub model: TrendModel,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// History length requested from the provider
    pub output_size: OutputSize,

    /// Where the fetched series are written, `None` disables the export
    pub output_path: Option<PathBuf>,

    /// Optional CSV of the projections
    pub predictions_path: Option<PathBuf>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            symbols: Vec::new(),
            horizon_days: 1,
            model: TrendModel::SelfRegression,
            request_timeout: Duration::from_secs(30),
            output_size: OutputSize::Compact,
            output_path: Some(PathBuf::from(DEFAULT_OUTPUT_PATH)),
            predictions_path: None,
        }
    }
}

impl ForecastConfig {
    /// Create a new configuration builder
    pub fn builder() -> ForecastConfigBuilder {
        ForecastConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            return Err(StockError::ConfigError(format!(
                "an API key is required; set {API_KEY_ENV} or apiKey in the config file"
            )));
        }

        if self.symbols.is_empty() {
            return Err(StockError::ConfigError(
                "at least one symbol is required".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(StockError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.base_url.trim().is_empty() {
            return Err(StockError::ConfigError("base_url must not be empty".to_string()));
        }

        if self.output_path.is_some() && self.output_path == self.predictions_path {
            return Err(StockError::ConfigError(
                "series and predictions exports must use different paths".to_string(),
            ));
        }

        Ok(())
    }
}

/// On-disk configuration, every key optional
///
/// ```json
/// {
///   "apiKey": "${ALPHA_VANTAGE_API_KEY}",
///   "symbols": ["AAPL", "MSFT"],
///   "horizonDays": 5,
///   "model": "day-index",
///   "timeoutSecs": 20,
///   "outputPath": "out/prices.csv"
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<TrendModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_size: Option<OutputSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictions_path: Option<String>,
}

impl ConfigFile {
    /// Load and resolve environment references in a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            StockError::ConfigError(format!(
                "Failed to read config file {}: {e}",
                path.as_ref().display()
            ))
        })?;

        let mut config: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| StockError::ConfigError(format!("Failed to parse config file: {e}")))?;

        config.resolve_env_vars()?;
        Ok(config)
    }

    /// Expand `${VAR}` in every string value
    pub fn resolve_env_vars(&mut self) -> Result<()> {
        for value in [
            &mut self.api_key,
            &mut self.base_url,
            &mut self.output_path,
            &mut self.predictions_path,
        ]
        .into_iter()
        .flatten()
        {
            *value = resolve_env_string(value)?;
        }

        if let Some(symbols) = &mut self.symbols {
            for symbol in symbols.iter_mut() {
                *symbol = resolve_env_string(symbol)?;
            }
        }

        Ok(())
    }
}

/// Resolve environment variable references in strings
///
/// Only `${VAR}` is a reference; a bare `$` is kept as written. A reference
/// to an unset variable is a configuration error.
pub fn resolve_env_string(s: &str) -> Result<String> {
    let mut result = String::with_capacity(s.len());
    let mut last = 0;
    for cap in ENV_REFERENCE.captures_iter(s) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let value = std::env::var(name.as_str()).map_err(|_| {
            StockError::ConfigError(format!(
                "environment variable {} referenced in config is not set",
                name.as_str()
            ))
        })?;
        result.push_str(&s[last..whole.start()]);
        result.push_str(&value);
        last = whole.end();
    }
    result.push_str(&s[last..]);

    Ok(result)
}

/// Builder for ForecastConfig
#[derive(Debug, Default)]
pub struct ForecastConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    symbols: Option<Vec<Symbol>>,
    horizon_days: Option<i64>,
    model: Option<TrendModel>,
    request_timeout: Option<Duration>,
    output_size: Option<OutputSize>,
    output_path: Option<Option<PathBuf>>,
    predictions_path: Option<PathBuf>,
}

impl ForecastConfigBuilder {
    /// Apply every key present in a config file
    pub fn config_file(mut self, file: ConfigFile) -> Result<Self> {
        if let Some(key) = file.api_key {
            self.api_key = Some(key);
        }
        if let Some(url) = file.base_url {
            self.base_url = Some(url);
        }
        if let Some(symbols) = file.symbols {
            self.symbols = Some(
                symbols
                    .iter()
                    .map(Symbol::new)
                    .collect::<Result<Vec<_>>>()?,
            );
        }
        if let Some(days) = file.horizon_days {
            self.horizon_days = Some(days);
        }
        if let Some(model) = file.model {
            self.model = Some(model);
        }
        if let Some(secs) = file.timeout_secs {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(size) = file.output_size {
            self.output_size = Some(size);
        }
        if let Some(path) = file.output_path {
            self.output_path = Some(Some(PathBuf::from(path)));
        }
        if let Some(path) = file.predictions_path {
            self.predictions_path = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    /// Load Alpha Vantage API key from environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
        self
    }

    /// Load the symbol list from `STOCK_SYMBOLS`
    pub fn with_env_symbols(mut self) -> Result<Self> {
        if let Ok(list) = std::env::var(SYMBOLS_ENV) {
            let symbols = Symbol::parse_list(&list)?;
            if !symbols.is_empty() {
                self.symbols = Some(symbols);
            }
        }
        Ok(self)
    }

    /// Set Alpha Vantage API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the query endpoint
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Replace the symbol list
    pub fn symbols(mut self, symbols: Vec<Symbol>) -> Self {
        self.symbols = Some(symbols);
        self
    }

    /// Set the projection horizon
    pub fn horizon_days(mut self, days: i64) -> Self {
        self.horizon_days = Some(days);
        self
    }

    /// Set the trend model
    pub fn model(mut self, model: TrendModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the requested history length
    pub fn output_size(mut self, size: OutputSize) -> Self {
        self.output_size = Some(size);
        self
    }

    /// Set the series export path, `None` to disable the export
    pub fn output_path(mut self, path: Option<PathBuf>) -> Self {
        self.output_path = Some(path);
        self
    }

    /// Set the predictions export path
    pub fn predictions_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.predictions_path = Some(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ForecastConfig> {
        let defaults = ForecastConfig::default();

        let config = ForecastConfig {
            api_key: self.api_key,
            base_url: self.base_url.unwrap_or(defaults.base_url),
            symbols: self.symbols.unwrap_or(defaults.symbols),
            horizon_days: self.horizon_days.unwrap_or(defaults.horizon_days),
            model: self.model.unwrap_or(defaults.model),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            output_size: self.output_size.unwrap_or(defaults.output_size),
            output_path: self.output_path.unwrap_or(defaults.output_path),
            predictions_path: self.predictions_path,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|n| Symbol::new(n).unwrap()).collect()
    }

    #[test]
    fn test_default_config() {
        let config = ForecastConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.horizon_days, 1);
        assert_eq!(config.model, TrendModel::SelfRegression);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.output_path, Some(PathBuf::from("stockData.csv")));
        // no key, no symbols
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = ForecastConfig::builder()
            .api_key("demo")
            .symbols(symbols(&["IBM"]))
            .horizon_days(-3)
            .model(TrendModel::DayIndex)
            .request_timeout(Duration::from_secs(5))
            .output_path(None)
            .build()
            .unwrap();

        assert_eq!(config.horizon_days, -3);
        assert_eq!(config.model, TrendModel::DayIndex);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.output_path.is_none());
    }

    #[test]
    fn test_validation_requires_key() {
        let err = ForecastConfig::builder()
            .api_key("  ")
            .symbols(symbols(&["IBM"]))
            .build()
            .unwrap_err();
        assert!(matches!(err, StockError::ConfigError(_)));
    }

    #[test]
    fn test_validation_requires_symbols() {
        let err = ForecastConfig::builder().api_key("demo").build().unwrap_err();
        assert!(matches!(err, StockError::ConfigError(_)));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let err = ForecastConfig::builder()
            .api_key("demo")
            .symbols(symbols(&["IBM"]))
            .request_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, StockError::ConfigError(_)));
    }

    #[test]
    fn test_validation_rejects_shared_export_path() {
        let err = ForecastConfig::builder()
            .api_key("demo")
            .symbols(vec![Symbol::new("IBM").unwrap()])
            .output_path(Some(PathBuf::from("out.csv")))
            .predictions_path("out.csv")
            .build()
            .unwrap_err();
        assert!(matches!(err, StockError::ConfigError(_)));
    }

    #[test]
    fn test_config_file_parsing() {
        let json = r#"{
            "apiKey": "file-key",
            "symbols": ["aapl", "msft"],
            "horizonDays": 5,
            "model": "day-index",
            "timeoutSecs": 12,
            "outputSize": "full",
            "outputPath": "out.csv"
        }"#;

        let file: ConfigFile = serde_json::from_str(json).unwrap();
        let config = ForecastConfig::builder()
            .config_file(file)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.symbols, symbols(&["AAPL", "MSFT"]));
        assert_eq!(config.horizon_days, 5);
        assert_eq!(config.model, TrendModel::DayIndex);
        assert_eq!(config.request_timeout, Duration::from_secs(12));
        assert_eq!(config.output_size, OutputSize::Full);
        assert_eq!(config.output_path, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_config_file_rejects_unknown_keys() {
        let result: std::result::Result<ConfigFile, _> =
            serde_json::from_str(r#"{"apikey": "typo"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_later_layers_win() {
        let file = ConfigFile {
            api_key: Some("file-key".to_string()),
            horizon_days: Some(10),
            symbols: Some(vec!["IBM".to_string()]),
            ..Default::default()
        };

        let config = ForecastConfig::builder()
            .config_file(file)
            .unwrap()
            .horizon_days(2)
            .build()
            .unwrap();

        assert_eq!(config.horizon_days, 2);
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_from_file_resolves_env() {
        // SAFETY: variable name is unique to this test
        unsafe { std::env::set_var("TREND_TEST_FILE_KEY", "secret") };

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"apiKey": "${{TREND_TEST_FILE_KEY}}", "symbols": ["IBM"]}}"#
        )
        .unwrap();

        let config = ConfigFile::from_file(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = ConfigFile::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, StockError::ConfigError(_)));
    }

    #[test]
    fn test_resolve_env_string() {
        // SAFETY: variable name is unique to this test
        unsafe { std::env::set_var("TREND_TEST_RESOLVE", "value") };

        assert_eq!(
            resolve_env_string("a_${TREND_TEST_RESOLVE}_b").unwrap(),
            "a_value_b"
        );
        assert_eq!(
            resolve_env_string("$TREND_TEST_RESOLVE/x").unwrap(),
            "$TREND_TEST_RESOLVE/x"
        );
        assert_eq!(resolve_env_string("pa$$word").unwrap(), "pa$$word");
        assert_eq!(resolve_env_string("k$ey123").unwrap(), "k$ey123");
        assert_eq!(resolve_env_string("plain").unwrap(), "plain");
        assert!(resolve_env_string("${TREND_TEST_SURELY_UNSET_VAR}").is_err());
    }

    #[test]
    fn test_output_size_parsing() {
        assert_eq!("FULL".parse::<OutputSize>().unwrap(), OutputSize::Full);
        assert!("huge".parse::<OutputSize>().is_err());
    }
}
