//! Log configuration

use serde::{Deserialize, Serialize};

/// Environment variable selecting the log output format (`pretty` or `json`)
pub const LOG_FORMAT_ENV: &str = "STOCK_TREND_LOG_FORMAT";

/// Default filter directive when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "warn,trend_stock=info,stock_trend=info";

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, one event per line
    #[default]
    Pretty,
    /// Newline-delimited JSON events
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitively. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `warn,trend_stock=debug`
    pub filter: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    /// Build from `RUST_LOG` and `STOCK_TREND_LOG_FORMAT`, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("RUST_LOG").ok(),
            std::env::var(LOG_FORMAT_ENV).ok(),
        )
    }

    fn from_values(filter: Option<String>, format: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            filter: filter
                .filter(|f| !f.trim().is_empty())
                .unwrap_or(defaults.filter),
            format: format
                .as_deref()
                .and_then(LogFormat::parse)
                .unwrap_or(defaults.format),
        }
    }

    /// Switch to JSON output
    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }
}
