//! Error types for stock trend operations

use thiserror::Error;

/// Stock trend specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Network or HTTP transport error (DNS, connection, timeout)
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("HTTP {status} while fetching {symbol}")]
    HttpStatus {
        symbol: String,
        status: u16,
    },

    /// The provider reported an error in an otherwise well-formed response
    #[error("API error for {symbol}: {message}")]
    ApiError {
        symbol: String,
        message: String,
    },

    /// Response body is not the expected structured data
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid arguments, e.g. sequences of different length
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input without variance, for which a regression is undefined
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Source data that cannot be used, such as a zero closing price
    #[error("Data quality error for {symbol}: {reason}")]
    DataQuality {
        symbol: String,
        reason: String,
    },

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// CSV export failed
    #[error("Export error: {0}")]
    ExportError(String),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StockError {
    /// Whether the error came from talking to the upstream API
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkError(_) | Self::HttpStatus { .. })
    }
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::InvalidSymbol(String::new());
        assert_eq!(err.to_string(), "Invalid symbol: \"\"");

        let err = StockError::DataQuality {
            symbol: "AAPL".to_string(),
            reason: "zero close on 2024-01-02".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Data quality error for AAPL: zero close on 2024-01-02"
        );

        let err = StockError::HttpStatus {
            symbol: "MSFT".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "HTTP 503 while fetching MSFT");
    }

    #[test]
    fn test_error_classification() {
        let err = StockError::HttpStatus {
            symbol: "MSFT".to_string(),
            status: 500,
        };
        assert!(err.is_network());

        let err = StockError::DegenerateInput("constant series".to_string());
        assert!(!err.is_network());
    }
}
