//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Yahoo Finance API error
    #[error("Yahoo Finance API error: {0}")]
    YahooApi(String),

    /// Connection to Yahoo Finance failed
    #[error("Yahoo Finance connection failed: {0}")]
    YahooConnection(String),

    /// Yahoo Finance throttled the request
    #[error("Yahoo Finance rate limit: {0}")]
    RateLimited(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP error status from a web source
    #[error("HTTP error: {0}")]
    Http(String),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Constituent list could not be extracted in full
    #[error("Constituent list error: {0}")]
    Constituents(String),

    /// Invalid date range
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date of the range
        start: String,
        /// End date of the range
        end: String,
    },

    /// Time conversion error
    #[error("Time conversion error: {0}")]
    TimeConversion(String),

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// CSV framing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Whether the failure is a transport problem worth retrying.
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::YahooConnection(_) | Self::RateLimited(_)
        )
    }
}

impl From<yahoo_finance_api::YahooError> for DataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        match err {
            yahoo_finance_api::YahooError::ConnectionFailed(e) => {
                Self::YahooConnection(e.to_string())
            }
            yahoo_finance_api::YahooError::TooManyRequests(context) => Self::RateLimited(context),
            other => Self::YahooApi(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yahoo_finance_api::YahooError;

    #[test]
    fn test_too_many_requests_is_transient() {
        let err = DataError::from(YahooError::TooManyRequests("GET chart".to_string()));
        assert!(matches!(&err, DataError::RateLimited(context) if context == "GET chart"));
        assert!(err.is_transient());
    }

    #[test]
    fn test_api_errors_are_not_transient() {
        let err = DataError::from(YahooError::NoQuotes);
        assert!(matches!(err, DataError::YahooApi(_)));
        assert!(!err.is_transient());
        assert!(!DataError::Parse("bad".to_string()).is_transient());
    }
}
