//! Error types for the simulation core.

use crate::Year;
use chrono::NaiveDate;
use thiserror::Error;

/// Failure to obtain a price series for one ticker.
///
/// The driver never treats these as fatal: the ticker is excluded from the
/// iteration that sampled it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The provider has no data for the ticker in the requested window
    /// (unknown symbol, delisted, or an empty response).
    #[error("No price data for {ticker}: {reason}")]
    Unavailable {
        /// Ticker that was requested
        ticker: String,
        /// Provider-supplied reason
        reason: String,
    },

    /// Network or transport failure talking to the provider.
    #[error("Network error fetching {ticker}: {reason}")]
    Network {
        /// Ticker that was requested
        ticker: String,
        /// Underlying error message
        reason: String,
    },

    /// The provider throttled the request.
    #[error("Rate limited fetching {ticker}, retry after {retry_after_ms}ms")]
    RateLimited {
        /// Ticker that was requested
        ticker: String,
        /// Milliseconds to wait before retrying
        retry_after_ms: u64,
    },
}

impl FetchError {
    /// Create an `Unavailable` error.
    pub fn unavailable(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }

    /// Create a `Network` error.
    pub fn network(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Network {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }

    /// Whether a retry could plausibly succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::RateLimited { .. })
    }
}

/// Violations of the [`PriceSeries`](crate::PriceSeries) invariants.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SeriesError {
    /// Bars are not strictly ascending by date.
    #[error("Bars for {ticker} are out of order at {date}")]
    Unordered {
        /// Ticker of the series
        ticker: String,
        /// First date that breaks the ordering
        date: NaiveDate,
    },

    /// Two bars share a trading date.
    #[error("Duplicate bar for {ticker} on {date}")]
    DuplicateDate {
        /// Ticker of the series
        ticker: String,
        /// Duplicated date
        date: NaiveDate,
    },

    /// A price is negative or not finite.
    #[error("Invalid price {value} on {date}")]
    InvalidPrice {
        /// Date of the offending bar
        date: NaiveDate,
        /// Offending value
        value: f64,
    },
}

/// Errors that abort the simulation of a single year.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimulationError {
    /// Requested sample size exceeds the universe and clamping is off.
    #[error("Insufficient universe: need {requested} tickers, only {available} available")]
    InsufficientUniverse {
        /// Requested sample size
        requested: usize,
        /// Size of the universe
        available: usize,
    },

    /// No universe was supplied for the year.
    #[error("No universe supplied for {0}")]
    MissingUniverse(Year),

    /// The year cannot be mapped onto a calendar range.
    #[error("Year {0} is out of the supported calendar range")]
    InvalidYear(Year),
}

/// Invalid run configuration, fatal at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Start year after end year.
    #[error("Invalid year range: start {start} is after end {end}")]
    InvalidYearRange {
        /// First year of the run
        start: Year,
        /// Last year of the run
        end: Year,
    },

    /// Iteration count must be positive.
    #[error("Iteration count must be positive")]
    ZeroIterations,

    /// Sample size must be positive.
    #[error("Sample size must be positive")]
    ZeroSampleSize,

    /// Year outside the range the data providers can serve.
    #[error("Year {0} is outside the supported range {min}..={max}", min = crate::config::MIN_YEAR, max = crate::config::MAX_YEAR)]
    UnsupportedYear(Year),
}
