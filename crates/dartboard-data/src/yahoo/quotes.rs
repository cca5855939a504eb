//! Daily price series from Yahoo Finance.

use crate::error::{DataError, Result};
use chrono::{DateTime, Days, NaiveDate};
use dartboard_core::{FetchError, PriceBar, PriceSeries, PriceSeriesProvider, Ticker};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Default pause after each request.
pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(250);

/// Yahoo Finance quote provider with rate limiting.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a provider with the default rate limit.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(DEFAULT_RATE_LIMIT)
    }

    /// Create a provider that pauses `rate_limit_delay` after every request.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be built.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            rate_limit_delay,
        })
    }

    /// Fetch daily bars for `symbol` between `start` and `end`, inclusive.
    ///
    /// Bars with missing or negative prices are dropped. If the response
    /// repeats a trading date, the later bar wins.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid range or symbol, a failed request, or
    /// a response without usable bars.
    pub async fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        // Yahoo treats the end of the window as exclusive
        let start_time = to_offset_datetime(start)?;
        let end_time = to_offset_datetime(end.checked_add_days(Days::new(1)).unwrap_or(end))?;

        let response = self
            .provider
            .get_quote_history(&yahoo_symbol(symbol), start_time, end_time)
            .await;

        // Apply rate limiting whether or not the request succeeded
        sleep(self.rate_limit_delay).await;

        let quotes = response?
            .quotes()?;

        let bars = bars_from_raw(
            quotes.iter().map(|q| (q.timestamp, q.open, q.close)),
            start,
            end,
        );
        if bars.is_empty() {
            return Err(DataError::Parse(format!(
                "No usable bars for {symbol} between {start} and {end}"
            )));
        }

        PriceSeries::new(symbol, bars).map_err(|e| DataError::Parse(e.to_string()))
    }
}

impl PriceSeriesProvider for YahooQuoteProvider {
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> std::result::Result<PriceSeries, FetchError> {
        self.fetch_bars(ticker.as_str(), start, end)
            .await
            .map_err(|e| fetch_error(ticker, &e, self.rate_limit_delay))
    }
}

/// Classify a data error for the simulation driver.
///
/// Throttling asks the caller to wait at least `rate_limit_delay` before
/// retrying.
fn fetch_error(ticker: &Ticker, err: &DataError, rate_limit_delay: Duration) -> FetchError {
    match err {
        DataError::RateLimited(_) => FetchError::RateLimited {
            ticker: ticker.to_string(),
            retry_after_ms: u64::try_from(rate_limit_delay.as_millis()).unwrap_or(u64::MAX),
        },
        e if e.is_transient() => FetchError::network(ticker.as_str(), e.to_string()),
        e => FetchError::unavailable(ticker.as_str(), e.to_string()),
    }
}

/// Map index-style share class symbols (`BRK.B`) to Yahoo's form (`BRK-B`).
pub fn yahoo_symbol(symbol: &str) -> String {
    symbol.trim().replace('.', "-")
}

/// Turn raw `(unix timestamp, open, close)` rows into ordered bars.
///
/// Rows outside `start..=end`, with unparseable timestamps, or with
/// non-finite or negative prices are dropped.
pub fn bars_from_raw(
    raw: impl IntoIterator<Item = (i64, f64, f64)>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<PriceBar> {
    let mut by_date = BTreeMap::new();
    for (timestamp, open, close) in raw {
        let Some(date) = DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive()) else {
            debug!(timestamp, "dropping bar with invalid timestamp");
            continue;
        };
        if date < start || date > end {
            continue;
        }
        let bar = PriceBar::new(date, open, close);
        if !bar.is_valid() {
            debug!(%date, open, close, "dropping bar with invalid prices");
            continue;
        }
        by_date.insert(date, bar);
    }
    by_date.into_values().collect()
}

fn to_offset_datetime(date: NaiveDate) -> Result<time::OffsetDateTime> {
    let timestamp = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DataError::TimeConversion(format!("Invalid date {date}")))?
        .and_utc()
        .timestamp();
    time::OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| DataError::TimeConversion(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, d).unwrap()
    }

    fn ts(m: u32, d: u32) -> i64 {
        date(m, d).and_hms_opt(14, 30, 0).unwrap().and_utc().timestamp()
    }

    #[rstest]
    #[case("BRK.B", "BRK-B")]
    #[case("BF.B", "BF-B")]
    #[case("AAPL", "AAPL")]
    #[case(" MSFT ", "MSFT")]
    fn test_yahoo_symbol(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(yahoo_symbol(input), expected);
    }

    #[test]
    fn test_bars_from_raw_sorts_and_filters() {
        let raw = vec![
            (ts(3, 1), 12.0, 12.5),
            (ts(1, 3), 10.0, 10.1),
            (ts(2, 1), f64::NAN, 11.0),
            (ts(2, 2), 11.0, -1.0),
            (ts(12, 31) + 86_400 * 3, 13.0, 13.0),
        ];

        let bars = bars_from_raw(raw, date(1, 1), date(12, 31));
        let dates: Vec<_> = bars.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![date(1, 3), date(3, 1)]);
    }

    #[test]
    fn test_bars_from_raw_keeps_last_duplicate() {
        let raw = vec![(ts(1, 3), 10.0, 10.1), (ts(1, 3), 10.0, 10.4)];
        let bars = bars_from_raw(raw, date(1, 1), date(12, 31));
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 10.4);
    }

    #[test]
    fn test_fetch_error_classification() {
        let ticker = Ticker::from("AAPL");
        let delay = Duration::from_millis(750);

        let throttled = DataError::from(yahoo::YahooError::TooManyRequests("GET chart".into()));
        assert_eq!(
            fetch_error(&ticker, &throttled, delay),
            FetchError::RateLimited {
                ticker: "AAPL".to_string(),
                retry_after_ms: 750,
            }
        );

        let dropped = DataError::YahooConnection("reset".to_string());
        assert!(matches!(
            fetch_error(&ticker, &dropped, delay),
            FetchError::Network { .. }
        ));

        let missing = DataError::from(yahoo::YahooError::NoQuotes);
        let mapped = fetch_error(&ticker, &missing, delay);
        assert!(matches!(mapped, FetchError::Unavailable { .. }));
        assert!(!mapped.is_transient());
    }

    #[tokio::test]
    async fn test_invalid_date_range() {
        let provider = YahooQuoteProvider::with_rate_limit(Duration::ZERO).unwrap();
        let result = provider.fetch_bars("AAPL", date(6, 1), date(1, 1)).await;
        assert!(matches!(result, Err(DataError::InvalidDateRange { .. })));
    }

    #[tokio::test]
    async fn test_invalid_symbol() {
        let provider = YahooQuoteProvider::with_rate_limit(Duration::ZERO).unwrap();
        let result = provider.fetch_bars("", date(1, 1), date(6, 1)).await;
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_fetch_series_live() {
        let provider = YahooQuoteProvider::new().unwrap();
        let series = provider
            .fetch_series(&Ticker::from("AAPL"), date(1, 1), date(12, 31))
            .await
            .unwrap();
        assert!(series.len() > 200);
        assert!(series.first().unwrap().date >= date(1, 1));
        assert!(series.last().unwrap().date <= date(12, 31));
    }
}
