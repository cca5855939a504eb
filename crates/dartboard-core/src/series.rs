//! Daily price bars and date-ordered price series.

use crate::error::SeriesError;
use crate::universe::Ticker;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opening and closing price for one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Closing price.
    pub close: f64,
}

impl PriceBar {
    /// Create a new bar.
    pub const fn new(date: NaiveDate, open: f64, close: f64) -> Self {
        Self { date, open, close }
    }

    /// Whether both prices are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.open.is_finite() && self.close.is_finite() && self.open >= 0.0 && self.close >= 0.0
    }

    fn validate(&self) -> Result<(), SeriesError> {
        for value in [self.open, self.close] {
            if !value.is_finite() || value < 0.0 {
                return Err(SeriesError::InvalidPrice {
                    date: self.date,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Price bars for one ticker, strictly ascending by date.
///
/// The ordering is checked when the series is built, so consumers can rely on
/// `first()` being the earliest bar and `last()` the latest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    ticker: Ticker,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from bars that are already in ascending date order.
    ///
    /// # Errors
    ///
    /// Returns an error if the bars are out of order, share a date, or carry
    /// a negative or non-finite price.
    pub fn new(ticker: impl Into<Ticker>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        let ticker = ticker.into();
        for bar in &bars {
            bar.validate()?;
        }
        for pair in bars.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(SeriesError::DuplicateDate {
                    ticker: ticker.to_string(),
                    date: pair[1].date,
                });
            }
            if pair[1].date < pair[0].date {
                return Err(SeriesError::Unordered {
                    ticker: ticker.to_string(),
                    date: pair[1].date,
                });
            }
        }
        Ok(Self { ticker, bars })
    }

    /// Build a series from bars in any order, sorting them by date.
    ///
    /// # Errors
    ///
    /// Returns an error if two bars share a date or a price is invalid.
    pub fn from_unsorted(
        ticker: impl Into<Ticker>,
        mut bars: Vec<PriceBar>,
    ) -> Result<Self, SeriesError> {
        bars.sort_by_key(|bar| bar.date);
        Self::new(ticker, bars)
    }

    /// An empty series for a ticker.
    pub fn empty(ticker: impl Into<Ticker>) -> Self {
        Self {
            ticker: ticker.into(),
            bars: Vec::new(),
        }
    }

    /// Ticker the series belongs to.
    pub const fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Bars in ascending date order.
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Earliest bar.
    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    /// Latest bar.
    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the series has no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, month, day).unwrap()
    }

    #[test]
    fn test_new_accepts_ascending_bars() {
        let series = PriceSeries::new(
            "AAPL",
            vec![
                PriceBar::new(date(1, 3), 130.0, 125.0),
                PriceBar::new(date(1, 4), 126.0, 126.5),
            ],
        )
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.first().unwrap().date, date(1, 3));
        assert_eq!(series.last().unwrap().date, date(1, 4));
    }

    #[test]
    fn test_new_rejects_unordered_bars() {
        let result = PriceSeries::new(
            "AAPL",
            vec![
                PriceBar::new(date(1, 4), 126.0, 126.5),
                PriceBar::new(date(1, 3), 130.0, 125.0),
            ],
        );
        assert!(matches!(result, Err(SeriesError::Unordered { .. })));
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let result = PriceSeries::from_unsorted(
            "AAPL",
            vec![
                PriceBar::new(date(1, 3), 130.0, 125.0),
                PriceBar::new(date(1, 3), 131.0, 124.0),
            ],
        );
        assert!(matches!(result, Err(SeriesError::DuplicateDate { .. })));
    }

    #[test]
    fn test_from_unsorted_sorts() {
        let series = PriceSeries::from_unsorted(
            "MSFT",
            vec![
                PriceBar::new(date(3, 1), 250.0, 255.0),
                PriceBar::new(date(1, 3), 240.0, 239.0),
                PriceBar::new(date(2, 1), 247.0, 249.0),
            ],
        )
        .unwrap();

        let dates: Vec<_> = series.bars().iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![date(1, 3), date(2, 1), date(3, 1)]);
    }

    #[test]
    fn test_invalid_prices_rejected() {
        let result = PriceSeries::new("BAD", vec![PriceBar::new(date(1, 3), f64::NAN, 1.0)]);
        assert!(matches!(result, Err(SeriesError::InvalidPrice { .. })));

        let result = PriceSeries::new("BAD", vec![PriceBar::new(date(1, 3), 1.0, -2.0)]);
        assert!(matches!(result, Err(SeriesError::InvalidPrice { .. })));

        assert!(!PriceBar::new(date(1, 3), f64::INFINITY, 1.0).is_valid());
        assert!(PriceBar::new(date(1, 3), 0.0, 1.0).is_valid());
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::empty("GONE");
        assert!(series.is_empty());
        assert!(series.first().is_none());
        assert_eq!(series.ticker().as_str(), "GONE");
    }
}
