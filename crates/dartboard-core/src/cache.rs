//! Per-year memo of fetched percent gains.

use crate::Year;
use crate::error::FetchError;
use crate::provider::PriceSeriesProvider;
use crate::returns::{PercentGain, percent_gain};
use crate::universe::Ticker;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Gains for one simulated year, fetched lazily and at most once per ticker.
///
/// Every iteration of a year reads from the same cache, so a ticker drawn in
/// many portfolios costs a single provider call. Entries are never rewritten
/// once populated; a failed fetch is remembered as "no data".
#[derive(Debug)]
pub struct YearCache {
    year: Year,
    start: NaiveDate,
    end: NaiveDate,
    gains: HashMap<Ticker, Option<PercentGain>>,
}

impl YearCache {
    /// Empty cache for the inclusive window `start..=end` of `year`.
    pub fn new(year: Year, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            year,
            start,
            end,
            gains: HashMap::new(),
        }
    }

    /// Year the cache belongs to.
    pub const fn year(&self) -> Year {
        self.year
    }

    /// Gain for `ticker`, fetching it on first use.
    ///
    /// `on_error` is invoked once, on the fetch that failed.
    pub async fn gain<P, F>(
        &mut self,
        provider: &P,
        ticker: &Ticker,
        on_error: F,
    ) -> Option<PercentGain>
    where
        P: PriceSeriesProvider,
        F: FnOnce(&FetchError),
    {
        let slot = match self.gains.entry(ticker.clone()) {
            Entry::Occupied(entry) => return *entry.get(),
            Entry::Vacant(entry) => entry,
        };

        let gain = match provider.fetch_series(ticker, self.start, self.end).await {
            Ok(series) => {
                let gain = percent_gain(&series);
                if gain.is_none() {
                    debug!(year = self.year, %ticker, bars = series.len(), "gain undefined");
                }
                gain
            }
            Err(e) => {
                on_error(&e);
                None
            }
        };

        *slot.insert(gain)
    }

    /// Number of tickers fetched so far.
    pub fn fetched(&self) -> usize {
        self.gains.len()
    }

    /// Number of fetched tickers without a usable gain.
    pub fn missing(&self) -> usize {
        self.gains.values().filter(|g| g.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryPriceProvider;
    use crate::series::{PriceBar, PriceSeries};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_fetches_once_per_ticker() {
        let provider = InMemoryPriceProvider::new().with_series(
            PriceSeries::new("A", vec![PriceBar::new(date(1, 3), 10.0, 11.0)]).unwrap(),
        );
        let mut cache = YearCache::new(2023, date(1, 1), date(12, 31));
        let a = Ticker::from("A");
        let c = Ticker::from("C");

        let mut errors = 0;
        for _ in 0..3 {
            assert!(cache.gain(&provider, &a, |_| errors += 1).await.is_some());
            assert!(cache.gain(&provider, &c, |_| errors += 1).await.is_none());
        }

        assert_eq!(provider.calls(), 2);
        assert_eq!(errors, 1);
        assert_eq!(cache.fetched(), 2);
        assert_eq!(cache.missing(), 1);
    }
}
