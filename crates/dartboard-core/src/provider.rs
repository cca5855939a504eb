//! Collaborator interfaces for constituent lists and price data.
//!
//! The simulation core only talks to the outside world through these traits.
//! Network-backed implementations live in `dartboard-data`; the in-memory
//! provider here backs tests, benchmarks and replay of captured data.

use crate::error::FetchError;
use crate::series::PriceSeries;
use crate::universe::{Constituent, Ticker};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of daily price series.
#[allow(async_fn_in_trait)]
pub trait PriceSeriesProvider {
    /// Fetch bars for `ticker` between `start` and `end`, both inclusive.
    ///
    /// Unknown or delisted tickers must yield [`FetchError::Unavailable`]
    /// rather than panic, so callers can exclude them.
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError>;
}

impl<P: PriceSeriesProvider> PriceSeriesProvider for &P {
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError> {
        (**self).fetch_series(ticker, start, end).await
    }
}

/// Source of the benchmark index's current constituents.
#[allow(async_fn_in_trait)]
pub trait ConstituentProvider {
    /// Error raised when the list cannot be produced in full.
    type Error: std::error::Error;

    /// Fetch the complete constituent list.
    ///
    /// Implementations must fail rather than return a partial list.
    async fn constituents(&self) -> Result<Vec<Constituent>, Self::Error>;
}

/// Provider serving pre-loaded series, clipped to the requested window.
///
/// Tickers without a registered series are reported as unavailable.
#[derive(Debug, Default)]
pub struct InMemoryPriceProvider {
    series: HashMap<Ticker, PriceSeries>,
    calls: AtomicUsize,
}

impl InMemoryPriceProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a series, replacing any previous one for the same ticker.
    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.ticker().clone(), series);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.insert(series);
        self
    }

    /// Number of `fetch_series` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl PriceSeriesProvider for InMemoryPriceProvider {
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let series = self
            .series
            .get(ticker)
            .ok_or_else(|| FetchError::unavailable(ticker.as_str(), "not in dataset"))?;

        let bars: Vec<_> = series
            .bars()
            .iter()
            .filter(|bar| bar.date >= start && bar.date <= end)
            .copied()
            .collect();

        if bars.is_empty() {
            return Err(FetchError::unavailable(
                ticker.as_str(),
                format!("no bars between {start} and {end}"),
            ));
        }

        // Bars come from an already ordered series, so this cannot fail
        PriceSeries::new(ticker.clone(), bars)
            .map_err(|e| FetchError::unavailable(ticker.as_str(), e.to_string()))
    }
}
