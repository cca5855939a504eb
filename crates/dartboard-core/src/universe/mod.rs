//! Tickers, index constituents and sampling universes.

pub mod gics;

pub use gics::GicsSector;

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Symbol identifying one tradable equity.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Create a ticker from any string-like symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// The symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Ticker {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Ticker {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Index constituent as published in a constituent list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constituent {
    /// Ticker symbol.
    pub symbol: Ticker,
    /// Company name, when the source provides one.
    pub name: Option<String>,
    /// GICS sector, when the source provides one.
    pub sector: Option<GicsSector>,
}

impl Constituent {
    /// Create a constituent with only a symbol.
    pub fn new(symbol: impl Into<Ticker>) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            sector: None,
        }
    }

    /// Attach a GICS sector.
    pub const fn with_sector(mut self, sector: GicsSector) -> Self {
        self.sector = Some(sector);
        self
    }

    /// Attach a company name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// The set of tickers eligible for sampling in a given year.
///
/// Tickers are kept sorted and de-duplicated so that sampling with a seeded
/// random source is reproducible regardless of the order the constituent
/// list arrived in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    tickers: Vec<Ticker>,
}

impl Universe {
    /// Build a universe from any collection of tickers.
    pub fn new<I, T>(tickers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Ticker>,
    {
        let mut tickers: Vec<Ticker> = tickers.into_iter().map(Into::into).collect();
        tickers.sort();
        tickers.dedup();
        Self { tickers }
    }

    /// Build a universe from constituents, optionally restricted to a sector.
    ///
    /// Constituents without a sector are dropped when a sector filter is set.
    pub fn from_constituents(constituents: &[Constituent], sector: Option<GicsSector>) -> Self {
        Self::new(
            constituents
                .iter()
                .filter(|c| sector.is_none_or(|s| c.sector == Some(s)))
                .map(|c| c.symbol.clone()),
        )
    }

    /// Tickers in ascending order.
    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    /// Number of tickers.
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    /// Whether the universe has no tickers.
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// Check if a symbol is in the universe.
    pub fn contains(&self, symbol: &str) -> bool {
        self.tickers
            .binary_search_by(|t| t.as_str().cmp(symbol))
            .is_ok()
    }
}

impl<T: Into<Ticker>> FromIterator<T> for Universe {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}
