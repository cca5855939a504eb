//! Embedded S&P 500 sample for offline runs.
//!
//! A fixed selection of large constituents covering all 11 GICS sectors. It
//! stands in for the live constituent list when the network is unavailable
//! or a run must be reproducible.

use dartboard_core::{Constituent, ConstituentProvider, GicsSector, Ticker, Universe};
use std::collections::HashMap;
use std::convert::Infallible;

/// Symbols per sector, in index weight order at the time of capture.
const CONSTITUENTS: &[(GicsSector, &[&str])] = &[
    (
        GicsSector::InformationTechnology,
        &[
            "AAPL", "MSFT", "NVDA", "AVGO", "ORCL", "CSCO", "ACN", "AMD", "IBM", "INTC", "TXN",
            "QCOM", "ADBE", "CRM", "NOW",
        ],
    ),
    (
        GicsSector::HealthCare,
        &[
            "LLY", "UNH", "JNJ", "ABBV", "MRK", "TMO", "ABT", "DHR", "PFE", "BMY", "AMGN", "GILD",
        ],
    ),
    (
        GicsSector::Financials,
        &[
            "BRK.B", "JPM", "V", "MA", "BAC", "WFC", "MS", "GS", "BLK", "C", "AXP", "SCHW",
        ],
    ),
    (
        GicsSector::ConsumerDiscretionary,
        &[
            "AMZN", "TSLA", "HD", "MCD", "NKE", "SBUX", "LOW", "TJX", "BKNG", "CMG", "F", "GM",
        ],
    ),
    (
        GicsSector::CommunicationServices,
        &["GOOGL", "GOOG", "META", "NFLX", "DIS", "CMCSA", "T", "VZ", "TMUS", "EA"],
    ),
    (
        GicsSector::Industrials,
        &[
            "CAT", "UNP", "RTX", "HON", "UPS", "BA", "DE", "LMT", "GE", "MMM", "FDX", "NSC",
        ],
    ),
    (
        GicsSector::ConsumerStaples,
        &["WMT", "PG", "COST", "KO", "PEP", "PM", "MO", "CL", "MDLZ", "KHC"],
    ),
    (
        GicsSector::Energy,
        &["XOM", "CVX", "COP", "SLB", "EOG", "MPC", "PSX", "VLO", "OXY", "HAL"],
    ),
    (
        GicsSector::Utilities,
        &["NEE", "SO", "DUK", "CEG", "AEP", "EXC", "XEL", "D"],
    ),
    (
        GicsSector::RealEstate,
        &["PLD", "AMT", "EQIX", "CCI", "PSA", "SPG", "O", "WELL"],
    ),
    (
        GicsSector::Materials,
        &["LIN", "APD", "SHW", "FCX", "NEM", "ECL", "DD", "DOW", "PPG", "NUE"],
    ),
];

/// Embedded S&P 500 constituents.
#[derive(Debug, Clone)]
pub struct SP500Universe {
    constituents: Vec<Constituent>,
    symbol_to_sector: HashMap<Ticker, GicsSector>,
}

impl SP500Universe {
    /// Load the embedded list.
    pub fn new() -> Self {
        let constituents: Vec<Constituent> = CONSTITUENTS
            .iter()
            .flat_map(|&(sector, symbols)| {
                symbols
                    .iter()
                    .map(move |&symbol| Constituent::new(symbol).with_sector(sector))
            })
            .collect();
        let symbol_to_sector = constituents
            .iter()
            .filter_map(|c| c.sector.map(|s| (c.symbol.clone(), s)))
            .collect();

        Self {
            constituents,
            symbol_to_sector,
        }
    }

    /// All constituents, grouped by sector.
    pub fn constituents(&self) -> &[Constituent] {
        &self.constituents
    }

    /// Sector of `symbol`, if it is in the list.
    pub fn sector(&self, symbol: &str) -> Option<GicsSector> {
        self.symbol_to_sector.get(symbol).copied()
    }

    /// Symbols classified under `sector`.
    pub fn symbols_in_sector(&self, sector: GicsSector) -> Vec<Ticker> {
        self.constituents
            .iter()
            .filter(|c| c.sector == Some(sector))
            .map(|c| c.symbol.clone())
            .collect()
    }

    /// Constituent count per sector.
    pub fn sector_counts(&self) -> HashMap<GicsSector, usize> {
        let mut counts = HashMap::new();
        for sector in self.constituents.iter().filter_map(|c| c.sector) {
            *counts.entry(sector).or_insert(0) += 1;
        }
        counts
    }

    /// Sampling universe, optionally restricted to one sector.
    pub fn universe(&self, sector: Option<GicsSector>) -> Universe {
        Universe::from_constituents(&self.constituents, sector)
    }
}

impl Default for SP500Universe {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstituentProvider for SP500Universe {
    type Error = Infallible;

    async fn constituents(&self) -> Result<Vec<Constituent>, Infallible> {
        Ok(self.constituents.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_universe_creation() {
        let sp500 = SP500Universe::new();
        assert!(sp500.constituents().len() >= 100);
        assert_eq!(sp500.universe(None).len(), sp500.constituents().len());
    }

    #[test]
    fn test_all_sectors_represented() {
        let counts = SP500Universe::new().sector_counts();
        for sector in GicsSector::all() {
            assert!(
                counts.get(&sector).is_some_and(|&n| n > 0),
                "Sector {sector:?} not represented"
            );
        }
    }

    #[test]
    fn test_sector_lookup() {
        let sp500 = SP500Universe::new();

        assert_eq!(sp500.sector("AAPL"), Some(GicsSector::InformationTechnology));
        assert_eq!(sp500.sector("XOM"), Some(GicsSector::Energy));
        assert_eq!(sp500.sector("BRK.B"), Some(GicsSector::Financials));
        assert_eq!(sp500.sector("INVALID"), None);
    }

    #[test]
    fn test_sector_universe() {
        let sp500 = SP500Universe::new();
        let energy = sp500.universe(Some(GicsSector::Energy));

        assert_eq!(energy.len(), 10);
        assert!(energy.contains("XOM"));
        assert!(!energy.contains("AAPL"));
        assert_eq!(
            sp500.symbols_in_sector(GicsSector::Energy).len(),
            energy.len()
        );
    }

    #[tokio::test]
    async fn test_constituent_provider() {
        let sp500 = SP500Universe::new();
        let Ok(list) = ConstituentProvider::constituents(&sp500).await;
        assert_eq!(list.len(), sp500.constituents().len());
    }
}
