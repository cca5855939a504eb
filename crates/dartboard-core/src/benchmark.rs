//! Historical annual returns of the benchmark index.

use crate::Year;
use crate::aggregate::mean;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Benchmark annual percent returns keyed by calendar year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReturns {
    returns: BTreeMap<Year, f64>,
}

impl BenchmarkReturns {
    /// Empty benchmark.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return for a year, if known.
    pub fn get(&self, year: Year) -> Option<f64> {
        self.returns.get(&year).copied()
    }

    /// Record a year's return, returning the value it replaced.
    pub fn insert(&mut self, year: Year, percent: f64) -> Option<f64> {
        self.returns.insert(year, percent)
    }

    /// Years in ascending order with their returns.
    pub fn iter(&self) -> impl Iterator<Item = (Year, f64)> + '_ {
        self.returns.iter().map(|(&y, &r)| (y, r))
    }

    /// Number of years covered.
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// Whether no year is covered.
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Mean return over the given years, ignoring years without data.
    pub fn mean_over(&self, years: impl IntoIterator<Item = Year>) -> Option<f64> {
        mean(years.into_iter().filter_map(|y| self.get(y)))
    }
}

impl FromIterator<(Year, f64)> for BenchmarkReturns {
    fn from_iter<I: IntoIterator<Item = (Year, f64)>>(iter: I) -> Self {
        Self {
            returns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_over_ignores_missing_years() {
        let benchmark: BenchmarkReturns =
            [(2021, 26.9), (2022, -19.4), (2023, 24.2)].into_iter().collect();

        let m = benchmark.mean_over([2022, 2023, 2030]).unwrap();
        assert_relative_eq!(m, 2.4, epsilon = 1e-9);
        assert_eq!(benchmark.mean_over([1990]), None);
    }

    #[test]
    fn test_insert_replaces() {
        let mut benchmark = BenchmarkReturns::new();
        assert_eq!(benchmark.insert(2023, 24.0), None);
        assert_eq!(benchmark.insert(2023, 24.2), Some(24.0));
        assert_eq!(benchmark.len(), 1);
        assert_eq!(benchmark.get(2023), Some(24.2));
    }
}
