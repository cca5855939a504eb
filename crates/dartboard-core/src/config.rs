//! Run configuration and validation.

use crate::Year;
use crate::error::ConfigError;
use crate::sampler::{SamplePolicy, Sampler};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Earliest year the simulation accepts.
pub const MIN_YEAR: Year = 1900;

/// Latest year the simulation accepts.
pub const MAX_YEAR: Year = 2999;

/// How iterations whose sampled tickers all lacked data are recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyPortfolioPolicy {
    /// Record a 0% performance.
    #[default]
    Zero,
    /// Leave the iteration out of the performance sequence.
    Exclude,
}

/// Parameters of the simulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Portfolios drawn per year.
    pub iterations: usize,
    /// Tickers per portfolio.
    pub sample_size: usize,
    /// Behaviour when no sampled ticker had data.
    pub empty_policy: EmptyPortfolioPolicy,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            sample_size: 100,
            empty_policy: EmptyPortfolioPolicy::Zero,
        }
    }
}

/// Full run configuration as accepted from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// First simulated year.
    pub start_year: Year,
    /// Last simulated year, inclusive.
    pub end_year: Year,
    /// Seed for the sampler; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Behaviour when a universe is smaller than the sample size.
    pub sample_policy: SamplePolicy,
    /// Loop parameters.
    pub driver: DriverConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_year: 2023,
            end_year: 2023,
            seed: None,
            sample_policy: SamplePolicy::Strict,
            driver: DriverConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Check the configuration before anything is fetched.
    ///
    /// # Errors
    ///
    /// Rejects an inverted or unsupported year range and zero counts.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.start_year > self.end_year {
            return Err(ConfigError::InvalidYearRange {
                start: self.start_year,
                end: self.end_year,
            });
        }
        if self.start_year < MIN_YEAR {
            return Err(ConfigError::UnsupportedYear(self.start_year));
        }
        if self.end_year > MAX_YEAR {
            return Err(ConfigError::UnsupportedYear(self.end_year));
        }
        if self.driver.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.driver.sample_size == 0 {
            return Err(ConfigError::ZeroSampleSize);
        }
        Ok(())
    }

    /// Sampler honouring the configured seed and policy.
    pub fn sampler(&self) -> Sampler<StdRng> {
        self.seed
            .map_or_else(Sampler::from_entropy, Sampler::seeded)
            .with_policy(self.sample_policy)
    }

    /// Simulated years in ascending order.
    pub fn years(&self) -> Vec<Year> {
        (self.start_year..=self.end_year).collect()
    }
}

/// First and last calendar day of `year`.
pub fn year_bounds(year: Year) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}
