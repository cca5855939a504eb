//! Simulation driver: repeated sampling and aggregation across years.

use crate::Year;
use crate::aggregate::aggregate;
use crate::cache::YearCache;
use crate::config::{DriverConfig, EmptyPortfolioPolicy, year_bounds};
use crate::error::{FetchError, SimulationError};
use crate::provider::PriceSeriesProvider;
use crate::sampler::Sampler;
use crate::universe::{Ticker, Universe};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Performance of one random portfolio in one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyPerformance {
    /// Simulated year.
    pub year: Year,
    /// Iteration index within the year, starting at 0.
    pub iteration: usize,
    /// Equal-weighted percent gain of the tickers that had data.
    pub performance: f64,
    /// Tickers drawn.
    pub sampled: usize,
    /// Drawn tickers that contributed a gain.
    pub with_data: usize,
}

/// A year that could not be simulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearFailure {
    /// Year that was aborted.
    pub year: Year,
    /// Why it was aborted.
    pub error: SimulationError,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationOutcome {
    /// Recorded performances, ordered by year then iteration.
    pub performances: Vec<YearlyPerformance>,
    /// Years that were aborted.
    pub failures: Vec<YearFailure>,
    /// Provider calls made across all years.
    pub fetches: usize,
}

impl SimulationOutcome {
    /// Performance values in recording order.
    pub fn values(&self) -> Vec<f64> {
        self.performances.iter().map(|p| p.performance).collect()
    }

    /// Whether at least one year failed and nothing was recorded.
    pub fn is_total_failure(&self) -> bool {
        self.performances.is_empty() && !self.failures.is_empty()
    }
}

/// Progress hooks invoked by [`SimulationDriver::run`].
///
/// All methods default to no-ops; `()` ignores every event.
pub trait SimulationObserver {
    /// A year is about to be simulated.
    fn on_year_start(&mut self, _year: Year, _universe: &Universe) {}

    /// A sampled ticker has no data for the year (reported once per year).
    fn on_ticker_unavailable(&mut self, _year: Year, _ticker: &Ticker, _error: &FetchError) {}

    /// An iteration's performance was recorded.
    fn on_iteration(&mut self, _performance: &YearlyPerformance) {}

    /// An iteration had no usable data and was left out.
    fn on_iteration_excluded(&mut self, _year: Year, _iteration: usize) {}

    /// A year was aborted.
    fn on_year_failed(&mut self, _year: Year, _error: &SimulationError) {}
}

impl SimulationObserver for () {}

/// Runs the sample, fetch, aggregate loop for every year.
#[derive(Debug)]
pub struct SimulationDriver<P> {
    provider: P,
    config: DriverConfig,
}

impl<P: PriceSeriesProvider> SimulationDriver<P> {
    /// Create a driver over a price provider.
    pub const fn new(provider: P, config: DriverConfig) -> Self {
        Self { provider, config }
    }

    /// Loop parameters.
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Underlying price provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Simulate each year in `years`, in order.
    ///
    /// Each year uses its entry in `universes` and its own [`YearCache`], so
    /// a ticker is fetched at most once per year however many portfolios
    /// draw it. Tickers without data are left out of the average. A year
    /// with no universe, or one too small for the sample under the strict
    /// policy, is recorded as a failure and the remaining years still run.
    pub async fn run<R, O>(
        &self,
        years: &[Year],
        universes: &BTreeMap<Year, Universe>,
        sampler: &mut Sampler<R>,
        observer: &mut O,
    ) -> SimulationOutcome
    where
        R: Rng,
        O: SimulationObserver + ?Sized,
    {
        let mut outcome = SimulationOutcome::default();
        if self.config.iterations == 0 {
            return outcome;
        }

        for &year in years {
            match self.run_year(year, universes, sampler, observer, &mut outcome).await {
                Ok(fetched) => {
                    outcome.fetches += fetched;
                }
                Err(error) => {
                    warn!(year, %error, "year aborted");
                    observer.on_year_failed(year, &error);
                    outcome.failures.push(YearFailure { year, error });
                }
            }
        }

        info!(
            recorded = outcome.performances.len(),
            failed_years = outcome.failures.len(),
            fetches = outcome.fetches,
            "simulation finished"
        );
        outcome
    }

    async fn run_year<R, O>(
        &self,
        year: Year,
        universes: &BTreeMap<Year, Universe>,
        sampler: &mut Sampler<R>,
        observer: &mut O,
        outcome: &mut SimulationOutcome,
    ) -> Result<usize, SimulationError>
    where
        R: Rng,
        O: SimulationObserver + ?Sized,
    {
        let (start, end) = year_bounds(year).ok_or(SimulationError::InvalidYear(year))?;
        let universe = universes
            .get(&year)
            .ok_or(SimulationError::MissingUniverse(year))?;

        observer.on_year_start(year, universe);
        let mut cache = YearCache::new(year, start, end);

        for iteration in 0..self.config.iterations {
            let sample = sampler.sample(universe, self.config.sample_size)?;

            let mut gains = BTreeMap::new();
            for ticker in &sample {
                let gain = cache
                    .gain(&self.provider, ticker, |e| {
                        debug!(year, %ticker, error = %e, "ticker excluded");
                        observer.on_ticker_unavailable(year, ticker, e);
                    })
                    .await;
                if let Some(gain) = gain {
                    gains.insert(ticker.clone(), gain);
                }
            }

            if gains.is_empty() && self.config.empty_policy == EmptyPortfolioPolicy::Exclude {
                observer.on_iteration_excluded(year, iteration);
                continue;
            }

            let performance = YearlyPerformance {
                year,
                iteration,
                performance: aggregate(&gains),
                sampled: sample.len(),
                with_data: gains.len(),
            };
            observer.on_iteration(&performance);
            outcome.performances.push(performance);
        }

        Ok(cache.fetched())
    }
}
