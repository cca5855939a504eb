//! Random portfolio sampling without replacement.

use crate::error::SimulationError;
use crate::universe::{Ticker, Universe};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// What to do when the requested sample is larger than the universe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplePolicy {
    /// Fail with [`SimulationError::InsufficientUniverse`].
    #[default]
    Strict,
    /// Return the whole universe in random order.
    Clamp,
}

/// Tickers drawn for one iteration, distinct and in draw order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSample {
    tickers: Vec<Ticker>,
}

impl PortfolioSample {
    /// Sampled tickers in draw order.
    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    /// Number of tickers.
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    /// Whether nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

impl<'a> IntoIterator for &'a PortfolioSample {
    type Item = &'a Ticker;
    type IntoIter = std::slice::Iter<'a, Ticker>;

    fn into_iter(self) -> Self::IntoIter {
        self.tickers.iter()
    }
}

/// Uniform sampler over a universe, driven by an injected random source.
///
/// Two samplers built from the same seed draw the same portfolios for the
/// same sequence of calls.
#[derive(Debug, Clone)]
pub struct Sampler<R> {
    rng: R,
    policy: SamplePolicy,
}

impl Sampler<StdRng> {
    /// Reproducible sampler seeded with `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Sampler seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Sampler<R> {
    /// Create a sampler around a random source with the strict policy.
    pub const fn new(rng: R) -> Self {
        Self {
            rng,
            policy: SamplePolicy::Strict,
        }
    }

    /// Set the oversized-sample policy.
    pub const fn with_policy(mut self, policy: SamplePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active policy.
    pub const fn policy(&self) -> SamplePolicy {
        self.policy
    }

    /// Draw `count` distinct tickers uniformly at random.
    ///
    /// # Errors
    ///
    /// With [`SamplePolicy::Strict`], fails when `count` exceeds the universe.
    pub fn sample(
        &mut self,
        universe: &Universe,
        count: usize,
    ) -> Result<PortfolioSample, SimulationError> {
        let available = universe.len();
        let amount = if count > available {
            match self.policy {
                SamplePolicy::Strict => {
                    return Err(SimulationError::InsufficientUniverse {
                        requested: count,
                        available,
                    });
                }
                SamplePolicy::Clamp => available,
            }
        } else {
            count
        };

        let tickers = rand::seq::index::sample(&mut self.rng, available, amount)
            .into_iter()
            .map(|i| universe.tickers()[i].clone())
            .collect();

        Ok(PortfolioSample { tickers })
    }
}
