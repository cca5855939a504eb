//! Bounded retry with exponential backoff for price providers.

use chrono::NaiveDate;
use dartboard_core::{FetchError, PriceSeries, PriceSeriesProvider, Ticker};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// How often and how patiently to retry transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Factor applied to the delay after every retry.
    pub multiplier: f64,
    /// Upper bound on a single delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            multiplier: 2.0,
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
            multiplier: 1.0,
            max_backoff: Duration::ZERO,
        }
    }

    /// Same policy with a different retry bound.
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Delay before retry number `retry` (zero-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let factor = self.multiplier.max(1.0).powi(exponent);
        let secs = self.initial_backoff.as_secs_f64() * factor;
        if !secs.is_finite() || secs >= self.max_backoff.as_secs_f64() {
            self.max_backoff
        } else {
            Duration::from_secs_f64(secs)
        }
    }
}

/// Wraps a provider and retries [`FetchError::is_transient`] failures.
///
/// `Unavailable` is returned immediately; asking again will not make a
/// delisted ticker appear.
#[derive(Debug)]
pub struct RetryingProvider<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P> RetryingProvider<P> {
    /// Wrap `inner` with `policy`.
    pub const fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The retry policy in use.
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The wrapped provider.
    pub const fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: PriceSeriesProvider> PriceSeriesProvider for RetryingProvider<P> {
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError> {
        let mut retry = 0;
        loop {
            match self.inner.fetch_series(ticker, start, end).await {
                Err(e) if e.is_transient() && retry < self.policy.max_retries => {
                    let mut delay = self.policy.backoff(retry);
                    if let FetchError::RateLimited { retry_after_ms, .. } = &e {
                        delay = delay.max(Duration::from_millis(*retry_after_ms));
                    }
                    retry += 1;
                    warn!(
                        %ticker,
                        attempt = retry,
                        max = self.policy.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "retrying fetch"
                    );
                    sleep(delay).await;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dartboard_core::PriceBar;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns the scripted errors in order, then a one-bar series.
    struct Flaky {
        script: Mutex<Vec<FetchError>>,
        calls: AtomicUsize,
    }

    impl Flaky {
        fn new(mut errors: Vec<FetchError>) -> Self {
            errors.reverse();
            Self {
                script: Mutex::new(errors),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PriceSeriesProvider for Flaky {
        async fn fetch_series(
            &self,
            ticker: &Ticker,
            start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<PriceSeries, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(e) = self.script.lock().unwrap().pop() {
                return Err(e);
            }
            Ok(PriceSeries::new(ticker.as_str(), vec![PriceBar::new(start, 1.0, 2.0)]).unwrap())
        }
    }

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff: Duration::ZERO,
            multiplier: 2.0,
            max_backoff: Duration::ZERO,
        }
    }

    fn window() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_recovers_from_transient_errors() {
        let flaky = Flaky::new(vec![
            FetchError::network("A", "reset"),
            FetchError::RateLimited {
                ticker: "A".into(),
                retry_after_ms: 0,
            },
        ]);
        let provider = RetryingProvider::new(&flaky, fast(3));
        let (start, end) = window();

        let series = provider.fetch_series(&Ticker::from("A"), start, end).await;
        assert!(series.is_ok());
        assert_eq!(flaky.calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_bound() {
        let flaky = Flaky::new(vec![FetchError::network("A", "down"); 5]);
        let provider = RetryingProvider::new(&flaky, fast(2));
        let (start, end) = window();

        let result = provider.fetch_series(&Ticker::from("A"), start, end).await;
        assert!(matches!(result, Err(FetchError::Network { .. })));
        assert_eq!(flaky.calls(), 3);
    }

    #[tokio::test]
    async fn test_never_retries_unavailable() {
        let flaky = Flaky::new(vec![FetchError::unavailable("A", "delisted")]);
        let provider = RetryingProvider::new(&flaky, fast(5));
        let (start, end) = window();

        let result = provider.fetch_series(&Ticker::from("A"), start, end).await;
        assert!(matches!(result, Err(FetchError::Unavailable { .. })));
        assert_eq!(flaky.calls(), 1);
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy {
            max_retries: 10,
            initial_backoff: Duration::from_millis(100),
            multiplier: 2.0,
            max_backoff: Duration::from_millis(500),
        };
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(2), Duration::from_millis(400));
        assert_eq!(policy.backoff(3), Duration::from_millis(500));
        assert_eq!(policy.backoff(u32::MAX), Duration::from_millis(500));
    }

    #[test]
    fn test_none_policy() {
        assert_eq!(RetryPolicy::none().max_retries, 0);
        assert_eq!(RetryPolicy::default().with_max_retries(7).max_retries, 7);
    }
}
