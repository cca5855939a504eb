//! End-to-end runs of the driver against in-memory price data.

use chrono::NaiveDate;
use dartboard_core::{
    DriverConfig, EmptyPortfolioPolicy, InMemoryPriceProvider, PriceBar, PriceSeries, Sampler,
    SimulationDriver, Ticker, Universe,
};
use std::collections::{BTreeMap, BTreeSet};

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, m, d).unwrap()
}

/// A: 10 -> 11 (+10%), B: 20 -> 18 (-10%), C has no data.
fn provider() -> InMemoryPriceProvider {
    InMemoryPriceProvider::new()
        .with_series(
            PriceSeries::new(
                "A",
                vec![
                    PriceBar::new(day(1, 3), 10.0, 10.2),
                    PriceBar::new(day(12, 29), 10.9, 11.0),
                ],
            )
            .unwrap(),
        )
        .with_series(
            PriceSeries::new(
                "B",
                vec![
                    PriceBar::new(day(1, 3), 20.0, 19.5),
                    PriceBar::new(day(12, 29), 18.3, 18.0),
                ],
            )
            .unwrap(),
        )
}

fn draw(seed: u64, universe: &Universe) -> BTreeSet<String> {
    Sampler::seeded(seed)
        .sample(universe, 2)
        .unwrap()
        .tickers()
        .iter()
        .map(Ticker::to_string)
        .collect()
}

#[tokio::test]
async fn test_three_ticker_scenario() {
    let universe = Universe::new(["A", "B", "C"]);
    let universes = BTreeMap::from([(2023, universe.clone())]);
    let config = DriverConfig {
        iterations: 1,
        sample_size: 2,
        empty_policy: EmptyPortfolioPolicy::Zero,
    };

    let mut seen = BTreeSet::new();
    for seed in 0..64 {
        let provider = provider();
        let driver = SimulationDriver::new(&provider, config);
        let outcome = driver
            .run(&[2023], &universes, &mut Sampler::seeded(seed), &mut ())
            .await;

        assert_eq!(outcome.performances.len(), 1);
        let result = outcome.performances[0];
        let drawn = draw(seed, &universe);
        let names: Vec<&str> = drawn.iter().map(String::as_str).collect();

        let (expected, with_data) = match names.as_slice() {
            ["A", "B"] => (0.0, 2),
            ["A", "C"] => (10.0, 1),
            ["B", "C"] => (-10.0, 1),
            other => panic!("unexpected sample {other:?}"),
        };
        assert!(
            (result.performance - expected).abs() < 1e-9,
            "seed {seed}: {names:?} gave {}",
            result.performance
        );
        assert_eq!(result.with_data, with_data);
        assert_eq!(result.sampled, 2);
        assert_eq!(provider.calls(), 2);

        seen.insert(names.join(""));
    }

    assert!(seen.contains("AB"));
    assert!(seen.contains("AC"));
}

#[tokio::test]
async fn test_seeded_runs_are_reproducible() {
    let universe = Universe::new(["A", "B", "C"]);
    let universes = BTreeMap::from([(2023, universe)]);
    let config = DriverConfig {
        iterations: 40,
        sample_size: 2,
        empty_policy: EmptyPortfolioPolicy::Zero,
    };

    let provider = provider();
    let driver = SimulationDriver::new(&provider, config);
    let first = driver
        .run(&[2023], &universes, &mut Sampler::seeded(11), &mut ())
        .await;
    let second = driver
        .run(&[2023], &universes, &mut Sampler::seeded(11), &mut ())
        .await;

    assert_eq!(first.values(), second.values());
    assert_eq!(first.performances.len(), 40);
}
