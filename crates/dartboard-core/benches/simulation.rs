//! Benchmarks for sampling and the simulation loop.

#![allow(missing_docs)]

use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dartboard_core::{
    DriverConfig, InMemoryPriceProvider, PriceBar, PriceSeries, Sampler, SimulationDriver,
    Universe,
};
use std::collections::BTreeMap;

fn universe(n: usize) -> Universe {
    Universe::new((0..n).map(|i| format!("T{i:04}")))
}

fn provider(universe: &Universe) -> InMemoryPriceProvider {
    let start = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();
    let end = NaiveDate::from_ymd_opt(2023, 12, 29).unwrap();
    let mut provider = InMemoryPriceProvider::new();
    for (i, ticker) in universe.tickers().iter().enumerate() {
        let open = 10.0 + i as f64;
        let close = open * (0.8 + (i % 7) as f64 * 0.1);
        let series = PriceSeries::new(
            ticker.clone(),
            vec![PriceBar::new(start, open, open), PriceBar::new(end, close, close)],
        )
        .unwrap();
        provider.insert(series);
    }
    provider
}

fn bench_sampler(c: &mut Criterion) {
    let universe = universe(500);
    let mut sampler = Sampler::seeded(42);

    c.bench_function("sample_100_of_500", |b| {
        b.iter(|| sampler.sample(black_box(&universe), 100).unwrap())
    });
}

fn bench_driver(c: &mut Criterion) {
    let universe = universe(500);
    let provider = provider(&universe);
    let universes = BTreeMap::from([(2023, universe)]);
    let driver = SimulationDriver::new(
        &provider,
        DriverConfig {
            iterations: 1000,
            sample_size: 100,
            ..DriverConfig::default()
        },
    );
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    c.bench_function("driver_1000x100_of_500", |b| {
        b.iter(|| {
            runtime.block_on(driver.run(&[2023], &universes, &mut Sampler::seeded(7), &mut ()))
        })
    });
}

criterion_group!(benches, bench_sampler, bench_driver);
criterion_main!(benches);
