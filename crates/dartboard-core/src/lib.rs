#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/dartboard/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod benchmark;
pub mod cache;
pub mod config;
pub mod driver;
pub mod error;
pub mod provider;
pub mod returns;
pub mod sampler;
pub mod series;
pub mod universe;

pub use aggregate::{aggregate, mean};
pub use benchmark::BenchmarkReturns;
pub use cache::YearCache;
pub use config::{DriverConfig, EmptyPortfolioPolicy, SimulationConfig, year_bounds};
pub use driver::{
    SimulationDriver, SimulationObserver, SimulationOutcome, YearFailure, YearlyPerformance,
};
pub use error::{ConfigError, FetchError, SeriesError, SimulationError};
pub use provider::{ConstituentProvider, InMemoryPriceProvider, PriceSeriesProvider};
pub use returns::{PercentGain, percent_gain};
pub use sampler::{PortfolioSample, SamplePolicy, Sampler};
pub use series::{PriceBar, PriceSeries};
pub use universe::{Constituent, GicsSector, Ticker, Universe};

/// Calendar year.
pub type Year = i32;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
