#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/dartboard/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod benchmark;
pub mod error;
pub mod retry;
pub mod wikipedia;
pub mod yahoo;

pub use benchmark::{
    BenchmarkFileConfig, BenchmarkLoad, ParseError, load_benchmark, load_benchmark_from_reader,
    load_benchmark_or_empty,
};
pub use error::{DataError, Result};
pub use retry::{RetryPolicy, RetryingProvider};
pub use wikipedia::{WikipediaConstituents, parse_constituents_table};
pub use yahoo::YahooQuoteProvider;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
