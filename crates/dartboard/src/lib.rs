#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/dartboard/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod universe;

// Re-export main types from sub-crates
pub use dartboard_core as simulation;
pub use dartboard_data as data;
pub use dartboard_output as output;

// Re-export common types
pub use dartboard_core::{
    BenchmarkReturns, GicsSector, SimulationConfig, SimulationDriver, Ticker, Universe,
};
pub use universe::SP500Universe;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
