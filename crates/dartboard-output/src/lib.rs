#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/dartboard/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod export;
pub mod report;
pub mod summary;

pub use chart::{ChartError, render_performance_chart, write_performance_chart};
pub use export::{ExportError, ExportFormat, Exporter};
pub use report::{FailedYear, Report, ReportBuilder, ReportError};
pub use summary::{
    BenchmarkComparison, DistributionStats, PerformanceSummary, YearSummary, median, summarize,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
