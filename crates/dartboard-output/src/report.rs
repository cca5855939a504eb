//! JSON report of a simulation run.

use crate::summary::PerformanceSummary;
use chrono::{DateTime, Utc};
use dartboard_core::{SimulationConfig, SimulationOutcome, Year};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required field was not set on the builder.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),
}

/// A year the run could not simulate, in printable form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailedYear {
    /// Year that was aborted.
    pub year: Year,
    /// Error message.
    pub reason: String,
}

/// Everything needed to reproduce and review a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Effective configuration.
    pub config: SimulationConfig,

    /// Constituent source that fed the universe.
    pub universe_source: String,

    /// Tickers in the universe.
    pub universe_size: usize,

    /// Benchmark file, if one was loaded.
    pub benchmark_source: Option<String>,

    /// Statistics; absent when nothing was recorded.
    pub summary: Option<PerformanceSummary>,

    /// Years that were aborted.
    pub failed_years: Vec<FailedYear>,

    /// Provider calls made.
    pub fetches: usize,
}

impl Report {
    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        let mut file = File::create(path)?;
        file.write_all(self.to_json()?.as_bytes())?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    config: Option<SimulationConfig>,
    universe_source: Option<String>,
    universe_size: usize,
    benchmark_source: Option<String>,
    summary: Option<PerformanceSummary>,
    failed_years: Vec<FailedYear>,
    fetches: usize,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the run configuration.
    pub fn config(mut self, config: SimulationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Describe where the universe came from.
    pub fn universe(mut self, source: impl Into<String>, size: usize) -> Self {
        self.universe_source = Some(source.into());
        self.universe_size = size;
        self
    }

    /// Record the benchmark file.
    pub fn benchmark_source(mut self, source: impl Into<String>) -> Self {
        self.benchmark_source = Some(source.into());
        self
    }

    /// Set the summary.
    pub fn summary(mut self, summary: Option<PerformanceSummary>) -> Self {
        self.summary = summary;
        self
    }

    /// Copy failures and fetch count from a run.
    pub fn outcome(mut self, outcome: &SimulationOutcome) -> Self {
        self.failed_years = outcome
            .failures
            .iter()
            .map(|f| FailedYear {
                year: f.year,
                reason: f.error.to_string(),
            })
            .collect();
        self.fetches = outcome.fetches;
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<Report, ReportError> {
        Ok(Report {
            timestamp: Utc::now(),
            config: self.config.ok_or(ReportError::MissingField("config"))?,
            universe_source: self.universe_source.unwrap_or_default(),
            universe_size: self.universe_size,
            benchmark_source: self.benchmark_source,
            summary: self.summary,
            failed_years: self.failed_years,
            fetches: self.fetches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dartboard_core::{SimulationError, YearFailure};

    #[test]
    fn test_report_builder() {
        let outcome = SimulationOutcome {
            performances: vec![],
            failures: vec![YearFailure {
                year: 2022,
                error: SimulationError::MissingUniverse(2022),
            }],
            fetches: 7,
        };

        let report = ReportBuilder::new()
            .config(SimulationConfig::default())
            .universe("wikipedia", 503)
            .benchmark_source("returns.csv")
            .outcome(&outcome)
            .build()
            .unwrap();

        assert_eq!(report.universe_source, "wikipedia");
        assert_eq!(report.universe_size, 503);
        assert_eq!(report.fetches, 7);
        assert_eq!(report.failed_years.len(), 1);
        assert_eq!(report.failed_years[0].year, 2022);
        assert!(report.summary.is_none());
    }

    #[test]
    fn test_missing_config() {
        let result = ReportBuilder::new().build();
        assert!(matches!(result, Err(ReportError::MissingField("config"))));
    }

    #[test]
    fn test_json_contains_config() {
        let report = ReportBuilder::new()
            .config(SimulationConfig::default())
            .build()
            .unwrap();
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["config"]["start_year"], 2023);
        assert_eq!(value["config"]["driver"]["iterations"], 1000);
        assert!(value["summary"].is_null());
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        ReportBuilder::new()
            .config(SimulationConfig::default())
            .build()
            .unwrap()
            .write_to(&path)
            .unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains("\"timestamp\""));
    }
}
