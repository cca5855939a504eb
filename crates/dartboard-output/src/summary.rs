//! Distribution statistics over simulated performances.
//!
//! This module reduces the performance sequence of a run to max, min, mean
//! and median, overall and per year, and compares the simulation against the
//! benchmark's annual returns over the years both cover.

use dartboard_core::{BenchmarkReturns, Year, YearlyPerformance, mean};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Summary statistics of a sequence of percent gains.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DistributionStats {
    /// Number of values.
    pub count: usize,
    /// Largest value.
    pub max: f64,
    /// Smallest value.
    pub min: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median; the mean of the two middle values for an even count.
    pub median: f64,
}

impl DistributionStats {
    /// Statistics of `values`, `None` when empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use dartboard_output::DistributionStats;
    ///
    /// let stats = DistributionStats::from_values(&[4.0, -2.0, 10.0, 0.0]).unwrap();
    /// assert_eq!(stats.max, 10.0);
    /// assert_eq!(stats.min, -2.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 2.0);
    /// ```
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let median = median(values)?;
        let mean = mean(values.iter().copied())?;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);

        Some(Self {
            count: values.len(),
            max,
            min,
            mean,
            median,
        })
    }
}

/// Median of `values`, `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Statistics for one simulated year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearSummary {
    /// Simulated year.
    pub year: Year,
    /// Distribution of that year's iterations.
    pub stats: DistributionStats,
    /// Benchmark return for the year, if known.
    pub benchmark: Option<f64>,
}

/// Simulation versus benchmark over the years both cover.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkComparison {
    /// Years present in both the simulation and the benchmark.
    pub years: Vec<Year>,
    /// Mean simulated performance over `years`.
    pub simulation_mean: f64,
    /// Mean benchmark return over `years`.
    pub benchmark_mean: f64,
    /// `simulation_mean - benchmark_mean`.
    pub delta: f64,
}

/// Summary of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceSummary {
    /// Statistics over every recorded iteration of every year.
    pub overall: DistributionStats,
    /// Statistics per year, ascending.
    pub per_year: Vec<YearSummary>,
    /// Comparison with the benchmark, when one overlaps the run.
    pub benchmark: Option<BenchmarkComparison>,
}

/// Summarize a run.
///
/// Returns `None` when `performances` is empty. The benchmark comparison is
/// left out when no benchmark is given or it shares no year with the run.
pub fn summarize(
    performances: &[YearlyPerformance],
    benchmark: Option<&BenchmarkReturns>,
) -> Option<PerformanceSummary> {
    let values: Vec<f64> = performances.iter().map(|p| p.performance).collect();
    let overall = DistributionStats::from_values(&values)?;

    let mut by_year: BTreeMap<Year, Vec<f64>> = BTreeMap::new();
    for p in performances {
        by_year.entry(p.year).or_default().push(p.performance);
    }

    let per_year = by_year
        .iter()
        .filter_map(|(&year, values)| {
            DistributionStats::from_values(values).map(|stats| YearSummary {
                year,
                stats,
                benchmark: benchmark.and_then(|b| b.get(year)),
            })
        })
        .collect();

    let comparison = benchmark.and_then(|b| compare(&by_year, b));

    Some(PerformanceSummary {
        overall,
        per_year,
        benchmark: comparison,
    })
}

fn compare(
    by_year: &BTreeMap<Year, Vec<f64>>,
    benchmark: &BenchmarkReturns,
) -> Option<BenchmarkComparison> {
    let years: Vec<Year> = by_year
        .keys()
        .copied()
        .filter(|&year| benchmark.get(year).is_some())
        .collect();

    let simulation_mean = mean(years.iter().flat_map(|y| by_year[y].iter().copied()))?;
    let benchmark_mean = benchmark.mean_over(years.iter().copied())?;

    Some(BenchmarkComparison {
        years,
        simulation_mean,
        benchmark_mean,
        delta: simulation_mean - benchmark_mean,
    })
}

impl PerformanceSummary {
    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\nSimulation Summary\n");
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!("  Years Simulated:       {}\n", self.per_year.len()));
        output.push_str(&format!("  Portfolios Simulated:  {}\n", self.overall.count));
        output.push_str(&format!("  Max Performance:       {:.2}%\n", self.overall.max));
        output.push_str(&format!("  Min Performance:       {:.2}%\n", self.overall.min));
        output.push_str(&format!("  Average Performance:   {:.2}%\n", self.overall.mean));
        output.push_str(&format!("  Median Performance:    {:.2}%\n", self.overall.median));

        if let Some(cmp) = &self.benchmark {
            output.push_str(&format!(
                "  Benchmark Average:     {:.2}% ({} year{})\n",
                cmp.benchmark_mean,
                cmp.years.len(),
                if cmp.years.len() == 1 { "" } else { "s" }
            ));
            output.push_str(&format!("  Delta vs Benchmark:    {:+.2}%\n", cmp.delta));
        }

        if self.per_year.len() > 1 || self.per_year.iter().any(|y| y.benchmark.is_some()) {
            output.push_str("\nPer Year:\n");
            output.push_str(&"-".repeat(64));
            output.push('\n');
            output.push_str(&format!(
                "{:<6} {:>6} {:>9} {:>9} {:>9} {:>9} {:>10}\n",
                "Year", "Count", "Mean", "Median", "Min", "Max", "Benchmark"
            ));
            output.push_str(&"-".repeat(64));
            output.push('\n');

            for year in &self.per_year {
                let benchmark = year
                    .benchmark
                    .map_or_else(|| "-".to_string(), |b| format!("{b:.2}%"));
                output.push_str(&format!(
                    "{:<6} {:>6} {:>8.2}% {:>8.2}% {:>8.2}% {:>8.2}% {:>10}\n",
                    year.year,
                    year.stats.count,
                    year.stats.mean,
                    year.stats.median,
                    year.stats.min,
                    year.stats.max,
                    benchmark
                ));
            }
        }

        output.push_str(&"=".repeat(64));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Simulation Summary\n\n");
        output.push_str(&format!("- **Years:** {}\n", self.per_year.len()));
        output.push_str(&format!("- **Portfolios:** {}\n", self.overall.count));
        output.push_str(&format!("- **Max:** {:.2}%\n", self.overall.max));
        output.push_str(&format!("- **Min:** {:.2}%\n", self.overall.min));
        output.push_str(&format!("- **Mean:** {:.2}%\n", self.overall.mean));
        output.push_str(&format!("- **Median:** {:.2}%\n", self.overall.median));
        if let Some(cmp) = &self.benchmark {
            output.push_str(&format!("- **Benchmark mean:** {:.2}%\n", cmp.benchmark_mean));
            output.push_str(&format!("- **Delta:** {:+.2}%\n", cmp.delta));
        }
        output.push('\n');

        output.push_str("## Per Year\n\n");
        output.push_str("| Year | Count | Mean | Median | Min | Max | Benchmark |\n");
        output.push_str("|------|-------|------|--------|-----|-----|-----------|\n");
        for year in &self.per_year {
            let benchmark = year
                .benchmark
                .map_or_else(|| "-".to_string(), |b| format!("{b:.2}%"));
            output.push_str(&format!(
                "| {} | {} | {:.2}% | {:.2}% | {:.2}% | {:.2}% | {} |\n",
                year.year,
                year.stats.count,
                year.stats.mean,
                year.stats.median,
                year.stats.min,
                year.stats.max,
                benchmark
            ));
        }

        output
    }
}

impl fmt::Display for PerformanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Years Simulated: {}", self.per_year.len())?;
        writeln!(f, "Portfolios Simulated: {}", self.overall.count)?;
        writeln!(f, "Max Performance: {:.2}%", self.overall.max)?;
        writeln!(f, "Min Performance: {:.2}%", self.overall.min)?;
        writeln!(f, "Average Performance: {:.2}%", self.overall.mean)?;
        writeln!(f, "Median Performance: {:.2}%", self.overall.median)?;
        if let Some(cmp) = &self.benchmark {
            writeln!(f, "Benchmark Average: {:.2}%", cmp.benchmark_mean)?;
            writeln!(f, "Delta vs Benchmark: {:+.2}%", cmp.delta)?;
        }
        Ok(())
    }
}
