//! Terminal progress for a simulation run.

use dartboard_core::{
    FetchError, SimulationError, SimulationObserver, Ticker, Universe, Year, YearlyPerformance,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Prints one line per iteration above a per-year progress bar.
#[derive(Debug)]
pub(crate) struct TerminalProgress {
    iterations: u64,
    quiet: bool,
    bar: Option<ProgressBar>,
}

impl TerminalProgress {
    pub(crate) const fn new(iterations: usize, quiet: bool) -> Self {
        Self {
            iterations: iterations as u64,
            quiet,
            bar: None,
        }
    }

    fn line(&self, text: String) {
        if self.quiet {
            return;
        }
        match &self.bar {
            Some(bar) => bar.println(text),
            None => println!("{text}"),
        }
    }

    pub(crate) fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl SimulationObserver for TerminalProgress {
    fn on_year_start(&mut self, year: Year, universe: &Universe) {
        self.finish();
        if self.quiet {
            return;
        }
        let bar = ProgressBar::new(self.iterations);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("█▓░"));
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message(format!("{year} ({} tickers)", universe.len()));
        self.bar = Some(bar);
    }

    fn on_ticker_unavailable(&mut self, _year: Year, ticker: &Ticker, _error: &FetchError) {
        self.line(format!("Failed to fetch data for {ticker}"));
    }

    fn on_iteration(&mut self, performance: &YearlyPerformance) {
        self.line(format!(
            "Portfolio performance for {}: {:.2}%",
            performance.year, performance.performance
        ));
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_iteration_excluded(&mut self, year: Year, iteration: usize) {
        self.line(format!("No data for {year} iteration {iteration}, excluded"));
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_year_failed(&mut self, year: Year, error: &SimulationError) {
        self.finish();
        eprintln!("Year {year} skipped: {error}");
    }
}

impl Drop for TerminalProgress {
    fn drop(&mut self) {
        self.finish();
    }
}
