//! Dartboard CLI binary.
//!
//! Simulates randomly picked S&P 500 portfolios and compares them with the
//! index's historical annual returns.

mod logging;
mod progress;

use clap::{Args, Parser, Subcommand};
use dartboard::SP500Universe;
use dartboard_core::{
    BenchmarkReturns, Constituent, ConstituentProvider, DriverConfig, EmptyPortfolioPolicy,
    GicsSector, SamplePolicy, SimulationConfig, SimulationDriver, Universe, Year,
};
use dartboard_data::{
    BenchmarkFileConfig, RetryPolicy, RetryingProvider, WikipediaConstituents,
    YahooQuoteProvider, load_benchmark, load_benchmark_or_empty,
};
use dartboard_output::{
    ExportFormat, Exporter, ReportBuilder, summarize, write_performance_chart,
};
use logging::init_logging;
use progress::TerminalProgress;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::{error, info, warn};

const DEFAULT_CHART_PATH: &str = "dartboard.svg";

#[derive(Parser)]
#[command(name = "dartboard")]
#[command(about = "Random S&P 500 portfolios versus the index", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate random portfolios
    Run(RunArgs),

    /// List index constituents
    Universe {
        /// Filter by GICS sector
        #[arg(long)]
        sector: Option<String>,

        /// List all sectors
        #[arg(long)]
        list_sectors: bool,

        /// Use the embedded list instead of downloading
        #[arg(long)]
        offline: bool,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// First simulated year
    #[arg(long, default_value_t = 2023)]
    start_year: Year,

    /// Last simulated year (defaults to the start year)
    #[arg(long)]
    end_year: Option<Year>,

    /// Portfolios drawn per year
    #[arg(long, default_value_t = 1000)]
    iterations: usize,

    /// Tickers per portfolio
    #[arg(long, default_value_t = 100)]
    sample_size: usize,

    /// Benchmark annual returns file (date,value rows)
    #[arg(long)]
    benchmark: Option<PathBuf>,

    /// Header rows to skip in the benchmark file
    #[arg(long, default_value_t = 1)]
    benchmark_header_rows: usize,

    /// Footer rows to ignore in the benchmark file
    #[arg(long, default_value_t = 1)]
    benchmark_footer_rows: usize,

    /// Multiply benchmark values, e.g. 100 for fractional returns
    #[arg(long, default_value_t = 1.0)]
    benchmark_scale: f64,

    /// Fail instead of continuing when the benchmark cannot be loaded
    #[arg(long)]
    strict_benchmark: bool,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Use the whole universe when it is smaller than the sample size
    #[arg(long)]
    clamp_sample: bool,

    /// Leave out portfolios with no price data instead of recording 0%
    #[arg(long)]
    exclude_empty: bool,

    /// Use the embedded constituent list instead of downloading
    #[arg(long)]
    offline_universe: bool,

    /// Restrict the universe to one GICS sector
    #[arg(long)]
    sector: Option<String>,

    /// Where to write the SVG chart of the performances
    #[arg(long, default_value = DEFAULT_CHART_PATH)]
    chart: PathBuf,

    /// Skip writing the chart
    #[arg(long)]
    no_chart: bool,

    /// Write a JSON report
    #[arg(long)]
    report: Option<PathBuf>,

    /// Export raw performances (.csv or .json)
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Pause after each price request, in milliseconds
    #[arg(long, default_value_t = 250)]
    rate_limit_ms: u64,

    /// Retries for transient network failures
    #[arg(long, default_value_t = 3)]
    max_retries: u32,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,
}

impl RunArgs {
    fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            start_year: self.start_year,
            end_year: self.end_year.unwrap_or(self.start_year),
            seed: self.seed,
            sample_policy: if self.clamp_sample {
                SamplePolicy::Clamp
            } else {
                SamplePolicy::Strict
            },
            driver: DriverConfig {
                iterations: self.iterations,
                sample_size: self.sample_size,
                empty_policy: if self.exclude_empty {
                    EmptyPortfolioPolicy::Exclude
                } else {
                    EmptyPortfolioPolicy::Zero
                },
            },
        }
    }

    fn chart_path(&self) -> Option<&Path> {
        (!self.no_chart).then_some(self.chart.as_path())
    }

    fn benchmark_config(&self) -> BenchmarkFileConfig {
        BenchmarkFileConfig {
            header_rows: self.benchmark_header_rows,
            footer_rows: self.benchmark_footer_rows,
            value_scale: self.benchmark_scale,
            ..BenchmarkFileConfig::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            init_logging(cli.verbose, args.quiet);
            run_simulation(&args).await?;
        }
        Commands::Universe {
            sector,
            list_sectors,
            offline,
        } => {
            init_logging(cli.verbose, false);
            if list_sectors {
                list_all_sectors();
            } else {
                list_universe(sector.as_deref(), offline).await?;
            }
        }
    }

    Ok(())
}

async fn run_simulation(args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.simulation_config();
    config.validate()?;
    let sector = args.sector.as_deref().map(parse_sector).transpose()?;

    // Benchmark first: a strict failure should not cost a full download.
    let benchmark = load_benchmark_file(args)?;

    let (source, constituents) = fetch_constituents(args.offline_universe).await?;
    let universe = Universe::from_constituents(&constituents, sector);
    if universe.is_empty() {
        return Err("Universe is empty after filtering".into());
    }
    info!(source, tickers = universe.len(), "universe ready");

    let years = config.years();
    let universes: BTreeMap<Year, Universe> =
        years.iter().map(|&y| (y, universe.clone())).collect();

    if !args.quiet {
        println!(
            "Simulating {} portfolio(s) of {} from {} tickers ({}), {}-{}",
            config.driver.iterations,
            config.driver.sample_size,
            universe.len(),
            source,
            config.start_year,
            config.end_year
        );
    }

    let quotes = YahooQuoteProvider::with_rate_limit(Duration::from_millis(args.rate_limit_ms))?;
    let provider = RetryingProvider::new(
        quotes,
        RetryPolicy::default().with_max_retries(args.max_retries),
    );
    let driver = SimulationDriver::new(provider, config.driver);
    let mut sampler = config.sampler();
    let mut progress = TerminalProgress::new(config.driver.iterations, args.quiet);

    let outcome = driver
        .run(&years, &universes, &mut sampler, &mut progress)
        .await;
    progress.finish();

    for failure in &outcome.failures {
        warn!(year = failure.year, error = %failure.error, "year failed");
    }

    let summary = summarize(&outcome.performances, benchmark.as_ref().map(|(b, _)| b));
    match &summary {
        Some(summary) => print!("{}", summary.to_ascii_table()),
        None => println!("No performances recorded."),
    }

    if let (Some(summary), Some(path)) = (&summary, args.chart_path()) {
        let title = if config.start_year == config.end_year {
            format!(
                "Portfolio Performance of Randomly Selected S&P 500 Stocks in {}",
                config.start_year
            )
        } else {
            format!(
                "Portfolio Performance of Randomly Selected S&P 500 Stocks, {}-{}",
                config.start_year, config.end_year
            )
        };
        match write_performance_chart(path, &outcome.values(), summary, &title) {
            Ok(()) => println!("Chart written to {}", path.display()),
            Err(e) => error!(path = %path.display(), error = %e, "failed to write chart"),
        }
    }

    if let Some(path) = &args.export_csv {
        let written = ExportFormat::from_path(path).and_then(|format| {
            outcome
                .performances
                .export_to_file(path, format)
        });
        match written {
            Ok(()) => println!("Performances exported to {}", path.display()),
            Err(e) => error!(path = %path.display(), error = %e, "failed to export performances"),
        }
    }

    if let Some(path) = &args.report {
        let mut builder = ReportBuilder::new()
            .config(config.clone())
            .universe(source, universe.len())
            .summary(summary.clone())
            .outcome(&outcome);
        if let Some((_, benchmark_path)) = &benchmark {
            builder = builder.benchmark_source(benchmark_path.display().to_string());
        }
        match builder.build().and_then(|report| report.write_to(path)) {
            Ok(()) => println!("Report written to {}", path.display()),
            Err(e) => error!(path = %path.display(), error = %e, "failed to write report"),
        }
    }

    if outcome.is_total_failure() {
        return Err(format!(
            "All {} simulated year(s) failed; first error: {}",
            outcome.failures.len(),
            outcome
                .failures
                .first()
                .map(|f| f.error.to_string())
                .unwrap_or_default()
        )
        .into());
    }

    Ok(())
}

/// Load the benchmark named on the command line, if any.
///
/// Without `--strict-benchmark` a structural failure is reported and the run
/// continues without a comparison.
fn load_benchmark_file(
    args: &RunArgs,
) -> Result<Option<(BenchmarkReturns, PathBuf)>, Box<dyn std::error::Error>> {
    let Some(path) = &args.benchmark else {
        return Ok(None);
    };
    let file_config = args.benchmark_config();

    let load = if args.strict_benchmark {
        load_benchmark(path, &file_config)
            .map_err(|e| format!("Failed to load benchmark {}: {}", path.display(), e))?
    } else {
        let (load, failure) = load_benchmark_or_empty(path, &file_config);
        if let Some(e) = failure {
            eprintln!(
                "Warning: benchmark {} unavailable ({}), continuing without it",
                path.display(),
                e
            );
            return Ok(None);
        }
        load
    };

    if !load.skipped.is_empty() {
        warn!(skipped = load.skipped.len(), "benchmark rows skipped");
    }
    if load.returns.is_empty() {
        eprintln!("Warning: benchmark {} has no usable rows", path.display());
        return Ok(None);
    }
    Ok(Some((load.returns, path.clone())))
}

async fn fetch_constituents(
    offline: bool,
) -> Result<(&'static str, Vec<Constituent>), Box<dyn std::error::Error>> {
    if offline {
        let Ok(constituents) = ConstituentProvider::constituents(&SP500Universe::new()).await;
        return Ok(("embedded", constituents));
    }

    let wikipedia = WikipediaConstituents::new()?;
    let constituents = wikipedia
        .constituents()
        .await
        .map_err(|e| format!("Failed to fetch constituent list: {}", e))?;
    Ok(("wikipedia", constituents))
}

async fn list_universe(
    sector: Option<&str>,
    offline: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let sector = sector.map(parse_sector).transpose()?;
    let (source, constituents) = fetch_constituents(offline).await?;

    let selected: Vec<&Constituent> = constituents
        .iter()
        .filter(|c| sector.is_none_or(|s| c.sector == Some(s)))
        .collect();

    println!(
        "{} constituent(s) from {}{}",
        selected.len(),
        source,
        sector.map(|s| format!(" in {s}")).unwrap_or_default()
    );
    println!("{}", "=".repeat(64));
    for c in selected {
        println!(
            "{:<8} {:<36} {}",
            c.symbol.as_str(),
            c.name.as_deref().unwrap_or("-"),
            c.sector.map_or("-", |s| s.name())
        );
    }

    Ok(())
}

fn list_all_sectors() {
    println!("GICS Sectors:");
    println!("=============\n");

    for sector in GicsSector::all() {
        println!("{:2} - {}", sector.code(), sector.name());
    }
}

fn parse_sector(name: &str) -> Result<GicsSector, Box<dyn std::error::Error>> {
    GicsSector::from_name(name).ok_or_else(|| format!("Unknown sector: {}", name).into())
}
