//! Level Book - latency comparison harness
//!
//! Generates one seeded operation sequence, replays it against every
//! selected level storage strategy, prints latency statistics and writes
//! the raw per-operation samples to `<strategy>_latencies.csv`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use level_book::error::HarnessError;
use level_book::orderbook::Strategy;
use level_book::sim::{self, SimConfig, DEFAULT_OPERATIONS, DEFAULT_SEED};

/// Command line configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "level-book")]
#[command(version)]
#[command(about = "Order book level storage latency comparison", long_about = None)]
struct Cli {
    /// Operations per strategy
    #[arg(short = 'n', long, default_value_t = DEFAULT_OPERATIONS)]
    operations: usize,

    /// RNG seed for the operation sequence
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Strategies to run (repeatable; default: all)
    #[arg(short = 'S', long = "strategy", value_enum)]
    strategies: Vec<Strategy>,

    /// Allocate a scratch buffer around each timed operation
    #[arg(long, default_value_t = false)]
    churn: bool,

    /// Directory for the latency CSV files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip writing latency CSV files
    #[arg(long, default_value_t = false)]
    no_export: bool,

    /// Log level (RUST_LOG overrides)
    #[arg(short = 'l', long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), HarnessError> {
    let config = SimConfig {
        operations: cli.operations,
        seed: cli.seed,
        churn: cli.churn,
        ..SimConfig::default()
    };
    let strategies = if cli.strategies.is_empty() {
        Strategy::ALL.to_vec()
    } else {
        cli.strategies
    };

    tracing::info!(
        operations = config.operations,
        seed = config.seed,
        churn = config.churn,
        "generating operation sequence"
    );
    let ops = sim::generate(&config);

    println!("Order Book Performance Comparison");
    println!("==================================");
    println!();

    for strategy in strategies {
        let mut book = strategy.build(config.operations);
        let latencies = sim::replay(book.as_mut(), &ops, config.churn);

        let title = if config.churn {
            format!("{} (Allocator Churn)", strategy.title())
        } else {
            strategy.title().to_string()
        };
        println!("=== {title} ===");
        match latencies.stats() {
            Some(stats) => println!("{stats}"),
            None => println!("No data collected."),
        }

        let (bid, ask) = book.best_prices();
        let snapshot = book.snapshot();
        println!("Best bid/ask: {bid} / {ask}");
        println!("Live orders: {}", book.live_orders());
        println!("Levels: {}", snapshot.level_count());
        println!("State root: {}", snapshot.state_root_hex());
        println!();

        if let Err(err) = book.verify() {
            tracing::error!(%strategy, %err, "book invariants violated");
        }

        if !cli.no_export {
            let path = cli.output_dir.join(format!("{}_latencies.csv", strategy.label()));
            latencies.save_csv(&path)?;
            tracing::info!(%strategy, path = %path.display(), "latencies written");
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "run failed");
            ExitCode::FAILURE
        }
    }
}
