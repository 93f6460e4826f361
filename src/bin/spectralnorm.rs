//! Spectral-norm CLI.
//!
//! Prints the spectral-norm estimate for an `N`-dimensional operator as one
//! line with nine fractional digits. Diagnostics go to stderr.
//!
//! Usage:
//!   cargo run --release --bin spectralnorm -- 5500
//!   cargo run --release --bin spectralnorm -- 5500 --workers 8 --backend rayon

use std::process;
use std::time::Duration;

use clap::Parser;
use spectral_pool::{BackendKind, PoolOptions, RunOptions, parse_dimension};
use tracing::info;

#[derive(Parser)]
#[command(name = "spectralnorm", about = "Estimate the spectral norm of the benchmark operator")]
struct Cli {
    /// Vector dimension (positive integer).
    #[arg(value_parser = parse_dimension)]
    n: usize,

    /// Concurrent workers per multiply (defaults to the number of CPUs).
    #[arg(long, short)]
    workers: Option<usize>,

    /// Executor backend: pool, rayon or serial.
    #[arg(long, default_value = "pool")]
    backend: BackendKind,

    /// Abort a multiply when no worker has delivered a result for this many seconds.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Per-worker channel buffer, in results.
    #[arg(long, default_value_t = spectral_pool::config::options::DEFAULT_CHANNEL_CAPACITY)]
    channel_capacity: usize,

    /// Log filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::new(&cli.log_level))
        .with_target(false)
        .init();

    let mut pool = PoolOptions::default();
    if let Some(workers) = cli.workers {
        pool.workers = workers;
    }
    pool.channel_capacity = cli.channel_capacity;
    pool.timeout = Some(Duration::from_secs(cli.timeout_secs));

    let opts = RunOptions {
        n: cli.n,
        backend: cli.backend,
        pool,
    };

    match spectral_pool::run(&opts) {
        Ok(estimate) => {
            info!(
                n = estimate.n,
                workers = estimate.workers,
                iterations = estimate.iterations,
                "done"
            );
            println!("{estimate}");
        }
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
