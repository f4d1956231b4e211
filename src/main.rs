//! rbs - Parallel Recursive Byte Search
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_utils::Backoff;
use rbs::config::{CliArgs, SearchConfig};
use rbs::progress::{format_progress, print_summary};
use rbs::search::{Scheduler, TraverseJob};
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Room for the deepest path we are willing to print
const PATH_BUF_LEN: usize = 4096 * 4;

/// How often verbose mode reports progress
const PROGRESS_INTERVAL: Duration = Duration::from_secs(2);

fn main() -> ExitCode {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    let config = match SearchConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: SearchConfig) -> Result<()> {
    let start = Instant::now();

    let mut scheduler = Scheduler::new(&config);
    let root = TraverseJob::from_path(&config.root)
        .with_context(|| format!("Failed to open search root '{}'", config.root.display()))?;
    scheduler.submit(root);
    scheduler.run()?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut path_buf = vec![0u8; PATH_BUF_LEN];

    // Consume results while traversal runs, then join and take a final
    // drain: workers may finish scanning after the last is_busy read.
    let backoff = Backoff::new();
    let mut last_report = Instant::now();
    while scheduler.is_busy() {
        if print_next(&scheduler, &mut out, &mut path_buf)? {
            backoff.reset();
        } else {
            backoff.snooze();
        }

        if config.verbose && last_report.elapsed() >= PROGRESS_INTERVAL {
            eprintln!("{}", format_progress(&scheduler.stats(), start.elapsed()));
            last_report = Instant::now();
        }
    }

    scheduler.join();
    while print_next(&scheduler, &mut out, &mut path_buf)? {}
    out.flush().context("Failed to flush output")?;

    if config.verbose {
        print_summary(&scheduler.stats(), start.elapsed());
    }

    Ok(())
}

/// Print one pending result if there is one
fn print_next(
    scheduler: &Scheduler,
    out: &mut impl Write,
    path_buf: &mut [u8],
) -> Result<bool> {
    let Some(hit) = scheduler.try_next_hit() else {
        return Ok(false);
    };

    match hit.write_path(path_buf, b'\n') {
        Ok(path) => out.write_all(path).context("Failed to write result")?,
        Err(e) => warn!(error = %e, "Skipping result with oversized path"),
    }

    Ok(true)
}

fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "rbs=debug" } else { "rbs=warn" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
