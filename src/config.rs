//! Configuration types for rbs
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Default soft limit on file descriptors held by queued search jobs.
/// Below this, workers favor traversal (wide fan-out).
const DEFAULT_OPEN_FILES_TARGET: usize = 1 << 13;

/// Default hard limit on file descriptors held by queued search jobs.
/// At or above this, workers refuse to open more files.
const DEFAULT_OPEN_FILES_MAX: usize = 1 << 15;

/// Parallel recursive byte search
#[derive(Parser, Debug, Clone)]
#[command(
    name = "rbs",
    version,
    about = "Parallel recursive byte search",
    long_about = "Searches every regular file under PATH for the byte pattern NEEDLE\n\
                  and prints the path of each matching file, one per line.\n\n\
                  Traversal and scanning share one adaptive worker pool: workers\n\
                  favor discovering new files until too many descriptors are open,\n\
                  then favor draining them.",
    after_help = "EXAMPLES:\n    \
        rbs /var/log \"connection refused\"\n    \
        rbs ~/src TODO -j 32\n    \
        rbs / secret -v 2>diagnostics.log"
)]
pub struct CliArgs {
    /// Directory to search
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Byte pattern to search for
    #[arg(value_name = "NEEDLE")]
    pub needle: String,

    /// Number of worker threads
    #[arg(
        short = 'j',
        long = "jobs",
        default_value_t = default_workers(),
        value_name = "NUM"
    )]
    pub jobs: usize,

    /// Verbose output (diagnostic logs and a run summary on stderr)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Open-descriptor count above which workers favor scanning over traversal
    #[arg(long, default_value_t = DEFAULT_OPEN_FILES_TARGET, value_name = "NUM")]
    pub open_files_target: usize,

    /// Open-descriptor count at which workers stop opening files entirely
    #[arg(long, default_value_t = DEFAULT_OPEN_FILES_MAX, value_name = "NUM")]
    pub open_files_max: usize,
}

fn default_workers() -> usize {
    // 2x CPU cores: traversal and scanning are I/O bound
    num_cpus::get() * 2
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Root directory of the search
    pub root: PathBuf,

    /// Byte pattern to find
    pub needle: Vec<u8>,

    /// Number of worker threads
    pub worker_count: usize,

    /// Soft backpressure threshold on open search-job descriptors
    pub open_files_target: usize,

    /// Hard backpressure threshold on open search-job descriptors
    pub open_files_max: usize,

    /// Verbose logging and summary
    pub verbose: bool,
}

impl SearchConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if args.needle.is_empty() {
            return Err(ConfigError::EmptyNeedle);
        }

        if args.jobs == 0 || args.jobs > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.jobs,
                max: MAX_WORKERS,
            });
        }

        if args.open_files_target >= args.open_files_max {
            return Err(ConfigError::InvalidOpenFileLimits {
                target: args.open_files_target,
                max: args.open_files_max,
            });
        }

        if !args.path.is_dir() {
            return Err(ConfigError::RootNotADirectory { path: args.path });
        }

        Ok(Self {
            root: args.path,
            needle: args.needle.into_bytes(),
            worker_count: args.jobs,
            open_files_target: args.open_files_target,
            open_files_max: args.open_files_max,
            verbose: args.verbose,
        })
    }
}
