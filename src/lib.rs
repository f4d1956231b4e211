//! rbs - Parallel Recursive Byte Search
//!
//! Searches every regular file under a directory tree for a fixed byte
//! pattern and reports the path of each matching file. Built for wide,
//! deep trees: traversal and scanning share one adaptive worker pool
//! instead of running as separate phases.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Worker Threads                            │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐         ┌─────────┐     │
//! │  │Worker 1 │  │Worker 2 │  │Worker 3 │  ...    │Worker N │     │
//! │  └────┬────┘  └────┬────┘  └────┬────┘         └────┬────┘     │
//! │       │            │            │                    │          │
//! │       └──────┬─────┴─────┬──────┴──────────┬─────────┘          │
//! │              │           │                 │                    │
//! │     ┌────────▼───┐  ┌────▼───────┐  ┌──────▼──────┐             │
//! │     │ traverse q │  │  search q  │  │  result q   │             │
//! │     │ (readdir + │  │  (mmap +   │  │ (matched    │             │
//! │     │  openat)   │  │   scan)    │  │  FsNodes)   │             │
//! │     └────────────┘  └────────────┘  └──────┬──────┘             │
//! │                                            │                    │
//! │     ┌──────────────────────────┐           │                    │
//! │     │      FsNode arena        │           ▼                    │
//! │     │ (append-only, lock-free) │    driver prints paths         │
//! │     └──────────────────────────┘                                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Key properties:
//!
//! - **One pool, two job kinds**: every worker both traverses
//!   directories and scans files, steered by descriptor pressure so
//!   traversal cannot exhaust file descriptors.
//!
//! - **Cheap paths**: directory entries live in an append-only arena
//!   as name + parent pointer; a match is just a node reference, and
//!   the path is rebuilt only when printed.
//!
//! - **Coordinator-free termination**: a single outstanding-directory
//!   counter proves when no further work can appear.
//!
//! # Example
//!
//! ```bash
//! # Find every file mentioning an error string
//! rbs /var/log "connection refused"
//!
//! # Crank up parallelism, watch diagnostics
//! rbs ~/src TODO -j 64 -v
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod progress;
pub mod scanner;
pub mod search;

pub use config::{CliArgs, SearchConfig};
pub use error::{RbsError, Result};
pub use scanner::Needle;
pub use search::{Scheduler, SearchHit, StatsSnapshot, TraverseJob};
