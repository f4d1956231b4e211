//! Parallel search engine
//!
//! This module implements the concurrent traversal-and-scan pipeline.
//!
//! # Architecture
//!
//! ```text
//!                    ┌──────────────────────────┐
//!                    │        Scheduler         │
//!                    │  - spawns worker threads │
//!                    │  - owns arena + broker   │
//!                    └────────────┬─────────────┘
//!                                 │
//!        ┌────────────────────────┼────────────────────────┐
//!        │                        │                        │
//!  ┌─────▼─────┐            ┌─────▼─────┐            ┌─────▼─────┐
//!  │  Worker 0 │            │  Worker 1 │    ...     │  Worker N │
//!  └─────┬─────┘            └─────┬─────┘            └─────┬─────┘
//!        │   traverse queue ──────┼────── search queue     │
//!        │   (readdir, openat)    │      (mmap + scan)     │
//!        └────────────────────────┼────────────────────────┘
//!                                 │
//!                          result queue
//!                                 │
//!                                 ▼
//!                      driver (prints paths)
//! ```
//!
//! Workers pull from both job queues under an adaptive policy keyed on
//! the open-descriptor count: traversal discovers files faster than
//! scanning retires them, so descriptor pressure shifts workers from
//! discovery to draining. Termination needs no coordinator - when the
//! outstanding-directories counter hits zero the frontier can never
//! grow again, and each worker drains the search queue and exits.

pub mod arena;
pub mod broker;
pub mod hit;
pub mod job;
pub mod scheduler;
pub(crate) mod worker;

pub use arena::{FsNode, NodeArena};
pub use hit::SearchHit;
pub use job::{Job, SearchJob, TraverseJob};
pub use scheduler::{Scheduler, StatsSnapshot};
