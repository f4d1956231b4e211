//! Scheduler: thread lifecycle and the public search API
//!
//! The scheduler owns everything the workers share - the arena, the
//! broker, the compiled needle, the counters - behind one `Arc`, spawns
//! the worker threads, and exposes the driver-facing surface: seed
//! work, poll busyness, poll results, stop, join.
//!
//! # Termination
//!
//! The scheduler does not detect termination itself; it exposes
//! `is_busy()` (any traversal outstanding). Workers self-terminate when
//! the traversal frontier drains. A driver consumes results while busy,
//! joins, then performs a final drain of the result queue - results may
//! still be arriving between its last `is_busy` read and the join.

use crate::config::SearchConfig;
use crate::error::WorkerError;
use crate::scanner::Needle;
use crate::search::broker::JobBroker;
use crate::search::hit::SearchHit;
use crate::search::job::TraverseJob;
use crate::search::worker::worker_loop;
use crate::search::NodeArena;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

/// Run statistics collected by the workers
#[derive(Debug, Default)]
pub struct SearchStats {
    /// Directories fully traversed
    pub dirs_walked: AtomicU64,

    /// Files examined (including empty files)
    pub files_scanned: AtomicU64,

    /// Bytes of file content scanned
    pub bytes_scanned: AtomicU64,

    /// Files whose content matched
    pub files_matched: AtomicU64,

    /// Per-entry errors (open/stat/read failures, all skipped)
    pub errors: AtomicU64,
}

impl SearchStats {
    pub(crate) fn record_dir(&self) {
        self.dirs_walked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_scan(&self, bytes: u64) {
        self.files_scanned.fetch_add(1, Ordering::Relaxed);
        self.bytes_scanned.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_match(&self) {
        self.files_matched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            dirs_walked: self.dirs_walked.load(Ordering::Relaxed),
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            files_matched: self.files_matched.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the run statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub dirs_walked: u64,
    pub files_scanned: u64,
    pub bytes_scanned: u64,
    pub files_matched: u64,
    pub errors: u64,
}

/// State shared by the scheduler and every worker
pub(crate) struct Shared {
    pub broker: JobBroker,
    pub arena: NodeArena,
    pub needle: Needle,

    /// Cooperative stop flag; workers return without draining
    pub exit: AtomicBool,

    /// Traversal jobs created but not yet completed. Incremented before
    /// a job is submitted, decremented after its directory handle is
    /// closed - so a zero read proves the frontier is empty for good.
    pub dirs_outstanding: AtomicUsize,

    /// Descriptors held by queued or in-flight search jobs
    pub files_open: AtomicUsize,

    /// Soft threshold: above this, workers favor scanning
    pub open_files_target: usize,

    /// Hard threshold: at or above this, workers stop opening files
    pub open_files_max: usize,

    pub stats: SearchStats,
}

impl Shared {
    pub(crate) fn new(needle: Needle, open_files_target: usize, open_files_max: usize) -> Self {
        Self {
            broker: JobBroker::new(),
            arena: NodeArena::new(),
            needle,
            exit: AtomicBool::new(false),
            dirs_outstanding: AtomicUsize::new(0),
            files_open: AtomicUsize::new(0),
            open_files_target,
            open_files_max,
            stats: SearchStats::default(),
        }
    }
}

/// Parallel search driver.
///
/// Construct, `submit` the root traverse job, `run`, then consume hits
/// until `is_busy` goes false; `join` and take a final drain. Dropping
/// the scheduler stops and joins any workers still running.
pub struct Scheduler {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    worker_count: usize,
}

impl Scheduler {
    /// Build a scheduler from a validated configuration
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            shared: Arc::new(Shared::new(
                Needle::new(&config.needle),
                config.open_files_target,
                config.open_files_max,
            )),
            workers: Vec::new(),
            worker_count: config.worker_count,
        }
    }

    /// Seed the search with a traverse job.
    ///
    /// Must be called before `run`: workers treat an empty traversal
    /// frontier as proof the search is over.
    pub fn submit(&self, job: TraverseJob) {
        self.shared.dirs_outstanding.fetch_add(1, Ordering::SeqCst);
        self.shared.broker.push_traverse(job);
    }

    /// Spawn the worker threads and return immediately
    pub fn run(&mut self) -> Result<(), WorkerError> {
        info!(
            workers = self.worker_count,
            needle_len = self.shared.needle.len(),
            "Starting search"
        );

        self.workers.reserve(self.worker_count);
        for id in 0..self.worker_count {
            let shared = Arc::clone(&self.shared);
            let handle = thread::Builder::new()
                .name(format!("searcher-{}", id))
                .spawn(move || worker_loop(id, shared))
                .map_err(|e| WorkerError::SpawnFailed {
                    id,
                    reason: e.to_string(),
                })?;
            self.workers.push(handle);
        }

        Ok(())
    }

    /// True while any traversal job is outstanding
    pub fn is_busy(&self) -> bool {
        self.shared.dirs_outstanding.load(Ordering::SeqCst) > 0
    }

    /// Non-blocking result poll
    pub fn try_next_hit(&self) -> Option<SearchHit<'_>> {
        self.shared
            .broker
            .pop_result()
            // Safety: the arena lives in self.shared; the hit borrows self.
            .map(|node| SearchHit::new(unsafe { node.get() }))
    }

    /// Set the exit flag and join all workers.
    ///
    /// Queued jobs are abandoned; their descriptors are released only
    /// at process exit (acceptable for a one-shot run).
    pub fn stop_all(&mut self) {
        self.shared.exit.store(true, Ordering::Relaxed);
        self.join();
    }

    /// Wait for every worker to finish
    pub fn join(&mut self) {
        for (id, handle) in self.workers.drain(..).enumerate() {
            if handle.join().is_err() {
                error!(error = %WorkerError::Panicked { id }, "Worker terminated abnormally");
            }
        }
        debug!("All workers joined");
    }

    /// Snapshot of the run counters
    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }

    /// Descriptors currently held by search jobs (diagnostics)
    pub fn open_files(&self) -> usize {
        self.shared.files_open.load(Ordering::Relaxed)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        // An abandoned scheduler must not hang its process: stop, then
        // join, then let the Arc release the arena after the last
        // worker is gone.
        if !self.workers.is_empty() {
            self.stop_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(root: PathBuf, needle: &str) -> SearchConfig {
        SearchConfig {
            root,
            needle: needle.as_bytes().to_vec(),
            worker_count: 4,
            open_files_target: 8192,
            open_files_max: 32768,
            verbose: false,
        }
    }

    fn run_to_completion(scheduler: &mut Scheduler) -> Vec<String> {
        scheduler.run().unwrap();
        while scheduler.is_busy() {
            std::thread::yield_now();
        }
        scheduler.join();

        let mut paths = Vec::new();
        let mut buf = [0u8; 4096];
        while let Some(hit) = scheduler.try_next_hit() {
            let path = hit.write_path(&mut buf, b'\n').unwrap();
            paths.push(String::from_utf8(path[..path.len() - 1].to_vec()).unwrap());
        }
        paths
    }

    #[test]
    fn test_basic_search() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello world").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"goodbye").unwrap();

        let config = config(dir.path().to_path_buf(), "world");
        let mut scheduler = Scheduler::new(&config);
        scheduler.submit(TraverseJob::from_path(&config.root).unwrap());

        let paths = run_to_completion(&mut scheduler);
        assert_eq!(paths, vec!["/a.txt".to_string()]);
        assert!(!scheduler.is_busy());
        assert_eq!(scheduler.open_files(), 0);
    }

    #[test]
    fn test_stats_after_run() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/x"), b"AAAAA").unwrap();
        std::fs::write(dir.path().join("sub/y"), b"AAAB").unwrap();

        let config = config(dir.path().to_path_buf(), "AAAB");
        let mut scheduler = Scheduler::new(&config);
        scheduler.submit(TraverseJob::from_path(&config.root).unwrap());

        let paths = run_to_completion(&mut scheduler);
        assert_eq!(paths, vec!["/sub/y".to_string()]);

        let stats = scheduler.stats();
        assert_eq!(stats.dirs_walked, 2);
        assert_eq!(stats.files_scanned, 2);
        assert_eq!(stats.files_matched, 1);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn test_stop_all_interrupts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f"), b"data").unwrap();

        let config = config(dir.path().to_path_buf(), "data");
        let mut scheduler = Scheduler::new(&config);
        scheduler.submit(TraverseJob::from_path(&config.root).unwrap());
        scheduler.run().unwrap();
        scheduler.stop_all();
        // Joining twice is harmless
        scheduler.join();
    }

    #[test]
    fn test_drop_joins_workers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f"), b"data").unwrap();

        let config = config(dir.path().to_path_buf(), "data");
        let mut scheduler = Scheduler::new(&config);
        scheduler.submit(TraverseJob::from_path(&config.root).unwrap());
        scheduler.run().unwrap();
        drop(scheduler);
    }
}
