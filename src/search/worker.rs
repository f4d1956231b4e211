//! Worker thread logic
//!
//! Each worker runs a fetch-and-service loop over the shared broker:
//! - Exit flag set: return immediately without draining anything.
//! - No directories outstanding: no new work can ever be produced
//!   (jobs are only created while servicing a counted traverse job),
//!   so drain the remaining search jobs and return.
//! - Otherwise fetch one job under the adaptive policy below, service
//!   it, and spin-backoff when both queues miss.
//!
//! # Adaptive job selection
//!
//! Traversal fans out: every serviced directory may open many files.
//! Scanning fans in: every serviced file closes one descriptor. The
//! open-descriptor count steers which queue a worker tries first:
//! under the target it favors traversal (discover work), above the
//! target it favors scanning (drain descriptors), and at the max it
//! refuses traversal entirely rather than open more files.

use crate::fs::EntryType;
use crate::search::arena::NodeRef;
use crate::search::job::{Job, SearchJob, TraverseJob};
use crate::search::scheduler::Shared;
use crossbeam_utils::Backoff;
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, warn};

/// Chunk size for the read fallback when a file cannot be mapped
const FALLBACK_CHUNK: usize = 1 << 20;

/// Main worker loop
pub(crate) fn worker_loop(id: usize, shared: Arc<Shared>) {
    debug!(worker = id, "Worker started");

    let backoff = Backoff::new();

    loop {
        if shared.exit.load(Ordering::Relaxed) {
            debug!(worker = id, "Worker exiting on stop signal");
            return;
        }

        if shared.dirs_outstanding.load(Ordering::SeqCst) == 0 {
            // The traversal frontier has drained; only queued search
            // jobs remain and no thread can enqueue more.
            while let Some(job) = shared.broker.pop_search() {
                service_search(id, &shared, job);
            }
            debug!(worker = id, "Worker finished");
            return;
        }

        if try_do_job(id, &shared) {
            backoff.reset();
        } else {
            backoff.snooze();
        }
    }
}

/// Fetch and service one job under the backpressure policy.
///
/// Returns whether any job was serviced.
fn try_do_job(id: usize, shared: &Arc<Shared>) -> bool {
    match fetch_job(shared) {
        Some(Job::Traverse(job)) => {
            service_traverse(id, shared, job);
            true
        }
        Some(Job::Search(job)) => {
            service_search(id, shared, job);
            true
        }
        None => false,
    }
}

/// Pick the next job by descriptor pressure.
fn fetch_job(shared: &Arc<Shared>) -> Option<Job> {
    let open = shared.files_open.load(Ordering::Relaxed);

    if open > shared.open_files_target {
        if let Some(job) = shared.broker.pop_search() {
            return Some(Job::Search(job));
        }
        // Better to open more files than to sit idle - unless we are
        // already at the hard limit.
        if open < shared.open_files_max {
            if let Some(job) = shared.broker.pop_traverse() {
                return Some(Job::Traverse(job));
            }
        }
        None
    } else {
        if let Some(job) = shared.broker.pop_traverse() {
            return Some(Job::Traverse(job));
        }
        shared.broker.pop_search().map(Job::Search)
    }
}

/// Enumerate one directory, dispatching each entry by type.
fn service_traverse(id: usize, shared: &Arc<Shared>, job: TraverseJob) {
    let TraverseJob { node: parent, mut dir } = job;
    // Safety: the arena outlives every worker (scheduler joins before drop).
    let parent_node = parent.map(|p| unsafe { p.get() });
    let mut warned_untyped = false;

    loop {
        let entry = match dir.read_entry() {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!(worker = id, error = %e, "Directory read failed");
                shared.stats.record_error();
                break;
            }
        };

        if entry.is_special() {
            continue;
        }

        match entry.entry_type {
            EntryType::Directory => match dir.open_dir_at(entry.name()) {
                Ok(child_dir) => {
                    let node = shared.arena.alloc(entry.name(), parent_node);
                    // Count before submit so the frontier never reads
                    // empty while a child job is in flight.
                    shared.dirs_outstanding.fetch_add(1, Ordering::SeqCst);
                    shared
                        .broker
                        .push_traverse(TraverseJob::child(NodeRef::new(node), child_dir));
                }
                Err(e) => {
                    warn!(
                        worker = id,
                        name = %String::from_utf8_lossy(entry.name()),
                        error = %e,
                        "Failed to open directory"
                    );
                    shared.stats.record_error();
                }
            },
            EntryType::File => match dir.open_file_at(entry.name()) {
                Ok(file) => {
                    let node = shared.arena.alloc(entry.name(), parent_node);
                    shared.files_open.fetch_add(1, Ordering::Relaxed);
                    shared
                        .broker
                        .push_search(SearchJob::new(NodeRef::new(node), file));
                }
                Err(e) => {
                    warn!(
                        worker = id,
                        name = %String::from_utf8_lossy(entry.name()),
                        error = %e,
                        "Failed to open file"
                    );
                    shared.stats.record_error();
                }
            },
            EntryType::Symlink => {
                // Never followed
                debug!(
                    worker = id,
                    name = %String::from_utf8_lossy(entry.name()),
                    "Skipping symlink"
                );
            }
            EntryType::Unknown => {
                if !warned_untyped {
                    warn!(
                        worker = id,
                        "Filesystem does not report entry types; skipping untyped entries \
                         in this directory"
                    );
                    warned_untyped = true;
                }
            }
            other => {
                debug!(
                    worker = id,
                    kind = ?other,
                    name = %String::from_utf8_lossy(entry.name()),
                    "Skipping special entry"
                );
            }
        }
    }

    drop(dir);
    shared.dirs_outstanding.fetch_sub(1, Ordering::SeqCst);
    shared.stats.record_dir();
}

/// Scan one file, enqueueing a result on match.
///
/// The descriptor is closed and the open-file count decremented exactly
/// once, on every path out of this function.
fn service_search(id: usize, shared: &Arc<Shared>, job: SearchJob) {
    let SearchJob { node, file } = job;

    let matched = scan_file(id, shared, &file);

    drop(file);
    shared.files_open.fetch_sub(1, Ordering::Relaxed);

    if matched {
        shared.stats.record_match();
        shared.broker.push_result(node);
    }
}

fn scan_file(id: usize, shared: &Arc<Shared>, file: &File) -> bool {
    let len = match file.metadata() {
        Ok(meta) => meta.len(),
        Err(e) => {
            warn!(worker = id, error = %e, "Failed to stat file");
            shared.stats.record_error();
            return false;
        }
    };

    if len == 0 {
        shared.stats.record_scan(0);
        return false;
    }

    shared.stats.record_scan(len);

    // Safety: the mapping is private and read-only; a concurrent
    // truncation of the underlying file can fault, which is the
    // documented trade-off of mapped scanning on a live tree.
    match unsafe { Mmap::map(file) } {
        Ok(map) => {
            // The scan is one forward pass; tell the pager
            let _ = map.advise(memmap2::Advice::Sequential);
            shared.needle.find(&map)
        }
        Err(e) => {
            debug!(worker = id, error = %e, "mmap failed, falling back to chunked read");
            scan_chunked(id, shared, file)
        }
    }
}

/// Streaming scan for files that cannot be memory-mapped.
///
/// Consecutive chunks overlap by `needle_len - 1` bytes so a match
/// straddling a chunk boundary is still seen whole.
fn scan_chunked(id: usize, shared: &Arc<Shared>, mut file: &File) -> bool {
    let overlap = shared.needle.len().saturating_sub(1);
    let mut buf = vec![0u8; FALLBACK_CHUNK + overlap];
    let mut carried = 0usize;

    loop {
        let read = match file.read(&mut buf[carried..]) {
            Ok(0) => return false,
            Ok(n) => n,
            Err(e) => {
                warn!(worker = id, error = %e, "Read failed during chunked scan");
                shared.stats.record_error();
                return false;
            }
        };

        let filled = carried + read;
        if shared.needle.find(&buf[..filled]) {
            return true;
        }

        carried = filled.min(overlap);
        buf.copy_within(filled - carried..filled, 0);
    }
}
