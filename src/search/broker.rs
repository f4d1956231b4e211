//! Multi-queue job broker
//!
//! Three unbounded MPMC queues connect the worker pool to itself and to
//! the result consumer: traverse jobs, search jobs, and match results.
//! Every operation is non-blocking - push never fails, pop returns
//! `None` on empty. Ordering across producers (and even within one
//! producer) is unspecified; nothing downstream depends on it.

use crate::search::arena::NodeRef;
use crate::search::job::{SearchJob, TraverseJob};
use crossbeam_queue::SegQueue;
use std::sync::atomic::{AtomicU64, Ordering};

/// Broker traffic counters (relaxed; for diagnostics and tests)
#[derive(Debug, Default)]
pub struct BrokerStats {
    /// Traverse jobs enqueued
    pub traverse_enqueued: AtomicU64,

    /// Search jobs enqueued
    pub search_enqueued: AtomicU64,

    /// Results enqueued
    pub results_enqueued: AtomicU64,
}

/// The three shared queues of the search pipeline.
pub(crate) struct JobBroker {
    traverse: SegQueue<TraverseJob>,
    search: SegQueue<SearchJob>,
    results: SegQueue<NodeRef>,
    stats: BrokerStats,
}

impl JobBroker {
    pub(crate) fn new() -> Self {
        Self {
            traverse: SegQueue::new(),
            search: SegQueue::new(),
            results: SegQueue::new(),
            stats: BrokerStats::default(),
        }
    }

    pub(crate) fn push_traverse(&self, job: TraverseJob) {
        self.stats.traverse_enqueued.fetch_add(1, Ordering::Relaxed);
        self.traverse.push(job);
    }

    pub(crate) fn pop_traverse(&self) -> Option<TraverseJob> {
        self.traverse.pop()
    }

    pub(crate) fn push_search(&self, job: SearchJob) {
        self.stats.search_enqueued.fetch_add(1, Ordering::Relaxed);
        self.search.push(job);
    }

    pub(crate) fn pop_search(&self) -> Option<SearchJob> {
        self.search.pop()
    }

    pub(crate) fn push_result(&self, node: NodeRef) {
        self.stats.results_enqueued.fetch_add(1, Ordering::Relaxed);
        self.results.push(node);
    }

    pub(crate) fn pop_result(&self) -> Option<NodeRef> {
        self.results.pop()
    }

    pub(crate) fn stats(&self) -> &BrokerStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::arena::NodeArena;
    use crate::search::job::TraverseJob;

    #[test]
    fn test_pop_empty_returns_none() {
        let broker = JobBroker::new();
        assert!(broker.pop_traverse().is_none());
        assert!(broker.pop_search().is_none());
        assert!(broker.pop_result().is_none());
    }

    #[test]
    fn test_traverse_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let broker = JobBroker::new();

        broker.push_traverse(TraverseJob::from_path(dir.path()).unwrap());
        assert_eq!(broker.stats().traverse_enqueued.load(Ordering::Relaxed), 1);

        let job = broker.pop_traverse().unwrap();
        assert!(job.node.is_none());
        assert!(broker.pop_traverse().is_none());
    }

    #[test]
    fn test_result_roundtrip() {
        let arena = NodeArena::new();
        let node = arena.alloc(b"match.txt", None);
        let broker = JobBroker::new();

        broker.push_result(NodeRef::new(node));
        broker.push_result(NodeRef::new(node));

        let first = broker.pop_result().unwrap();
        assert_eq!(unsafe { first.get() }.name(), b"match.txt");
        assert!(broker.pop_result().is_some());
        assert!(broker.pop_result().is_none());
        assert_eq!(broker.stats().results_enqueued.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_concurrent_producers_consumers() {
        use std::sync::atomic::AtomicUsize;
        use std::sync::Arc;

        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 500;

        let arena = Arc::new(NodeArena::new());
        let broker = Arc::new(JobBroker::new());
        let consumed = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..PRODUCERS {
            let arena = Arc::clone(&arena);
            let broker = Arc::clone(&broker);
            handles.push(std::thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    let node = arena.alloc(format!("f{}", i).as_bytes(), None);
                    broker.push_result(NodeRef::new(node));
                }
            }));
        }

        for _ in 0..2 {
            let broker = Arc::clone(&broker);
            let consumed = Arc::clone(&consumed);
            handles.push(std::thread::spawn(move || loop {
                if broker.pop_result().is_some() {
                    consumed.fetch_add(1, Ordering::Relaxed);
                } else if consumed.load(Ordering::Relaxed) == PRODUCERS * PER_PRODUCER {
                    break;
                } else {
                    std::thread::yield_now();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(consumed.load(Ordering::Relaxed), PRODUCERS * PER_PRODUCER);
    }
}
