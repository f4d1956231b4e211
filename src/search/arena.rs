//! Filesystem-node arena
//!
//! An append-only, lock-free allocator of directory-entry records. Each
//! record (`FsNode`) stores an entry's base name inline plus a pointer
//! to its parent record, so the whole tree is a set of reverse-linked
//! chains rooted at the search root. Records are never moved and never
//! individually freed: a node address stays valid until the arena is
//! dropped, which makes it safe to hand node references through queues
//! and hold them in results for the lifetime of the search.
//!
//! # Publication
//!
//! A node's fields are fully written before the release-CAS that links
//! its slot into the arena, and the parent pointer always refers to a
//! node published earlier. Any thread that reaches a node through a
//! result or a parent chain therefore observes fully-initialized data.
//!
//! # Safety
//!
//! `NodeRef` is a raw pointer in disguise. Holders must ensure the
//! arena outlives the reference; in this crate the scheduler owns the
//! arena and joins every worker before dropping it, and public result
//! handles borrow the scheduler.

use crate::fs::NAME_MAX_LEN;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicPtr, Ordering};

/// One directory entry: inline name plus an optional parent link.
///
/// Immutable after the arena publishes it.
pub struct FsNode {
    parent: Option<NonNull<FsNode>>,
    name_len: u8,
    name: [u8; NAME_MAX_LEN],
}

// Nodes are immutable after publication and reached only through
// references that the arena's lifetime guarantees valid.
unsafe impl Send for FsNode {}
unsafe impl Sync for FsNode {}

impl FsNode {
    /// The entry's base name
    pub fn name(&self) -> &[u8] {
        &self.name[..self.name_len as usize]
    }

    /// The parent entry, absent for entries directly under the search root
    pub fn parent(&self) -> Option<&FsNode> {
        // Safety: parents are published before children and live as
        // long as the arena (see module docs).
        self.parent.map(|p| unsafe { &*p.as_ptr() })
    }

    /// Number of links in this node's parent chain, root-level node = 1
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut cur = self.parent();
        while let Some(node) = cur {
            depth += 1;
            cur = node.parent();
        }
        depth
    }
}

impl std::fmt::Debug for FsNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsNode")
            .field("name", &String::from_utf8_lossy(self.name()))
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// Shareable handle to an arena-allocated node.
///
/// Plain-data and queue-friendly. Dereferencing requires the arena to
/// still be alive, which the scheduler's join-before-drop discipline
/// guarantees for every holder inside this crate.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef(NonNull<FsNode>);

unsafe impl Send for NodeRef {}
unsafe impl Sync for NodeRef {}

impl NodeRef {
    pub(crate) fn new(node: &FsNode) -> Self {
        Self(NonNull::from(node))
    }

    /// # Safety
    ///
    /// The arena that allocated the node must still be alive, and must
    /// remain alive for `'a`.
    pub(crate) unsafe fn get<'a>(self) -> &'a FsNode {
        &*self.0.as_ptr()
    }
}

struct Slot {
    node: FsNode,
    previous: *mut Slot,
}

/// Lock-free append-only arena of [`FsNode`] records.
///
/// Pushes are wait-free on the uncontended path (one CAS) and retry on
/// contention. The arena cannot be cloned or moved once shared; all
/// slots are freed together when it is dropped.
pub struct NodeArena {
    head: AtomicPtr<Slot>,
}

unsafe impl Send for NodeArena {}
unsafe impl Sync for NodeArena {}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            head: AtomicPtr::new(std::ptr::null_mut()),
        }
    }

    /// Allocate and publish a node.
    ///
    /// The slot is fully initialized before the release-CAS links it,
    /// so a node is never observable half-written. Heap exhaustion
    /// aborts the process (`Box::new` semantics), which is the intended
    /// fatal-resource behavior.
    pub fn alloc(&self, name: &[u8], parent: Option<&FsNode>) -> &FsNode {
        assert!(
            name.len() <= NAME_MAX_LEN,
            "entry name exceeds NAME_MAX ({} bytes)",
            name.len()
        );

        let mut name_buf = [0u8; NAME_MAX_LEN];
        name_buf[..name.len()].copy_from_slice(name);

        let slot = Box::into_raw(Box::new(Slot {
            node: FsNode {
                parent: parent.map(NonNull::from),
                name_len: name.len() as u8,
                name: name_buf,
            },
            previous: std::ptr::null_mut(),
        }));

        let mut head = self.head.load(Ordering::Relaxed);
        loop {
            // Safety: slot is exclusively ours until the CAS succeeds.
            unsafe { (*slot).previous = head };
            match self
                .head
                .compare_exchange_weak(head, slot, Ordering::Release, Ordering::Relaxed)
            {
                Ok(_) => return unsafe { &(*slot).node },
                Err(current) => head = current,
            }
        }
    }

    /// Number of allocated nodes. Walks the chain; debug/test use only.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut cur = self.head.load(Ordering::Acquire);
        while !cur.is_null() {
            count += 1;
            cur = unsafe { (*cur).previous };
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire).is_null()
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NodeArena {
    fn drop(&mut self) {
        let mut cur = self.head.load(Ordering::Acquire);
        while !cur.is_null() {
            // Safety: drop runs with exclusive access after all workers
            // have joined; every slot was created by Box::into_raw.
            let slot = unsafe { Box::from_raw(cur) };
            cur = slot.previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_alloc_and_read_back() {
        let arena = NodeArena::new();
        let root = arena.alloc(b"usr", None);
        let child = arena.alloc(b"share", Some(root));

        assert_eq!(root.name(), b"usr");
        assert!(root.parent().is_none());
        assert_eq!(child.name(), b"share");
        assert_eq!(child.parent().unwrap().name(), b"usr");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_depth() {
        let arena = NodeArena::new();
        let a = arena.alloc(b"a", None);
        let b = arena.alloc(b"b", Some(a));
        let c = arena.alloc(b"c", Some(b));
        assert_eq!(a.depth(), 1);
        assert_eq!(c.depth(), 3);
    }

    #[test]
    fn test_empty_name_allowed() {
        let arena = NodeArena::new();
        let node = arena.alloc(b"", None);
        assert_eq!(node.name(), b"");
    }

    #[test]
    #[should_panic(expected = "exceeds NAME_MAX")]
    fn test_oversized_name_panics() {
        let arena = NodeArena::new();
        arena.alloc(&[b'x'; NAME_MAX_LEN + 1], None);
    }

    #[test]
    fn test_concurrent_push() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 1000;

        let arena = Arc::new(NodeArena::new());
        let mut handles = Vec::new();

        for t in 0..THREADS {
            let arena = Arc::clone(&arena);
            handles.push(std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let name = format!("{}-{}", t, i);
                    let node = arena.alloc(name.as_bytes(), None);
                    assert_eq!(node.name(), name.as_bytes());
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(arena.len(), THREADS * PER_THREAD);
    }

    #[test]
    fn test_parent_chain_across_threads() {
        // Children allocated on other threads must observe parent names
        let arena = Arc::new(NodeArena::new());
        let parent = arena.alloc(b"parent", None);
        let parent_ref = NodeRef::new(parent);

        let arena2 = Arc::clone(&arena);
        let handle = std::thread::spawn(move || {
            let parent = unsafe { parent_ref.get() };
            let child = arena2.alloc(b"child", Some(parent));
            assert_eq!(child.parent().unwrap().name(), b"parent");
        });
        handle.join().unwrap();
    }
}
