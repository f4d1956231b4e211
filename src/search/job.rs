//! Work items
//!
//! Two job shapes flow through the broker: traverse one directory, or
//! scan one file. A job owns the OS resource it names - the directory
//! stream or the open descriptor - and servicing (or dropping) the job
//! releases it. The dequeue-miss sentinel is `Option::None` at the
//! queue boundary; the variant set is closed, so an enum dispatch
//! replaces any dynamic indirection.

use crate::fs::DirHandle;
use crate::search::arena::NodeRef;
use std::fs::File;
use std::io;
use std::path::Path;

/// Obligation to enumerate one directory and submit child jobs.
#[derive(Debug)]
pub struct TraverseJob {
    /// The node representing this directory; `None` only at the root
    pub(crate) node: Option<NodeRef>,
    /// Open directory stream, closed when the job finishes
    pub(crate) dir: DirHandle,
}

impl TraverseJob {
    /// Build the root job by opening the search root directory
    pub fn from_path(path: &Path) -> io::Result<Self> {
        Ok(Self {
            node: None,
            dir: DirHandle::open(path)?,
        })
    }

    pub(crate) fn child(node: NodeRef, dir: DirHandle) -> Self {
        Self {
            node: Some(node),
            dir,
        }
    }
}

/// Obligation to scan one file's content for the needle.
#[derive(Debug)]
pub struct SearchJob {
    /// The node identifying the file in the tree
    pub(crate) node: NodeRef,
    /// Open descriptor, closed when the job finishes
    pub(crate) file: File,
}

impl SearchJob {
    pub(crate) fn new(node: NodeRef, file: File) -> Self {
        Self { node, file }
    }
}

/// A unit of work for the adaptive worker loop.
#[derive(Debug)]
pub enum Job {
    Traverse(TraverseJob),
    Search(SearchJob),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_job_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let job = TraverseJob::from_path(dir.path()).unwrap();
        assert!(job.node.is_none());
    }

    #[test]
    fn test_root_job_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TraverseJob::from_path(&dir.path().join("absent")).is_err());
    }
}
