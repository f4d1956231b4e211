//! Filesystem access primitives
//!
//! Thin safe wrappers over the libc directory API. Traversal opens
//! everything relative to an already-open directory descriptor
//! (`openat`/`fdopendir`), so entry names never need to be joined into
//! absolute paths on the hot path.

pub mod dir;
pub mod types;

pub use dir::DirHandle;
pub use types::{DirEntry, EntryType, NAME_MAX_LEN};
