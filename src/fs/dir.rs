//! Directory stream wrapper
//!
//! This module provides a safe Rust wrapper around the libc directory
//! stream API (`opendir`/`fdopendir`/`readdir`/`closedir`) plus
//! `openat`-relative opens, so nested traversal never has to rebuild
//! absolute paths per entry.
//!
//! Key safety considerations:
//! - A `DirHandle` is owned by exactly one job at a time (Send, not Sync)
//! - RAII closes the stream (and its descriptor) on drop
//! - All unsafe FFI calls are encapsulated with errno translation

use crate::fs::types::{DirEntry, EntryType};
use std::ffi::{CStr, CString};
use std::fs::File;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::{FromRawFd, RawFd};
use std::path::Path;

/// An open directory stream.
///
/// Owns the underlying `DIR*` and its file descriptor; both are released
/// on drop. The handle moves between threads with the job that owns it
/// but is never shared.
pub struct DirHandle {
    /// libc directory stream (never null after construction)
    dir: *mut libc::DIR,
}

// The stream is used by one thread at a time; ownership transfers with
// the traverse job that holds it.
unsafe impl Send for DirHandle {}
// NOT Sync - readdir mutates the stream.

impl DirHandle {
    /// Open a directory by path (used only for the search root)
    pub fn open(path: &Path) -> io::Result<Self> {
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;

        let dir = unsafe { libc::opendir(c_path.as_ptr()) };
        if dir.is_null() {
            return Err(io::Error::last_os_error());
        }

        Ok(Self { dir })
    }

    /// Open a subdirectory relative to this handle's descriptor.
    ///
    /// Uses `O_NOFOLLOW`: the entry was reported as a directory by
    /// `readdir`, but it may have been replaced by a symlink since.
    pub fn open_dir_at(&self, name: &[u8]) -> io::Result<Self> {
        let fd = self.open_at_raw(name, libc::O_RDONLY | libc::O_DIRECTORY)?;

        let dir = unsafe { libc::fdopendir(fd) };
        if dir.is_null() {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(err);
        }

        Ok(Self { dir })
    }

    /// Open a regular file relative to this handle's descriptor
    pub fn open_file_at(&self, name: &[u8]) -> io::Result<File> {
        let fd = self.open_at_raw(name, libc::O_RDONLY)?;
        Ok(unsafe { File::from_raw_fd(fd) })
    }

    fn open_at_raw(&self, name: &[u8], flags: libc::c_int) -> io::Result<RawFd> {
        let c_name =
            CString::new(name).map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;

        let fd = unsafe {
            libc::openat(
                self.raw_fd(),
                c_name.as_ptr(),
                flags | libc::O_CLOEXEC | libc::O_NOFOLLOW,
            )
        };

        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(fd)
    }

    /// Read the next entry from the stream.
    ///
    /// Returns `Ok(None)` at end-of-stream; `Err` is a read failure on
    /// the directory itself (the stream should be abandoned).
    pub fn read_entry(&mut self) -> io::Result<Option<DirEntry>> {
        // readdir signals errors only through errno, so it must be
        // cleared to distinguish end-of-stream from failure.
        clear_errno();

        let entry = unsafe { libc::readdir(self.dir) };
        if entry.is_null() {
            let err = io::Error::last_os_error();
            return match err.raw_os_error() {
                Some(0) | None => Ok(None),
                Some(_) => Err(err),
            };
        }

        let entry = unsafe { &*entry };
        let name = unsafe { CStr::from_ptr(entry.d_name.as_ptr()) }.to_bytes();
        Ok(Some(DirEntry::new(
            name,
            EntryType::from_d_type(entry.d_type),
        )))
    }

    /// The descriptor backing this stream (for `openat`)
    pub fn raw_fd(&self) -> RawFd {
        unsafe { libc::dirfd(self.dir) }
    }
}

impl Drop for DirHandle {
    fn drop(&mut self) {
        // closedir also closes the descriptor obtained via fdopendir
        unsafe { libc::closedir(self.dir) };
    }
}

impl std::fmt::Debug for DirHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirHandle").field("fd", &self.raw_fd()).finish()
    }
}

fn clear_errno() {
    #[cfg(target_os = "linux")]
    unsafe {
        *libc::__errno_location() = 0;
    }
    #[cfg(target_os = "macos")]
    unsafe {
        *libc::__error() = 0;
    }
}
