//! Directory entry types
//!
//! These types represent filesystem entries as reported by `readdir`,
//! carrying the inline `d_type` discriminator so traversal can dispatch
//! without an extra stat call.

/// Longest entry name the kernel will return (POSIX NAME_MAX)
pub const NAME_MAX_LEN: usize = 255;

/// Type of filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntryType {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link
    Symlink,
    /// Named pipe (FIFO)
    Fifo,
    /// Character device
    CharDevice,
    /// Block device
    BlockDevice,
    /// Unix socket
    Socket,
    /// Filesystem did not report a type (DT_UNKNOWN)
    Unknown,
}

impl EntryType {
    /// Convert from a dirent `d_type` value
    pub fn from_d_type(d_type: u8) -> Self {
        match d_type {
            libc::DT_REG => EntryType::File,
            libc::DT_DIR => EntryType::Directory,
            libc::DT_LNK => EntryType::Symlink,
            libc::DT_FIFO => EntryType::Fifo,
            libc::DT_CHR => EntryType::CharDevice,
            libc::DT_BLK => EntryType::BlockDevice,
            libc::DT_SOCK => EntryType::Socket,
            _ => EntryType::Unknown,
        }
    }

    /// Check if this is a regular file
    pub fn is_file(&self) -> bool {
        *self == EntryType::File
    }

    /// Check if this is a directory
    pub fn is_dir(&self) -> bool {
        *self == EntryType::Directory
    }
}

/// One entry read from a directory stream.
///
/// The name is stored inline so the entry stays valid after the next
/// `readdir` call overwrites the stream's internal buffer.
#[derive(Clone)]
pub struct DirEntry {
    name: [u8; NAME_MAX_LEN],
    name_len: u8,
    /// Entry type as reported by the filesystem
    pub entry_type: EntryType,
}

impl DirEntry {
    pub(crate) fn new(name: &[u8], entry_type: EntryType) -> Self {
        debug_assert!(name.len() <= NAME_MAX_LEN, "kernel returned oversized name");
        let len = name.len().min(NAME_MAX_LEN);
        let mut buf = [0u8; NAME_MAX_LEN];
        buf[..len].copy_from_slice(&name[..len]);
        Self {
            name: buf,
            name_len: len as u8,
            entry_type,
        }
    }

    /// The entry's base name (no path separators, no NUL)
    pub fn name(&self) -> &[u8] {
        &self.name[..self.name_len as usize]
    }

    /// Check if this is the "." or ".." pseudo-entry
    pub fn is_special(&self) -> bool {
        let name = self.name();
        name == b"." || name == b".."
    }
}

impl std::fmt::Debug for DirEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirEntry")
            .field("name", &String::from_utf8_lossy(self.name()))
            .field("entry_type", &self.entry_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_from_d_type() {
        assert_eq!(EntryType::from_d_type(libc::DT_REG), EntryType::File);
        assert_eq!(EntryType::from_d_type(libc::DT_DIR), EntryType::Directory);
        assert_eq!(EntryType::from_d_type(libc::DT_LNK), EntryType::Symlink);
        assert_eq!(EntryType::from_d_type(libc::DT_UNKNOWN), EntryType::Unknown);
        assert_eq!(EntryType::from_d_type(200), EntryType::Unknown);
    }

    #[test]
    fn test_entry_predicates() {
        assert!(EntryType::File.is_file());
        assert!(!EntryType::File.is_dir());
        assert!(EntryType::Directory.is_dir());
    }

    #[test]
    fn test_special_entries() {
        assert!(DirEntry::new(b".", EntryType::Directory).is_special());
        assert!(DirEntry::new(b"..", EntryType::Directory).is_special());
        assert!(!DirEntry::new(b"...", EntryType::File).is_special());
        assert!(!DirEntry::new(b"a", EntryType::File).is_special());
    }

    #[test]
    fn test_name_roundtrip() {
        let entry = DirEntry::new(b"hello.txt", EntryType::File);
        assert_eq!(entry.name(), b"hello.txt");
    }
}
