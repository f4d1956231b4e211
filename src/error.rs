//! Error types for rbs
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Errors should be actionable - include context about what went wrong
//! - Per-entry I/O failures are logged and skipped, never propagated to
//!   the result stream; only setup and lifecycle failures surface here

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the rbs application
#[derive(Error, Debug)]
pub enum RbsError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// I/O errors (opening the search root, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Needle may not be empty
    #[error("Search pattern is empty")]
    EmptyNeedle,

    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Open-file thresholds out of order
    #[error("Invalid open-file limits: target {target} must be less than max {max}")]
    InvalidOpenFileLimits { target: usize, max: usize },

    /// Search root is not a directory
    #[error("Search root '{path}' is not a directory")]
    RootNotADirectory { path: PathBuf },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker thread could not be spawned
    #[error("Failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },

    /// Worker panicked
    #[error("Worker {id} panicked")]
    Panicked { id: usize },
}

/// Path reconstruction errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// Caller buffer cannot hold the reconstructed path
    #[error("Path buffer too small: need {needed} bytes, have {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },
}

/// Result type alias for RbsError
pub type Result<T> = std::result::Result<T, RbsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let cfg_err = ConfigError::EmptyNeedle;
        let top: RbsError = cfg_err.into();
        assert!(matches!(top, RbsError::Config(_)));
    }

    #[test]
    fn test_error_messages_carry_context() {
        let err = ConfigError::InvalidOpenFileLimits { target: 9, max: 4 };
        let msg = err.to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains('4'));
    }
}
