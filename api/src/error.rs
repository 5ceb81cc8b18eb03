//! The shared error vocabulary of the allocator.
//!
//! Every kind in here is recoverable at the call site: operations return them
//! as values and leave the filesystem state untouched, so a caller can report
//! the failure and carry on. Layer implementations wrap this type in their own
//! `thiserror` enums with `#[from]`, which keeps the `?` operator working
//! across layer boundaries.

use thiserror::Error;

/// Error kinds surfaced through the public operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    /// An operation was attempted before `init`.
    /// Only the command adapter can produce this; an owned filesystem value
    /// is initialized by construction.
    #[error("file system not initialized")]
    NotInitialized,
    /// Empty name or non-positive size.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A file with this name already exists.
    #[error("file '{0}' already exists")]
    DuplicateName(String),
    /// The pool does not have enough free blocks for the request.
    #[error("not enough space: need {needed} blocks, only {available} available")]
    InsufficientSpace {
        /// Blocks the request needs, data and indirect together.
        needed: u64,
        /// Free blocks currently in the pool.
        available: u64,
    },
    /// The pool promised enough free blocks but returned fewer.
    /// This cannot happen when the `InsufficientSpace` check is correct;
    /// observing it means a defect, not a full disk.
    #[error("allocator shortfall: needed {needed} blocks, found {found}")]
    AllocationShortfall {
        /// Blocks that were requested.
        needed: u64,
        /// Blocks the scan actually produced.
        found: u64,
    },
    /// No file with this name exists.
    #[error("file '{0}' not found")]
    FileNotFound(String),
    /// The file would need more data blocks than direct pointers plus one
    /// full indirect block can address. The modeled tier stops there.
    #[error("file too large: at most {max_bytes} bytes fit in a single-indirect inode")]
    FileTooLarge {
        /// The size ceiling for the current geometry.
        max_bytes: u64,
    },
}

/// Define a generic alias for a `Result` with the error type `FsError`.
pub type Result<T> = std::result::Result<T, FsError>;
