//! Error taxonomy for the record store and query layers.
//!
//! Leaf operations return a [`StoreError`]; the indexer logs and skips
//! recoverable kinds, continuing with sibling nodes. Only resource
//! exhaustion and permission failures abort a run.

use thiserror::Error;

/// Error kinds surfaced by record store operations and searches.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An expected-negative lookup result. Drives control flow; never an
    /// error to log.
    #[error("not found")]
    NotFound,

    /// Multiple non-equal matches where exactly one was required.
    #[error("ambiguous name")]
    Ambiguous,

    /// A mutating call on a read-only store.
    #[error("store is read-only")]
    PermissionDenied,

    /// Malformed argument, malformed query, string too long.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Integer out of representable range (e.g. a negative id read from
    /// disk, or a value too large to bind).
    #[error("value out of range: {0}")]
    Range(String),

    /// A durable-store invariant violated: wrong column type, referenced id
    /// missing. Logged distinctively; never fatal by itself.
    #[error("corrupt record: {0}")]
    Corruption(String),

    /// A known-unimplemented feature was encountered; the node is skipped.
    #[error("unimplemented: {0}")]
    Unimplemented(&'static str),

    /// Opaque error from the database driver.
    #[error("database error: {0}")]
    Backend(#[from] rusqlite::Error),

    /// Opaque error from the operating system.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True for the kinds that should abort an indexing run instead of
    /// being logged and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::PermissionDenied)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
