//! Error types for segment buffer operations.

use std::collections::TryReserveError;
use thiserror::Error;

/// Result type for segment buffer operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while manipulating a segment buffer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Growing the buffer failed.
    ///
    /// The buffer is left exactly as it was before the call: same contents,
    /// same used length, same reserved size.
    #[error("allocation failure: could not reserve {requested} additional bytes")]
    AllocationFailure {
        /// Number of additional bytes the grow attempted to reserve.
        requested: usize,
        /// Underlying allocator error.
        #[source]
        source: TryReserveError,
    },

    /// A range extends beyond the used length of the buffer.
    #[error("invalid range: offset {offset} + length {len} exceeds used size {used}")]
    InvalidRange {
        /// The requested base offset.
        offset: u64,
        /// The requested length.
        len: u64,
        /// The buffer's used length at the time of the call.
        used: u64,
    },
}
