//! Error types for segment store operations.

use crate::types::SegmentId;
use thiserror::Error;

/// Result type for segment store operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur operating on the segment store and registries.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Buffer-level error (allocation failure, invalid range).
    #[error("storage error: {0}")]
    Storage(#[from] vmseg_storage::StorageError),

    /// The id does not resolve to a live segment.
    ///
    /// Either it was never issued or the segment has been destroyed; ids are
    /// never reused, so the distinction does not matter to the caller.
    #[error("segment not found: {id}")]
    SegmentNotFound {
        /// The handle that failed to resolve.
        id: SegmentId,
    },
}
