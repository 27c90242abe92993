//! # vmseg storage
//!
//! Growable, offset-addressed byte buffers for the vmseg allocator.
//!
//! This crate provides the lowest-level building block of the allocator:
//! [`SegmentBuffer`], a contiguous byte buffer that grows by amortized
//! doubling and is addressed **by offset, never by pointer**. Every append
//! returns the offset at which the value was written, and that offset keeps
//! addressing the same logical bytes for the buffer's lifetime, across any
//! number of reallocations.
//!
//! ## Design Principles
//!
//! - Buffers are opaque byte stores; value typing lives with the caller
//! - Appends are tightly packed: no padding between values of mixed widths
//! - Growth is fallible and atomic: a failed grow leaves the buffer untouched
//! - Handle bookkeeping (ids, registries) lives one layer up, in `vmseg_core`
//!
//! ## Example
//!
//! ```rust
//! use vmseg_storage::{SegmentBuffer, ValueWidth};
//!
//! let mut buf = SegmentBuffer::new();
//! let at = buf.append_dword(0x1122_3344).unwrap();
//! assert_eq!(at, 0);
//! assert_eq!(buf.used(), 4);
//! assert_eq!(buf.read_value(at, ValueWidth::Dword).unwrap(), 0x1122_3344);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod error;

pub use buffer::{SegmentBuffer, ValueWidth};
pub use error::{StorageError, StorageResult};
