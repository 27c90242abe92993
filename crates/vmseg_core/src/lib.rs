//! # vmseg core
//!
//! Handle management for the vmseg data-segment allocator.
//!
//! This crate provides:
//! - [`SegmentStore`] — owns every segment buffer, resolves opaque
//!   [`SegmentId`] handles, and handles create/destroy/duplicate
//! - [`NamedSegmentRegistry`] — binds user-defined [`TypeCode`]s to
//!   dedicated segments
//! - [`VmData`] — the per-VM context owning the store, the registry, and
//!   the well-known `globaldata`/`localdata` segments
//!
//! There is no process-wide state: each VM instance owns a [`VmData`] and
//! all operations thread through it, so independent instances never share
//! buffers and teardown is just dropping the context.
//!
//! ## Example
//!
//! ```rust
//! use vmseg_core::VmData;
//!
//! let mut vm = VmData::new();
//! let globals = vm.globaldata();
//! let at = vm.store_mut().get_mut(globals)?.append_dword(7)?;
//! assert_eq!(at, 0);
//! # Ok::<(), vmseg_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod error;
mod registry;
mod store;
mod types;

pub use context::VmData;
pub use error::{CoreError, CoreResult};
pub use registry::NamedSegmentRegistry;
pub use store::SegmentStore;
pub use types::{SegmentId, TypeCode};

// The storage-level types appear throughout this crate's API.
pub use vmseg_storage::{SegmentBuffer, StorageError, ValueWidth};
