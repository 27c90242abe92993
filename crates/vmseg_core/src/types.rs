//! Core type definitions for the segment allocator.

use std::fmt;

/// Opaque handle to a segment, resolved through a [`crate::SegmentStore`].
///
/// Ids are assigned from a monotonic counter starting at 1 and never reused,
/// even after the segment is destroyed: a stale handle can fail but can
/// never silently alias a newer, unrelated segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(pub u64);

impl SegmentId {
    /// Creates a segment id from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg:{}", self.0)
    }
}

/// A user-defined type code, bindable to a dedicated segment.
///
/// The interpreter assigns codes when user types are declared; this layer
/// treats them as opaque integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeCode(pub i64);

impl TypeCode {
    /// Creates a type code from its raw value.
    #[must_use]
    pub const fn new(code: i64) -> Self {
        Self(code)
    }

    /// Returns the raw code value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type:{}", self.0)
    }
}
