//! Registry binding user-defined type codes to dedicated segments.

use crate::error::{CoreError, CoreResult};
use crate::store::SegmentStore;
use crate::types::{SegmentId, TypeCode};
use std::collections::HashMap;
use tracing::debug;

/// Maps user-defined [`TypeCode`]s to their backing segments.
///
/// A code maps to at most one segment at a time. Lookups through
/// [`by_name`](Self::by_name) create the backing segment lazily, so the
/// interpreter can resolve a type's storage without a separate setup step.
///
/// The registry holds ids, not buffers; the [`SegmentStore`] passed into
/// each operation remains the owner of all segment data.
#[derive(Debug, Default)]
pub struct NamedSegmentRegistry {
    bindings: HashMap<TypeCode, SegmentId>,
}

impl NamedSegmentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the segment bound to `code`, creating and binding a fresh
    /// empty segment on first use.
    ///
    /// Idempotent between rebinds: repeated calls return the same id. A
    /// binding whose segment has since been destroyed counts as absent and
    /// is replaced with a fresh segment.
    pub fn by_name(&mut self, store: &mut SegmentStore, code: TypeCode) -> SegmentId {
        if let Some(&id) = self.bindings.get(&code) {
            if store.contains(id) {
                return id;
            }
        }

        let id = store.create();
        self.bindings.insert(code, id);
        debug!(%code, %id, "bound fresh segment to type code");
        id
    }

    /// Binds `id` to `code`, replacing any existing binding for the code.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SegmentNotFound`] if `id` is not live; the
    /// existing binding, if any, is kept in that case.
    pub fn bind_name(
        &mut self,
        store: &SegmentStore,
        id: SegmentId,
        code: TypeCode,
    ) -> CoreResult<()> {
        if !store.contains(id) {
            return Err(CoreError::SegmentNotFound { id });
        }

        let replaced = self.bindings.insert(code, id);
        debug!(%code, %id, ?replaced, "bound segment to type code");
        Ok(())
    }

    /// Returns the segment currently bound to `code`, if any.
    ///
    /// Never creates a segment; see [`by_name`](Self::by_name) for the
    /// creating lookup.
    #[must_use]
    pub fn bound(&self, code: TypeCode) -> Option<SegmentId> {
        self.bindings.get(&code).copied()
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if no codes are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
