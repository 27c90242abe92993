//! Per-VM data context.

use crate::error::CoreResult;
use crate::registry::NamedSegmentRegistry;
use crate::store::SegmentStore;
use crate::types::{SegmentId, TypeCode};
use tracing::debug;

/// The per-VM data context.
///
/// `VmData` owns the segment store, the named-segment registry, and the two
/// well-known segments every program uses:
///
/// - `globaldata` — global-variable storage, lives as long as the context
/// - `localdata` — the active call frame's local-variable storage, reset on
///   subroutine entry/exit so each frame starts from a clean offset space
///
/// Both are created before any bytecode executes and are destroyed when the
/// context is dropped. There is no process-wide state: every VM instance
/// owns its `VmData`, and concurrent instances never share segments.
///
/// # Example
///
/// ```rust
/// use vmseg_core::VmData;
///
/// let mut vm = VmData::new();
/// let locals = vm.localdata();
/// vm.store_mut().get_mut(locals)?.append_qword(99)?;
///
/// // Subroutine returned: discard the frame's locals.
/// vm.reset_locals()?;
/// assert_eq!(vm.store().get(locals)?.used(), 0);
/// # Ok::<(), vmseg_core::CoreError>(())
/// ```
#[derive(Debug)]
pub struct VmData {
    store: SegmentStore,
    registry: NamedSegmentRegistry,
    globaldata: SegmentId,
    localdata: SegmentId,
}

impl VmData {
    /// Creates a fresh context with empty `globaldata` and `localdata`
    /// segments.
    #[must_use]
    pub fn new() -> Self {
        let mut store = SegmentStore::new();
        let globaldata = store.create();
        let localdata = store.create();
        debug!(%globaldata, %localdata, "initialized VM data context");
        Self {
            store,
            registry: NamedSegmentRegistry::new(),
            globaldata,
            localdata,
        }
    }

    /// Handle of the global-variable segment.
    #[must_use]
    pub fn globaldata(&self) -> SegmentId {
        self.globaldata
    }

    /// Handle of the current frame's local-variable segment.
    #[must_use]
    pub fn localdata(&self) -> SegmentId {
        self.localdata
    }

    /// The underlying segment store.
    #[must_use]
    pub fn store(&self) -> &SegmentStore {
        &self.store
    }

    /// The underlying segment store, mutably.
    pub fn store_mut(&mut self) -> &mut SegmentStore {
        &mut self.store
    }

    /// Returns the segment backing `code`, creating it on first use.
    ///
    /// See [`NamedSegmentRegistry::by_name`].
    pub fn segment_by_name(&mut self, code: TypeCode) -> SegmentId {
        self.registry.by_name(&mut self.store, code)
    }

    /// Binds `id` as the backing segment for `code` (last bind wins).
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::SegmentNotFound`] if `id` is not live.
    pub fn bind_segment_name(&mut self, id: SegmentId, code: TypeCode) -> CoreResult<()> {
        self.registry.bind_name(&self.store, id, code)
    }

    /// The named-segment registry.
    #[must_use]
    pub fn registry(&self) -> &NamedSegmentRegistry {
        &self.registry
    }

    /// Empties `localdata` so the next frame starts from offset 0.
    ///
    /// The segment keeps its reserved storage for reuse.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::SegmentNotFound`] if `localdata` has been
    /// destroyed through [`store_mut`](Self::store_mut).
    pub fn reset_locals(&mut self) -> CoreResult<()> {
        self.store.get_mut(self.localdata)?.retain_range(0, 0)?;
        Ok(())
    }
}

impl Default for VmData {
    fn default() -> Self {
        Self::new()
    }
}
