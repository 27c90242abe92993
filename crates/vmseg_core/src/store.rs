//! Segment store: id assignment and segment lifecycle.

use crate::error::{CoreError, CoreResult};
use crate::types::SegmentId;
use std::collections::HashMap;
use tracing::debug;
use vmseg_storage::SegmentBuffer;

/// Owns every segment buffer and resolves [`SegmentId`] handles to them.
///
/// The store is the sole authority for id-to-segment resolution. Ids are
/// assigned from a monotonic counter starting at 1 and are never recycled,
/// including across destroys. Duplication produces fully disjoint buffers;
/// no two live segments ever share storage.
///
/// # Example
///
/// ```rust
/// use vmseg_core::SegmentStore;
///
/// let mut store = SegmentStore::new();
/// let id = store.create();
/// let at = store.get_mut(id)?.append_byte(0xFF)?;
/// assert_eq!(at, 0);
/// # Ok::<(), vmseg_core::CoreError>(())
/// ```
#[derive(Debug)]
pub struct SegmentStore {
    segments: HashMap<SegmentId, SegmentBuffer>,
    next_id: u64,
}

impl Default for SegmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentStore {
    /// Creates an empty store. The first segment created will get id 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            segments: HashMap::new(),
            next_id: 1,
        }
    }

    /// Creates a new empty segment and returns its handle.
    ///
    /// The segment allocates nothing until its first append, so creation
    /// cannot fail.
    pub fn create(&mut self) -> SegmentId {
        let id = self.issue_id();
        self.segments.insert(id, SegmentBuffer::new());
        debug!(%id, "created segment");
        id
    }

    /// Creates an independent copy of the used bytes of `id`.
    ///
    /// The copy gets a fresh handle and shares no storage with the source:
    /// mutating one never affects the other.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SegmentNotFound`] if `id` is not live.
    pub fn duplicate(&mut self, id: SegmentId) -> CoreResult<SegmentId> {
        let copy = SegmentBuffer::from_bytes(self.get(id)?.as_slice().to_vec());
        let dup_id = self.issue_id();
        self.segments.insert(dup_id, copy);
        debug!(source = %id, %dup_id, "duplicated segment");
        Ok(dup_id)
    }

    /// Destroys the segment, releasing its buffer.
    ///
    /// The id becomes permanently invalid; it is never reassigned.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SegmentNotFound`] if `id` is not live.
    pub fn destroy(&mut self, id: SegmentId) -> CoreResult<()> {
        match self.segments.remove(&id) {
            Some(_) => {
                debug!(%id, "destroyed segment");
                Ok(())
            }
            None => Err(CoreError::SegmentNotFound { id }),
        }
    }

    /// Resolves a handle to its segment buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SegmentNotFound`] if `id` is not live.
    pub fn get(&self, id: SegmentId) -> CoreResult<&SegmentBuffer> {
        self.segments
            .get(&id)
            .ok_or(CoreError::SegmentNotFound { id })
    }

    /// Resolves a handle to its segment buffer, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SegmentNotFound`] if `id` is not live.
    pub fn get_mut(&mut self, id: SegmentId) -> CoreResult<&mut SegmentBuffer> {
        self.segments
            .get_mut(&id)
            .ok_or(CoreError::SegmentNotFound { id })
    }

    /// Appends the used content of `src` onto `dst`, growing `dst` as
    /// needed.
    ///
    /// Returns the offset in `dst` where the copied region begins. `src` is
    /// not mutated. `dst == src` is allowed and doubles the content.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SegmentNotFound`] if either handle is dead, or
    /// [`CoreError::Storage`] if growing `dst` fails; in both cases neither
    /// segment has been mutated.
    pub fn append_from(&mut self, dst: SegmentId, src: SegmentId) -> CoreResult<u64> {
        // src is copied out first: dst == src stays well defined and
        // resolution failures happen before any mutation.
        let data = self.get(src)?.as_slice().to_vec();
        let offset = self.get_mut(dst)?.append_bytes(&data)?;
        Ok(offset)
    }

    /// Returns `true` if `id` resolves to a live segment.
    #[must_use]
    pub fn contains(&self, id: SegmentId) -> bool {
        self.segments.contains_key(&id)
    }

    /// Returns the number of live segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if no segments are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn issue_id(&mut self) -> SegmentId {
        let id = SegmentId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_monotonic_ids_from_one() {
        let mut store = SegmentStore::new();
        assert_eq!(store.create(), SegmentId::new(1));
        assert_eq!(store.create(), SegmentId::new(2));
        assert_eq!(store.create(), SegmentId::new(3));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn created_segment_is_empty() {
        let mut store = SegmentStore::new();
        let id = store.create();
        let buf = store.get(id).unwrap();
        assert_eq!(buf.used(), 0);
        assert_eq!(buf.reserved(), 0);
    }

    #[test]
    fn get_unknown_id_fails() {
        let store = SegmentStore::new();
        let result = store.get(SegmentId::new(99));
        assert!(matches!(result, Err(CoreError::SegmentNotFound { .. })));
    }

    #[test]
    fn destroy_invalidates_id_permanently() {
        let mut store = SegmentStore::new();
        let id = store.create();

        store.destroy(id).unwrap();
        assert!(matches!(
            store.get(id),
            Err(CoreError::SegmentNotFound { .. })
        ));
        assert!(matches!(
            store.destroy(id),
            Err(CoreError::SegmentNotFound { .. })
        ));
    }

    #[test]
    fn ids_are_never_reused_after_destroy() {
        let mut store = SegmentStore::new();
        let first = store.create();
        store.destroy(first).unwrap();

        let second = store.create();
        assert_ne!(first, second);
        assert_eq!(second, SegmentId::new(2));
    }

    #[test]
    fn destroy_leaves_other_segments_alone() {
        let mut store = SegmentStore::new();
        let a = store.create();
        let b = store.create();
        store.get_mut(b).unwrap().append_word(0xBEEF).unwrap();

        store.destroy(a).unwrap();
        assert_eq!(store.get(b).unwrap().used(), 2);
    }

    #[test]
    fn duplicate_copies_content_independently() {
        let mut store = SegmentStore::new();
        let original = store.create();
        store.get_mut(original).unwrap().append_dword(0xAABB_CCDD).unwrap();

        let copy = store.duplicate(original).unwrap();
        assert_ne!(original, copy);
        assert_eq!(
            store.get(copy).unwrap().as_slice(),
            store.get(original).unwrap().as_slice()
        );

        // Mutations do not cross over, in either direction.
        store.get_mut(original).unwrap().append_byte(1).unwrap();
        assert_eq!(store.get(copy).unwrap().used(), 4);
        store.get_mut(copy).unwrap().append_byte(2).unwrap();
        assert_eq!(store.get(original).unwrap().used(), 5);
        assert_ne!(
            store.get(original).unwrap().as_slice(),
            store.get(copy).unwrap().as_slice()
        );
    }

    #[test]
    fn duplicate_dead_handle_fails() {
        let mut store = SegmentStore::new();
        let id = store.create();
        store.destroy(id).unwrap();
        assert!(matches!(
            store.duplicate(id),
            Err(CoreError::SegmentNotFound { .. })
        ));
    }

    #[test]
    fn append_from_copies_used_content() {
        let mut store = SegmentStore::new();
        let src = store.create();
        store.get_mut(src).unwrap().append_bytes(&[1, 2, 3]).unwrap();
        let dst = store.create();
        store.get_mut(dst).unwrap().append_byte(9).unwrap();

        let offset = store.append_from(dst, src).unwrap();
        assert_eq!(offset, 1);
        assert_eq!(store.get(dst).unwrap().as_slice(), &[9, 1, 2, 3]);
        // Source untouched.
        assert_eq!(store.get(src).unwrap().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn append_from_self_doubles_content() {
        let mut store = SegmentStore::new();
        let id = store.create();
        store.get_mut(id).unwrap().append_bytes(&[7, 8]).unwrap();

        let offset = store.append_from(id, id).unwrap();
        assert_eq!(offset, 2);
        assert_eq!(store.get(id).unwrap().as_slice(), &[7, 8, 7, 8]);
    }

    #[test]
    fn append_from_dead_source_leaves_dst_unchanged() {
        let mut store = SegmentStore::new();
        let dst = store.create();
        store.get_mut(dst).unwrap().append_byte(1).unwrap();
        let src = store.create();
        store.destroy(src).unwrap();

        assert!(store.append_from(dst, src).is_err());
        assert_eq!(store.get(dst).unwrap().used(), 1);
    }
}
