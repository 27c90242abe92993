//! Growable, offset-addressed segment buffer.

use crate::error::{StorageError, StorageResult};
use std::fmt;
use tracing::trace;

/// Width of a typed value, in bytes.
///
/// Every typed append and read is parameterized by a width; the four
/// fixed-width convenience methods on [`SegmentBuffer`] delegate to the
/// generic entry points with the matching variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueWidth {
    /// 1 byte.
    Byte,
    /// 2 bytes, little-endian.
    Word,
    /// 4 bytes, little-endian.
    Dword,
    /// 8 bytes, little-endian.
    Qword,
}

impl ValueWidth {
    /// All widths, narrowest first.
    pub const ALL: [Self; 4] = [Self::Byte, Self::Word, Self::Dword, Self::Qword];

    /// Returns the encoded size in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Word => 2,
            Self::Dword => 4,
            Self::Qword => 8,
        }
    }
}

impl fmt::Display for ValueWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Byte => "byte",
            Self::Word => "word",
            Self::Dword => "dword",
            Self::Qword => "qword",
        };
        f.write_str(name)
    }
}

/// A growable, contiguous byte buffer addressed by stable integer offsets.
///
/// A `SegmentBuffer` tracks two lengths: `used`, the bytes written so far,
/// and `reserved`, the bytes the buffer has committed to holding without
/// another reallocation. Growth reallocates to
/// `max(2 * reserved, used + count)`, so repeated appends are amortized
/// constant time.
///
/// Offsets returned by the append methods stay valid for the buffer's
/// lifetime: reallocation moves the bytes but never renumbers them, and
/// callers address content exclusively by offset.
///
/// # Invariants
///
/// - `used <= reserved` and the underlying allocation holds at least
///   `reserved` bytes
/// - appends are tightly packed: the offset of each append is exactly the
///   `used` length before it
/// - a failed grow leaves contents, `used`, and `reserved` unchanged
///
/// # Example
///
/// ```rust
/// use vmseg_storage::SegmentBuffer;
///
/// let mut buf = SegmentBuffer::new();
/// assert_eq!(buf.append_byte(0xAB).unwrap(), 0);
/// assert_eq!(buf.append_word(0x1234).unwrap(), 1);
/// assert_eq!(buf.used(), 3);
/// assert_eq!(buf.as_slice(), &[0xAB, 0x34, 0x12]);
/// ```
#[derive(Default)]
pub struct SegmentBuffer {
    bytes: Vec<u8>,
    reserved: usize,
}

impl SegmentBuffer {
    /// Creates a new empty buffer.
    ///
    /// No allocation happens until the first append or
    /// [`ensure_capacity`](Self::ensure_capacity) call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer pre-seeded with `bytes` as its used content.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let reserved = bytes.capacity();
        Self { bytes, reserved }
    }

    /// Returns the number of bytes written so far.
    ///
    /// This is the offset at which the next append will write.
    #[must_use]
    pub fn used(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Returns the number of bytes the buffer can hold without growing.
    #[must_use]
    pub fn reserved(&self) -> u64 {
        self.reserved as u64
    }

    /// Returns `true` if no bytes have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the used bytes `[0, used)` as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the used bytes as a mutable slice for in-place writes.
    ///
    /// The used length cannot be changed through the slice; use the append
    /// methods to extend the buffer.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Guarantees at least `count` free bytes beyond the used length.
    ///
    /// Grows by reallocating to `max(2 * reserved, used + count)`. The used
    /// bytes are carried over unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AllocationFailure`] if the reservation fails;
    /// the buffer is left exactly as before the call.
    pub fn ensure_capacity(&mut self, count: usize) -> StorageResult<()> {
        let needed = self.bytes.len().saturating_add(count);
        if needed <= self.reserved {
            return Ok(());
        }

        let target = needed.max(self.reserved.saturating_mul(2));
        let additional = target - self.bytes.len();
        self.bytes
            .try_reserve(additional)
            .map_err(|source| StorageError::AllocationFailure {
                requested: additional,
                source,
            })?;
        trace!(
            used = self.bytes.len(),
            from = self.reserved,
            to = target,
            "grew segment buffer"
        );
        self.reserved = target;
        Ok(())
    }

    /// Appends `value` at the current used length, little-endian, using the
    /// lowest `width` bytes.
    ///
    /// Returns the offset at which the value now resides. Values are tightly
    /// packed: no padding or alignment is inserted between appends of
    /// different widths.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AllocationFailure`] if growth fails; nothing
    /// is written in that case.
    pub fn append_value(&mut self, value: u64, width: ValueWidth) -> StorageResult<u64> {
        let le = value.to_le_bytes();
        self.append_bytes(&le[..width.size()])
    }

    /// Appends a single byte. See [`append_value`](Self::append_value).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AllocationFailure`] if growth fails.
    pub fn append_byte(&mut self, value: u8) -> StorageResult<u64> {
        self.append_value(u64::from(value), ValueWidth::Byte)
    }

    /// Appends a 16-bit value, little-endian. See [`append_value`](Self::append_value).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AllocationFailure`] if growth fails.
    pub fn append_word(&mut self, value: u16) -> StorageResult<u64> {
        self.append_value(u64::from(value), ValueWidth::Word)
    }

    /// Appends a 32-bit value, little-endian. See [`append_value`](Self::append_value).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AllocationFailure`] if growth fails.
    pub fn append_dword(&mut self, value: u32) -> StorageResult<u64> {
        self.append_value(u64::from(value), ValueWidth::Dword)
    }

    /// Appends a 64-bit value, little-endian. See [`append_value`](Self::append_value).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AllocationFailure`] if growth fails.
    pub fn append_qword(&mut self, value: u64) -> StorageResult<u64> {
        self.append_value(value, ValueWidth::Qword)
    }

    /// Appends a raw byte slice, returning the offset where it begins.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AllocationFailure`] if growth fails; nothing
    /// is written in that case.
    pub fn append_bytes(&mut self, data: &[u8]) -> StorageResult<u64> {
        self.ensure_capacity(data.len())?;
        let offset = self.bytes.len() as u64;
        self.bytes.extend_from_slice(data);
        Ok(offset)
    }

    /// Reads a little-endian value of the given width at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidRange`] if `offset + width` exceeds
    /// the used length.
    pub fn read_value(&self, offset: u64, width: ValueWidth) -> StorageResult<u64> {
        let range = self.check_range(offset, width.size() as u64)?;
        let mut le = [0u8; 8];
        le[..width.size()].copy_from_slice(&self.bytes[range]);
        Ok(u64::from_le_bytes(le))
    }

    /// Overwrites a little-endian value of the given width at `offset`.
    ///
    /// Only previously appended bytes can be written; the used length never
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidRange`] if `offset + width` exceeds
    /// the used length; the buffer is unchanged in that case.
    pub fn write_value(&mut self, offset: u64, value: u64, width: ValueWidth) -> StorageResult<()> {
        let range = self.check_range(offset, width.size() as u64)?;
        let le = value.to_le_bytes();
        self.bytes[range].copy_from_slice(&le[..width.size()]);
        Ok(())
    }

    /// Keeps only `[base_offset, base_offset + total_length)`, shifted to the
    /// start of the buffer.
    ///
    /// Afterwards the used length is exactly `total_length`; the reserved
    /// size is unchanged. Used to discard stale frame data, e.g. trimming a
    /// local-variable segment on scope exit.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidRange`] if the range extends beyond the
    /// used length; the buffer is unchanged in that case.
    pub fn retain_range(&mut self, base_offset: u64, total_length: u64) -> StorageResult<()> {
        let range = self.check_range(base_offset, total_length)?;
        self.bytes.copy_within(range, 0);
        self.bytes.truncate(total_length as usize);
        Ok(())
    }

    /// Renders the used bytes as a hex dump for diagnostics.
    ///
    /// Read-only; no state changes.
    #[must_use]
    pub fn dump(&self) -> String {
        pretty_hex::pretty_hex(&self.bytes)
    }

    /// Validates `[offset, offset + len)` against the used length and
    /// returns it as a `usize` range.
    fn check_range(&self, offset: u64, len: u64) -> StorageResult<std::ops::Range<usize>> {
        let used = self.used();
        let end = offset.checked_add(len).filter(|&end| end <= used);
        match end {
            Some(end) => Ok(offset as usize..end as usize),
            None => Err(StorageError::InvalidRange { offset, len, used }),
        }
    }
}

impl fmt::Debug for SegmentBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentBuffer")
            .field("used", &self.used())
            .field("reserved", &self.reserved())
            .finish_non_exhaustive()
    }
}
