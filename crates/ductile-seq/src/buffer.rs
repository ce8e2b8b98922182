//! Slot-addressed view over a raw byte block.
//!
//! A [`SlotBuffer`] owns one block from the allocator and addresses it in
//! whole elements: slot `i` is the byte range
//! `i * element_size..(i + 1) * element_size`. All offset arithmetic for the
//! container lives here; callers only deal in slot indices and ranges.

use std::ops::Range;

/// An allocator block carved into fixed-width element slots.
pub(crate) struct SlotBuffer {
    /// Backing storage. `data.len()` is always a multiple of `element_size`.
    data: Vec<u8>,
    element_size: usize,
}

impl SlotBuffer {
    /// Wrap a freshly allocated block.
    pub(crate) fn from_block(data: Vec<u8>, element_size: usize) -> Self {
        debug_assert!(element_size > 0);
        debug_assert_eq!(data.len() % element_size, 0);
        Self { data, element_size }
    }

    /// Number of slots the block holds.
    pub(crate) fn capacity(&self) -> usize {
        self.data.len() / self.element_size
    }

    pub(crate) fn element_size(&self) -> usize {
        self.element_size
    }

    /// Bytes of a single slot.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity()`.
    pub(crate) fn slot(&self, index: usize) -> &[u8] {
        &self.data[self.byte_range(index..index + 1)]
    }

    /// Mutable bytes of a single slot.
    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut [u8] {
        let range = self.byte_range(index..index + 1);
        &mut self.data[range]
    }

    /// Contiguous bytes covering a range of slots.
    pub(crate) fn slots(&self, range: Range<usize>) -> &[u8] {
        &self.data[self.byte_range(range)]
    }

    /// Mutable contiguous bytes covering a range of slots.
    pub(crate) fn slots_mut(&mut self, range: Range<usize>) -> &mut [u8] {
        let range = self.byte_range(range);
        &mut self.data[range]
    }

    /// Move the slots in `src` so they start at slot `dest`.
    ///
    /// Source and destination may overlap. Slots vacated by the move keep
    /// stale bytes; callers overwrite or ignore them.
    pub(crate) fn move_slots(&mut self, src: Range<usize>, dest: usize) {
        if src.is_empty() || src.start == dest {
            return;
        }
        let bytes = self.byte_range(src);
        self.data.copy_within(bytes, dest * self.element_size);
    }

    /// Memory held by the block in bytes.
    pub(crate) fn memory_bytes(&self) -> usize {
        self.data.len()
    }

    /// Surrender the block, leaving an empty buffer behind.
    pub(crate) fn take_block(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }

    fn byte_range(&self, range: Range<usize>) -> Range<usize> {
        range.start * self.element_size..range.end * self.element_size
    }
}
