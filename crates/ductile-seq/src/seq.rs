//! The byte-level sequence container.
//!
//! [`ByteSeq`] stores elements of a runtime-fixed byte width in one
//! contiguous buffer obtained from a [`BufferAllocator`]. It applies the
//! crate's capacity policy explicitly rather than leaning on `Vec`'s own
//! strategy, so capacity behaviour is reproducible slot for slot.
//!
//! # Failure atomicity
//!
//! Every reallocation acquires the new block *before* touching the live
//! buffer. If the allocator refuses, the call returns
//! [`SeqError::AllocationFailed`] and the container is exactly as it was:
//! same elements, same order, same capacity. This includes removals whose
//! shrink-on-demand step fails and sorts whose scratch block cannot be
//! allocated.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;
use std::slice::ChunksExact;

use ductile_core::{BufferAllocator, SeqConfig, SeqError, SeqMetrics, SystemAllocator};

use crate::buffer::SlotBuffer;
use crate::growth::{self, Growth};
use crate::sort;

/// A growable, contiguous sequence of fixed-width opaque elements.
///
/// Elements are byte slices of exactly [`element_size`](Self::element_size)
/// bytes; the container never interprets them. Slots `[0, len)` hold live
/// elements in order.
///
/// Not internally synchronised: share across threads only behind external
/// mutual exclusion.
pub struct ByteSeq<A: BufferAllocator = SystemAllocator> {
    buf: SlotBuffer,
    len: usize,
    alloc: A,
    metrics: SeqMetrics,
}

impl ByteSeq<SystemAllocator> {
    /// Create an empty container on the global heap.
    ///
    /// # Errors
    ///
    /// [`SeqError::Config`] for a zero element size or an initial buffer
    /// too large to address; [`SeqError::AllocationFailed`] if the heap
    /// refuses the initial buffer.
    pub fn new(config: SeqConfig) -> Result<Self, SeqError> {
        Self::with_allocator(config, SystemAllocator)
    }
}

impl<A: BufferAllocator> ByteSeq<A> {
    /// Create an empty container whose buffers come from `alloc`.
    pub fn with_allocator(config: SeqConfig, mut alloc: A) -> Result<Self, SeqError> {
        config.validate()?;
        let capacity = config.resolved_capacity();
        // validate() guarantees this product does not overflow.
        let block = alloc.allocate(capacity * config.element_size)?;
        Ok(Self {
            buf: SlotBuffer::from_block(block, config.element_size),
            len: 0,
            alloc,
            metrics: SeqMetrics::with_initial_capacity(capacity),
        })
    }

    /// Release the buffer and consume the container.
    ///
    /// Equivalent to dropping it; provided for call sites that want the
    /// teardown to be explicit.
    pub fn destroy(self) {
        drop(self);
    }

    // ── Queries ────────────────────────────────────────────────────

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the container holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Byte width of one element.
    pub fn element_size(&self) -> usize {
        self.buf.element_size()
    }

    /// Bytes held by the current buffer.
    pub fn memory_bytes(&self) -> usize {
        self.buf.memory_bytes()
    }

    /// Cumulative resize counters.
    pub fn metrics(&self) -> &SeqMetrics {
        &self.metrics
    }

    /// The allocator backing this container.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Element at `index`, or `None` if `index >= len()`.
    ///
    /// The borrow ends before any mutating call, so a returned slice can
    /// never observe a reallocation or shift.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        (index < self.len).then(|| self.buf.slot(index))
    }

    /// First element, or `None` when empty.
    pub fn front(&self) -> Option<&[u8]> {
        self.get(0)
    }

    /// Last element, or `None` when empty.
    pub fn back(&self) -> Option<&[u8]> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    /// All live elements as one contiguous byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.slots(0..self.len)
    }

    /// Iterate live elements in index order.
    pub fn iter(&self) -> ChunksExact<'_, u8> {
        self.as_bytes().chunks_exact(self.element_size())
    }

    /// Visit every element with `(Some(element), index, len)`.
    ///
    /// An empty container invokes `visitor` exactly once with
    /// `(None, 0, 0)` so callers can detect emptiness in the same pass.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(Option<&[u8]>, usize, usize),
    {
        if self.is_empty() {
            visitor(None, 0, 0);
            return;
        }
        for (index, element) in self.iter().enumerate() {
            visitor(Some(element), index, self.len);
        }
    }

    /// Index of the first element for which `cmp(element, target)` is
    /// [`Ordering::Equal`].
    ///
    /// # Errors
    ///
    /// [`SeqError::InvalidArgument`] if `target` is not one element wide;
    /// [`SeqError::NotFound`] if nothing matches.
    pub fn find<F>(&self, target: &[u8], mut cmp: F) -> Result<usize, SeqError>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        self.check_element(target)?;
        self.iter()
            .position(|element| cmp(element, target) == Ordering::Equal)
            .ok_or(SeqError::NotFound)
    }

    // ── Insertion ──────────────────────────────────────────────────

    /// Append one element.
    ///
    /// Amortised O(1); doubles the capacity when full.
    pub fn push_back(&mut self, value: &[u8]) -> Result<(), SeqError> {
        self.check_element(value)?;
        if self.len == self.capacity() {
            let mut next = self.acquire_grown(Growth::Single, self.len + 1)?;
            next.slots_mut(0..self.len)
                .copy_from_slice(self.buf.slots(0..self.len));
            self.install(next);
        }
        self.buf.slot_mut(self.len).copy_from_slice(value);
        self.len += 1;
        Ok(())
    }

    /// Prepend one element. O(n).
    ///
    /// When growth is needed the element is written straight into slot 0
    /// of the new buffer and the old contents copied after it, so no
    /// separate shift pass runs.
    pub fn push_front(&mut self, value: &[u8]) -> Result<(), SeqError> {
        self.check_element(value)?;
        if self.len == self.capacity() {
            let mut next = self.acquire_grown(Growth::Single, self.len + 1)?;
            next.slot_mut(0).copy_from_slice(value);
            next.slots_mut(1..self.len + 1)
                .copy_from_slice(self.buf.slots(0..self.len));
            self.install(next);
        } else {
            self.buf.move_slots(0..self.len, 1);
            self.buf.slot_mut(0).copy_from_slice(value);
        }
        self.len += 1;
        Ok(())
    }

    /// Append every element in `block`.
    ///
    /// `block` must be a non-empty whole number of elements. Grows at most
    /// once, then performs a single bulk copy.
    pub fn push_back_block(&mut self, block: &[u8]) -> Result<(), SeqError> {
        let count = self.check_block(block)?;
        let required = self.required_len(count)?;
        if required > self.capacity() {
            let mut next = self.acquire_grown(Growth::Block, required)?;
            next.slots_mut(0..self.len)
                .copy_from_slice(self.buf.slots(0..self.len));
            self.install(next);
        }
        self.buf.slots_mut(self.len..required).copy_from_slice(block);
        self.len = required;
        Ok(())
    }

    /// Insert one element before the element at `index`.
    ///
    /// Requires `index < len()`; appending goes through
    /// [`push_back`](Self::push_back).
    pub fn insert(&mut self, index: usize, value: &[u8]) -> Result<(), SeqError> {
        self.check_element(value)?;
        self.insert_slots(index, value, 1, Growth::Single)
    }

    /// Insert every element in `block` before the element at `index`.
    ///
    /// Requires `index < len()`; appending goes through
    /// [`push_back_block`](Self::push_back_block).
    pub fn insert_block(&mut self, index: usize, block: &[u8]) -> Result<(), SeqError> {
        let count = self.check_block(block)?;
        self.insert_slots(index, block, count, Growth::Block)
    }

    /// Overwrite the element at `index` in place.
    pub fn modify(&mut self, index: usize, value: &[u8]) -> Result<(), SeqError> {
        self.check_element(value)?;
        self.check_index(index)?;
        self.buf.slot_mut(index).copy_from_slice(value);
        Ok(())
    }

    // ── Removal ────────────────────────────────────────────────────

    /// Remove the element at `index`, shifting later elements left.
    pub fn remove(&mut self, index: usize) -> Result<(), SeqError> {
        self.check_index(index)?;
        self.remove_slots(index..index + 1)
    }

    /// Remove `count` elements starting at `index`.
    ///
    /// # Errors
    ///
    /// [`SeqError::InvalidArgument`] for `count == 0`;
    /// [`SeqError::IndexOutOfRange`] if `index + count > len()`.
    pub fn remove_block(&mut self, index: usize, count: usize) -> Result<(), SeqError> {
        if count == 0 {
            return Err(SeqError::InvalidArgument {
                reason: "block length must be non-zero",
            });
        }
        let end = index
            .checked_add(count)
            .filter(|&end| end <= self.len)
            .ok_or(SeqError::IndexOutOfRange {
                index: index.saturating_add(count),
                len: self.len,
            })?;
        self.remove_slots(index..end)
    }

    /// Remove the last element. A no-op on an empty container.
    pub fn pop_back(&mut self) -> Result<(), SeqError> {
        match self.len {
            0 => Ok(()),
            len => self.remove_slots(len - 1..len),
        }
    }

    /// Remove the first element, shifting the rest left. A no-op on an
    /// empty container.
    pub fn pop_front(&mut self) -> Result<(), SeqError> {
        match self.len {
            0 => Ok(()),
            _ => self.remove_slots(0..1),
        }
    }

    /// Drop all elements and return the buffer to the minimum capacity.
    pub fn clear(&mut self) -> Result<(), SeqError> {
        if let Some(target) = growth::after_clear(self.capacity()) {
            let next = self.acquire(target)?;
            self.install(next);
        }
        self.len = 0;
        Ok(())
    }

    /// Reallocate to `max(len, MIN_CAPACITY)` slots if that is smaller
    /// than the current capacity.
    pub fn shrink(&mut self) -> Result<(), SeqError> {
        if let Some(target) = growth::fit(self.capacity(), self.len) {
            let mut next = self.acquire(target)?;
            next.slots_mut(0..self.len)
                .copy_from_slice(self.buf.slots(0..self.len));
            self.install(next);
        }
        Ok(())
    }

    // ── Sorting ────────────────────────────────────────────────────

    /// Stable sort of the live elements by a three-way comparator.
    ///
    /// Allocates one scratch block of `len() * element_size()` bytes for
    /// the duration of the call. If that allocation fails the elements are
    /// left in their original order.
    pub fn sort<F>(&mut self, cmp: F) -> Result<(), SeqError>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        if self.len > 1 {
            let bytes = self.len * self.element_size();
            let mut scratch = match self.alloc.allocate(bytes) {
                Ok(block) => block,
                Err(e) => {
                    self.metrics.failed_allocations += 1;
                    return Err(e.into());
                }
            };
            let es = self.buf.element_size();
            sort::merge_sort(self.buf.slots_mut(0..self.len), &mut scratch, es, cmp);
            self.alloc.release(scratch);
        }
        self.metrics.sort_calls += 1;
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────

    /// Shared body of `insert` and `insert_block`.
    fn insert_slots(
        &mut self,
        index: usize,
        block: &[u8],
        count: usize,
        growth: Growth,
    ) -> Result<(), SeqError> {
        self.check_index(index)?;
        let required = self.required_len(count)?;
        let gap = index..index + count;

        if required > self.capacity() {
            // Three-part copy: prefix, new elements, tail.
            let mut next = self.acquire_grown(growth, required)?;
            next.slots_mut(0..index)
                .copy_from_slice(self.buf.slots(0..index));
            next.slots_mut(gap.clone()).copy_from_slice(block);
            next.slots_mut(gap.end..required)
                .copy_from_slice(self.buf.slots(index..self.len));
            self.install(next);
        } else {
            self.buf.move_slots(index..self.len, gap.end);
            self.buf.slots_mut(gap).copy_from_slice(block);
        }
        self.len = required;
        Ok(())
    }

    /// Remove the slots in `range` and apply shrink-on-demand.
    ///
    /// The shrunk buffer is allocated before anything moves; the surviving
    /// elements are then copied into it around the removed range.
    fn remove_slots(&mut self, range: Range<usize>) -> Result<(), SeqError> {
        let new_len = self.len - range.len();

        if let Some(target) = growth::after_removal(self.capacity(), new_len) {
            let mut next = self.acquire(target)?;
            next.slots_mut(0..range.start)
                .copy_from_slice(self.buf.slots(0..range.start));
            next.slots_mut(range.start..new_len)
                .copy_from_slice(self.buf.slots(range.end..self.len));
            self.install(next);
        } else {
            self.buf.move_slots(range.end..self.len, range.start);
        }
        self.len = new_len;
        Ok(())
    }

    /// Allocate a buffer of `capacity` slots without installing it.
    fn acquire(&mut self, capacity: usize) -> Result<SlotBuffer, SeqError> {
        let es = self.element_size();
        let bytes = capacity
            .checked_mul(es)
            .ok_or(SeqError::AllocationFailed {
                requested: usize::MAX,
            })?;
        match self.alloc.allocate(bytes) {
            Ok(block) => Ok(SlotBuffer::from_block(block, es)),
            Err(e) => {
                self.metrics.failed_allocations += 1;
                Err(e.into())
            }
        }
    }

    /// Allocate a grown buffer able to hold `required` slots.
    fn acquire_grown(&mut self, growth: Growth, required: usize) -> Result<SlotBuffer, SeqError> {
        let target = growth
            .target(self.capacity(), required)
            .ok_or(SeqError::AllocationFailed {
                requested: usize::MAX,
            })?;
        self.acquire(target)
    }

    /// Swap in `next` and hand the old block back to the allocator.
    fn install(&mut self, next: SlotBuffer) {
        let old_capacity = self.capacity();
        let mut old = std::mem::replace(&mut self.buf, next);
        self.metrics.record_resize(old_capacity, self.buf.capacity());
        self.alloc.release(old.take_block());
    }

    fn required_len(&self, count: usize) -> Result<usize, SeqError> {
        self.len.checked_add(count).ok_or(SeqError::AllocationFailed {
            requested: usize::MAX,
        })
    }

    fn check_index(&self, index: usize) -> Result<(), SeqError> {
        if index < self.len {
            Ok(())
        } else {
            Err(SeqError::IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }

    fn check_element(&self, value: &[u8]) -> Result<(), SeqError> {
        if value.len() == self.element_size() {
            Ok(())
        } else {
            Err(SeqError::InvalidArgument {
                reason: "value width differs from element_size",
            })
        }
    }

    /// Element count of a block, rejecting empty or ragged blocks.
    fn check_block(&self, block: &[u8]) -> Result<usize, SeqError> {
        let es = self.element_size();
        if block.is_empty() {
            return Err(SeqError::InvalidArgument {
                reason: "block length must be non-zero",
            });
        }
        if block.len() % es != 0 {
            return Err(SeqError::InvalidArgument {
                reason: "block length is not a multiple of element_size",
            });
        }
        Ok(block.len() / es)
    }
}

impl<A: BufferAllocator> Drop for ByteSeq<A> {
    fn drop(&mut self) {
        let block = self.buf.take_block();
        self.alloc.release(block);
    }
}

impl<A: BufferAllocator> fmt::Debug for ByteSeq<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteSeq")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("element_size", &self.element_size())
            .finish()
    }
}

impl<'a, A: BufferAllocator> IntoIterator for &'a ByteSeq<A> {
    type Item = &'a [u8];
    type IntoIter = ChunksExact<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
