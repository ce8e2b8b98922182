//! Compile-time typed front end over [`ByteSeq`].
//!
//! [`Seq<T>`] stores `T: Pod` values in a [`ByteSeq`] whose element size is
//! `size_of::<T>()`, so the capacity policy and allocator seam are shared
//! with the byte variant. Elements are read back by value because the
//! underlying block carries no alignment guarantee for `T`.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use bytemuck::Pod;
use ductile_core::{BufferAllocator, SeqConfig, SeqError, SeqMetrics, SystemAllocator};

use crate::seq::ByteSeq;

/// A growable sequence of plain-old-data values.
pub struct Seq<T: Pod, A: BufferAllocator = SystemAllocator> {
    inner: ByteSeq<A>,
    _marker: PhantomData<T>,
}

impl<T: Pod> Seq<T, SystemAllocator> {
    /// Empty sequence with the default capacity.
    ///
    /// # Errors
    ///
    /// [`SeqError::Config`] if `T` is zero-sized.
    pub fn new() -> Result<Self, SeqError> {
        Self::with_capacity(0)
    }

    /// Empty sequence with room for `capacity` values (at least the minimum).
    pub fn with_capacity(capacity: usize) -> Result<Self, SeqError> {
        Self::with_allocator(capacity, SystemAllocator)
    }
}

impl<T: Pod, A: BufferAllocator> Seq<T, A> {
    /// Empty sequence whose buffers come from `alloc`.
    pub fn with_allocator(capacity: usize, alloc: A) -> Result<Self, SeqError> {
        let config = SeqConfig::new(std::mem::size_of::<T>()).with_capacity(capacity);
        Ok(Self {
            inner: ByteSeq::with_allocator(config, alloc)?,
            _marker: PhantomData,
        })
    }

    /// The underlying byte container.
    pub fn as_byte_seq(&self) -> &ByteSeq<A> {
        &self.inner
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Cumulative resize counters.
    pub fn metrics(&self) -> &SeqMetrics {
        self.inner.metrics()
    }

    /// Value at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.get(index).map(bytemuck::pod_read_unaligned)
    }

    /// First value, or `None` when empty.
    pub fn front(&self) -> Option<T> {
        self.inner.front().map(bytemuck::pod_read_unaligned)
    }

    /// Last value, or `None` when empty.
    pub fn back(&self) -> Option<T> {
        self.inner.back().map(bytemuck::pod_read_unaligned)
    }

    /// Iterate values in index order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.inner.iter().map(bytemuck::pod_read_unaligned)
    }

    /// Copy the values into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Append one value.
    pub fn push_back(&mut self, value: T) -> Result<(), SeqError> {
        self.inner.push_back(bytemuck::bytes_of(&value))
    }

    /// Prepend one value.
    pub fn push_front(&mut self, value: T) -> Result<(), SeqError> {
        self.inner.push_front(bytemuck::bytes_of(&value))
    }

    /// Append a non-empty slice of values.
    pub fn push_back_slice(&mut self, values: &[T]) -> Result<(), SeqError> {
        self.inner.push_back_block(bytemuck::cast_slice(values))
    }

    /// Insert before the value at `index` (`index < len()`).
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), SeqError> {
        self.inner.insert(index, bytemuck::bytes_of(&value))
    }

    /// Insert a non-empty slice before the value at `index` (`index < len()`).
    pub fn insert_slice(&mut self, index: usize, values: &[T]) -> Result<(), SeqError> {
        self.inner.insert_block(index, bytemuck::cast_slice(values))
    }

    /// Overwrite the value at `index`.
    pub fn modify(&mut self, index: usize, value: T) -> Result<(), SeqError> {
        self.inner.modify(index, bytemuck::bytes_of(&value))
    }

    /// Remove the value at `index`.
    pub fn remove(&mut self, index: usize) -> Result<(), SeqError> {
        self.inner.remove(index)
    }

    /// Remove `count` values starting at `index`.
    pub fn remove_range(&mut self, index: usize, count: usize) -> Result<(), SeqError> {
        self.inner.remove_block(index, count)
    }

    /// Remove the last value (no-op when empty).
    pub fn pop_back(&mut self) -> Result<(), SeqError> {
        self.inner.pop_back()
    }

    /// Remove the first value (no-op when empty).
    pub fn pop_front(&mut self) -> Result<(), SeqError> {
        self.inner.pop_front()
    }

    /// Remove every value and return to the minimum capacity.
    pub fn clear(&mut self) -> Result<(), SeqError> {
        self.inner.clear()
    }

    /// Fit capacity to the current length (never below the minimum).
    pub fn shrink(&mut self) -> Result<(), SeqError> {
        self.inner.shrink()
    }

    /// Stable sort by `cmp`.
    pub fn sort_by<F>(&mut self, mut cmp: F) -> Result<(), SeqError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.inner.sort(|a, b| {
            let a: T = bytemuck::pod_read_unaligned(a);
            let b: T = bytemuck::pod_read_unaligned(b);
            cmp(&a, &b)
        })
    }

    /// Index of the first value `v` with `cmp(v, target) == Equal`.
    pub fn find_by<F>(&self, target: &T, mut cmp: F) -> Result<usize, SeqError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.inner.find(bytemuck::bytes_of(target), |element, _| {
            let element: T = bytemuck::pod_read_unaligned(element);
            cmp(&element, target)
        })
    }

    /// Visit each value as `(Some(value), index, len)`; an empty sequence
    /// yields one `(None, 0, 0)` call.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(Option<T>, usize, usize),
    {
        self.inner.for_each(|element, index, len| {
            visitor(element.map(bytemuck::pod_read_unaligned), index, len);
        });
    }
}

impl<T: Pod + Ord, A: BufferAllocator> Seq<T, A> {
    /// Stable sort in ascending order.
    pub fn sort(&mut self) -> Result<(), SeqError> {
        self.sort_by(T::cmp)
    }

    /// Index of the first value equal to `target`.
    pub fn find(&self, target: &T) -> Result<usize, SeqError> {
        self.find_by(target, T::cmp)
    }
}

impl<T: Pod + fmt::Debug, A: BufferAllocator> fmt::Debug for Seq<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
