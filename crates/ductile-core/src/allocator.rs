//! The allocator seam.
//!
//! The container never talks to the heap directly. Every buffer it owns is
//! obtained from a [`BufferAllocator`] and handed back to the same
//! allocator when it is replaced or the container is dropped. Embedded
//! targets plug in a pool or budgeted allocator here; hosted builds use
//! [`SystemAllocator`].
//!
//! Blocks are plain `Vec<u8>` whose length equals the requested byte
//! count. Non-overlapping copies between blocks use `copy_from_slice`;
//! overlap-safe moves inside a block use `copy_within`.

use crate::error::AllocError;

/// Source of raw byte blocks for container buffers.
///
/// Implementations must return a block whose `len()` is exactly `bytes`,
/// or an [`AllocError`]. Failure must be reported, never papered over by
/// falling back to another allocator.
pub trait BufferAllocator {
    /// Obtain a block of exactly `bytes` bytes.
    fn allocate(&mut self, bytes: usize) -> Result<Vec<u8>, AllocError>;

    /// Return a block previously obtained from [`allocate`](Self::allocate).
    ///
    /// The default implementation simply drops it.
    fn release(&mut self, block: Vec<u8>) {
        drop(block);
    }
}

impl<A: BufferAllocator + ?Sized> BufferAllocator for &mut A {
    fn allocate(&mut self, bytes: usize) -> Result<Vec<u8>, AllocError> {
        (**self).allocate(bytes)
    }

    fn release(&mut self, block: Vec<u8>) {
        (**self).release(block);
    }
}

/// Allocator backed by the global heap.
///
/// Uses `try_reserve_exact`, so exhaustion surfaces as an [`AllocError`]
/// instead of aborting the process.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAllocator;

impl BufferAllocator for SystemAllocator {
    fn allocate(&mut self, bytes: usize) -> Result<Vec<u8>, AllocError> {
        let mut block = Vec::new();
        block
            .try_reserve_exact(bytes)
            .map_err(|_| AllocError { requested: bytes })?;
        block.resize(bytes, 0);
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_allocator_returns_exact_length() {
        let block = SystemAllocator.allocate(37).unwrap();
        assert_eq!(block.len(), 37);
        assert!(block.iter().all(|&b| b == 0));
    }

    #[test]
    fn system_allocator_zero_bytes_is_valid() {
        let block = SystemAllocator.allocate(0).unwrap();
        assert!(block.is_empty());
    }

    #[test]
    fn system_allocator_reports_impossible_request() {
        let result = SystemAllocator.allocate(usize::MAX);
        assert_eq!(
            result,
            Err(AllocError {
                requested: usize::MAX
            })
        );
    }

    #[test]
    fn mutable_reference_forwards() {
        fn round_trip<A: BufferAllocator>(mut alloc: A) -> usize {
            let block = alloc.allocate(8).unwrap();
            let len = block.len();
            alloc.release(block);
            len
        }
        let mut inner = SystemAllocator;
        assert_eq!(round_trip(&mut inner), 8);
    }
}
