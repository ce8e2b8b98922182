//! Test utilities for Ductile development.
//!
//! Provides instrumented [`BufferAllocator`] implementations
//! ([`CountingAllocator`], [`FailingAllocator`]) and small fixtures for
//! `i32` payloads in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use ductile_core::{AllocError, BufferAllocator, SystemAllocator};

pub use fixtures::{block_i32, bytes_i32, cmp_i32, i32_at};

/// Shared counters observed by a [`CountingAllocator`].
///
/// Cloning shares the counters, so a test keeps one handle while the
/// allocator moves into the container.
#[derive(Clone, Debug, Default)]
pub struct AllocStats {
    allocations: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
    live_bytes: Arc<AtomicUsize>,
}

impl AllocStats {
    /// Successful `allocate` calls so far.
    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::Relaxed)
    }

    /// `release` calls so far.
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::Relaxed)
    }

    /// Bytes handed out and not yet released.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::Relaxed)
    }
}

/// Heap allocator that counts every block it hands out and takes back.
#[derive(Debug, Default)]
pub struct CountingAllocator {
    stats: AllocStats,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle on the shared counters.
    pub fn stats(&self) -> AllocStats {
        self.stats.clone()
    }
}

impl BufferAllocator for CountingAllocator {
    fn allocate(&mut self, bytes: usize) -> Result<Vec<u8>, AllocError> {
        let block = SystemAllocator.allocate(bytes)?;
        self.stats.allocations.fetch_add(1, Ordering::Relaxed);
        self.stats.live_bytes.fetch_add(bytes, Ordering::Relaxed);
        Ok(block)
    }

    fn release(&mut self, block: Vec<u8>) {
        self.stats.releases.fetch_add(1, Ordering::Relaxed);
        self.stats
            .live_bytes
            .fetch_sub(block.len(), Ordering::Relaxed);
    }
}

/// Remote control for a [`FailingAllocator`].
#[derive(Clone, Debug, Default)]
pub struct FailSwitch {
    failing: Arc<AtomicBool>,
}

impl FailSwitch {
    /// Refuse every allocation from now on.
    pub fn fail_from_now(&self) {
        self.failing.store(true, Ordering::Relaxed);
    }

    /// Resume serving allocations.
    pub fn recover(&self) {
        self.failing.store(false, Ordering::Relaxed);
    }
}

/// Heap allocator that refuses requests on demand.
///
/// Either flipped via its [`FailSwitch`] or configured with
/// [`after`](Self::after) to serve a fixed number of blocks and then fail.
#[derive(Debug, Default)]
pub struct FailingAllocator {
    switch: FailSwitch,
    remaining: Option<usize>,
}

impl FailingAllocator {
    /// Serve every request until the switch is flipped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `successes` requests, then refuse all later ones.
    pub fn after(successes: usize) -> Self {
        Self {
            switch: FailSwitch::default(),
            remaining: Some(successes),
        }
    }

    /// A handle that can flip this allocator into failure mode.
    pub fn switch(&self) -> FailSwitch {
        self.switch.clone()
    }
}

impl BufferAllocator for FailingAllocator {
    fn allocate(&mut self, bytes: usize) -> Result<Vec<u8>, AllocError> {
        if self.switch.failing.load(Ordering::Relaxed) {
            return Err(AllocError { requested: bytes });
        }
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return Err(AllocError { requested: bytes });
            }
            *remaining -= 1;
        }
        SystemAllocator.allocate(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_tracks_live_bytes() {
        let mut alloc = CountingAllocator::new();
        let stats = alloc.stats();
        let a = alloc.allocate(16).unwrap();
        let b = alloc.allocate(8).unwrap();
        assert_eq!(stats.allocations(), 2);
        assert_eq!(stats.live_bytes(), 24);
        alloc.release(a);
        alloc.release(b);
        assert_eq!(stats.releases(), 2);
        assert_eq!(stats.live_bytes(), 0);
    }

    #[test]
    fn failing_after_budget() {
        let mut alloc = FailingAllocator::after(1);
        assert!(alloc.allocate(4).is_ok());
        assert_eq!(alloc.allocate(4), Err(AllocError { requested: 4 }));
    }

    #[test]
    fn switch_toggles_failure() {
        let mut alloc = FailingAllocator::new();
        let switch = alloc.switch();
        assert!(alloc.allocate(4).is_ok());
        switch.fail_from_now();
        assert!(alloc.allocate(4).is_err());
        switch.recover();
        assert!(alloc.allocate(4).is_ok());
    }
}
