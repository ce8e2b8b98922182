//! Type-agnostic growable sequence container.
//!
//! A contiguous, growable and shrinkable sequence of fixed-width elements
//! for memory-constrained targets. The element type is opaque: only its
//! byte width matters. Capacity is managed by an explicit, reproducible
//! policy instead of `Vec`'s internal strategy.
//!
//! # Architecture
//!
//! ```text
//! Seq<T: Pod>            (typed front end, by-value reads)
//! └── ByteSeq<A>         (length, metrics, operation logic)
//!     ├── SlotBuffer     (one allocator block, slot-addressed)
//!     ├── growth         (capacity policy: double / halve / fit)
//!     └── sort           (bottom-up stable merge sort, one scratch block)
//! ```
//!
//! # Capacity policy
//!
//! - **Grow** at 100% utilisation: double for single inserts,
//!   `max(2 * capacity, 2 * (len + count))` for blocks.
//! - **Shrink on demand** after removals once `capacity > 2 * len`, to
//!   `max(capacity / 2, 4)`.
//! - Never below four slots.
//!
//! Every reallocation is prepared before the live buffer is touched, so a
//! refused allocation leaves the container unchanged.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod buffer;
mod growth;
pub mod seq;
mod sort;
pub mod typed;

// Public re-exports for the primary API surface.
pub use ductile_core::{
    AllocError, BufferAllocator, ConfigError, ErrorKind, SeqConfig, SeqError, SeqMetrics,
    SystemAllocator,
};
pub use seq::ByteSeq;
pub use typed::Seq;
