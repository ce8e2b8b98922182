//! Ductile: a type-agnostic growable sequence container.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Ductile sub-crates. For most users, adding `ductile` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ductile::prelude::*;
//!
//! // Byte-level: the element type is opaque, only its width matters.
//! let mut seq = ByteSeq::new(SeqConfig::new(4)).unwrap();
//! for v in [3i32, 1, 2] {
//!     seq.push_back(&v.to_le_bytes()).unwrap();
//! }
//! seq.sort(|a, b| {
//!     let a = i32::from_le_bytes(a.try_into().unwrap());
//!     let b = i32::from_le_bytes(b.try_into().unwrap());
//!     a.cmp(&b)
//! })
//! .unwrap();
//! assert_eq!(seq.front(), Some(&1i32.to_le_bytes()[..]));
//!
//! // Typed: same container and capacity policy, values by copy.
//! let mut typed = Seq::<u16>::new().unwrap();
//! typed.push_back_slice(&[9, 8, 7, 6, 5]).unwrap();
//! assert_eq!(typed.capacity(), 10);
//! typed.remove_range(0, 3).unwrap();
//! assert_eq!(typed.to_vec(), vec![6, 5]);
//! assert_eq!(typed.capacity(), 5);
//!
//! // Errors carry a coarse kind for callers that only branch on category.
//! let err = typed.insert(2, 0).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`crate::core`] | `ductile-core` | Configuration, errors, allocator seam, metrics |
//! | [`seq`] | `ductile-seq` | `ByteSeq` and the typed `Seq<T>` |
//!
//! The C interface lives in the separate `ductile-ffi` crate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Configuration, errors, allocator seam, and metrics (`ductile-core`).
///
/// Implement [`crate::core::BufferAllocator`] to back containers with a custom
/// memory source.
pub use ductile_core as core;

/// The containers (`ductile-seq`).
///
/// [`seq::ByteSeq`] for runtime element widths, [`seq::Seq`] for
/// `bytemuck::Pod` element types.
pub use ductile_seq as seq;

/// Common imports for typical Ductile usage.
///
/// ```rust
/// use ductile::prelude::*;
/// ```
pub mod prelude {
    // Containers
    pub use ductile_seq::{ByteSeq, Seq};

    // Configuration and allocation
    pub use ductile_core::{BufferAllocator, SeqConfig, SystemAllocator};

    // Errors and counters
    pub use ductile_core::{AllocError, ErrorKind, SeqError, SeqMetrics};
}
