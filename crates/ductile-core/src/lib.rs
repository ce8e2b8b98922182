//! Core types for the Ductile sequence container.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! pieces shared by every layer of the workspace: creation-time
//! configuration, the error taxonomy, the allocator seam, and the
//! cumulative resize counters.
//!
//! The container itself lives in `ductile-seq`; the C surface in
//! `ductile-ffi`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod config;
pub mod error;
pub mod metrics;

pub use allocator::{BufferAllocator, SystemAllocator};
pub use config::SeqConfig;
pub use error::{AllocError, ConfigError, ErrorKind, SeqError};
pub use metrics::SeqMetrics;
