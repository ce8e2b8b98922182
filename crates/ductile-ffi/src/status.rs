//! C-compatible status codes.
//!
//! [`DuctileStatus`] is a `repr(i32)` enum covering every error a container
//! operation can report, plus the conditions that only exist at the C
//! boundary (stale handles, poisoned locks, caught panics).

use ductile_core::{ErrorKind, SeqError};

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuctileStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// An argument is null, the wrong width, or otherwise invalid.
    InvalidArgument = -2,
    /// An index or index range lies outside the live elements.
    IndexOutOfRange = -3,
    /// A growth, shrink, or sort-buffer allocation failed. The container
    /// is unchanged.
    AllocationFailed = -4,
    /// A search matched no element.
    NotFound = -5,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -6,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<ErrorKind> for DuctileStatus {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidArgument => DuctileStatus::InvalidArgument,
            ErrorKind::IndexOutOfRange => DuctileStatus::IndexOutOfRange,
            ErrorKind::AllocationFailure => DuctileStatus::AllocationFailed,
            ErrorKind::NotFound => DuctileStatus::NotFound,
        }
    }
}

impl From<&SeqError> for DuctileStatus {
    fn from(e: &SeqError) -> Self {
        DuctileStatus::from(e.kind())
    }
}

/// Collapse an operation result into a status code.
pub(crate) fn status_of<T>(result: Result<T, SeqError>) -> i32 {
    match result {
        Ok(_) => DuctileStatus::Ok as i32,
        Err(e) => DuctileStatus::from(&e) as i32,
    }
}
