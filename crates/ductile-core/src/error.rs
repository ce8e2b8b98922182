//! Error types for the Ductile sequence container.
//!
//! Every fallible operation returns a [`SeqError`]. Callers that only need
//! the coarse category (for example to map onto a C status code) use
//! [`SeqError::kind`].

use std::error::Error;
use std::fmt;

/// Coarse error category shared by every fallible container operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or malformed input: bad configuration, wrong element width,
    /// zero-length block.
    InvalidArgument,
    /// An index or index range lies outside the live elements.
    IndexOutOfRange,
    /// A growth, shrink, or sort-buffer allocation failed.
    AllocationFailure,
    /// A well-formed search matched no element.
    NotFound,
}

/// Errors returned by container operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeqError {
    /// An argument was malformed.
    InvalidArgument {
        /// What was wrong with the argument.
        reason: &'static str,
    },
    /// `index` (or the end of a block range) is not below the live length.
    IndexOutOfRange {
        /// The offending index or range end.
        index: usize,
        /// Live element count at the time of the call.
        len: usize,
    },
    /// The allocator could not provide a buffer.
    AllocationFailed {
        /// Number of bytes requested.
        requested: usize,
    },
    /// No element matched the search target.
    NotFound,
    /// The creation-time configuration was rejected.
    Config(ConfigError),
}

impl SeqError {
    /// The coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } | Self::Config(_) => ErrorKind::InvalidArgument,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::AllocationFailed { .. } => ErrorKind::AllocationFailure,
            Self::NotFound => ErrorKind::NotFound,
        }
    }
}

impl fmt::Display for SeqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::AllocationFailed { requested } => {
                write!(f, "allocation of {requested} bytes failed")
            }
            Self::NotFound => write!(f, "no matching element"),
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

impl Error for SeqError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AllocError> for SeqError {
    fn from(e: AllocError) -> Self {
        Self::AllocationFailed {
            requested: e.requested,
        }
    }
}

impl From<ConfigError> for SeqError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Failure reported by a [`BufferAllocator`](crate::BufferAllocator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocError {
    /// Number of bytes that could not be provided.
    pub requested: usize,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "allocator refused {} bytes", self.requested)
    }
}

impl Error for AllocError {}

/// Errors detected by [`SeqConfig::validate`](crate::SeqConfig::validate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `element_size` was zero.
    ZeroElementSize,
    /// `capacity * element_size` does not fit in an allocation.
    ByteSizeOverflow {
        /// The resolved slot count.
        capacity: usize,
        /// The configured element width.
        element_size: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroElementSize => write!(f, "element_size must be greater than zero"),
            Self::ByteSizeOverflow {
                capacity,
                element_size,
            } => write!(
                f,
                "{capacity} slots of {element_size} bytes exceed the addressable size"
            ),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_collapse_config_into_invalid_argument() {
        assert_eq!(
            SeqError::Config(ConfigError::ZeroElementSize).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            SeqError::InvalidArgument { reason: "x" }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            SeqError::IndexOutOfRange { index: 3, len: 2 }.kind(),
            ErrorKind::IndexOutOfRange
        );
        assert_eq!(
            SeqError::AllocationFailed { requested: 8 }.kind(),
            ErrorKind::AllocationFailure
        );
        assert_eq!(SeqError::NotFound.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn alloc_error_converts_with_requested_size() {
        let e: SeqError = AllocError { requested: 64 }.into();
        assert_eq!(e, SeqError::AllocationFailed { requested: 64 });
    }

    #[test]
    fn display_mentions_index_and_len() {
        let msg = SeqError::IndexOutOfRange { index: 7, len: 4 }.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains('4'));
    }

    #[test]
    fn config_error_is_error_source() {
        let e = SeqError::Config(ConfigError::ZeroElementSize);
        assert!(e.source().is_some());
        assert!(SeqError::NotFound.source().is_none());
    }
}
