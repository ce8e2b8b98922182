//! Sequence configuration parameters.

use crate::error::ConfigError;

/// Creation-time configuration for a sequence container.
///
/// `element_size` is fixed for the container's lifetime. `capacity` is a
/// hint for the initial slot count: zero selects
/// [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY), and anything below
/// [`MIN_CAPACITY`](Self::MIN_CAPACITY) is raised to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeqConfig {
    /// Byte width of one element. Must be non-zero.
    pub element_size: usize,

    /// Requested initial slot count. Zero means "use the default".
    pub capacity: usize,
}

impl SeqConfig {
    /// Smallest slot count a live container ever holds.
    ///
    /// Shrinking (explicit or on removal) never goes below this.
    pub const MIN_CAPACITY: usize = 4;

    /// Slot count used when `capacity` is zero.
    pub const DEFAULT_CAPACITY: usize = Self::MIN_CAPACITY;

    /// Configuration for `element_size`-byte elements with the default capacity.
    pub fn new(element_size: usize) -> Self {
        Self {
            element_size,
            capacity: 0,
        }
    }

    /// Set the requested initial slot count.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Slot count the container is actually created with.
    pub fn resolved_capacity(&self) -> usize {
        if self.capacity == 0 {
            Self::DEFAULT_CAPACITY
        } else {
            self.capacity.max(Self::MIN_CAPACITY)
        }
    }

    /// Size of the initial buffer in bytes, or `None` on overflow.
    pub fn buffer_bytes(&self) -> Option<usize> {
        self.resolved_capacity().checked_mul(self.element_size)
    }

    /// Check the structural invariants of this configuration.
    ///
    /// The byte size must also fit in `isize`, which is the hard ceiling
    /// for any Rust allocation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.element_size == 0 {
            return Err(ConfigError::ZeroElementSize);
        }
        match self.buffer_bytes() {
            Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
            _ => Err(ConfigError::ByteSizeOverflow {
                capacity: self.resolved_capacity(),
                element_size: self.element_size,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_resolves_to_default() {
        let config = SeqConfig::new(4);
        assert_eq!(config.resolved_capacity(), 4);
        assert_eq!(config.buffer_bytes(), Some(16));
    }

    #[test]
    fn small_capacity_is_raised_to_minimum() {
        let config = SeqConfig::new(8).with_capacity(2);
        assert_eq!(config.resolved_capacity(), SeqConfig::MIN_CAPACITY);
    }

    #[test]
    fn large_capacity_preserved() {
        let config = SeqConfig::new(2).with_capacity(100);
        assert_eq!(config.resolved_capacity(), 100);
        assert_eq!(config.buffer_bytes(), Some(200));
    }

    #[test]
    fn zero_element_size_rejected() {
        assert_eq!(
            SeqConfig::new(0).validate(),
            Err(ConfigError::ZeroElementSize)
        );
    }

    #[test]
    fn overflowing_byte_size_rejected() {
        let config = SeqConfig::new(usize::MAX / 2).with_capacity(16);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ByteSizeOverflow { capacity: 16, .. })
        ));
    }

    #[test]
    fn byte_size_above_isize_max_rejected() {
        let config = SeqConfig::new(1).with_capacity(isize::MAX as usize + 1);
        assert!(config.validate().is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_config() -> impl Strategy<Value = SeqConfig> {
            let element_size = prop_oneof![0usize..64, any::<usize>()];
            let capacity = prop_oneof![0usize..1_024, any::<usize>()];
            (element_size, capacity).prop_map(|(e, c)| SeqConfig::new(e).with_capacity(c))
        }

        proptest! {
            #[test]
            fn resolved_capacity_never_below_minimum(config in any_config()) {
                let resolved = config.resolved_capacity();
                prop_assert!(resolved >= SeqConfig::MIN_CAPACITY);
                if config.capacity >= SeqConfig::MIN_CAPACITY {
                    prop_assert_eq!(resolved, config.capacity);
                }
            }

            #[test]
            fn validate_accepts_exactly_representable_buffers(config in any_config()) {
                let fits = config.element_size != 0
                    && config
                        .buffer_bytes()
                        .is_some_and(|bytes| bytes <= isize::MAX as usize);
                prop_assert_eq!(config.validate().is_ok(), fits);
            }
        }
    }
}
