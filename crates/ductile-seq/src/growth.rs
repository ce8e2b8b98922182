//! Capacity policy.
//!
//! Pure functions deciding when and to what size the container's buffer is
//! reallocated. Growth only fires at 100% utilisation and shrink-on-demand
//! only below 50%, so alternating push/pop at a boundary never thrashes.
//!
//! | Trigger | New capacity |
//! |---------|--------------|
//! | single-element insert at `len == capacity` | `2 * capacity` |
//! | block insert needing more room | `max(2 * capacity, 2 * (len + count))` |
//! | removal leaving `capacity > 2 * len` | `max(capacity / 2, MIN)` |
//! | explicit shrink | `max(len, MIN)` |
//! | clear | `MIN` |
//!
//! Every shrink rule is gated on `capacity > MIN`. All functions return
//! `None` when no reallocation is needed (or, for growth, on overflow).

use ductile_core::SeqConfig;

const MIN: usize = SeqConfig::MIN_CAPACITY;

/// Which growth rule an insertion uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Growth {
    /// One element: double the capacity.
    Single,
    /// A block: room for twice the post-insert length.
    Block,
}

impl Growth {
    /// Capacity for a buffer that must hold `required` slots.
    ///
    /// Only meaningful when `required > capacity`. Returns `None` if the
    /// target overflows `usize`.
    pub(crate) fn target(self, capacity: usize, required: usize) -> Option<usize> {
        debug_assert!(required > capacity);
        match self {
            Self::Single => capacity.checked_mul(2),
            Self::Block => {
                let doubled = capacity.checked_mul(2)?;
                let room = required.checked_mul(2)?;
                Some(doubled.max(room))
            }
        }
    }
}

/// Shrink-on-demand target after a removal leaves `len` live slots.
pub(crate) fn after_removal(capacity: usize, len: usize) -> Option<usize> {
    let under_half = len.checked_mul(2).is_some_and(|used| capacity > used);
    if capacity > MIN && under_half {
        Some((capacity / 2).max(MIN))
    } else {
        None
    }
}

/// Tight-fit target for an explicit shrink.
pub(crate) fn fit(capacity: usize, len: usize) -> Option<usize> {
    if capacity > MIN && capacity > len {
        Some(len.max(MIN))
    } else {
        None
    }
}

/// Target after clearing all elements.
pub(crate) fn after_clear(capacity: usize) -> Option<usize> {
    (capacity > MIN).then_some(MIN)
}
