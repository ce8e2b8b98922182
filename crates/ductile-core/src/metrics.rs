//! Cumulative resize counters for a sequence container.
//!
//! [`SeqMetrics`] is updated in place by every operation that touches the
//! allocator, so callers can audit reallocation churn without wrapping the
//! allocator themselves.

/// Counters collected over a container's lifetime.
///
/// All fields are cumulative since creation. `clear()` does not reset them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeqMetrics {
    /// Reallocations that increased capacity.
    pub grow_events: u64,
    /// Reallocations that decreased capacity (clear, shrink, or
    /// shrink-on-demand after removal).
    pub shrink_events: u64,
    /// Allocation requests the allocator refused.
    pub failed_allocations: u64,
    /// Completed sort calls.
    pub sort_calls: u64,
    /// Largest capacity (in slots) ever held.
    pub peak_capacity: usize,
}

impl SeqMetrics {
    /// Fresh counters for a container created with `capacity` slots.
    pub fn with_initial_capacity(capacity: usize) -> Self {
        Self {
            peak_capacity: capacity,
            ..Self::default()
        }
    }

    /// Record a successful capacity change from `old` to `new` slots.
    pub fn record_resize(&mut self, old: usize, new: usize) {
        if new > old {
            self.grow_events += 1;
        } else if new < old {
            self.shrink_events += 1;
        }
        self.peak_capacity = self.peak_capacity.max(new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = SeqMetrics::default();
        assert_eq!(m.grow_events, 0);
        assert_eq!(m.shrink_events, 0);
        assert_eq!(m.failed_allocations, 0);
        assert_eq!(m.sort_calls, 0);
        assert_eq!(m.peak_capacity, 0);
    }

    #[test]
    fn resize_direction_is_classified() {
        let mut m = SeqMetrics::with_initial_capacity(4);
        m.record_resize(4, 8);
        m.record_resize(8, 16);
        m.record_resize(16, 8);
        assert_eq!(m.grow_events, 2);
        assert_eq!(m.shrink_events, 1);
        assert_eq!(m.peak_capacity, 16);
    }

    #[test]
    fn same_size_resize_counts_nothing() {
        let mut m = SeqMetrics::with_initial_capacity(4);
        m.record_resize(4, 4);
        assert_eq!(m, SeqMetrics::with_initial_capacity(4));
    }
}
