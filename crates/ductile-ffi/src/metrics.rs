//! C-compatible resize counters.

use ductile_seq::ByteSeq;

use crate::status::DuctileStatus;
use crate::vector::with_vector;

/// Snapshot of a container's size and cumulative resize counters.
///
/// Every field is a fixed-width `u64` for ABI portability (not `usize`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DuctileMetrics {
    /// Live element count.
    pub len: u64,
    /// Allocated slot count.
    pub capacity: u64,
    /// Bytes held by the current buffer.
    pub memory_bytes: u64,
    /// Reallocations that increased capacity.
    pub grow_events: u64,
    /// Reallocations that decreased capacity.
    pub shrink_events: u64,
    /// Allocation requests the allocator refused.
    pub failed_allocations: u64,
    /// Completed sort calls.
    pub sort_calls: u64,
    /// Largest capacity ever held, in slots.
    pub peak_capacity: u64,
}

// Compile-time layout assertions for ABI stability.
const _: () = assert!(std::mem::size_of::<DuctileMetrics>() == 64);
const _: () = assert!(std::mem::align_of::<DuctileMetrics>() == 8);

impl DuctileMetrics {
    pub(crate) fn from_seq(seq: &ByteSeq) -> Self {
        let m = seq.metrics();
        Self {
            len: seq.len() as u64,
            capacity: seq.capacity() as u64,
            memory_bytes: seq.memory_bytes() as u64,
            grow_events: m.grow_events,
            shrink_events: m.shrink_events,
            failed_allocations: m.failed_allocations,
            sort_calls: m.sort_calls,
            peak_capacity: m.peak_capacity as u64,
        }
    }
}

/// Write the container's current metrics to `metrics_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_metrics(handle: u64, metrics_out: *mut DuctileMetrics) -> i32 {
    ffi_guard!({
        if metrics_out.is_null() {
            return DuctileStatus::InvalidArgument as i32;
        }
        with_vector(handle, |seq| {
            let m = DuctileMetrics::from_seq(seq);
            // SAFETY: metrics_out is valid per caller contract.
            unsafe { *metrics_out = m };
            DuctileStatus::Ok as i32
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuctileConfig;
    use crate::vector::{
        ductile_vector_create, ductile_vector_destroy, ductile_vector_pop_back,
        ductile_vector_push_back, ductile_vector_sort, DuctileCompareFn,
    };
    use std::ffi::c_void;

    #[allow(unsafe_code)]
    unsafe extern "C" fn cmp_u8(a: *const c_void, b: *const c_void) -> i32 {
        let (a, b) = unsafe { (*a.cast::<u8>(), *b.cast::<u8>()) };
        i32::from(a) - i32::from(b)
    }

    fn metrics(h: u64) -> DuctileMetrics {
        let mut m = DuctileMetrics::default();
        assert_eq!(ductile_vector_metrics(h, &mut m), 0);
        m
    }

    #[test]
    fn counters_follow_resizes() {
        let config = DuctileConfig {
            element_size: 1,
            capacity: 0,
        };
        let mut h = 0u64;
        assert_eq!(ductile_vector_create(&config, &mut h), 0);

        let fresh = metrics(h);
        assert_eq!(fresh.capacity, 4);
        assert_eq!(fresh.peak_capacity, 4);
        assert_eq!(fresh.memory_bytes, 4);

        for v in (0u8..9).rev() {
            assert_eq!(ductile_vector_push_back(h, (&v as *const u8).cast()), 0);
        }
        let cmp: DuctileCompareFn = cmp_u8;
        assert_eq!(ductile_vector_sort(h, Some(cmp)), 0);
        for _ in 0..5 {
            ductile_vector_pop_back(h);
        }

        let m = metrics(h);
        assert_eq!(m.len, 4);
        assert_eq!(m.grow_events, 2);
        assert_eq!(m.peak_capacity, 16);
        assert_eq!(m.shrink_events, 1);
        assert_eq!(m.capacity, 8);
        assert_eq!(m.sort_calls, 1);
        assert_eq!(m.failed_allocations, 0);

        ductile_vector_destroy(h);
    }

    #[test]
    fn null_out_and_stale_handle() {
        assert_eq!(
            ductile_vector_metrics(0, std::ptr::null_mut()),
            DuctileStatus::InvalidArgument as i32
        );
        let mut m = DuctileMetrics::default();
        assert_eq!(
            ductile_vector_metrics(0, &mut m),
            DuctileStatus::InvalidHandle as i32
        );
    }
}
