//! Bottom-up merge sort over fixed-width byte elements.
//!
//! The engine is stateless: [`merge_sort`] receives the live bytes, a
//! scratch block of the same length, and a three-way comparator. Runs of
//! width 1, 2, 4, … are merged pairwise through the scratch block and
//! copied back, so the only auxiliary memory is the one block the caller
//! supplies. Ties take the left run's element first, which makes the sort
//! stable.

use std::cmp::Ordering;

/// Sort `data` in place as a sequence of `element_size`-byte elements.
///
/// `scratch` must be at least as long as `data`. `data.len()` must be a
/// multiple of `element_size`.
pub(crate) fn merge_sort<F>(data: &mut [u8], scratch: &mut [u8], element_size: usize, mut cmp: F)
where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    debug_assert!(element_size > 0);
    debug_assert_eq!(data.len() % element_size, 0);
    debug_assert!(scratch.len() >= data.len());

    let n = data.len() / element_size;
    let mut width = 1usize;
    while width < n {
        let mut left = 0usize;
        while left < n {
            let mid = left.saturating_add(width).min(n);
            let right = mid.saturating_add(width).min(n);
            // A trailing lone run is already sorted.
            if mid < right {
                merge(data, scratch, element_size, left, mid, right, &mut cmp);
            }
            left = right;
        }
        width = width.saturating_mul(2);
    }
}

/// Merge the sorted runs `[left, mid)` and `[mid, right)` (slot indices).
fn merge<F>(
    data: &mut [u8],
    scratch: &mut [u8],
    es: usize,
    left: usize,
    mid: usize,
    right: usize,
    cmp: &mut F,
) where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    let (mut i, mut j, mut out) = (left, mid, 0usize);

    while i < mid && j < right {
        let a = &data[i * es..(i + 1) * es];
        let b = &data[j * es..(j + 1) * es];
        let src = if cmp(a, b) != Ordering::Greater {
            i += 1;
            a
        } else {
            j += 1;
            b
        };
        scratch[out * es..(out + 1) * es].copy_from_slice(src);
        out += 1;
    }

    // At most one of these tails is non-empty.
    let rest = if i < mid { i..mid } else { j..right };
    let rest_bytes = (rest.end - rest.start) * es;
    scratch[out * es..out * es + rest_bytes]
        .copy_from_slice(&data[rest.start * es..rest.end * es]);

    let total = (right - left) * es;
    data[left * es..right * es].copy_from_slice(&scratch[..total]);
}
