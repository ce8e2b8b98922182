//! Benchmark workloads for the Ductile sequence container.
//!
//! Every workload is derived from a seed through `ChaCha8Rng`, so two runs
//! with the same seed touch the same indices in the same order:
//!
//! - [`random_values`]: `i32` payloads for push and sort benchmarks
//! - [`index_walk`]: valid insert/remove positions for a shrinking or
//!   growing sequence
//! - [`filled_seq`]: a `ByteSeq` of `i32` elements ready to be drained

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ductile_core::{SeqConfig, SeqError};
use ductile_seq::ByteSeq;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Element width used by every workload.
pub const ELEMENT_SIZE: usize = std::mem::size_of::<i32>();

/// Sizes swept by the parameterised benchmarks.
pub const SIZES: [usize; 3] = [64, 1_024, 16_384];

/// `n` pseudo-random `i32` values.
pub fn random_values(n: usize, seed: u64) -> Vec<i32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.next_u32() as i32).collect()
}

/// `steps` positions, each valid for a sequence whose length changes by
/// `delta` (+1 for inserts, -1 for removals) after every step.
///
/// Starting length is `start_len`. For inserts the position is in
/// `[0, len)` to match the insert contract; an empty sequence yields 0,
/// which callers route to `push_back`.
pub fn index_walk(start_len: usize, steps: usize, delta: isize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut len = start_len;
    let mut walk = Vec::with_capacity(steps);
    for _ in 0..steps {
        let pos = if len == 0 {
            0
        } else {
            rng.next_u32() as usize % len
        };
        walk.push(pos);
        len = len.saturating_add_signed(delta);
    }
    walk
}

/// A sequence holding `values` as little-endian `i32` elements.
pub fn filled_seq(values: &[i32]) -> Result<ByteSeq, SeqError> {
    let mut seq = ByteSeq::new(SeqConfig::new(ELEMENT_SIZE))?;
    if !values.is_empty() {
        let block: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        seq.push_back_block(&block)?;
    }
    Ok(seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_deterministic() {
        assert_eq!(random_values(32, 7), random_values(32, 7));
        assert_ne!(random_values(32, 7), random_values(32, 8));
    }

    #[test]
    fn removal_walk_stays_in_bounds() {
        let walk = index_walk(100, 100, -1, 3);
        for (step, pos) in walk.iter().enumerate() {
            assert!(*pos < 100 - step);
        }
    }

    #[test]
    fn insert_walk_stays_in_bounds() {
        let walk = index_walk(1, 50, 1, 3);
        for (step, pos) in walk.iter().enumerate() {
            assert!(*pos < 1 + step);
        }
    }

    #[test]
    fn filled_seq_round_trips() {
        let values = random_values(10, 1);
        let seq = filled_seq(&values).unwrap();
        let back: Vec<i32> = seq
            .iter()
            .map(|b| i32::from_le_bytes(b.try_into().unwrap()))
            .collect();
        assert_eq!(back, values);
        assert!(filled_seq(&[]).unwrap().is_empty());
    }
}
