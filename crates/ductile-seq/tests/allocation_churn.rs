//! Integration test: reallocation churn and leak accounting.
//!
//! Drives containers through long push/pop workloads with instrumented
//! allocators. Oscillating at a capacity boundary must not reallocate on
//! every call, and every block handed out must come back on drop.

use ductile_seq::{ByteSeq, ErrorKind, SeqConfig};
use ductile_test_utils::{
    block_i32, bytes_i32, cmp_i32, i32_at, CountingAllocator, FailingAllocator,
};

fn contents<A: ductile_seq::BufferAllocator>(seq: &ByteSeq<A>) -> Vec<i32> {
    seq.iter().map(i32_at).collect()
}

#[test]
fn boundary_oscillation_does_not_thrash() {
    let alloc = CountingAllocator::new();
    let stats = alloc.stats();
    let config = SeqConfig::new(4).with_capacity(8);
    let mut seq = ByteSeq::with_allocator(config, alloc).unwrap();

    // Fill exactly to capacity 8.
    seq.push_back_block(&block_i32(&[0, 1, 2, 3, 4, 5, 6, 7]))
        .unwrap();
    assert_eq!(seq.capacity(), 8);
    let capacity = seq.capacity();
    let baseline = stats.allocations();

    // Push one past the boundary (grow), then pop back and forth. Growth
    // fires only at 100% and shrink only below 50%, so after the first
    // growth nothing else reallocates.
    seq.push_back(&bytes_i32(8)).unwrap();
    for i in 0..1000 {
        seq.pop_back().unwrap();
        seq.push_back(&bytes_i32(i)).unwrap();
    }
    assert_eq!(stats.allocations(), baseline + 1);
    assert!(seq.capacity() > capacity);
}

#[test]
fn long_workload_returns_every_block() {
    let alloc = CountingAllocator::new();
    let stats = alloc.stats();
    {
        let mut seq = ByteSeq::with_allocator(SeqConfig::new(4), alloc).unwrap();
        for round in 0..50 {
            for v in 0..round * 10 {
                seq.push_back(&bytes_i32(v)).unwrap();
            }
            seq.sort(cmp_i32).unwrap();
            while !seq.is_empty() {
                seq.pop_front().unwrap();
            }
            assert_eq!(seq.capacity(), SeqConfig::MIN_CAPACITY);
        }
        assert!(seq.metrics().grow_events > 0);
        assert!(seq.metrics().shrink_events > 0);
    }
    assert_eq!(stats.allocations(), stats.releases());
    assert_eq!(stats.live_bytes(), 0);
}

#[test]
fn memory_stays_within_twice_live_data() {
    let mut seq = ByteSeq::new(SeqConfig::new(4)).unwrap();
    seq.push_back_block(&block_i32(&(0..1024).collect::<Vec<_>>()))
        .unwrap();
    while seq.len() > 10 {
        seq.remove(seq.len() / 2).unwrap();
        assert!(seq.capacity() <= 2 * seq.len().max(SeqConfig::MIN_CAPACITY));
    }
    assert_eq!(seq.capacity(), 16);
}

#[test]
fn failures_never_corrupt_elements() {
    let alloc = FailingAllocator::new();
    let switch = alloc.switch();
    let mut seq = ByteSeq::with_allocator(SeqConfig::new(4), alloc).unwrap();
    seq.push_back_block(&block_i32(&[5, 4, 3, 2])).unwrap();
    let before = contents(&seq);

    switch.fail_from_now();
    assert_eq!(
        seq.push_back(&bytes_i32(1)).unwrap_err().kind(),
        ErrorKind::AllocationFailure
    );
    assert_eq!(
        seq.push_front(&bytes_i32(1)).unwrap_err().kind(),
        ErrorKind::AllocationFailure
    );
    assert_eq!(
        seq.insert(1, &bytes_i32(1)).unwrap_err().kind(),
        ErrorKind::AllocationFailure
    );
    assert_eq!(
        seq.insert_block(0, &block_i32(&[1, 1])).unwrap_err().kind(),
        ErrorKind::AllocationFailure
    );
    assert_eq!(
        seq.sort(cmp_i32).unwrap_err().kind(),
        ErrorKind::AllocationFailure
    );
    assert_eq!(contents(&seq), before);
    assert_eq!(seq.capacity(), 4);
    assert_eq!(seq.metrics().failed_allocations, 5);

    // Operations that need no allocation still work.
    seq.modify(0, &bytes_i32(50)).unwrap();
    seq.pop_back().unwrap();
    assert_eq!(contents(&seq), vec![50, 4, 3]);

    switch.recover();
    seq.push_back_block(&block_i32(&[9, 9])).unwrap();
    seq.sort(cmp_i32).unwrap();
    assert_eq!(contents(&seq), vec![3, 4, 9, 9, 50]);
}
