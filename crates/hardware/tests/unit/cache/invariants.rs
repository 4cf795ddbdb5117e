//! Invariant Tests.
//!
//! Drives the engine with random request streams under every policy and checks
//! the properties that must hold after each request.

use std::collections::HashSet;

use proptest::prelude::*;
use setcache_core::CacheConfig;
use setcache_core::config::{AllocatePolicy, WritePolicy};

use crate::common::TestContext;

#[derive(Clone, Copy, Debug)]
enum Op {
    Load(u32),
    Store(u32, i32),
    Invalidate(u32),
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    // 256 words keeps the working set a few times larger than the cache.
    let op = prop_oneof![
        4 => (0u32..256).prop_map(Op::Load),
        3 => (0u32..256, any::<i32>()).prop_map(|(a, v)| Op::Store(a, v)),
        1 => (0u32..256).prop_map(Op::Invalidate),
    ];
    prop::collection::vec(op, 1..200)
}

fn policies() -> impl Strategy<Value = (WritePolicy, AllocatePolicy)> {
    (
        prop_oneof![Just(WritePolicy::WriteBack), Just(WritePolicy::WriteThrough)],
        prop_oneof![Just(AllocatePolicy::Allocate), Just(AllocatePolicy::NoAllocate)],
    )
}

fn geometries() -> impl Strategy<Value = (usize, usize, usize)> {
    prop_oneof![
        Just((16, 4, 2)),
        Just((32, 4, 4)),
        Just((32, 2, 1)),
        Just((64, 8, 8)),
        Just((16, 1, 16)),
    ]
}

proptest! {
    /// No set ever holds two valid ways with the same tag.
    #[test]
    fn tags_are_unique_within_a_set(
        (capacity, block_size, ways) in geometries(),
        (write_policy, allocate_policy) in policies(),
        ops in ops(),
    ) {
        let config = CacheConfig::new(capacity, block_size, ways, write_policy, allocate_policy);
        let mut ctx = TestContext::new(config);
        for op in ops {
            match op {
                Op::Load(a) => { let _ = ctx.load(a); }
                Op::Store(a, v) => { let _ = ctx.store(a, v); }
                Op::Invalidate(a) => { let _ = ctx.cache.invalidate(a); }
            }
            for set in ctx.cache.sets() {
                let mut seen = HashSet::new();
                for block in set.ways().iter().filter(|b| b.is_valid()) {
                    prop_assert!(seen.insert(block.tag()), "duplicate tag {:#x}", block.tag());
                }
            }
        }
    }

    /// Under write-through the cache and memory always agree on resident data,
    /// and a load always returns the last value stored to that word.
    #[test]
    fn write_through_is_coherent(
        allocate in prop_oneof![Just(AllocatePolicy::Allocate), Just(AllocatePolicy::NoAllocate)],
        ops in ops(),
    ) {
        let config = CacheConfig::new(16, 4, 2, WritePolicy::WriteThrough, allocate);
        let mut ctx = TestContext::new(config);
        let mut model: Vec<i32> = (0..256).collect();
        for op in ops {
            match op {
                Op::Load(a) => prop_assert_eq!(ctx.load(a).value, model[a as usize]),
                Op::Store(a, v) => {
                    let _ = ctx.store(a, v);
                    model[a as usize] = v;
                }
                Op::Invalidate(a) => { let _ = ctx.cache.invalidate(a); }
            }
        }
        let snapshot = ctx.cache.snapshot();
        let decoder = ctx.cache.decoder();
        for (index, block) in snapshot.valid_blocks() {
            let base = decoder.compose(block.tag, index as u32, 0);
            prop_assert_eq!(block.data.as_slice(), ctx.memory.block(base).unwrap());
        }
    }

    /// The access clock counts every load and store exactly once.
    #[test]
    fn clock_counts_requests(ops in ops()) {
        let mut ctx = TestContext::reference();
        let mut requests = 0;
        for op in ops {
            match op {
                Op::Load(a) => { let _ = ctx.load(a); requests += 1; }
                Op::Store(a, v) => { let _ = ctx.store(a, v); requests += 1; }
                Op::Invalidate(a) => { let _ = ctx.cache.invalidate(a); }
            }
        }
        prop_assert_eq!(ctx.cache.access_count(), requests);
        prop_assert_eq!(ctx.cache.stats().accesses(), requests);
        let stats = ctx.cache.stats();
        prop_assert_eq!(stats.hits() + stats.misses(), requests);
    }
}
