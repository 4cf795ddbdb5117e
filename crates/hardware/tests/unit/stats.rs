//! Statistics Tests.

use setcache_core::cache::set::CacheSet;
use setcache_core::config::{AllocatePolicy, WritePolicy};
use setcache_core::stats::CacheStats;

use crate::common::TestContext;

#[test]
fn empty_stats() {
    let stats = CacheStats::default();
    assert_eq!(stats.accesses(), 0);
    assert_eq!(stats.misses(), 0);
    assert!(stats.hit_rate().abs() < f64::EPSILON);
}

#[test]
fn counts_requests_and_outcomes() {
    let mut ctx = TestContext::small(WritePolicy::WriteThrough, AllocatePolicy::NoAllocate);
    ctx.warm(&[0x0, 0x1, 0x4]);
    let _ = ctx.store(0x0, 1); // hit
    let _ = ctx.store(0x20, 2); // miss, not allocated

    let stats = ctx.cache.stats();
    assert_eq!(stats.loads, 3);
    assert_eq!(stats.load_hits, 1);
    assert_eq!(stats.stores, 2);
    assert_eq!(stats.store_hits, 1);
    assert_eq!(stats.installs, 2);
    assert_eq!(stats.evictions, 0);
    assert_eq!(stats.write_throughs, 2);
    assert_eq!(stats.hits(), 2);
    assert_eq!(stats.misses(), 3);
    assert!((stats.hit_rate() - 0.4).abs() < 1e-9);
}

#[test]
fn report_mentions_every_counter() {
    let mut ctx = TestContext::reference();
    ctx.warm(&[0x0, 0x0]);
    let report = ctx.cache.stats().to_string();
    for key in [
        "accesses",
        "loads",
        "stores",
        "misses",
        "hit_rate",
        "installs",
        "evictions",
        "write_throughs",
    ] {
        assert!(report.contains(key), "missing {key}");
    }
    assert!(report.contains("50.00%"));
}

/// Each counted install leaves exactly one newly valid block behind, so
/// installs always equal resident blocks plus evictions.
#[test]
fn installs_match_filled_ways() {
    let mut ctx = TestContext::reference();
    for n in 0..5 {
        let address = TestContext::small_block(0, n);
        ctx.warm(&[address]);
        assert!(ctx.cache.contains(address));
    }
    ctx.warm(&[TestContext::small_block(1, 0)]);

    let resident: usize = ctx.cache.sets().iter().map(CacheSet::occupancy).sum();
    let stats = ctx.cache.stats();
    assert_eq!(stats.installs, 6);
    assert_eq!(stats.evictions, 3);
    assert_eq!(stats.installs, resident as u64 + stats.evictions);
}
