//! Error Handling Tests.
//!
//! A failed call must leave the cache, its clock and the backing block untouched.

use pretty_assertions::assert_eq;
use rstest::rstest;
use setcache_core::config::{AllocatePolicy, CacheConfig, WritePolicy};
use setcache_core::{CacheEngine, CacheError};

use crate::common::TestContext;

#[rstest]
#[case::capacity(CacheConfig::new(12, 4, 1, WritePolicy::WriteBack, AllocatePolicy::Allocate))]
#[case::block(CacheConfig::new(16, 6, 1, WritePolicy::WriteBack, AllocatePolicy::Allocate))]
#[case::ways(CacheConfig::new(16, 4, 8, WritePolicy::WriteBack, AllocatePolicy::Allocate))]
fn construction_rejects_invalid_geometry(#[case] config: CacheConfig) {
    assert!(matches!(
        CacheEngine::new(&config),
        Err(CacheError::InvalidGeometry { .. })
    ));
}

#[rstest]
#[case::short(3)]
#[case::long(5)]
#[case::empty(0)]
fn load_rejects_wrong_block_length(#[case] len: usize) {
    let mut ctx = TestContext::reference();
    ctx.warm(&[0x0]);
    let before = ctx.cache.snapshot();

    let backing = vec![9; len];
    assert_eq!(
        ctx.cache.load(0x10, &backing).unwrap_err(),
        CacheError::InvalidBlockSize {
            expected: 4,
            actual: len
        }
    );
    assert_eq!(ctx.cache.snapshot(), before);
    assert_eq!(ctx.cache.access_count(), 1);
    assert_eq!(ctx.cache.stats().loads, 1);
}

#[rstest]
#[case::hit(0x0)]
#[case::miss(0x10)]
fn store_rejects_wrong_block_length(#[case] address: u32) {
    let mut ctx = TestContext::small(WritePolicy::WriteThrough, AllocatePolicy::Allocate);
    ctx.warm(&[0x0]);
    let before = ctx.cache.snapshot();

    let mut backing = vec![9; 2];
    assert!(matches!(
        ctx.cache.store(address, 1, &mut backing),
        Err(CacheError::InvalidBlockSize { .. })
    ));
    assert_eq!(backing, vec![9, 9], "write-through did not run");
    assert_eq!(ctx.cache.snapshot(), before);
    assert_eq!(ctx.cache.access_count(), 1);
}

/// Errors from the backing memory surface before the engine is called.
#[test]
fn out_of_range_comes_from_memory() {
    let ctx = TestContext::reference();
    assert!(matches!(
        ctx.memory.block(u32::MAX),
        Err(CacheError::OutOfRange { .. })
    ));
    assert_eq!(ctx.cache.access_count(), 0);
}
