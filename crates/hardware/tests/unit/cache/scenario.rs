//! Reference Walkthrough.
//!
//! 16-word cache, 4-word blocks, 2 ways (2 sets), write-back with
//! write-allocate, in front of memory where each word holds its own index.
//! Requests use byte addresses, converted to word addresses as the driver does.

use setcache_core::memory::word_address;

use crate::common::TestContext;

#[test]
fn reference_walkthrough() {
    let mut ctx = TestContext::reference();

    // Cold miss.
    let outcome = ctx.load(word_address(0x00));
    assert_eq!((outcome.value, outcome.hit), (0, false));

    // Same block.
    let outcome = ctx.load(word_address(0x01));
    assert_eq!((outcome.value, outcome.hit), (0, true));

    // Word 4: block 1 lands in set 1.
    let outcome = ctx.load(word_address(0x10));
    assert_eq!((outcome.value, outcome.hit), (4, false));
    assert_eq!(ctx.cache.index(word_address(0x10)), 1);

    // Store into the resident block leaves memory stale.
    assert!(ctx.store(word_address(0x00), 1234));
    assert_eq!(ctx.memory_word(0), 0);

    let outcome = ctx.load(word_address(0x00));
    assert_eq!((outcome.value, outcome.hit), (1234, true));

    assert_eq!(ctx.cache.access_count(), 5);
    assert_eq!(ctx.cache.stats().hits(), 3);
    assert_eq!(ctx.cache.stats().misses(), 2);
}

#[test]
fn walkthrough_eviction_tail() {
    let mut ctx = TestContext::reference();
    for byte in [0x00, 0x01, 0x10, 0xF8, 0x14] {
        let _ = ctx.load(word_address(byte));
    }
    let _ = ctx.store(word_address(0x00), 1234);
    let _ = ctx.load(word_address(0x00));

    // Allocating store miss into the free way of set 0.
    assert!(!ctx.store(word_address(0x20), 5678));
    assert_eq!(ctx.load(word_address(0x20)).value, 5678);

    // Three more blocks push out the oldest way of each set in turn.
    for byte in [0x30, 0x40, 0x50] {
        assert!(!ctx.load(word_address(byte)).hit);
    }
    assert_eq!(ctx.cache.stats().evictions, 3);

    // Block 0 and block 1 were both evicted; the dirty block 0 never reached memory.
    assert!(!ctx.cache.contains(word_address(0x00)));
    assert_eq!(ctx.memory_word(0), 0);
    let outcome = ctx.load(word_address(0x10));
    assert_eq!((outcome.value, outcome.hit), (4, false));
}
