//! Backing Memory Tests.
//!
//! Verifies aligned block views, bounds checking and byte-to-word conversion.

use setcache_core::CacheError;
use setcache_core::memory::{BlockMemory, word_address};

#[test]
fn identity_pattern_fills_word_indices() {
    let memory = BlockMemory::identity(32, 4).unwrap();
    assert_eq!(memory.block(0).unwrap(), &[0, 1, 2, 3]);
    assert_eq!(memory.block(31).unwrap(), &[28, 29, 30, 31]);
    assert_eq!(memory.word(17).unwrap(), 17);
}

#[test]
fn custom_pattern() {
    let memory = BlockMemory::with_pattern(8, 2, |i| -(i as i32)).unwrap();
    assert_eq!(memory.block(5).unwrap(), &[-4, -5]);
}

#[test]
fn block_mut_writes_through_to_memory() {
    let mut memory = BlockMemory::new(16, 4).unwrap();
    memory.block_mut(9).unwrap()[1] = 77;
    assert_eq!(memory.word(9).unwrap(), 77);
}

#[test]
fn out_of_range_block() {
    let memory = BlockMemory::new(16, 4).unwrap();
    assert_eq!(
        memory.block(16).unwrap_err(),
        CacheError::OutOfRange {
            address: 16,
            limit: 16
        }
    );
    assert!(memory.word(16).is_err());
}

#[test]
fn out_of_range_block_mut() {
    let mut memory = BlockMemory::new(16, 4).unwrap();
    assert!(matches!(
        memory.block_mut(u32::MAX),
        Err(CacheError::OutOfRange { .. })
    ));
}

#[test]
fn byte_addresses_map_to_words() {
    assert_eq!(word_address(0x00), 0);
    assert_eq!(word_address(0x01), 0);
    assert_eq!(word_address(0x10), 4);
    assert_eq!(word_address(0xF8), 62);
}
