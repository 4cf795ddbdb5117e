//! Word-addressed backing memory.
//!
//! This module provides the memory that sits behind a cache. It provides:
//! 1. **Block Views:** The aligned block containing a word address, readable and writable.
//! 2. **Bounds Checking:** Addresses past the end fail with [`CacheError::OutOfRange`].
//! 3. **Byte Addressing:** Conversion from byte to word addresses.

use crate::common::{CacheError, Result, WORD_BYTES, Word};

/// Converts a byte address to the address of the word containing it.
pub const fn word_address(byte_address: u32) -> u32 {
    byte_address / WORD_BYTES
}

/// Memory of `Word`s grouped into aligned blocks.
///
/// The block size must match the cache it backs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockMemory {
    words: Vec<Word>,
    block_size: usize,
}

impl BlockMemory {
    /// Creates zero-filled memory.
    ///
    /// # Arguments
    ///
    /// * `words` - Memory size in words; rounded down to whole blocks.
    /// * `block_size` - Words per block.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidBlockSize`] if `block_size` is zero.
    pub fn new(words: usize, block_size: usize) -> Result<Self> {
        Self::with_pattern(words, block_size, |_| 0)
    }

    /// Creates memory where word `i` holds `pattern(i)`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidBlockSize`] if `block_size` is zero.
    pub fn with_pattern(
        words: usize,
        block_size: usize,
        pattern: impl Fn(usize) -> Word,
    ) -> Result<Self> {
        if block_size == 0 {
            return Err(CacheError::InvalidBlockSize {
                expected: 1,
                actual: 0,
            });
        }
        let len = words - words % block_size;
        Ok(Self {
            words: (0..len).map(pattern).collect(),
            block_size,
        })
    }

    /// Memory filled with each word's own index.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidBlockSize`] if `block_size` is zero.
    #[allow(clippy::cast_possible_wrap)]
    pub fn identity(words: usize, block_size: usize) -> Result<Self> {
        Self::with_pattern(words, block_size, |i| i as Word)
    }

    /// Memory size in words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the memory holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words per block.
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of whole blocks.
    pub fn num_blocks(&self) -> usize {
        self.words.len() / self.block_size
    }

    /// Returns the aligned block containing `address`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::OutOfRange`] if the block lies past the end.
    pub fn block(&self, address: u32) -> Result<&[Word]> {
        let range = self.block_range(address)?;
        Ok(&self.words[range])
    }

    /// Returns the aligned block containing `address` for writing.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::OutOfRange`] if the block lies past the end.
    pub fn block_mut(&mut self, address: u32) -> Result<&mut [Word]> {
        let range = self.block_range(address)?;
        Ok(&mut self.words[range])
    }

    /// Reads the word at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::OutOfRange`] if `address` lies past the end.
    pub fn word(&self, address: u32) -> Result<Word> {
        self.words
            .get(address as usize)
            .copied()
            .ok_or_else(|| self.out_of_range(address))
    }

    fn block_range(&self, address: u32) -> Result<std::ops::Range<usize>> {
        let start = (address as usize / self.block_size) * self.block_size;
        match start.checked_add(self.block_size) {
            Some(end) if end <= self.words.len() => Ok(start..end),
            _ => Err(self.out_of_range(address)),
        }
    }

    fn out_of_range(&self, address: u32) -> CacheError {
        CacheError::OutOfRange {
            address,
            limit: self.words.len(),
        }
    }
}
