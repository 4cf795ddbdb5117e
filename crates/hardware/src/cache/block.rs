//! Cache block.
//!
//! A block is one resident line: its tag, a validity flag, the recency stamp
//! used by victim selection, and exactly `block_size` words of data. The data
//! length is checked on every construction and refill, never padded or cut.

use crate::common::{CacheError, Result, Word};

/// One cache line.
///
/// `tag` and `data` are only meaningful while `valid` is set. An invalid block
/// may still carry the tag and data of its previous occupant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    tag: u32,
    valid: bool,
    recency: u64,
    data: Box<[Word]>,
}

impl Block {
    /// Recency stamp of a block that has never been touched.
    ///
    /// The access clock is advanced before it is stamped, so every touched
    /// block carries a larger value.
    pub const UNTOUCHED: u64 = 0;

    /// Creates an invalid, zero-filled block.
    pub fn empty(block_size: usize) -> Self {
        Self {
            tag: 0,
            valid: false,
            recency: Self::UNTOUCHED,
            data: vec![0; block_size].into_boxed_slice(),
        }
    }

    /// Creates a block holding a copy of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidBlockSize`] if `data.len() != block_size`.
    pub fn new(
        block_size: usize,
        tag: u32,
        valid: bool,
        recency: u64,
        data: &[Word],
    ) -> Result<Self> {
        check_len(block_size, data)?;
        Ok(Self {
            tag,
            valid,
            recency,
            data: data.into(),
        })
    }

    /// Tag of the resident memory block.
    pub const fn tag(&self) -> u32 {
        self.tag
    }

    /// Whether the block holds live data.
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Access clock value at the last touch.
    pub const fn recency(&self) -> u64 {
        self.recency
    }

    /// The block's words.
    pub fn data(&self) -> &[Word] {
        &self.data
    }

    /// Number of words in the block.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true for a zero-length block. Blocks built by a cache always
    /// hold at least one word, since its geometry rejects a zero block size.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if this block is valid and holds `tag`.
    #[inline]
    pub const fn holds(&self, tag: u32) -> bool {
        self.valid && self.tag == tag
    }

    /// Reads the word at `offset`, or `None` past the end.
    pub fn word(&self, offset: usize) -> Option<Word> {
        self.data.get(offset).copied()
    }

    /// Stamps the block with the current access clock.
    pub(crate) const fn touch(&mut self, now: u64) {
        self.recency = now;
    }

    /// Overwrites the word at `offset`.
    ///
    /// `offset` comes from the decoder, which masks it below the block size.
    pub(crate) fn write_word(&mut self, offset: usize, value: Word) {
        self.data[offset] = value;
    }

    /// Makes this block a valid copy of `data` under `tag`.
    ///
    /// The existing allocation is reused. On a length mismatch the block is
    /// left as it was.
    pub(crate) fn refill(&mut self, tag: u32, now: u64, data: &[Word]) -> Result<()> {
        check_len(self.data.len(), data)?;
        self.data.copy_from_slice(data);
        self.tag = tag;
        self.valid = true;
        self.recency = now;
        Ok(())
    }

    pub(crate) const fn invalidate(&mut self) {
        self.valid = false;
    }
}

/// Fails unless `data` holds exactly `expected` words.
pub(crate) const fn check_len(expected: usize, data: &[Word]) -> Result<()> {
    if data.len() == expected {
        Ok(())
    } else {
        Err(CacheError::InvalidBlockSize {
            expected,
            actual: data.len(),
        })
    }
}
