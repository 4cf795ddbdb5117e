//! Cache set and victim selection.
//!
//! A set is a fixed row of `associativity` blocks indexed by way. Victim
//! selection scans the ways from way 0:
//!
//! 1. The first invalid way is returned immediately, so empty slots are always
//!    filled before anything is evicted.
//! 2. Otherwise the way with the smallest recency stamp is returned. Ties go to
//!    the lowest way index.
//!
//! Recency stamps are values of the engine's access clock, which makes the
//! policy exact LRU among valid blocks.

use super::block::Block;

/// A fixed-capacity row of blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSet {
    ways: Box<[Block]>,
}

impl CacheSet {
    /// Creates a set of `associativity` empty blocks.
    pub fn new(associativity: usize, block_size: usize) -> Self {
        Self {
            ways: (0..associativity).map(|_| Block::empty(block_size)).collect(),
        }
    }

    /// Number of ways.
    pub fn associativity(&self) -> usize {
        self.ways.len()
    }

    /// All ways in index order.
    pub fn ways(&self) -> &[Block] {
        &self.ways
    }

    /// The block at `way`, if it exists.
    pub fn way(&self, way: usize) -> Option<&Block> {
        self.ways.get(way)
    }

    pub(crate) fn way_mut(&mut self, way: usize) -> Option<&mut Block> {
        self.ways.get_mut(way)
    }

    /// The way chosen by [`Self::find_victim`] and its block.
    pub(crate) fn victim_mut(&mut self) -> (usize, &mut Block) {
        let way = self.find_victim();
        (way, &mut self.ways[way])
    }

    /// Returns the way holding a valid copy of `tag`.
    pub fn find(&self, tag: u32) -> Option<usize> {
        self.ways.iter().position(|block| block.holds(tag))
    }

    /// Number of valid ways.
    pub fn occupancy(&self) -> usize {
        self.ways.iter().filter(|block| block.is_valid()).count()
    }

    /// Selects the way to fill on a miss.
    pub fn find_victim(&self) -> usize {
        let mut victim = 0;
        let mut oldest = u64::MAX;
        for (way, block) in self.ways.iter().enumerate() {
            if !block.is_valid() {
                return way;
            }
            if block.recency() < oldest {
                oldest = block.recency();
                victim = way;
            }
        }
        victim
    }
}
