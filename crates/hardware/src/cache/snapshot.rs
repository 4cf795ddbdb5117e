//! Read-only view of cache contents for inspection and printing.

use std::fmt;

use serde::Serialize;

use super::block::Block;
use super::set::CacheSet;
use crate::common::Word;

/// State of one way at the time of the snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockSnapshot {
    /// Way index within the set.
    pub way: usize,
    /// Stored tag; stale when `valid` is false.
    pub tag: u32,
    /// Validity flag.
    pub valid: bool,
    /// Recency stamp.
    pub recency: u64,
    /// Block data.
    pub data: Vec<Word>,
}

/// State of one set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetSnapshot {
    /// Set index.
    pub index: usize,
    /// Ways in index order.
    pub ways: Vec<BlockSnapshot>,
}

/// State of every set in a cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CacheSnapshot {
    /// Sets in index order.
    pub sets: Vec<SetSnapshot>,
}

impl BlockSnapshot {
    fn capture(way: usize, block: &Block) -> Self {
        Self {
            way,
            tag: block.tag(),
            valid: block.is_valid(),
            recency: block.recency(),
            data: block.data().to_vec(),
        }
    }
}

impl CacheSnapshot {
    pub(crate) fn capture(sets: &[CacheSet]) -> Self {
        Self {
            sets: sets
                .iter()
                .enumerate()
                .map(|(index, set)| SetSnapshot {
                    index,
                    ways: set
                        .ways()
                        .iter()
                        .enumerate()
                        .map(|(way, block)| BlockSnapshot::capture(way, block))
                        .collect(),
                })
                .collect(),
        }
    }

    /// Iterates over the valid blocks as `(set, snapshot)` pairs.
    pub fn valid_blocks(&self) -> impl Iterator<Item = (usize, &BlockSnapshot)> + '_ {
        self.sets.iter().flat_map(|set| {
            set.ways
                .iter()
                .filter(|block| block.valid)
                .map(move |block| (set.index, block))
        })
    }
}

impl fmt::Display for BlockSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tag={:#x} valid={} repl={} data=[",
            self.tag,
            u8::from(self.valid),
            self.recency
        )?;
        for (i, word) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{word}")?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for CacheSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L1 cache state:")?;
        for set in &self.sets {
            write!(f, "\n Set[{}]:", set.index)?;
            for block in &set.ways {
                write!(f, "\n  {block}")?;
            }
        }
        Ok(())
    }
}
