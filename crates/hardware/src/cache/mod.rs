//! Set-Associative Cache Engine.
//!
//! This module implements a set-associative cache in front of a word-addressed
//! backing memory. It models:
//! 1. **Lookup:** Address decoding and a per-set tag scan.
//! 2. **Replacement:** Empty-first, then least-recently-touched victim selection.
//! 3. **Write Policies:** Write-back or write-through combined with write-allocate or no-allocate.
//!
//! The caller owns the backing memory and lends the engine the aligned block
//! for each request. Under write-back the engine keeps no dirty state, so a
//! modified block that is evicted is dropped without reaching the backing
//! memory.

/// Cache line storage.
pub mod block;

/// Cache sets and victim selection.
pub mod set;

/// Diagnostic snapshots of cache contents.
pub mod snapshot;

use tracing::{debug, info, trace};

use self::block::{Block, check_len};
use self::set::CacheSet;
use self::snapshot::CacheSnapshot;
use crate::common::{AddressDecoder, DecodedAddress, Geometry, Result, Word};
use crate::config::{AllocatePolicy, CacheConfig, WritePolicy};
use crate::stats::CacheStats;

/// Result of a load request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOutcome {
    /// The word at the requested address.
    pub value: Word,
    /// Whether the block was already resident.
    pub hit: bool,
}

/// A set-associative cache with configurable write and allocate policies.
///
/// Every `load` and `store` advances a private access clock by one. The clock
/// value is stamped into the block that was hit or installed and drives
/// victim selection.
#[derive(Clone, Debug)]
pub struct CacheEngine {
    sets: Box<[CacheSet]>,
    geometry: Geometry,
    decoder: AddressDecoder,
    write_policy: WritePolicy,
    allocate_policy: AllocatePolicy,
    access_count: u64,
    stats: CacheStats,
}

impl CacheEngine {
    /// Creates an empty cache.
    ///
    /// # Arguments
    ///
    /// * `config` - Geometry and policies of the cache.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::CacheError::InvalidGeometry`] if the configured
    /// dimensions cannot describe a cache. No engine is built in that case.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let geometry = config.geometry()?;
        info!(
            capacity = geometry.capacity(),
            block_size = geometry.block_size(),
            ways = geometry.associativity(),
            sets = geometry.num_sets(),
            offset_bits = geometry.offset_bits(),
            index_bits = geometry.index_bits(),
            tag_bits = geometry.tag_bits(),
            write_policy = ?config.write_policy,
            allocate_policy = ?config.allocate_policy,
            "cache created"
        );

        let sets = (0..geometry.num_sets())
            .map(|_| CacheSet::new(geometry.associativity(), geometry.block_size()))
            .collect();

        Ok(Self {
            sets,
            geometry,
            decoder: geometry.decoder(),
            write_policy: config.write_policy,
            allocate_policy: config.allocate_policy,
            access_count: 0,
            stats: CacheStats::default(),
        })
    }

    /// Derived geometry.
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Address decoder for this cache.
    pub const fn decoder(&self) -> AddressDecoder {
        self.decoder
    }

    /// Store propagation policy.
    pub const fn write_policy(&self) -> WritePolicy {
        self.write_policy
    }

    /// Store miss allocation policy.
    pub const fn allocate_policy(&self) -> AllocatePolicy {
        self.allocate_policy
    }

    /// Number of `load` and `store` calls completed so far.
    pub const fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Counters accumulated since construction.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// All sets in index order.
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// Tag field of `address`.
    pub const fn tag(&self, address: u32) -> u32 {
        self.decoder.tag(address)
    }

    /// Set index field of `address`.
    pub const fn index(&self, address: u32) -> u32 {
        self.decoder.index(address)
    }

    /// Block offset field of `address`.
    pub const fn offset(&self, address: u32) -> u32 {
        self.decoder.offset(address)
    }

    /// Returns true if the block holding `address` is resident.
    ///
    /// Does not advance the access clock or touch recency.
    pub fn contains(&self, address: u32) -> bool {
        let DecodedAddress { tag, index, .. } = self.decoder.decode(address);
        self.set(index).find(tag).is_some()
    }

    /// Captures the current contents of every set.
    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot::capture(&self.sets)
    }

    /// Reads the word at `address`.
    ///
    /// # Arguments
    ///
    /// * `address` - Word address to read.
    /// * `backing` - The aligned backing-memory block containing `address`.
    ///
    /// # Returns
    ///
    /// The word and whether the request hit. On a miss the block is
    /// installed from `backing`, evicting a victim if the set is full.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::CacheError::InvalidBlockSize`] if `backing`
    /// does not hold exactly one block. The cache is left untouched.
    pub fn load(&mut self, address: u32, backing: &[Word]) -> Result<LoadOutcome> {
        check_len(self.geometry.block_size(), backing)?;
        let now = self.tick();
        let DecodedAddress { tag, index, offset } = self.decode(address);
        let offset = offset as usize;
        self.stats.loads += 1;

        if let Some(block) = self.lookup(index, tag) {
            block.touch(now);
            let value = block.data()[offset];
            self.stats.load_hits += 1;
            debug!(address, value, "load hit");
            return Ok(LoadOutcome { value, hit: true });
        }

        self.install(index, tag, backing)?;
        let value = backing[offset];
        debug!(address, value, "load miss");
        Ok(LoadOutcome { value, hit: false })
    }

    /// Writes `value` to `address`.
    ///
    /// # Arguments
    ///
    /// * `address` - Word address to write.
    /// * `value` - The word to store.
    /// * `backing` - The aligned backing-memory block containing `address`.
    ///   It is written only under [`WritePolicy::WriteThrough`].
    ///
    /// # Returns
    ///
    /// Whether the request hit. On a miss under
    /// [`AllocatePolicy::Allocate`] the block is installed from `backing`
    /// with `value` merged in.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::CacheError::InvalidBlockSize`] if `backing`
    /// does not hold exactly one block. Neither the cache nor `backing` is
    /// modified.
    pub fn store(&mut self, address: u32, value: Word, backing: &mut [Word]) -> Result<bool> {
        check_len(self.geometry.block_size(), backing)?;
        let now = self.tick();
        let DecodedAddress { tag, index, offset } = self.decode(address);
        let offset = offset as usize;
        self.stats.stores += 1;

        let hit = if let Some(block) = self.lookup(index, tag) {
            block.write_word(offset, value);
            block.touch(now);
            self.stats.store_hits += 1;
            debug!(address, value, "store hit");
            true
        } else {
            if self.allocate_policy == AllocatePolicy::Allocate {
                let mut merged = backing.to_vec();
                merged[offset] = value;
                self.install(index, tag, &merged)?;
            }
            debug!(address, value, allocate = ?self.allocate_policy, "store miss");
            false
        };

        if self.write_policy == WritePolicy::WriteThrough {
            backing[offset] = value;
            self.stats.write_throughs += 1;
            trace!(address, value, "write through");
        }

        Ok(hit)
    }

    /// Drops the block holding `address` from the cache.
    ///
    /// Returns true if a resident block was invalidated. The block's data is
    /// not written back and the access clock does not advance.
    pub fn invalidate(&mut self, address: u32) -> bool {
        let DecodedAddress { tag, index, .. } = self.decoder.decode(address);
        match self.lookup(index, tag) {
            Some(block) => {
                block.invalidate();
                debug!(address, tag, index, "invalidate");
                true
            }
            None => false,
        }
    }

    const fn tick(&mut self) -> u64 {
        self.access_count += 1;
        self.access_count
    }

    fn decode(&self, address: u32) -> DecodedAddress {
        let decoded = self.decoder.decode(address);
        trace!(
            address,
            tag = decoded.tag,
            index = decoded.index,
            offset = decoded.offset,
            "decode"
        );
        decoded
    }

    // The decoder masks the index to `index_bits`, so it is always in range.
    fn set(&self, index: u32) -> &CacheSet {
        &self.sets[index as usize]
    }

    fn set_mut(&mut self, index: u32) -> &mut CacheSet {
        &mut self.sets[index as usize]
    }

    fn lookup(&mut self, index: u32, tag: u32) -> Option<&mut Block> {
        let set = self.set_mut(index);
        let way = set.find(tag)?;
        set.way_mut(way)
    }

    /// Fills a victim way of set `index` with `data` under `tag`.
    ///
    /// Only called after a failed lookup, which keeps tags unique within a set.
    fn install(&mut self, index: u32, tag: u32, data: &[Word]) -> Result<()> {
        let now = self.access_count;
        let set = self.set_mut(index);
        let (way, block) = set.victim_mut();
        let evicted = block.is_valid().then_some(block.tag());
        block.refill(tag, now, data)?;
        debug_assert_eq!(
            set.ways().iter().filter(|block| block.holds(tag)).count(),
            1,
            "tag {tag:#x} resident in more than one way of set {index}"
        );

        self.stats.installs += 1;
        if let Some(victim_tag) = evicted {
            self.stats.evictions += 1;
            debug!(index, way, victim_tag, tag, "evict");
        } else {
            debug!(index, way, tag, "fill");
        }
        Ok(())
    }
}
