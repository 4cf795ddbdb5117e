//! Feeds requests to a cache and its backing memory.

use std::fmt;

use serde::Serialize;
use setcache_core::cache::snapshot::CacheSnapshot;
use setcache_core::common::{DecodedAddress, Word};
use setcache_core::memory::{BlockMemory, word_address};
use setcache_core::stats::CacheStats;
use setcache_core::{CacheConfig, CacheEngine, Result};
use tracing::debug;

use crate::trace::Request;

/// Outcome of one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Access {
    /// The request that was executed.
    pub request: Request,
    /// Fields of the word address the request decoded to.
    pub decoded: DecodedAddress,
    /// Value read by a load; `None` for stores.
    pub value: Option<Word>,
    /// Whether the block was resident.
    pub hit: bool,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let DecodedAddress { tag, index, offset } = self.decoded;
        writeln!(f, "{tag} + {index} + {offset}")?;
        let outcome = if self.hit { "hit" } else { "miss" };
        match self.request {
            Request::Load { address } => write!(
                f,
                "Load  addr={address:#x} -> value={} ({outcome})",
                self.value.unwrap_or_default()
            ),
            Request::Store { address, value } => {
                write!(f, "Store addr={address:#x} value={value} ({outcome})")
            }
        }
    }
}

/// Final state reported by `--json`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// Configuration the run used.
    pub config: &'a CacheConfig,
    /// Counters at the end of the run.
    pub stats: &'a CacheStats,
    /// Cache contents at the end of the run.
    pub snapshot: CacheSnapshot,
}

/// A cache and the memory behind it.
#[derive(Debug)]
pub struct Driver {
    config: CacheConfig,
    cache: CacheEngine,
    memory: BlockMemory,
}

impl Driver {
    /// Builds the cache and a memory of `memory_words` words where each word
    /// holds its own index.
    pub fn new(config: CacheConfig, memory_words: usize) -> Result<Self> {
        let cache = CacheEngine::new(&config)?;
        let memory = BlockMemory::identity(memory_words, cache.geometry().block_size())?;
        Ok(Self {
            config,
            cache,
            memory,
        })
    }

    /// The cache.
    pub const fn cache(&self) -> &CacheEngine {
        &self.cache
    }

    /// The backing memory.
    pub const fn memory(&self) -> &BlockMemory {
        &self.memory
    }

    /// Runs one request.
    ///
    /// # Errors
    ///
    /// Propagates [`setcache_core::CacheError::OutOfRange`] from the memory.
    pub fn execute(&mut self, request: Request) -> Result<Access> {
        let address = word_address(request.address());
        let decoded = self.cache.decoder().decode(address);
        debug!(%request, address, "execute");

        let (value, hit) = match request {
            Request::Load { .. } => {
                let outcome = self.cache.load(address, self.memory.block(address)?)?;
                (Some(outcome.value), outcome.hit)
            }
            Request::Store { value, .. } => {
                let hit = self
                    .cache
                    .store(address, value, self.memory.block_mut(address)?)?;
                (None, hit)
            }
        };

        Ok(Access {
            request,
            decoded,
            value,
            hit,
        })
    }

    /// End-of-run report.
    pub fn report(&self) -> Report<'_> {
        Report {
            config: &self.config,
            stats: self.cache.stats(),
            snapshot: self.cache.snapshot(),
        }
    }
}
