//! Configuration for the cache engine.
//!
//! This module defines the structures and enums used to parameterize a cache:
//! 1. **Defaults:** Baseline geometry and policy constants.
//! 2. **Structures:** [`CacheConfig`], deserializable from JSON with per-field defaults.
//! 3. **Enums:** Write propagation and write-miss allocation policies.
//!
//! Use `CacheConfig::default()` or deserialize from JSON; [`CacheConfig::geometry`]
//! validates the dimensions before an engine is built.

use serde::{Deserialize, Serialize};

use crate::common::{Geometry, Result};

/// Default configuration constants.
mod defaults {
    /// Default capacity (16 words).
    pub const CAPACITY: usize = 16;

    /// Default block size (4 words).
    pub const BLOCK_SIZE: usize = 4;

    /// Default associativity (2 ways).
    pub const ASSOCIATIVITY: usize = 2;
}

/// When a stored value reaches the backing memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum WritePolicy {
    /// Stores update only the cached copy.
    ///
    /// Dirty data is not written back when the block is evicted.
    #[serde(alias = "write_back", alias = "wb")]
    WriteBack,
    /// Every store is also written to the backing memory immediately.
    #[default]
    #[serde(alias = "write_through", alias = "wt")]
    WriteThrough,
}

/// Whether a store that misses installs a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum AllocatePolicy {
    /// A store miss installs the block, with the stored word merged in.
    #[serde(alias = "allocate", alias = "write_allocate")]
    Allocate,
    /// A store miss leaves the cache untouched.
    #[default]
    #[serde(alias = "no_allocate", alias = "no_write_allocate")]
    NoAllocate,
}

/// Cache configuration.
///
/// All sizes are in words.
///
/// # Examples
///
/// ```
/// use setcache_core::config::{AllocatePolicy, CacheConfig, WritePolicy};
///
/// let json = r#"{
///     "capacity": 64,
///     "block_size": 8,
///     "associativity": 4,
///     "write_policy": "WriteBack",
///     "allocate_policy": "Allocate"
/// }"#;
///
/// let config: CacheConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.write_policy, WritePolicy::WriteBack);
/// assert_eq!(config.allocate_policy, AllocatePolicy::Allocate);
/// assert_eq!(config.geometry().unwrap().num_sets(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Total capacity in words
    #[serde(default = "CacheConfig::default_capacity")]
    pub capacity: usize,

    /// Words per block
    #[serde(default = "CacheConfig::default_block_size")]
    pub block_size: usize,

    /// Ways per set
    #[serde(default = "CacheConfig::default_associativity")]
    pub associativity: usize,

    /// Store propagation policy
    #[serde(default)]
    pub write_policy: WritePolicy,

    /// Store miss allocation policy
    #[serde(default)]
    pub allocate_policy: AllocatePolicy,
}

impl CacheConfig {
    /// Creates a configuration from explicit dimensions and policies.
    pub const fn new(
        capacity: usize,
        block_size: usize,
        associativity: usize,
        write_policy: WritePolicy,
        allocate_policy: AllocatePolicy,
    ) -> Self {
        Self {
            capacity,
            block_size,
            associativity,
            write_policy,
            allocate_policy,
        }
    }

    /// Validates the dimensions and derives the cache geometry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::CacheError::InvalidGeometry`] when the
    /// dimensions cannot describe a cache.
    pub fn geometry(&self) -> Result<Geometry> {
        Geometry::new(self.capacity, self.block_size, self.associativity)
    }

    fn default_capacity() -> usize {
        defaults::CAPACITY
    }

    fn default_block_size() -> usize {
        defaults::BLOCK_SIZE
    }

    fn default_associativity() -> usize {
        defaults::ASSOCIATIVITY
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::CAPACITY,
            block_size: defaults::BLOCK_SIZE,
            associativity: defaults::ASSOCIATIVITY,
            write_policy: WritePolicy::default(),
            allocate_policy: AllocatePolicy::default(),
        }
    }
}
