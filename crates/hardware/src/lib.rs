//! Set-associative cache model.
//!
//! This crate models a hardware cache in front of a word-addressed backing memory:
//! 1. **Addressing:** Geometry validation and tag/index/offset decoding.
//! 2. **Cache:** Blocks, sets, victim selection, and the load/store engine.
//! 3. **Policies:** Write-back or write-through, with write-allocate or no-allocate.
//! 4. **Memory:** A block-grouped backing store that lends blocks to the engine.
//! 5. **Observation:** Statistics and read-only snapshots of cache contents.
//!
//! # Examples
//!
//! ```
//! use setcache_core::config::{AllocatePolicy, CacheConfig, WritePolicy};
//! use setcache_core::memory::BlockMemory;
//! use setcache_core::CacheEngine;
//!
//! let config = CacheConfig::new(16, 4, 2, WritePolicy::WriteBack, AllocatePolicy::Allocate);
//! let mut cache = CacheEngine::new(&config).unwrap();
//! let mut memory = BlockMemory::identity(256, 4).unwrap();
//!
//! let first = cache.load(5, memory.block(5).unwrap()).unwrap();
//! assert_eq!((first.value, first.hit), (5, false));
//!
//! assert!(cache.store(5, 99, memory.block_mut(5).unwrap()).unwrap());
//! assert_eq!(memory.word(5).unwrap(), 5);
//! assert_eq!(cache.load(5, memory.block(5).unwrap()).unwrap().value, 99);
//! ```

/// Cache engine, blocks, sets and snapshots.
pub mod cache;
/// Shared types (geometry, decoder, errors, words).
pub mod common;
/// Cache configuration (geometry and policies).
pub mod config;
/// Backing memory.
pub mod memory;
/// Cache statistics.
pub mod stats;

/// Main cache type; build with `CacheEngine::new`.
pub use crate::cache::{CacheEngine, LoadOutcome};
/// Crate error type.
pub use crate::common::{CacheError, Result};
/// Cache configuration; use `CacheConfig::default()` or deserialize from JSON.
pub use crate::config::CacheConfig;
