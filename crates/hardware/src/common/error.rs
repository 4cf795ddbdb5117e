//! Error definitions for the cache model.
//!
//! Every fallible operation in the crate reports one of three failures:
//! 1. **Geometry:** The configured capacity, block size or associativity cannot describe a cache.
//! 2. **Block Size:** A block of word data does not have exactly `block_size` entries.
//! 3. **Range:** The backing memory does not cover the requested address.
//!
//! A failed call never leaves the engine half-updated.

use thiserror::Error;

/// Errors raised by the cache engine and its backing memory.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The cache geometry is not realisable.
    ///
    /// Raised at construction when a dimension is zero, not a power of two,
    /// or does not divide the dimension above it.
    #[error("invalid cache geometry: {reason}")]
    InvalidGeometry {
        /// Human-readable description of the violated constraint.
        reason: String,
    },

    /// A block of data has the wrong number of words.
    #[error("block holds {actual} words, expected {expected}")]
    InvalidBlockSize {
        /// The configured block size in words.
        expected: usize,
        /// The length of the offending slice.
        actual: usize,
    },

    /// The backing memory has no block containing `address`.
    #[error("address {address:#x} is outside memory of {limit} words")]
    OutOfRange {
        /// The word address that was requested.
        address: u32,
        /// Size of the memory in words.
        limit: usize,
    },
}

impl CacheError {
    pub(crate) fn geometry(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
