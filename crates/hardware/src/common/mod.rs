//! Common types shared by the cache engine and its backing memory.
//!
//! This module provides the building blocks used across the crate:
//! 1. **Addressing:** Cache geometry and the tag/index/offset decoder.
//! 2. **Error Handling:** The crate error type and `Result` alias.

/// Cache geometry and address decoding.
pub mod addr;

/// Error types.
pub mod error;

pub use addr::{ADDRESS_WIDTH, AddressDecoder, DecodedAddress, Geometry};
pub use error::{CacheError, Result};

/// A single data word held by the cache and its backing memory.
pub type Word = i32;

/// Bytes per [`Word`], used to turn byte addresses into word addresses.
pub const WORD_BYTES: u32 = 4;
