//! Cache geometry and address decoding.
//!
//! This module turns the three configured dimensions of a cache into the bit
//! layout used to split an address. It provides the following:
//! 1. **Geometry:** Validated capacity, block size and associativity plus the derived set count and field widths.
//! 2. **Decoding:** Pure extraction of the tag, set index and block offset fields.
//! 3. **Composition:** The inverse mapping, used to rebuild an address from its fields.
//!
//! Addresses are word addresses held in a `u32`, so the address width is fixed
//! at [`ADDRESS_WIDTH`] bits and a wider address cannot be expressed.

use super::error::{CacheError, Result};

/// Number of bits in an address.
pub const ADDRESS_WIDTH: u32 = u32::BITS;

/// Returns a mask covering the low `bits` bits.
#[inline(always)]
const fn low_mask(bits: u32) -> u32 {
    if bits >= ADDRESS_WIDTH {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// Validated dimensions of a set-associative cache.
///
/// All sizes are counted in words. The derived fields are computed once in
/// [`Geometry::new`] and never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    capacity: usize,
    block_size: usize,
    associativity: usize,
    total_blocks: usize,
    num_sets: usize,
    offset_bits: u32,
    index_bits: u32,
}

impl Geometry {
    /// Derives the geometry of a cache.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Total data capacity in words.
    /// * `block_size` - Words per block.
    /// * `associativity` - Ways per set.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidGeometry`] if any dimension is not a power
    /// of two, if `block_size` exceeds `capacity`, if `associativity` exceeds
    /// the number of blocks, or if offset and index do not fit in an address.
    pub fn new(capacity: usize, block_size: usize, associativity: usize) -> Result<Self> {
        for (name, value) in [
            ("capacity", capacity),
            ("block size", block_size),
            ("associativity", associativity),
        ] {
            if !value.is_power_of_two() {
                return Err(CacheError::geometry(format!(
                    "{name} {value} is not a power of two"
                )));
            }
        }

        if block_size > capacity {
            return Err(CacheError::geometry(format!(
                "block size {block_size} does not divide capacity {capacity}"
            )));
        }
        let total_blocks = capacity / block_size;

        if associativity > total_blocks {
            return Err(CacheError::geometry(format!(
                "associativity {associativity} does not divide {total_blocks} blocks"
            )));
        }
        let num_sets = total_blocks / associativity;

        let offset_bits = block_size.trailing_zeros();
        let index_bits = num_sets.trailing_zeros();
        if offset_bits + index_bits > ADDRESS_WIDTH {
            return Err(CacheError::geometry(format!(
                "{offset_bits} offset bits and {index_bits} index bits exceed a {ADDRESS_WIDTH}-bit address"
            )));
        }

        Ok(Self {
            capacity,
            block_size,
            associativity,
            total_blocks,
            num_sets,
            offset_bits,
            index_bits,
        })
    }

    /// Total data capacity in words.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Words per block.
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Ways per set.
    pub const fn associativity(&self) -> usize {
        self.associativity
    }

    /// Number of blocks the cache can hold.
    pub const fn total_blocks(&self) -> usize {
        self.total_blocks
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Width of the block offset field.
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Width of the set index field.
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Width of the tag field.
    pub const fn tag_bits(&self) -> u32 {
        ADDRESS_WIDTH - self.offset_bits - self.index_bits
    }

    /// Returns the decoder for this geometry.
    pub const fn decoder(&self) -> AddressDecoder {
        AddressDecoder {
            offset_bits: self.offset_bits,
            index_bits: self.index_bits,
        }
    }
}

/// An address split into its cache fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddress {
    /// High-order bits identifying the block.
    pub tag: u32,
    /// Set selected by the address.
    pub index: u32,
    /// Word within the block.
    pub offset: u32,
}

/// Stateless address splitter for one cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
}

impl AddressDecoder {
    /// Extracts the word offset within the block.
    #[inline(always)]
    pub const fn offset(&self, address: u32) -> u32 {
        address & low_mask(self.offset_bits)
    }

    /// Extracts the set index.
    #[inline(always)]
    pub const fn index(&self, address: u32) -> u32 {
        match address.checked_shr(self.offset_bits) {
            Some(shifted) => shifted & low_mask(self.index_bits),
            None => 0,
        }
    }

    /// Extracts the tag.
    ///
    /// When offset and index together consume the whole address the tag is
    /// always zero.
    #[inline(always)]
    pub const fn tag(&self, address: u32) -> u32 {
        match address.checked_shr(self.offset_bits + self.index_bits) {
            Some(tag) => tag,
            None => 0,
        }
    }

    /// Splits `address` into all three fields.
    pub const fn decode(&self, address: u32) -> DecodedAddress {
        DecodedAddress {
            tag: self.tag(address),
            index: self.index(address),
            offset: self.offset(address),
        }
    }

    /// Rebuilds an address from its fields.
    ///
    /// Bits of a field wider than its slot are discarded, so the result always
    /// wraps into the address space.
    pub const fn compose(&self, tag: u32, index: u32, offset: u32) -> u32 {
        let tag_part = match tag.checked_shl(self.offset_bits + self.index_bits) {
            Some(v) => v,
            None => 0,
        };
        let index_part = match (index & low_mask(self.index_bits)).checked_shl(self.offset_bits) {
            Some(v) => v,
            None => 0,
        };
        tag_part | index_part | (offset & low_mask(self.offset_bits))
    }

    /// Returns the address of the first word of the block holding `address`.
    pub const fn block_base(&self, address: u32) -> u32 {
        address & !low_mask(self.offset_bits)
    }
}
