//! Cache statistics collection and reporting.
//!
//! Tracks what the engine did with each request:
//! 1. **Requests:** Loads and stores issued.
//! 2. **Outcomes:** Hits per request kind; misses are derived.
//! 3. **Fills:** Blocks installed and valid blocks evicted to make room.
//! 4. **Propagation:** Stores written through to the backing memory.
//!
//! Only calls that succeed are counted.

use std::fmt;

use serde::Serialize;

/// Counters kept by a [`crate::CacheEngine`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of load requests.
    pub loads: u64,
    /// Number of store requests.
    pub stores: u64,
    /// Loads that found their block resident.
    pub load_hits: u64,
    /// Stores that found their block resident.
    pub store_hits: u64,
    /// Blocks installed on a miss.
    pub installs: u64,
    /// Installs that replaced a valid block.
    pub evictions: u64,
    /// Stores propagated to the backing memory.
    pub write_throughs: u64,
}

impl CacheStats {
    /// Total requests.
    pub const fn accesses(&self) -> u64 {
        self.loads + self.stores
    }

    /// Total hits.
    pub const fn hits(&self) -> u64 {
        self.load_hits + self.store_hits
    }

    /// Total misses.
    pub const fn misses(&self) -> u64 {
        self.accesses() - self.hits()
    }

    /// Fraction of requests that hit, or 0 before any request.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses() == 0 {
            0.0
        } else {
            self.hits() as f64 / self.accesses() as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "CACHE STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "  accesses               {}", self.accesses())?;
        writeln!(
            f,
            "  loads                  {} ({} hits)",
            self.loads, self.load_hits
        )?;
        writeln!(
            f,
            "  stores                 {} ({} hits)",
            self.stores, self.store_hits
        )?;
        writeln!(f, "  misses                 {}", self.misses())?;
        writeln!(f, "  hit_rate               {:.2}%", self.hit_rate() * 100.0)?;
        writeln!(f, "  installs               {}", self.installs)?;
        writeln!(f, "  evictions              {}", self.evictions)?;
        writeln!(f, "  write_throughs         {}", self.write_throughs)?;
        write!(f, "==========================================================")
    }
}
