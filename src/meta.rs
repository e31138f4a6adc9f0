//! Per-Key Policy Metadata
//!
//! Bookkeeping that an eviction policy keeps for each tracked key.
//!
//! | Policy | Metadata Type | Description |
//! |--------|---------------|-------------|
//! | LRU    | none          | Position in the recency list is implicit |
//! | LFU    | [`LfuMeta`]   | Access count plus insertion sequence |
//!
//! # Usage
//!
//! ```
//! use storage_cache::meta::LfuMeta;
//!
//! let mut meta = LfuMeta::new(7);
//! assert_eq!(meta.frequency, 1);
//! assert_eq!(meta.inserted_at, 7);
//!
//! assert_eq!(meta.increment(), 2);
//! assert_eq!(meta.rank(), (2, 7));
//! ```

/// Metadata for a key tracked by the LFU policy.
///
/// Caching a key counts as its first access, so `frequency` starts at 1.
/// `inserted_at` is a sequence number taken from a per-policy counter when
/// the key was first tracked; it breaks ties between keys sharing the same
/// frequency so that the earliest inserted key is evicted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfuMeta {
    /// Number of accesses, including the insertion itself.
    pub frequency: u64,
    /// Insertion sequence number, unique within one policy instance.
    pub inserted_at: u64,
}

impl LfuMeta {
    /// Creates metadata for a freshly inserted key.
    #[inline]
    pub fn new(inserted_at: u64) -> Self {
        Self {
            frequency: 1,
            inserted_at,
        }
    }

    /// Increments the access count and returns the new value.
    #[inline]
    pub fn increment(&mut self) -> u64 {
        self.frequency = self.frequency.saturating_add(1);
        self.frequency
    }

    /// Eviction rank: lower ranks are evicted first.
    #[inline]
    pub fn rank(&self) -> (u64, u64) {
        (self.frequency, self.inserted_at)
    }
}
