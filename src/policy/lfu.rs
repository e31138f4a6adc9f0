//! Least Frequently Used (LFU) Eviction Policy
//!
//! Counts accesses per tracked key and evicts the key with the fewest. The
//! first access is the insertion itself, so a freshly cached key starts at a
//! count of 1.
//!
//! # Tie-Break
//!
//! Among keys sharing the minimum count, the one inserted into the cache
//! earliest is evicted. Each key receives a sequence number from a
//! per-policy counter when it starts being tracked (see
//! [`LfuMeta`](crate::meta::LfuMeta)); the counter restarts on `clear`.
//!
//! # Data Structure
//!
//! Keys are grouped into frequency buckets kept in a `BTreeMap`, and within a
//! bucket they are ordered by insertion sequence:
//!
//! ```text
//! frequency ──▶ { inserted_at ──▶ key }
//!     1     ──▶ { 4 ──▶ "d", 7 ──▶ "g" }      ◀── victim is "d"
//!     3     ──▶ { 0 ──▶ "a" }
//!     5     ──▶ { 1 ──▶ "b", 2 ──▶ "c" }
//! ```
//!
//! # Performance Characteristics
//!
//! - `record_access`: O(log n)
//! - `select_victim`: O(log n)
//! - `remove`: O(log n)
//! - `ordered_keys`: O(n)

use crate::meta::LfuMeta;
use crate::policy::EvictionPolicy;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Frequency-ordered eviction policy with insertion-order tie-break.
///
/// # Examples
///
/// ```
/// use storage_cache::policy::{EvictionPolicy, LfuPolicy};
///
/// let mut policy = LfuPolicy::new();
/// policy.record_access(&"cold");
/// policy.record_access(&"hot");
/// policy.record_access(&"hot");
///
/// assert_eq!(policy.frequency(&"hot"), Some(2));
/// assert_eq!(policy.select_victim(), Some(&"cold"));
/// ```
pub struct LfuPolicy<K, S = DefaultHashBuilder> {
    /// Per-key access count and insertion sequence
    meta: HashMap<K, LfuMeta, S>,

    /// frequency -> (insertion sequence -> key)
    buckets: BTreeMap<u64, BTreeMap<u64, K>>,

    /// Sequence number handed to the next newly tracked key
    next_seq: u64,
}

impl<K: Hash + Eq> LfuPolicy<K> {
    /// Creates an empty LFU policy.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq> Default for LfuPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, S: BuildHasher> LfuPolicy<K, S> {
    /// Creates an empty LFU policy using `hash_builder` for its key index.
    pub fn with_hasher(hash_builder: S) -> Self {
        LfuPolicy {
            meta: HashMap::with_hasher(hash_builder),
            buckets: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Creates an empty LFU policy sized for `capacity` keys.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        LfuPolicy {
            meta: HashMap::with_capacity_and_hasher(capacity, hash_builder),
            buckets: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Returns the access count of a tracked key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.meta.get(key).map(|m| m.frequency)
    }

    /// Returns the full metadata of a tracked key.
    pub fn meta(&self, key: &K) -> Option<&LfuMeta> {
        self.meta.get(key)
    }

    /// Lowest access count among tracked keys.
    pub fn min_frequency(&self) -> Option<u64> {
        self.buckets.keys().next().copied()
    }

    fn take_from_bucket(&mut self, meta: LfuMeta) -> Option<K> {
        let bucket = self.buckets.get_mut(&meta.frequency)?;
        let key = bucket.remove(&meta.inserted_at);
        if bucket.is_empty() {
            self.buckets.remove(&meta.frequency);
        }
        key
    }
}

impl<K, S> EvictionPolicy<K> for LfuPolicy<K, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    fn record_access(&mut self, key: &K) {
        let Some(current) = self.meta.get(key).copied() else {
            let meta = LfuMeta::new(self.next_seq);
            self.next_seq += 1;
            self.buckets
                .entry(meta.frequency)
                .or_default()
                .insert(meta.inserted_at, key.clone());
            self.meta.insert(key.clone(), meta);
            return;
        };

        let mut updated = current;
        updated.increment();
        if updated == current {
            // Count saturated; position is unchanged
            return;
        }

        let owned = self
            .take_from_bucket(current)
            .unwrap_or_else(|| key.clone());
        self.buckets
            .entry(updated.frequency)
            .or_default()
            .insert(updated.inserted_at, owned);
        if let Some(meta) = self.meta.get_mut(key) {
            *meta = updated;
        }
    }

    fn select_victim(&self) -> Option<&K> {
        self.buckets
            .values()
            .next()
            .and_then(|bucket| bucket.values().next())
    }

    fn remove(&mut self, key: &K) -> bool {
        match self.meta.remove(key) {
            Some(meta) => {
                let removed = self.take_from_bucket(meta);
                debug_assert!(removed.is_some(), "tracked key missing from its bucket");
                true
            }
            None => false,
        }
    }

    fn ordered_keys(&self) -> Vec<K> {
        self.buckets
            .values()
            .flat_map(|bucket| bucket.values())
            .cloned()
            .collect()
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.meta.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.meta.len()
    }

    fn clear(&mut self) {
        self.meta.clear();
        self.buckets.clear();
        self.next_seq = 0;
    }

    fn name(&self) -> &'static str {
        "LFU"
    }
}

impl<K, S> fmt::Debug for LfuPolicy<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuPolicy")
            .field("len", &self.meta.len())
            .field("min_frequency", &self.buckets.keys().next())
            .field("next_seq", &self.next_seq)
            .finish()
    }
}
