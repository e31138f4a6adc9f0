//! Read-Through Cache Engine
//!
//! [`Cache`] keeps a bounded map of recently fetched values in front of a
//! slower [`Storage`]. A lookup is answered from the map when possible;
//! otherwise the value is fetched from storage, cached, and returned.
//!
//! # Lookup Flow
//!
//! ```text
//!   get(key) ──▶ key missing? ──yes──▶ Err(InvalidArgument)
//!                    │ no
//!                    ▼
//!              lookups += 1
//!                    │
//!          in bounded store? ──yes──▶ hits += 1, policy.record_access ──▶ Ok(value)
//!                    │ no
//!                    ▼
//!           storage.retrieve(key) ──None──▶ Err(ItemNotFound)
//!                    │ Some(value)
//!                    ▼
//!   full and key new? ──yes──▶ evict policy.select_victim()
//!                    │
//!                    ▼
//!        insert + policy.record_access ──▶ Ok(value)
//! ```
//!
//! # Eviction Timing
//!
//! A victim is chosen only when the store already holds `capacity` entries
//! **and** the incoming key is not one of them. The check happens before the
//! insert, so the store never grows past its capacity, not even briefly.
//!
//! # Thread Safety
//!
//! A `Cache` has a single logical owner; every operation takes `&mut self`
//! or `&self` and runs to completion. Share one across threads by wrapping
//! the whole engine in a mutex, or use `SharedCache` from the `concurrent`
//! feature.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;

use log::{debug, trace, warn};

use crate::error::CacheError;
use crate::metrics::{CacheMetrics, CacheStats};
use crate::policy::{DynPolicy, EvictionPolicy, LfuPolicy, LruPolicy};
use crate::storage::Storage;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// A bounded read-through cache in front of a [`Storage`].
///
/// `P` is the eviction policy. Caches built by
/// [`CacheFactory`](crate::CacheFactory) use a boxed policy chosen at runtime;
/// [`Cache::lru`], [`Cache::lfu`] and [`Cache::with_policy`] keep the policy
/// type static.
///
/// # Examples
///
/// ```
/// use storage_cache::Cache;
/// use std::collections::BTreeMap;
/// use core::num::NonZeroUsize;
///
/// let storage: BTreeMap<u32, &str> = [(1, "one"), (2, "two"), (3, "three")].into();
/// let mut cache = Cache::lru(storage, NonZeroUsize::new(2).unwrap());
///
/// assert_eq!(cache.get(&1), Ok("one"));   // miss, fetched from storage
/// assert_eq!(cache.get(&1), Ok("one"));   // hit
/// assert_eq!(cache.get(&2), Ok("two"));
/// assert_eq!(cache.get(&3), Ok("three")); // evicts 1
///
/// assert!(!cache.contains_key(&1));
/// assert_eq!(cache.values(), ["two", "three"]);
/// assert_eq!(cache.hit_rate(), 0.25);
/// ```
pub struct Cache<K, V, St, P = DynPolicy<K>, S = DefaultHashBuilder> {
    storage: St,
    capacity: NonZeroUsize,
    store: HashMap<K, V, S>,
    policy: P,
    stats: CacheStats,
}

impl<K, V, St> Cache<K, V, St, LruPolicy<K>>
where
    K: Hash + Eq + Clone,
{
    /// Creates a cache that evicts the least recently used entry.
    pub fn lru(storage: St, capacity: NonZeroUsize) -> Self {
        let policy =
            LruPolicy::with_capacity_and_hasher(capacity.get(), DefaultHashBuilder::default());
        Self::with_policy(storage, capacity, policy)
    }
}

impl<K, V, St> Cache<K, V, St, LfuPolicy<K>>
where
    K: Hash + Eq + Clone,
{
    /// Creates a cache that evicts the least frequently used entry.
    pub fn lfu(storage: St, capacity: NonZeroUsize) -> Self {
        let policy =
            LfuPolicy::with_capacity_and_hasher(capacity.get(), DefaultHashBuilder::default());
        Self::with_policy(storage, capacity, policy)
    }
}

impl<K, V, St, P> Cache<K, V, St, P>
where
    K: Hash + Eq,
{
    /// Creates a cache driven by an arbitrary eviction policy.
    ///
    /// The cache starts empty, so any keys `policy` already tracks are
    /// cleared.
    pub fn with_policy(storage: St, capacity: NonZeroUsize, policy: P) -> Self
    where
        P: EvictionPolicy<K>,
    {
        Self::with_policy_and_hasher(storage, capacity, policy, DefaultHashBuilder::default())
    }
}

impl<K, V, St, P, S> Cache<K, V, St, P, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a cache with a custom hasher for the bounded store.
    ///
    /// Any keys `policy` already tracks are cleared.
    pub fn with_policy_and_hasher(
        storage: St,
        capacity: NonZeroUsize,
        mut policy: P,
        hash_builder: S,
    ) -> Self
    where
        P: EvictionPolicy<K>,
    {
        if !policy.is_empty() {
            debug!(
                "{} policy handed over with {} tracked keys; clearing",
                policy.name(),
                policy.len()
            );
            policy.clear();
        }
        Cache {
            storage,
            capacity,
            store: HashMap::with_capacity_and_hasher(capacity.get(), hash_builder),
            policy,
            stats: CacheStats::new(),
        }
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Number of cached entries.
    #[inline]
    pub fn size(&self) -> usize {
        self.store.len()
    }

    /// Number of cached entries; same as [`Cache::size`].
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns `true` if `key` is cached. Never consults storage and leaves
    /// policy state and counters untouched.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.store.contains_key(key)
    }

    /// Returns the cached value for `key` without counting a lookup or
    /// touching the eviction order.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.store.get(key)
    }

    /// Fraction of lookups answered from the cache since creation or the
    /// last [`clear`](Cache::clear); 0.0 if there were none.
    #[inline]
    pub fn hit_rate(&self) -> f64 {
        self.stats.hit_rate()
    }

    /// Lookup and eviction counters.
    #[inline]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// The backing storage.
    #[inline]
    pub fn storage(&self) -> &St {
        &self.storage
    }

    /// The eviction policy.
    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<K, V, St, P, S> Cache<K, V, St, P, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    St: Storage<K, V>,
    P: EvictionPolicy<K>,
    S: BuildHasher,
{
    /// Looks up `key`, falling back to storage on a miss.
    ///
    /// `key` may be `&K` or an `Option<&K>`; `None` is rejected with
    /// [`CacheError::InvalidArgument`] before any counter changes. A key that
    /// neither the cache nor storage holds yields [`CacheError::ItemNotFound`]
    /// and leaves the cache contents as they were.
    pub fn get<'k, Q>(&mut self, key: Q) -> Result<V, CacheError>
    where
        Q: Into<Option<&'k K>>,
        K: 'k,
    {
        let key = key
            .into()
            .ok_or(CacheError::InvalidArgument("key cannot be missing"))?;

        if let Some(value) = self.store.get(key) {
            self.stats.record_hit();
            self.policy.record_access(key);
            trace!("{} cache hit", self.policy.name());
            return Ok(value.clone());
        }

        self.stats.record_miss();
        let Some(value) = self.storage.retrieve(key) else {
            self.stats.record_storage_miss();
            debug!("{} cache miss not satisfied by storage", self.policy.name());
            return Err(CacheError::ItemNotFound);
        };

        trace!("{} cache miss filled from storage", self.policy.name());
        self.add_to_cache(key.clone(), value.clone());
        Ok(value)
    }

    /// Cached values, next eviction victim first.
    pub fn values(&self) -> Vec<V> {
        self.policy
            .ordered_keys()
            .iter()
            .filter_map(|key| self.store.get(key).cloned())
            .collect()
    }

    /// Cached keys, next eviction victim first.
    pub fn keys(&self) -> Vec<K> {
        self.policy.ordered_keys()
    }

    /// Drops `key` from the cache, returning its value if it was cached.
    ///
    /// Does not count as a lookup or an eviction.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.store.remove(key)?;
        let tracked = self.policy.remove(key);
        debug_assert!(tracked, "cached key was not tracked by the policy");
        Some(value)
    }

    /// Empties the cache and the policy state and resets every counter.
    pub fn clear(&mut self) {
        self.store.clear();
        self.policy.clear();
        self.stats.reset();
        debug!("{} cache cleared", self.policy.name());
    }

    /// Name of the eviction policy, e.g. `"LRU"`.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Checks the structural invariants: the store is within capacity and
    /// holds exactly the keys the policy tracks.
    pub fn is_consistent(&self) -> bool {
        self.store.len() <= self.capacity.get()
            && self.policy.len() == self.store.len()
            && self.store.keys().all(|key| self.policy.contains(key))
    }

    fn add_to_cache(&mut self, key: K, value: V) {
        let full = self.store.len() == self.capacity.get();
        if full && !self.store.contains_key(&key) && !self.evict() {
            warn!(
                "{} policy gave no evictable victim for a full cache; value not cached",
                self.policy.name()
            );
            debug_assert!(false, "full cache without an evictable victim");
            return;
        }

        self.policy.record_access(&key);
        if self.store.insert(key, value).is_none() {
            self.stats.record_insertion();
        }
    }

    /// Removes the policy's victim from both the policy and the store.
    ///
    /// Victims the store does not hold are dropped from the policy and the
    /// next one is tried.
    fn evict(&mut self) -> bool {
        loop {
            let Some(victim) = self.policy.select_victim().cloned() else {
                return false;
            };
            if !self.policy.remove(&victim) {
                return false;
            }
            if self.store.remove(&victim).is_some() {
                break;
            }
            debug!(
                "{} policy tracked a key the store did not hold; dropped it",
                self.policy.name()
            );
        }

        self.stats.record_eviction();
        debug!(
            "{} evicted an entry ({} evictions so far)",
            self.policy.name(),
            self.stats.evictions
        );
        true
    }
}

impl<K, V, St, P, S> CacheMetrics for Cache<K, V, St, P, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    St: Storage<K, V>,
    P: EvictionPolicy<K>,
    S: BuildHasher,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.stats.to_btreemap();
        metrics.insert("size".to_string(), self.store.len() as f64);
        metrics.insert("capacity".to_string(), self.capacity.get() as f64);
        metrics.insert(
            "utilization".to_string(),
            self.store.len() as f64 / self.capacity.get() as f64,
        );
        metrics
    }

    fn algorithm_name(&self) -> &'static str {
        self.policy.name()
    }
}

impl<K, V, St, P, S> fmt::Debug for Cache<K, V, St, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("capacity", &self.capacity)
            .field("len", &self.store.len())
            .field("stats", &self.stats)
            .finish()
    }
}
