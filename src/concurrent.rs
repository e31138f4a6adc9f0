//! Shared Cache
//!
//! [`SharedCache`] puts a whole [`Cache`] behind a single
//! `parking_lot::Mutex` so it can be used from several threads.
//!
//! Every lookup mutates policy state and counters, so there is no read-only
//! path a `RwLock` could serve. One lock around the engine keeps eviction
//! order global and the counters exact; a slow storage holds the lock for
//! the duration of its `retrieve`.
//!
//! # Example
//!
//! ```rust
//! use storage_cache::{CacheFactory, PolicyKind, SharedCache};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let storage: HashMap<u32, u32> = (0..100).map(|k| (k, k * 2)).collect();
//! let cache = CacheFactory::create(storage, 10, PolicyKind::Lru).unwrap();
//! let shared = Arc::new(SharedCache::new(cache));
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let shared = Arc::clone(&shared);
//!         thread::spawn(move || {
//!             for k in 0..25 {
//!                 assert_eq!(shared.get(&(t * 25 + k)), Ok((t * 25 + k) * 2));
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(shared.size(), 10);
//! assert_eq!(shared.stats().total_lookups, 100);
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;

use parking_lot::Mutex;

use crate::cache::Cache;
use crate::error::CacheError;
use crate::metrics::{CacheMetrics, CacheStats};
use crate::policy::{DynPolicy, EvictionPolicy};
use crate::storage::Storage;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A [`Cache`] guarded by one mutex, usable through `&self`.
///
/// `SharedCache` is `Sync` whenever the wrapped engine is `Send`, which holds
/// for factory-built caches over a `Send` storage.
pub struct SharedCache<K, V, St, P = DynPolicy<K>, S = DefaultHashBuilder> {
    inner: Mutex<Cache<K, V, St, P, S>>,
}

impl<K, V, St, P, S> SharedCache<K, V, St, P, S> {
    /// Wraps an engine.
    pub fn new(cache: Cache<K, V, St, P, S>) -> Self {
        SharedCache {
            inner: Mutex::new(cache),
        }
    }

    /// Unwraps the engine.
    pub fn into_inner(self) -> Cache<K, V, St, P, S> {
        self.inner.into_inner()
    }

    /// Runs `f` with exclusive access to the engine.
    ///
    /// Use this to group several operations under one lock acquisition.
    pub fn with_cache<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cache<K, V, St, P, S>) -> R,
    {
        let mut cache = self.inner.lock();
        f(&mut cache)
    }
}

impl<K, V, St, P, S> SharedCache<K, V, St, P, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Maximum number of entries.
    pub fn capacity(&self) -> NonZeroUsize {
        self.inner.lock().capacity()
    }

    /// Number of cached entries.
    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }

    /// Returns `true` if `key` is cached, without touching eviction order.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.lock().contains_key(key)
    }

    /// Fraction of lookups answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        self.inner.lock().hit_rate()
    }

    /// Snapshot of the lookup and eviction counters.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats().clone()
    }
}

impl<K, V, St, P, S> SharedCache<K, V, St, P, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    St: Storage<K, V>,
    P: EvictionPolicy<K>,
    S: BuildHasher,
{
    /// Looks up `key`, falling back to storage on a miss.
    ///
    /// Same contract as [`Cache::get`]. The lock is held across the storage
    /// fetch, so concurrent misses on one key fetch it once.
    pub fn get<'k, Q>(&self, key: Q) -> Result<V, CacheError>
    where
        Q: Into<Option<&'k K>>,
        K: 'k,
    {
        self.inner.lock().get(key)
    }

    /// Cached values, next eviction victim first.
    pub fn values(&self) -> Vec<V> {
        self.inner.lock().values()
    }

    /// Cached keys, next eviction victim first.
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().keys()
    }

    /// Drops `key` from the cache, returning its value if it was cached.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Empties the cache and resets every counter.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<K, V, St, P, S> CacheMetrics for SharedCache<K, V, St, P, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    St: Storage<K, V>,
    P: EvictionPolicy<K>,
    S: BuildHasher,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.inner.lock().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.inner.lock().algorithm_name()
    }
}

impl<K, V, St, P, S> From<Cache<K, V, St, P, S>> for SharedCache<K, V, St, P, S> {
    fn from(cache: Cache<K, V, St, P, S>) -> Self {
        Self::new(cache)
    }
}

impl<K, V, St, P, S> core::fmt::Debug for SharedCache<K, V, St, P, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.inner.try_lock() {
            Some(cache) => f.debug_struct("SharedCache").field("cache", &*cache).finish(),
            None => f
                .debug_struct("SharedCache")
                .field("cache", &"<locked>")
                .finish(),
        }
    }
}
