//! Least Recently Used (LRU) Eviction Policy
//!
//! Keeps tracked keys in order of recency: every access moves a key to the
//! most recent end, and the victim is always the key at the opposite end.
//! Insertion counts as an access, so a freshly cached key is the last one to
//! be evicted until something else is touched.
//!
//! # Performance Characteristics
//!
//! - `record_access`: O(1)
//! - `select_victim`: O(1)
//! - `remove`: O(1)
//! - `ordered_keys`: O(n)
//!
//! The ordering is total (it is the access order itself), so ties never
//! occur.
//!
//! # Thread Safety
//!
//! Not thread-safe on its own. Like the cache that owns it, wrap it in a
//! `Mutex` for shared use.

use crate::list::{List, Node};
use crate::policy::EvictionPolicy;
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

/// Recency-ordered eviction policy.
///
/// # Safety
///
/// `map` holds raw pointers into `list`. A pointer is valid while its key is
/// present in `map`; every path that unlinks a node removes the key from
/// `map` first.
///
/// # Examples
///
/// ```
/// use storage_cache::policy::{EvictionPolicy, LruPolicy};
///
/// let mut policy = LruPolicy::new();
/// policy.record_access(&"a");
/// policy.record_access(&"b");
/// policy.record_access(&"a");
///
/// assert_eq!(policy.select_victim(), Some(&"b"));
/// assert_eq!(policy.ordered_keys(), ["b", "a"]);
/// ```
pub struct LruPolicy<K, S = DefaultHashBuilder> {
    list: List<K>,
    map: HashMap<K, *mut Node<K>, S>,
}

// SAFETY: LruPolicy owns every node its pointers refer to; moving it to another
// thread moves the nodes with it.
unsafe impl<K: Send, S: Send> Send for LruPolicy<K, S> {}

// SAFETY: all mutation goes through &mut self.
unsafe impl<K: Sync, S: Sync> Sync for LruPolicy<K, S> {}

impl<K: Hash + Eq> LruPolicy<K> {
    /// Creates an empty LRU policy.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq> Default for LruPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, S: BuildHasher> LruPolicy<K, S> {
    /// Creates an empty LRU policy using `hash_builder` for its key index.
    pub fn with_hasher(hash_builder: S) -> Self {
        LruPolicy {
            list: List::new(),
            map: HashMap::with_hasher(hash_builder),
        }
    }

    /// Creates an empty LRU policy sized for `capacity` keys.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        LruPolicy {
            list: List::new(),
            map: HashMap::with_capacity_and_hasher(capacity, hash_builder),
        }
    }
}

impl<K, S> EvictionPolicy<K> for LruPolicy<K, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    fn record_access(&mut self, key: &K) {
        if let Some(&node) = self.map.get(key) {
            // SAFETY: node comes from our map, so it is linked into our list
            unsafe { self.list.move_to_back(node) };
            return;
        }

        let node = self.list.push_back(key.clone());
        self.map.insert(key.clone(), node);
    }

    fn select_victim(&self) -> Option<&K> {
        self.list.front()
    }

    fn remove(&mut self, key: &K) -> bool {
        match self.map.remove(key) {
            Some(node) => {
                // SAFETY: node came from our map and is unlinked exactly once here
                drop(unsafe { self.list.unlink(node) });
                true
            }
            None => false,
        }
    }

    fn ordered_keys(&self) -> Vec<K> {
        self.list.iter().cloned().collect()
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        debug_assert_eq!(self.map.len(), self.list.len());
        self.map.len()
    }

    fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }

    fn name(&self) -> &'static str {
        "LRU"
    }
}

impl<K, S> fmt::Debug for LruPolicy<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruPolicy")
            .field("len", &self.list.len())
            .finish()
    }
}
