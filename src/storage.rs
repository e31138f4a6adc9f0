//! Primary Storage Abstraction
//!
//! The cache sits in front of a slower, authoritative store. All the cache
//! needs from it is a single lookup that either produces a value or reports
//! that the key does not exist.
//!
//! Absence is a plain `None`, not an error. A storage backend that can fail
//! (disk, network) decides for itself how to map those failures; the cache
//! treats anything other than `Some` as "not there".
//!
//! # Provided Implementations
//!
//! | Type | Notes |
//! |------|-------|
//! | `hashbrown::HashMap<K, V, S>` | Clones the stored value |
//! | `std::collections::HashMap<K, V, S>` | Needs `std` or no `hashbrown`; clones the stored value |
//! | `BTreeMap<K, V>` | Clones the stored value |
//! | `&T`, `Box<T>` where `T: Storage` | Delegates |
//! | [`FnStorage`] | Wraps a closure, see [`from_fn`] |
//!
//! # Example
//!
//! ```
//! use storage_cache::storage::{self, Storage};
//!
//! let squares = storage::from_fn(|n: &u64| n.checked_mul(*n));
//! assert_eq!(squares.retrieve(&12), Some(144));
//! assert_eq!(squares.retrieve(&u64::MAX), None);
//! ```

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Authoritative source of values behind a cache.
pub trait Storage<K, V> {
    /// Returns the value stored under `key`, or `None` if there is none.
    fn retrieve(&self, key: &K) -> Option<V>;
}

impl<K, V, S> Storage<K, V> for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Clone,
    S: BuildHasher,
{
    fn retrieve(&self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }
}

#[cfg(all(feature = "std", feature = "hashbrown"))]
impl<K, V, S> Storage<K, V> for std::collections::HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Clone,
    S: BuildHasher,
{
    fn retrieve(&self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }
}

impl<K: Ord, V: Clone> Storage<K, V> for BTreeMap<K, V> {
    fn retrieve(&self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }
}

impl<K, V, T> Storage<K, V> for &T
where
    T: Storage<K, V> + ?Sized,
{
    #[inline]
    fn retrieve(&self, key: &K) -> Option<V> {
        (**self).retrieve(key)
    }
}

impl<K, V, T> Storage<K, V> for Box<T>
where
    T: Storage<K, V> + ?Sized,
{
    #[inline]
    fn retrieve(&self, key: &K) -> Option<V> {
        (**self).retrieve(key)
    }
}

/// Storage backed by a lookup closure.
///
/// Created with [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnStorage<F> {
    lookup: F,
}

/// Wraps a closure as a [`Storage`].
pub fn from_fn<K, V, F>(lookup: F) -> FnStorage<F>
where
    F: Fn(&K) -> Option<V>,
{
    FnStorage { lookup }
}

impl<K, V, F> Storage<K, V> for FnStorage<F>
where
    F: Fn(&K) -> Option<V>,
{
    #[inline]
    fn retrieve(&self, key: &K) -> Option<V> {
        (self.lookup)(key)
    }
}

impl<F> fmt::Debug for FnStorage<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStorage").finish_non_exhaustive()
    }
}
