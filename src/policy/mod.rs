//! Eviction Policies
//!
//! An eviction policy decides which key leaves a full cache. It only ever
//! sees keys: the cached values live in the engine's bounded store, and the
//! policy keeps whatever ordering it needs over the same key set.
//!
//! # Contract
//!
//! The engine drives a policy through four calls:
//!
//! | Call | When |
//! |------|------|
//! | [`record_access`](EvictionPolicy::record_access) | On every insertion and every cache hit |
//! | [`select_victim`](EvictionPolicy::select_victim) | When a new key arrives at a full cache |
//! | [`remove`](EvictionPolicy::remove) | After the victim (or an invalidated key) leaves the store |
//! | [`ordered_keys`](EvictionPolicy::ordered_keys) | To build an ordered snapshot of the cache |
//!
//! The policy never tracks a key the store does not hold, and the store never
//! holds a key the policy does not track.
//!
//! # Available Policies
//!
//! | Policy | Type | Victim |
//! |--------|------|--------|
//! | LRU | [`LruPolicy`] | Least recently accessed key |
//! | LFU | [`LfuPolicy`] | Fewest accesses, earliest inserted on ties |

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::error::CacheError;

pub mod lfu;
pub mod lru;

pub use lfu::LfuPolicy;
pub use lru::LruPolicy;

/// Bookkeeping behind a bounded cache's eviction decisions.
///
/// Implementations must keep every operation consistent with a set of
/// tracked keys: a key becomes tracked on its first `record_access` and
/// stops being tracked on `remove` or `clear`. No key is tracked twice.
pub trait EvictionPolicy<K> {
    /// Records an access to `key`, starting to track it if it is new.
    ///
    /// Inserting a key into the cache counts as its first access.
    fn record_access(&mut self, key: &K);

    /// Returns the key that should be evicted next, without removing it.
    ///
    /// Returns `None` only when no key is tracked.
    fn select_victim(&self) -> Option<&K>;

    /// Stops tracking `key`. Returns `false` if it was not tracked.
    fn remove(&mut self, key: &K) -> bool;

    /// Returns all tracked keys, next victim first.
    fn ordered_keys(&self) -> Vec<K>;

    /// Returns `true` if `key` is tracked.
    fn contains(&self, key: &K) -> bool;

    /// Number of tracked keys.
    fn len(&self) -> usize;

    /// Returns `true` if no key is tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every tracked key and resets internal counters.
    fn clear(&mut self);

    /// Short identifier of the policy, e.g. `"LRU"`.
    fn name(&self) -> &'static str;
}

impl<K, P> EvictionPolicy<K> for Box<P>
where
    P: EvictionPolicy<K> + ?Sized,
{
    #[inline]
    fn record_access(&mut self, key: &K) {
        (**self).record_access(key)
    }

    #[inline]
    fn select_victim(&self) -> Option<&K> {
        (**self).select_victim()
    }

    #[inline]
    fn remove(&mut self, key: &K) -> bool {
        (**self).remove(key)
    }

    #[inline]
    fn ordered_keys(&self) -> Vec<K> {
        (**self).ordered_keys()
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        (**self).contains(key)
    }

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    #[inline]
    fn clear(&mut self) {
        (**self).clear()
    }

    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// A policy chosen at runtime, as produced by [`CacheFactory`](crate::CacheFactory).
pub type DynPolicy<K> = Box<dyn EvictionPolicy<K> + Send>;

/// The eviction policies a cache can be built with.
///
/// Parses from its common spellings, ignoring case and treating `-` and `_`
/// alike:
///
/// ```
/// use storage_cache::PolicyKind;
///
/// assert_eq!("lru".parse::<PolicyKind>(), Ok(PolicyKind::Lru));
/// assert_eq!("Least-Frequently-Used".parse::<PolicyKind>(), Ok(PolicyKind::Lfu));
/// assert!("fifo".parse::<PolicyKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolicyKind {
    /// Least Recently Used.
    #[default]
    Lru,
    /// Least Frequently Used with insertion-order tie-break.
    Lfu,
}

impl PolicyKind {
    /// All supported policies.
    pub const ALL: [PolicyKind; 2] = [PolicyKind::Lru, PolicyKind::Lfu];

    /// Canonical short name, matching [`EvictionPolicy::name`].
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Lru => "LRU",
            PolicyKind::Lfu => "LFU",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let matches = |name: &str| {
            s.len() == name.len()
                && s.bytes().zip(name.bytes()).all(|(a, b)| {
                    let a = if a == b'-' { b'_' } else { a };
                    a.eq_ignore_ascii_case(&b)
                })
        };

        if matches("lru") || matches("least_recently_used") {
            Ok(PolicyKind::Lru)
        } else if matches("lfu") || matches("least_frequently_used") {
            Ok(PolicyKind::Lfu)
        } else {
            Err(CacheError::InvalidArgument("unrecognized eviction policy"))
        }
    }
}
