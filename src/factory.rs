//! Cache Factory
//!
//! Builds a [`Cache`] whose eviction policy is picked at runtime, from a
//! [`PolicyKind`], a policy name or a [`CacheConfig`]. The policy ends up
//! boxed behind [`DynPolicy`], so caches built with different policies share
//! one type.
//!
//! Every constructor validates its arguments up front and fails with
//! [`CacheError::InvalidArgument`] without building anything.
//!
//! ```
//! use storage_cache::{CacheFactory, PolicyKind};
//! use std::collections::BTreeMap;
//!
//! let storage: BTreeMap<&str, u32> = [("a", 1), ("b", 2)].into_iter().collect();
//!
//! let mut cache = CacheFactory::create(storage, 16, PolicyKind::Lfu).unwrap();
//! assert_eq!(cache.get(&"a"), Ok(1));
//! assert_eq!(cache.policy_name(), "LFU");
//!
//! assert!(CacheFactory::create(BTreeMap::<&str, u32>::new(), 0, PolicyKind::Lru).is_err());
//! ```

use alloc::boxed::Box;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;

use log::debug;

use crate::cache::Cache;
use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::policy::{DynPolicy, LfuPolicy, LruPolicy, PolicyKind};
use crate::storage::Storage;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// Constructs caches bound to a storage, a capacity and a policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheFactory;

impl CacheFactory {
    /// Creates a cache with `capacity` entries evicting per `policy`.
    ///
    /// Fails with [`CacheError::InvalidArgument`] if `capacity` is zero.
    pub fn create<K, V, St>(
        storage: St,
        capacity: usize,
        policy: PolicyKind,
    ) -> Result<Cache<K, V, St>, CacheError>
    where
        K: Hash + Eq + Clone + Send + 'static,
        St: Storage<K, V>,
    {
        let config = CacheConfig::new(capacity, policy)?;
        Ok(Self::from_config(storage, config))
    }

    /// Creates a cache from a policy name such as `"lru"`, `"LFU"` or
    /// `"least-recently-used"`.
    ///
    /// Fails with [`CacheError::InvalidArgument`] if `capacity` is zero or the
    /// name is not recognised.
    pub fn create_named<K, V, St>(
        storage: St,
        capacity: usize,
        policy: &str,
    ) -> Result<Cache<K, V, St>, CacheError>
    where
        K: Hash + Eq + Clone + Send + 'static,
        St: Storage<K, V>,
    {
        let config = CacheConfig::from_names(capacity, policy)?;
        Ok(Self::from_config(storage, config))
    }

    /// Creates a cache from an already validated configuration.
    pub fn from_config<K, V, St>(storage: St, config: CacheConfig) -> Cache<K, V, St>
    where
        K: Hash + Eq + Clone + Send + 'static,
        St: Storage<K, V>,
    {
        Self::from_config_with_hasher(storage, config, DefaultHashBuilder::default())
    }

    /// Creates a cache from a configuration with a custom hasher for the
    /// bounded store and the policy's key index.
    pub fn from_config_with_hasher<K, V, St, S>(
        storage: St,
        config: CacheConfig,
        hash_builder: S,
    ) -> Cache<K, V, St, DynPolicy<K>, S>
    where
        K: Hash + Eq + Clone + Send + 'static,
        St: Storage<K, V>,
        S: BuildHasher + Clone + Send + 'static,
    {
        debug!(
            "creating {} cache with capacity {}",
            config.policy,
            config.capacity
        );
        let policy = Self::policy(config.policy, config.capacity, hash_builder.clone());
        Cache::with_policy_and_hasher(storage, config.capacity, policy, hash_builder)
    }

    /// Builds a boxed policy of the requested kind.
    pub fn policy<K, S>(kind: PolicyKind, capacity: NonZeroUsize, hash_builder: S) -> DynPolicy<K>
    where
        K: Hash + Eq + Clone + Send + 'static,
        S: BuildHasher + Send + 'static,
    {
        match kind {
            PolicyKind::Lru => Box::new(LruPolicy::with_capacity_and_hasher(
                capacity.get(),
                hash_builder,
            )),
            PolicyKind::Lfu => Box::new(LfuPolicy::with_capacity_and_hasher(
                capacity.get(),
                hash_builder,
            )),
        }
    }
}
