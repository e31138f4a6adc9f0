#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Lookup Path
//!
//! ```text
//!  caller ──get(key)──▶ ┌──────────────────────────┐
//!                       │ Cache                    │
//!                       │  store: HashMap<K, V>    │──hit──▶ value
//!                       │  policy: EvictionPolicy  │
//!                       │  stats: CacheStats       │
//!                       └────────────┬─────────────┘
//!                                    │ miss
//!                                    ▼
//!                       ┌──────────────────────────┐
//!                       │ Storage::retrieve(key)   │──None──▶ ItemNotFound
//!                       └────────────┬─────────────┘
//!                                    │ Some(value)
//!                                    ▼
//!                     evict victim if full, insert, return value
//! ```
//!
//! ## Quick Reference
//!
//! | Policy | Evicts | Tie-break | Access cost |
//! |--------|--------|-----------|-------------|
//! | [`LruPolicy`] | Least recently used key | n/a | O(1) |
//! | [`LfuPolicy`] | Lowest access count | Earliest inserted | O(log n) |
//!
//! ## Code Examples
//!
//! ### Choosing a policy at runtime
//!
//! ```rust
//! use storage_cache::{CacheFactory, CacheError};
//! use std::collections::BTreeMap;
//!
//! let storage: BTreeMap<u32, &str> = [(1, "one"), (2, "two"), (3, "three")].into_iter().collect();
//! let mut cache = CacheFactory::create_named(&storage, 2, "lfu").unwrap();
//!
//! cache.get(&1).unwrap();
//! cache.get(&1).unwrap();
//! cache.get(&2).unwrap();
//! cache.get(&3).unwrap();   // 2 has the lowest count and is evicted
//!
//! assert_eq!(cache.keys(), [3, 1]);
//! assert_eq!(cache.get(&4), Err(CacheError::ItemNotFound));
//! ```
//!
//! ### Static policy type
//!
//! ```rust
//! use storage_cache::Cache;
//! use storage_cache::storage;
//! use core::num::NonZeroUsize;
//!
//! let lengths = storage::from_fn(|word: &&str| Some(word.len()));
//! let mut cache = Cache::lru(lengths, NonZeroUsize::new(100).unwrap());
//! assert_eq!(cache.get(&"cache"), Ok(5));
//! assert_eq!(cache.policy_name(), "LRU");
//! ```
//!
//! ## Modules
//!
//! - [`cache`]: The read-through engine
//! - [`policy`]: Eviction policy trait with LRU and LFU implementations
//! - [`storage`]: The storage trait and its provided implementations
//! - [`factory`]: Runtime construction from a capacity and a policy kind
//! - [`config`]: Validated cache configuration
//! - [`error`]: Error type shared by every fallible operation
//! - [`metrics`]: Lookup counters and metrics reporting
//! - [`concurrent`]: Mutex-guarded shared cache (requires `concurrent` feature)

#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", not(feature = "hashbrown")))]
extern crate std;

/// Error type for cache operations.
pub mod error;

/// Per-entry bookkeeping for frequency-based eviction.
pub mod meta;

/// Doubly linked list with stable node addresses, used for recency order.
///
/// **Note**: This module is internal infrastructure. It exposes raw pointer
/// operations whose safety depends on the caller keeping node handles in sync
/// with the list.
pub(crate) mod list;

/// Primary storage abstraction.
pub mod storage;

/// Eviction policies.
///
/// Defines the [`EvictionPolicy`] trait and the LRU and LFU implementations
/// the engine delegates victim selection to.
pub mod policy;

/// Cache configuration.
pub mod config;

/// Cache metrics.
///
/// Provides the counters every cache keeps and a reporting trait that
/// flattens them into name/value pairs.
pub mod metrics;

/// Read-through cache engine.
pub mod cache;

/// Runtime cache construction.
pub mod factory;

/// Thread-safe wrapper around a cache.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use cache::Cache;
pub use config::CacheConfig;
pub use error::CacheError;
pub use factory::CacheFactory;
pub use metrics::{CacheMetrics, CacheStats};
pub use policy::{DynPolicy, EvictionPolicy, LfuPolicy, LruPolicy, PolicyKind};
pub use storage::Storage;

#[cfg(feature = "concurrent")]
pub use concurrent::SharedCache;
