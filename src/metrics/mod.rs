//! Cache Metrics
//!
//! Lookup and eviction counters owned by a single cache instance, plus a
//! reporting trait that flattens them into named values.
//!
//! Counters only grow; the one way to bring them back to zero is
//! [`Cache::clear`](crate::Cache::clear).
//!
//! # Why BTreeMap?
//!
//! Reports are returned as a `BTreeMap` so metric names always come out in
//! the same order, which keeps test assertions and log lines stable.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Lookup and eviction counters for one cache instance.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups with a usable key, hits and misses alike
    pub total_lookups: u64,

    /// Lookups answered from the bounded store
    pub successful_hits: u64,

    /// Misses for which storage had no value either
    pub storage_misses: u64,

    /// Entries added to the bounded store
    pub insertions: u64,

    /// Entries removed to make room for a new key
    pub evictions: u64,
}

impl CacheStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup answered from the cache.
    #[inline]
    pub fn record_hit(&mut self) {
        self.total_lookups += 1;
        self.successful_hits += 1;
    }

    /// Records a lookup that had to go to storage.
    #[inline]
    pub fn record_miss(&mut self) {
        self.total_lookups += 1;
    }

    /// Records a miss that storage could not satisfy.
    #[inline]
    pub fn record_storage_miss(&mut self) {
        self.storage_misses += 1;
    }

    /// Records a new entry in the bounded store.
    #[inline]
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records a capacity eviction.
    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Lookups that were not answered from the cache.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.total_lookups - self.successful_hits
    }

    /// Fraction of lookups answered from the cache, 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        if self.total_lookups == 0 {
            0.0
        } else {
            self.successful_hits as f64 / self.total_lookups as f64
        }
    }

    /// Fraction of lookups that went to storage, 0.0 before any lookup.
    pub fn miss_rate(&self) -> f64 {
        if self.total_lookups == 0 {
            0.0
        } else {
            self.misses() as f64 / self.total_lookups as f64
        }
    }

    /// Resets every counter to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Flattens the counters into a report keyed by metric name.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("requests".to_string(), self.total_lookups as f64);
        metrics.insert("cache_hits".to_string(), self.successful_hits as f64);
        metrics.insert("cache_misses".to_string(), self.misses() as f64);
        metrics.insert("storage_misses".to_string(), self.storage_misses as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.total_lookups > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.total_lookups as f64,
            );
        }

        metrics
    }
}

/// Uniform metrics reporting for anything that wraps a cache.
pub trait CacheMetrics {
    /// Returns all metrics as name/value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Name of the eviction algorithm in use, e.g. `"LRU"` or `"LFU"`.
    fn algorithm_name(&self) -> &'static str;
}
