//! Correctness Tests for the Read-Through Cache
//!
//! These tests drive caches built by `CacheFactory` through small,
//! deterministic access patterns and check which key is evicted, what the
//! storage was asked for, and how the hit rate evolves.
//!
//! ## Test Strategy
//! - Small capacities (1-5 entries) for predictable behavior
//! - A counting storage in place of a mock, so tests can assert how often
//!   `retrieve` ran and with which keys
//! - Structural invariants checked after every mutating step

use std::cell::RefCell;
use std::collections::HashMap;

use storage_cache::{Cache, CacheError, CacheFactory, CacheMetrics, PolicyKind, Storage};

const MIN_CAPACITY: usize = 1;
const CAPACITY: usize = 16;

// ============================================================================
// HELPERS
// ============================================================================

/// Storage that answers from a map and records every key it was asked for.
#[derive(Default)]
struct RecordingStorage {
    items: HashMap<i32, i32>,
    requests: RefCell<Vec<i32>>,
}

impl RecordingStorage {
    /// Storage where each listed key maps to itself.
    fn identity(keys: &[i32]) -> Self {
        RecordingStorage {
            items: keys.iter().map(|&k| (k, k)).collect(),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    fn calls_for(&self, key: i32) -> usize {
        self.requests.borrow().iter().filter(|&&k| k == key).count()
    }
}

impl Storage<i32, i32> for RecordingStorage {
    fn retrieve(&self, key: &i32) -> Option<i32> {
        self.requests.borrow_mut().push(*key);
        self.items.get(key).copied()
    }
}

type TestCache = Cache<i32, i32, RecordingStorage>;

fn make_cache(keys: &[i32], capacity: usize, policy: PolicyKind) -> TestCache {
    CacheFactory::create(RecordingStorage::identity(keys), capacity, policy).unwrap()
}

fn assert_consistent(cache: &TestCache) {
    assert!(cache.size() <= cache.capacity().get(), "size exceeds capacity");
    assert!(cache.is_consistent(), "store and policy disagree");
}

// ============================================================================
// BEHAVIOR SHARED BY BOTH POLICIES
// ============================================================================

#[test]
fn test_initial_size() {
    for policy in PolicyKind::ALL {
        let cache = make_cache(&[], CAPACITY, policy);
        assert_eq!(cache.size(), 0);
        assert_eq!(cache.hit_rate(), 0.0);
        assert!(cache.values().is_empty());
    }
}

#[test]
fn test_get_with_missing_key() {
    for policy in PolicyKind::ALL {
        let mut cache = make_cache(&[0], CAPACITY, policy);
        assert!(cache.get(None).unwrap_err().is_invalid_argument());
        assert_eq!(cache.stats().total_lookups, 0);
        assert_eq!(cache.storage().calls(), 0);
    }
}

#[test]
fn test_get_with_unavailable_item() {
    for policy in PolicyKind::ALL {
        let mut cache = make_cache(&[], CAPACITY, policy);
        assert_eq!(cache.get(&0), Err(CacheError::ItemNotFound));
        assert_eq!(cache.size(), 0);
        assert_eq!(cache.storage().calls_for(0), 1);
        assert_consistent(&cache);
    }
}

#[test]
fn test_get_from_primary_storage() {
    for policy in PolicyKind::ALL {
        let mut cache = make_cache(&[0], CAPACITY, policy);
        assert_eq!(cache.get(&0), Ok(0));
        assert_eq!(cache.storage().calls_for(0), 1);
        assert_eq!(cache.size(), 1);
    }
}

#[test]
fn test_get_from_cache() {
    for policy in PolicyKind::ALL {
        let mut cache = make_cache(&[0], CAPACITY, policy);
        assert_eq!(cache.get(&0), Ok(0)); // from storage
        assert_eq!(cache.size(), 1);
        assert_eq!(cache.get(&0), Ok(0)); // from cache
        assert_eq!(cache.hit_rate(), 0.5);
        assert!(cache.values().contains(&0));
        assert_eq!(cache.storage().calls(), 1);
    }
}

#[test]
fn test_evict_from_minimal_cache() {
    for policy in PolicyKind::ALL {
        let mut cache = make_cache(&[0, 1], MIN_CAPACITY, policy);
        assert!(cache.values().is_empty());

        assert_eq!(cache.get(&0), Ok(0));
        assert_eq!(cache.get(&0), Ok(0));
        assert_eq!(cache.size(), 1);
        assert!(cache.values().contains(&0));

        assert_eq!(cache.get(&1), Ok(1));
        assert_eq!(cache.values(), [1], "{policy} should have evicted 0");
        assert_eq!(cache.stats().evictions, 1);
        assert_consistent(&cache);
    }
}

#[test]
fn test_hit_rate_and_clear() {
    for policy in PolicyKind::ALL {
        let mut cache = make_cache(&[0], MIN_CAPACITY, policy);
        assert_eq!(cache.hit_rate(), 0.0);

        cache.get(&0).unwrap();
        assert_eq!(cache.hit_rate(), 0.0);
        cache.get(&0).unwrap();
        assert_eq!(cache.hit_rate(), 1.0 / 2.0);
        cache.get(&0).unwrap();
        assert_eq!(cache.hit_rate(), 2.0 / 3.0);

        cache.clear();
        assert_eq!(cache.size(), 0);
        assert!(cache.values().is_empty());
        assert_eq!(cache.hit_rate(), 0.0);
        assert_consistent(&cache);
    }
}

#[test]
fn test_refetch_into_full_cache_never_evicts() {
    for policy in PolicyKind::ALL {
        let mut cache = make_cache(&[1, 2, 3], 3, policy);
        for key in [1, 2, 3] {
            cache.get(&key).unwrap();
        }
        for key in [3, 1, 2, 2, 1] {
            cache.get(&key).unwrap();
        }
        assert_eq!(cache.size(), 3);
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.storage().calls(), 3);
    }
}

#[test]
fn test_miss_on_full_cache_keeps_contents() {
    for policy in PolicyKind::ALL {
        let mut cache = make_cache(&[1, 2], 2, policy);
        cache.get(&1).unwrap();
        cache.get(&2).unwrap();
        let before = cache.keys();

        assert_eq!(cache.get(&99), Err(CacheError::ItemNotFound));
        assert_eq!(cache.keys(), before);
        assert_eq!(cache.stats().storage_misses, 1);
        assert_consistent(&cache);
    }
}

// ============================================================================
// LRU
// ============================================================================

#[test]
fn test_lru_eviction_sequence() {
    let mut cache = make_cache(&[1, 2, 3, 4, 5, 7, 8], 5, PolicyKind::Lru);

    for key in 1..=5 {
        cache.get(&key).unwrap();
    }
    assert_eq!(cache.values(), [1, 2, 3, 4, 5]);

    cache.get(&1).unwrap();
    assert_eq!(cache.values(), [2, 3, 4, 5, 1]);

    cache.get(&7).unwrap();
    assert_eq!(cache.values(), [3, 4, 5, 1, 7]);

    cache.get(&8).unwrap();
    assert_eq!(cache.values(), [4, 5, 1, 7, 8]);

    cache.get(&4).unwrap();
    assert_eq!(cache.values(), [5, 1, 7, 8, 4]);

    assert_eq!(cache.hit_rate(), 2.0 / 9.0);
    assert_eq!(cache.stats().evictions, 2);
    assert_consistent(&cache);
}

#[test]
fn test_lru_new_key_evicts_least_recent() {
    let mut cache = make_cache(&[1, 2, 3, 4, 5, 6], 5, PolicyKind::Lru);
    for key in 1..=5 {
        cache.get(&key).unwrap();
    }
    cache.get(&1).unwrap();
    cache.get(&6).unwrap();

    assert!(!cache.contains_key(&2));
    assert_eq!(cache.values(), [3, 4, 5, 1, 6]);
}

// ============================================================================
// LFU
// ============================================================================

#[test]
fn test_lfu_evicts_least_frequent() {
    let mut cache = make_cache(&[1, 2, 3, 4, 5, 6], 5, PolicyKind::Lfu);
    for key in 1..=5 {
        cache.get(&key).unwrap();
    }
    for key in 1..=4 {
        cache.get(&key).unwrap();
    }
    cache.get(&6).unwrap();

    let values = cache.values();
    assert!(!values.contains(&5));
    assert!(values.contains(&6));
    assert_consistent(&cache);
}

#[test]
fn test_lfu_cold_tie_evicts_earliest_inserted() {
    let mut cache = make_cache(&[1, 2, 3, 4, 5, 7, 8], 5, PolicyKind::Lfu);

    for key in 1..=5 {
        cache.get(&key).unwrap();
    }
    assert_eq!(cache.storage().calls(), 5);
    assert_eq!(cache.hit_rate(), 0.0);
    assert_eq!(cache.values(), [1, 2, 3, 4, 5]);

    // Every count is 1, so the oldest entry goes
    cache.get(&7).unwrap();
    assert_eq!(cache.storage().calls_for(7), 1);
    assert_eq!(cache.values(), [2, 3, 4, 5, 7]);

    for key in 2..=4 {
        cache.get(&key).unwrap();
    }
    assert_eq!(cache.hit_rate(), 3.0 / 9.0);

    // 5 and 7 are tied at 1; 5 was inserted first
    cache.get(&8).unwrap();
    assert!(cache.values().contains(&8));
    assert!(!cache.values().contains(&5));
    assert_eq!(cache.values(), [7, 8, 2, 3, 4]);
    assert_eq!(cache.hit_rate(), 3.0 / 10.0);

    cache.get(&8).unwrap();
    assert_eq!(cache.hit_rate(), 4.0 / 11.0);
    assert_eq!(cache.values(), [7, 2, 3, 4, 8]);
    assert_consistent(&cache);
}

#[test]
fn test_lfu_reinserted_key_starts_cold() {
    let mut cache = make_cache(&[1, 2, 3], 2, PolicyKind::Lfu);
    cache.get(&1).unwrap();
    cache.get(&1).unwrap();
    cache.get(&1).unwrap();
    cache.get(&2).unwrap();

    cache.get(&3).unwrap(); // evicts 2
    cache.get(&2).unwrap(); // evicts 3, the only count-1 entry
    assert_eq!(cache.keys(), [2, 1]);
    assert_eq!(cache.storage().calls_for(2), 2);
}

// ============================================================================
// FACTORY AND REPORTING
// ============================================================================

#[test]
fn test_factory_rejects_bad_arguments() {
    let err = CacheFactory::create(RecordingStorage::default(), 0, PolicyKind::Lru).unwrap_err();
    assert!(err.is_invalid_argument());

    let err = CacheFactory::create_named(RecordingStorage::default(), 4, "fifo").unwrap_err();
    assert!(err.is_invalid_argument());

    let cache = CacheFactory::create_named(RecordingStorage::default(), 4, "Least-Recently-Used")
        .unwrap();
    assert_eq!(cache.policy_name(), "LRU");
}

#[test]
fn test_metrics_follow_lookups() {
    let mut cache = make_cache(&[1, 2, 3], 2, PolicyKind::Lfu);
    cache.get(&1).unwrap();
    cache.get(&1).unwrap();
    cache.get(&2).unwrap();
    cache.get(&3).unwrap();
    let _ = cache.get(&4);

    let metrics = cache.metrics();
    assert_eq!(metrics["requests"], 5.0);
    assert_eq!(metrics["cache_hits"], 1.0);
    assert_eq!(metrics["cache_misses"], 4.0);
    assert_eq!(metrics["storage_misses"], 1.0);
    assert_eq!(metrics["insertions"], 3.0);
    assert_eq!(metrics["evictions"], 1.0);
    assert_eq!(metrics["size"], 2.0);
    assert_eq!(cache.algorithm_name(), "LFU");
}

#[test]
fn test_invariants_under_mixed_workload() {
    let keys: Vec<i32> = (0..40).collect();
    for policy in PolicyKind::ALL {
        let mut cache = make_cache(&keys, 7, policy);
        let mut hits = 0u64;
        let mut lookups = 0u64;

        // Deterministic pseudo-random walk over keys, some outside storage
        let mut state = 17u32;
        for _ in 0..500 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let key = ((state >> 16) % 50) as i32;
            let cached = cache.contains_key(&key);
            let result = cache.get(&key);
            lookups += 1;
            if cached {
                hits += 1;
                assert_eq!(result, Ok(key));
            } else if key < 40 {
                assert_eq!(result, Ok(key));
            } else {
                assert_eq!(result, Err(CacheError::ItemNotFound));
            }
            assert_consistent(&cache);
        }

        assert_eq!(cache.stats().total_lookups, lookups);
        assert_eq!(cache.hit_rate(), hits as f64 / lookups as f64);
    }
}
