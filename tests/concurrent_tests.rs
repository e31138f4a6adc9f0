//! Shared Cache Tests
//!
//! These tests drive one `SharedCache` from a pool of worker threads and
//! check that the counters stay exact and the structural invariants hold
//! once the workers are done.

#![cfg(feature = "concurrent")]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use scoped_threadpool::Pool;
use storage_cache::{CacheError, CacheFactory, CacheMetrics, PolicyKind, SharedCache};

const NUM_THREADS: u32 = 8;
const OPS_PER_THREAD: u64 = 1_000;

type Shared = SharedCache<u64, u64, HashMap<u64, u64>>;

fn make_shared(capacity: usize, policy: PolicyKind) -> Shared {
    let storage: HashMap<u64, u64> = (0..500).map(|k| (k, k * 3)).collect();
    SharedCache::new(CacheFactory::create(storage, capacity, policy).unwrap())
}

#[test]
fn test_concurrent_lookups_keep_exact_counts() {
    for policy in PolicyKind::ALL {
        let cache = make_shared(64, policy);
        let not_found = AtomicU64::new(0);
        let mut pool = Pool::new(NUM_THREADS);

        pool.scoped(|scope| {
            for t in 0..NUM_THREADS as u64 {
                let cache = &cache;
                let not_found = &not_found;
                scope.execute(move || {
                    for i in 0..OPS_PER_THREAD {
                        // Keys 500.. are absent from storage
                        let key = (t * 97 + i * 13) % 600;
                        match cache.get(&key) {
                            Ok(value) => assert_eq!(value, key * 3),
                            Err(CacheError::ItemNotFound) => {
                                assert!(key >= 500);
                                not_found.fetch_add(1, Ordering::Relaxed);
                            }
                            Err(err) => panic!("unexpected error: {err}"),
                        }
                    }
                });
            }
        });

        let stats = cache.stats();
        assert_eq!(stats.total_lookups, NUM_THREADS as u64 * OPS_PER_THREAD);
        assert_eq!(stats.storage_misses, not_found.load(Ordering::Relaxed));
        assert_eq!(cache.size(), 64);
        assert!(cache.with_cache(|inner| inner.is_consistent()));
        assert_eq!(cache.algorithm_name(), policy.as_str());
    }
}

#[test]
fn test_concurrent_hot_key_stays_cached_under_lfu() {
    let cache = make_shared(4, PolicyKind::Lfu);
    let mut pool = Pool::new(4);

    pool.scoped(|scope| {
        for t in 0..4u64 {
            let cache = &cache;
            scope.execute(move || {
                for i in 0..500 {
                    cache.get(&0).unwrap();
                    cache.get(&(1 + (t * 500 + i) % 200)).unwrap();
                }
            });
        }
    });

    assert!(cache.contains_key(&0));
    assert_eq!(cache.stats().total_lookups, 4_000);
    assert!(cache.hit_rate() > 0.45);
}

#[test]
fn test_concurrent_clear_and_remove() {
    let cache = make_shared(32, PolicyKind::Lru);
    let mut pool = Pool::new(4);

    pool.scoped(|scope| {
        for t in 0..4u64 {
            let cache = &cache;
            scope.execute(move || {
                for i in 0..200 {
                    let key = (t + i) % 100;
                    cache.get(&key).unwrap();
                    if i % 50 == 0 {
                        cache.remove(&key);
                    }
                }
            });
        }
    });
    assert!(cache.size() <= 32);
    assert!(cache.with_cache(|inner| inner.is_consistent()));

    cache.clear();
    assert_eq!(cache.size(), 0);
    assert_eq!(cache.hit_rate(), 0.0);
    assert!(cache.values().is_empty());
}
