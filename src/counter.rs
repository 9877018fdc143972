//! # Frequency-Ordered Hit Counter
//!
//! This module provides the hit counter façade: unbounded increments of
//! opaque string keys with O(1) amortized cost and top-K retrieval in O(K),
//! plus a thread-safe wrapper for mixed reader/writer workloads.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                       HitCounter<K>                              │
//!   │                                                                  │
//!   │   ┌────────────────────────────┐  ┌──────────────────────────┐   │
//!   │   │  index: FxHashMap<K,SlotId>│  │  list: BucketList<K>     │   │
//!   │   │                            │  │                          │   │
//!   │   │  ┌──────────┬──────────┐   │  │  top ─► [3] ─► a         │   │
//!   │   │  │   Key    │  SlotId  │   │  │          │               │   │
//!   │   │  ├──────────┼──────────┤   │  │         [2] ─► b         │   │
//!   │   │  │   "a"    │   id_0   │───┼──┼───►      │               │   │
//!   │   │  │   "b"    │   id_1   │───┼──┼───►   fl [1] ─► c        │   │
//!   │   │  │   "c"    │   id_2   │───┼──┼───►                      │   │
//!   │   │  └──────────┴──────────┘   │  └──────────────────────────┘   │
//!   │   └────────────────────────────┘                                 │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A naive counter (hash map, sort on query) pays O(N log N) per top-K
//! query. Keeping entries bucketed by count instead makes each `add` a
//! constant number of link fixes and each query a prefix walk of an
//! already-ordered structure.
//!
//! ## Core Operations
//!
//! | Method          | Complexity | Description                            |
//! |-----------------|------------|----------------------------------------|
//! | `add(key)`      | O(1)*      | Record one hit (amortized, hash map)   |
//! | `top(n)`        | O(n)       | Up to `n` keys, most frequent first    |
//! | `top_counts(n)` | O(n)       | Same walk, paired with counts          |
//! | `count(&key)`   | O(1)       | Current count for one key              |
//! | `len()`         | O(1)       | Distinct keys observed                 |
//!
//! ## Ordering Guarantees
//!
//! Query results are non-increasing in count. Within one count class the
//! order is most-recently-touched first; that is an artifact of the bucket
//! lists, not a stability guarantee, and can change with any `add`.
//!
//! ## Thread Safety
//!
//! - `HitCounter` is **NOT thread-safe**; it is the single-threaded core.
//! - [`ConcurrentHitCounter`] wraps it in one `parking_lot::RwLock`: `add`
//!   takes the write lock, queries take the read lock, so readers proceed
//!   in parallel and writers exclude everything. No blocking call happens
//!   under either lock.

use std::hash::Hash;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::ds::bucket_list::BucketList;
use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::CounterMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::CounterMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CounterMetricsReadRecorder, CounterMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::{ConcurrentCounter, DomainCounter};

/// Frequency-ordered hit counter. Single-threaded core.
///
/// Keys are opaque; no normalization is performed. Entries are never
/// evicted, so memory grows with the number of distinct keys.
#[derive(Debug)]
pub struct HitCounter<K> {
    list: BucketList<K>,
    index: FxHashMap<K, SlotId>,
    #[cfg(feature = "metrics")]
    metrics: CounterMetrics,
}

impl<K> HitCounter<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty counter with reserved capacity for distinct keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: BucketList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            #[cfg(feature = "metrics")]
            metrics: CounterMetrics::default(),
        }
    }

    /// Records one hit for `key`.
    ///
    /// A first-seen key enters the count-1 bucket; a known key is promoted
    /// to its next count. Each call increments exactly once.
    pub fn add(&mut self, key: K) {
        #[cfg(feature = "metrics")]
        self.metrics.record_add_call();

        if let Some(&id) = self.index.get(&key) {
            self.list.promote(id);
            #[cfg(feature = "metrics")]
            self.metrics.record_add_promotion();
        } else {
            let id = self.list.insert_new(key.clone());
            self.index.insert(key, id);
            #[cfg(feature = "metrics")]
            self.metrics.record_add_new();
        }
    }

    /// Returns up to `n` keys, most frequent first.
    pub fn top(&self, n: usize) -> Vec<K> {
        let result: Vec<K> = self.list.ranked().take(n).map(|(key, _)| key.clone()).collect();
        #[cfg(feature = "metrics")]
        self.metrics.record_top_call(result.len() as u64);
        result
    }

    /// Returns up to `n` `(key, count)` pairs in the order [`top`](Self::top)
    /// uses; the vector preserves the traversal order.
    pub fn top_counts(&self, n: usize) -> Vec<(K, u64)> {
        let result: Vec<(K, u64)> = self
            .list
            .ranked()
            .take(n)
            .map(|(key, count)| (key.clone(), count))
            .collect();
        #[cfg(feature = "metrics")]
        self.metrics.record_top_counts_call(result.len() as u64);
        result
    }

    /// Returns the current count for `key`, or `None` if never observed.
    pub fn count(&self, key: &K) -> Option<u64> {
        let result = self.index.get(key).map(|&id| self.list.count_of(id));
        #[cfg(feature = "metrics")]
        self.metrics.record_count_call(result.is_some());
        result
    }

    /// Returns `true` if `key` has been observed at least once.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the number of distinct keys observed.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no key has been observed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Sum of all counts; equals the number of `add` calls applied.
    pub fn total_hits(&self) -> u64 {
        self.list.total_hits()
    }

    /// Verifies the structural invariants of the bucket list and the entry
    /// index, returning a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_invariants()?;
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new("index and entry population diverged"));
        }
        for (key, &id) in &self.index {
            match self.list.key_of(id) {
                Some(stored) if stored == key => {},
                _ => return Err(InvariantError::new("index points at a foreign entry")),
            }
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("hit counter invariant violated: {err}");
        }
    }
}

#[cfg(feature = "metrics")]
impl<K> HitCounter<K>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> CounterMetricsSnapshot {
        CounterMetricsSnapshot {
            add_calls: self.metrics.add_calls,
            add_new: self.metrics.add_new,
            add_promotions: self.metrics.add_promotions,
            top_calls: self.metrics.top_calls.get(),
            top_entries_yielded: self.metrics.top_entries_yielded.get(),
            top_counts_calls: self.metrics.top_counts_calls.get(),
            top_counts_entries_yielded: self.metrics.top_counts_entries_yielded.get(),
            count_calls: self.metrics.count_calls.get(),
            count_found: self.metrics.count_found.get(),
            distinct_keys: self.len(),
        }
    }
}

#[cfg(feature = "metrics")]
impl<K> MetricsSnapshotProvider<CounterMetricsSnapshot> for HitCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> CounterMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K> Default for HitCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> DomainCounter<K> for HitCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn add(&mut self, key: K) {
        HitCounter::add(self, key)
    }

    fn top(&self, n: usize) -> Vec<K> {
        HitCounter::top(self, n)
    }

    fn top_counts(&self, n: usize) -> Vec<(K, u64)> {
        HitCounter::top_counts(self, n)
    }

    fn len(&self) -> usize {
        HitCounter::len(self)
    }
}

/// Thread-safe hit counter guarding a [`HitCounter`] with a single
/// `parking_lot::RwLock`.
///
/// `add` acquires exclusive access for its full duration; queries acquire
/// shared access, so any number of readers proceed in parallel while a
/// writer excludes everything. The critical sections contain no I/O and no
/// blocking calls, and `parking_lot`'s lock keeps writers from starving
/// under sustained reads.
#[derive(Debug)]
pub struct ConcurrentHitCounter<K> {
    inner: RwLock<HitCounter<K>>,
}

impl<K> ConcurrentHitCounter<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty concurrent counter.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HitCounter::new()),
        }
    }

    /// Creates an empty concurrent counter with reserved key capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(HitCounter::with_capacity(capacity)),
        }
    }

    /// Records one hit for `key` under the write lock.
    pub fn add(&self, key: K) {
        let mut counter = self.inner.write();
        counter.add(key);
    }

    /// Returns up to `n` keys, most frequent first.
    ///
    /// The result is a snapshot: it reflects every `add` that completed
    /// before the read section began and none that started after.
    pub fn top(&self, n: usize) -> Vec<K> {
        let counter = self.inner.read();
        counter.top(n)
    }

    /// Returns up to `n` `(key, count)` pairs in the same order as
    /// [`top`](Self::top), as one consistent snapshot.
    pub fn top_counts(&self, n: usize) -> Vec<(K, u64)> {
        let counter = self.inner.read();
        counter.top_counts(n)
    }

    /// Returns the current count for `key`, or `None` if never observed.
    pub fn count(&self, key: &K) -> Option<u64> {
        let counter = self.inner.read();
        counter.count(key)
    }

    /// Returns `true` if `key` has been observed at least once.
    pub fn contains(&self, key: &K) -> bool {
        let counter = self.inner.read();
        counter.contains(key)
    }

    /// Returns the number of distinct keys observed.
    pub fn len(&self) -> usize {
        let counter = self.inner.read();
        counter.len()
    }

    /// Returns `true` if no key has been observed.
    pub fn is_empty(&self) -> bool {
        let counter = self.inner.read();
        counter.is_empty()
    }

    /// Sum of all counts; equals the number of `add` calls applied.
    pub fn total_hits(&self) -> u64 {
        let counter = self.inner.read();
        counter.total_hits()
    }

    /// Verifies structural invariants under the read lock.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let counter = self.inner.read();
        counter.check_invariants()
    }
}

#[cfg(feature = "metrics")]
impl<K> ConcurrentHitCounter<K>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> CounterMetricsSnapshot {
        let counter = self.inner.read();
        counter.metrics_snapshot()
    }
}

impl<K> Default for ConcurrentHitCounter<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> ConcurrentCounter for ConcurrentHitCounter<K> where K: Send + Sync {}

#[cfg(test)]
mod tests {
    use super::*;

    mod single_threaded {
        use super::*;

        #[test]
        fn empty_counter_reports_nothing() {
            let counter: HitCounter<String> = HitCounter::new();
            assert!(counter.is_empty());
            assert_eq!(counter.top(5), Vec::<String>::new());
            assert!(counter.top_counts(5).is_empty());
            assert_eq!(counter.count(&"a".to_string()), None);
            counter.debug_validate_invariants();
        }

        #[test]
        fn repeated_adds_accumulate() {
            let mut counter = HitCounter::new();
            counter.add("a.com");
            counter.add("a.com");
            counter.add("a.com");
            assert_eq!(counter.top_counts(3), vec![("a.com", 3)]);
            assert_eq!(counter.count(&"a.com"), Some(3));
            assert_eq!(counter.total_hits(), 3);
        }

        #[test]
        fn mixed_frequencies_rank_descending() {
            let mut counter = HitCounter::new();
            for key in ["a", "b", "a", "c", "a", "b"] {
                counter.add(key);
            }
            assert_eq!(counter.top(2), vec!["a", "b"]);
            assert_eq!(
                counter.top_counts(3),
                vec![("a", 3), ("b", 2), ("c", 1)]
            );
            counter.debug_validate_invariants();
        }

        #[test]
        fn top_zero_is_empty() {
            let mut counter = HitCounter::new();
            counter.add("a");
            assert!(counter.top(0).is_empty());
            assert!(counter.top_counts(0).is_empty());
        }

        #[test]
        fn top_beyond_population_returns_all() {
            let mut counter = HitCounter::new();
            counter.add("a");
            counter.add("b");
            let all = counter.top(100);
            assert_eq!(all.len(), 2);
        }

        #[test]
        fn top_keys_match_top_counts_keys() {
            let mut counter = HitCounter::new();
            for key in ["x", "y", "x", "z", "x", "y", "w"] {
                counter.add(key);
            }
            let keys = counter.top(4);
            let paired: Vec<_> = counter.top_counts(4).into_iter().map(|(k, _)| k).collect();
            assert_eq!(keys, paired);
        }

        #[test]
        fn contains_and_len_follow_distinct_keys() {
            let mut counter = HitCounter::new();
            counter.add("a");
            counter.add("a");
            counter.add("b");
            assert_eq!(counter.len(), 2);
            assert!(counter.contains(&"a"));
            assert!(counter.contains(&"b"));
            assert!(!counter.contains(&"c"));
        }

        #[test]
        fn check_invariants_passes_after_random_churn() {
            let mut counter = HitCounter::new();
            for i in 0..500u32 {
                counter.add(format!("domain-{}", i % 37));
                if i % 13 == 0 {
                    assert!(counter.check_invariants().is_ok());
                }
            }
            assert_eq!(counter.total_hits(), 500);
            assert_eq!(counter.len(), 37);
            counter.debug_validate_invariants();
        }

        #[test]
        fn trait_impl_matches_inherent_methods() {
            fn drive<C: DomainCounter<&'static str>>(counter: &mut C) -> Vec<&'static str> {
                counter.add("a");
                counter.add("b");
                counter.add("a");
                counter.top(2)
            }
            let mut counter = HitCounter::new();
            assert_eq!(drive(&mut counter), vec!["a", "b"]);
        }
    }

    mod concurrent_wrapper {
        use super::*;

        #[test]
        fn shared_reference_operations() {
            let counter = ConcurrentHitCounter::new();
            counter.add("a");
            counter.add("b");
            counter.add("a");
            assert_eq!(counter.len(), 2);
            assert_eq!(counter.count(&"a"), Some(2));
            assert_eq!(counter.top(1), vec!["a"]);
            assert_eq!(counter.top_counts(2), vec![("a", 2), ("b", 1)]);
            assert!(counter.check_invariants().is_ok());
        }

        #[test]
        fn wrapper_is_send_and_sync() {
            fn assert_concurrent<C: ConcurrentCounter>() {}
            assert_concurrent::<ConcurrentHitCounter<String>>();
        }

        #[test]
        fn total_hits_visible_through_wrapper() {
            let counter = ConcurrentHitCounter::new();
            for _ in 0..10 {
                counter.add("hot");
            }
            assert_eq!(counter.total_hits(), 10);
            assert!(!counter.is_empty());
            assert!(counter.contains(&"hot"));
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn snapshot_tracks_call_mix() {
            let mut counter = HitCounter::new();
            counter.add("a");
            counter.add("a");
            counter.add("b");
            let _ = counter.top(2);
            let _ = counter.top_counts(10);
            let _ = counter.count(&"a");
            let _ = counter.count(&"missing");

            let snapshot = counter.metrics_snapshot();
            assert_eq!(snapshot.add_calls, 3);
            assert_eq!(snapshot.add_new, 2);
            assert_eq!(snapshot.add_promotions, 1);
            assert_eq!(snapshot.top_calls, 1);
            assert_eq!(snapshot.top_entries_yielded, 2);
            assert_eq!(snapshot.top_counts_calls, 1);
            assert_eq!(snapshot.top_counts_entries_yielded, 2);
            assert_eq!(snapshot.count_calls, 2);
            assert_eq!(snapshot.count_found, 1);
            assert_eq!(snapshot.distinct_keys, 2);
        }
    }
}
