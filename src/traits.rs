//! Counter trait hierarchy.
//!
//! A deliberately small surface: every hit counter exposes the same three
//! operations the service contract names, and thread-safe counters carry a
//! marker trait so generic code can require one.
//!
//! ```text
//!   ┌──────────────────────────────────────────────┐
//!   │            DomainCounter<K>                  │
//!   │                                              │
//!   │  add(&mut, K)                                │
//!   │  top(&, n) → Vec<K>                          │
//!   │  top_counts(&, n) → Vec<(K, u64)>            │
//!   │  len(&) → usize                              │
//!   │  is_empty(&) → bool                          │
//!   └──────────────────────────────────────────────┘
//!
//!   ConcurrentCounter: Send + Sync   (marker)
//! ```
//!
//! | Trait               | Purpose                                   |
//! |---------------------|-------------------------------------------|
//! | `DomainCounter`     | add / top / top_counts contract           |
//! | `ConcurrentCounter` | marker for internally synchronized types  |

/// Core operations of a frequency-ordered hit counter.
///
/// `add` records one hit for a key; `top` and `top_counts` report the most
/// frequent keys in non-increasing count order. Order among keys sharing a
/// count is implementation-defined.
///
/// # Example
///
/// ```
/// use countkit::counter::HitCounter;
/// use countkit::traits::DomainCounter;
///
/// fn replay<C: DomainCounter<&'static str>>(counter: &mut C, hits: &[&'static str]) {
///     for &hit in hits {
///         counter.add(hit);
///     }
/// }
///
/// let mut counter = HitCounter::new();
/// replay(&mut counter, &["a", "b", "a"]);
/// assert_eq!(counter.top(1), vec!["a"]);
/// ```
pub trait DomainCounter<K> {
    /// Records one hit for `key`. Never idempotent: each call counts once.
    fn add(&mut self, key: K);

    /// Returns up to `n` keys, most frequent first. `top(0)` is empty; if
    /// fewer than `n` keys exist, all of them are returned.
    fn top(&self, n: usize) -> Vec<K>;

    /// Returns up to `n` `(key, count)` pairs in the same order `top` uses.
    fn top_counts(&self, n: usize) -> Vec<(K, u64)>;

    /// Returns the number of distinct keys observed.
    fn len(&self) -> usize;

    /// Returns `true` if no key has been observed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Marker trait for counters that are safe to share across threads.
///
/// Implementors guarantee internally synchronized operations through `&self`.
///
/// # Example
///
/// ```
/// use countkit::counter::ConcurrentHitCounter;
/// use countkit::traits::ConcurrentCounter;
///
/// fn spawn_writers<C: ConcurrentCounter>(_counter: &C) {
///     // Safe to hand references to worker threads.
/// }
///
/// let counter = ConcurrentHitCounter::<String>::new();
/// spawn_writers(&counter);
/// ```
pub trait ConcurrentCounter: Send + Sync {}
