//! Reducer for combining per-node `top_counts` results.
//!
//! When the counter runs sharded across nodes, each participant reports its
//! local `(key, count)` ranking and the querying side reduces them into one
//! global top-K. A correct reduction sums the counts of matching keys and
//! orders the merged set by *descending* count before truncating; ordering
//! ascending silently returns the least frequent keys instead.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Merges per-node `top_counts` results into a global top-`n` ranking.
///
/// Counts for matching keys are summed across parts; the merged set is
/// sorted by descending count and truncated to `n`. Order among equal
/// counts is unspecified, matching the counter's own contract.
///
/// # Example
///
/// ```
/// use countkit::merge::merge_top_counts;
///
/// let node_a = vec![("a.com", 5), ("b.com", 2)];
/// let node_b = vec![("b.com", 4), ("c.com", 1)];
///
/// let merged = merge_top_counts([node_a, node_b], 2);
/// assert_eq!(merged, vec![("b.com", 6), ("a.com", 5)]);
/// ```
pub fn merge_top_counts<K, I>(parts: I, n: usize) -> Vec<(K, u64)>
where
    K: Eq + Hash,
    I: IntoIterator<Item = Vec<(K, u64)>>,
{
    let mut totals: FxHashMap<K, u64> = FxHashMap::default();
    for part in parts {
        for (key, count) in part {
            *totals.entry(key).or_insert(0) += count;
        }
    }
    let mut merged: Vec<(K, u64)> = totals.into_iter().collect();
    merged.sort_unstable_by(|a, b| b.1.cmp(&a.1));
    merged.truncate(n);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_sums_matching_keys() {
        let merged = merge_top_counts(
            [vec![("a", 3), ("b", 1)], vec![("a", 2), ("c", 4)]],
            10,
        );
        assert_eq!(merged[0], ("a", 5));
        assert_eq!(merged[1], ("c", 4));
        assert_eq!(merged[2], ("b", 1));
    }

    #[test]
    fn merge_orders_descending_and_truncates() {
        let merged = merge_top_counts(
            [vec![("low", 1)], vec![("high", 9)], vec![("mid", 5)]],
            2,
        );
        assert_eq!(merged, vec![("high", 9), ("mid", 5)]);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        let merged: Vec<(&str, u64)> = merge_top_counts(Vec::<Vec<(&str, u64)>>::new(), 5);
        assert!(merged.is_empty());
    }

    #[test]
    fn merge_with_zero_n_is_empty() {
        let merged = merge_top_counts([vec![("a", 1)]], 0);
        assert!(merged.is_empty());
    }
}
