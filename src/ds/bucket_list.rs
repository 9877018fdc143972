//! Count-ordered bucket list.
//!
//! Two-level doubly linked structure behind the hit counter: a vertical
//! list of count buckets, strictly increasing from the permanent floor
//! bucket (count 1) to the top, where each bucket owns a horizontal list of
//! the entries sharing that count.
//!
//! ## Architecture
//!
//! ```text
//!   top ───► [ 5 ] ─► "google.com" ◄─► "mail.ru" ◄─► "twitter.com"
//!             ▲│
//!             │▼
//!            [ 2 ] ─► "yandex.ru" ◄─► "yahoo.com"
//!             ▲│
//!             │▼
//!   floor ─► [ 1 ] ─► "example.com"
//! ```
//!
//! Buckets and entries live in two [`SlotArena`]s and link by [`SlotId`],
//! so the back-references (entry → bucket) and the doubly linked lists
//! never form ownership cycles.
//!
//! ## Operations
//! - `insert_new(key)`: fresh entry at the floor bucket's list head
//! - `promote(id)`: move one entry from count `c` to `c + 1`, reusing the
//!   `c + 1` bucket when it already exists and splicing a new one otherwise;
//!   a non-floor bucket that drains is unlinked and its slot reclaimed
//! - `ranked()`: walk buckets top-down, entries head-to-tail within each
//!
//! ## Performance
//! - `insert_new` / `promote`: O(1)
//! - `ranked`: O(entries visited)
//!
//! Promoted and newly inserted entries become the head of their bucket's
//! list, so `ranked()` yields most-recently-touched entries first within a
//! count class. Callers must not rely on that order being stable across
//! mutations.
//!
//! `debug_validate_invariants()` is available in debug/test builds.

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

const BUCKET_MISSING: &str = "count bucket missing";
const ENTRY_MISSING: &str = "domain entry missing";

#[derive(Debug)]
struct Bucket {
    /// Shared hit count of every entry in this bucket. Fixed at creation.
    count: u64,
    prev: Option<SlotId>,
    next: Option<SlotId>,
    head: Option<SlotId>,
}

#[derive(Debug)]
struct Entry<K> {
    key: K,
    prev: Option<SlotId>,
    next: Option<SlotId>,
    bucket: SlotId,
}

/// Frequency-ordered two-level list of count buckets and domain entries.
#[derive(Debug)]
pub struct BucketList<K> {
    buckets: SlotArena<Bucket>,
    entries: SlotArena<Entry<K>>,
    /// Permanent count-1 bucket. Never unlinked, even when empty.
    floor: SlotId,
    /// Bucket holding the current maximum count.
    top: SlotId,
}

impl<K> BucketList<K> {
    /// Creates an empty list with the floor bucket in place.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with reserved capacity for entries.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buckets = SlotArena::new();
        let floor = buckets.insert(Bucket {
            count: 1,
            prev: None,
            next: None,
            head: None,
        });
        Self {
            buckets,
            entries: SlotArena::with_capacity(capacity),
            floor,
            top: floor,
        }
    }

    /// Returns the number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entry has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the current count of the entry at `id`.
    pub fn count_of(&self, id: SlotId) -> u64 {
        let bucket = self.entries.get(id).expect(ENTRY_MISSING).bucket;
        self.buckets.get(bucket).expect(BUCKET_MISSING).count
    }

    /// Returns the current maximum count, or `None` while the list is empty.
    pub fn max_count(&self) -> Option<u64> {
        if self.is_empty() {
            return None;
        }
        Some(self.buckets.get(self.top).expect(BUCKET_MISSING).count)
    }

    /// Sum of every entry's count; equals the number of promotions plus
    /// insertions applied so far.
    pub fn total_hits(&self) -> u64 {
        self.ranked().map(|(_, count)| count).sum()
    }

    pub(crate) fn key_of(&self, id: SlotId) -> Option<&K> {
        self.entries.get(id).map(|entry| &entry.key)
    }

    /// Attaches a fresh entry for `key` at the head of the floor bucket.
    ///
    /// The floor bucket always exists, so no bucket is created here.
    pub fn insert_new(&mut self, key: K) -> SlotId {
        let id = self.entries.insert(Entry {
            key,
            prev: None,
            next: None,
            bucket: self.floor,
        });
        self.attach_head(self.floor, id);
        id
    }

    /// Moves the entry at `id` from its current count `c` to `c + 1`.
    ///
    /// The destination is the neighbor bucket when its count is exactly
    /// `c + 1`, otherwise a new bucket spliced directly above the source.
    /// A source bucket left empty is unlinked unless it is the floor. The
    /// unlink happens after the destination splice so a freshly created
    /// destination is never orphaned. Returns the new count.
    pub fn promote(&mut self, id: SlotId) -> u64 {
        let src = self.entries.get(id).expect(ENTRY_MISSING).bucket;
        let count = self.buckets.get(src).expect(BUCKET_MISSING).count;

        self.detach(id);
        let (src_empty, src_next) = {
            let bucket = self.buckets.get(src).expect(BUCKET_MISSING);
            (bucket.head.is_none(), bucket.next)
        };

        let dest = match src_next {
            Some(next) if self.buckets.get(next).expect(BUCKET_MISSING).count == count + 1 => next,
            _ => self.splice_after(src, count + 1),
        };
        self.attach_head(dest, id);

        // Read the top count before the source can be reclaimed: the source
        // may itself be the top bucket.
        let top_count = self.buckets.get(self.top).expect(BUCKET_MISSING).count;
        if src_empty && src != self.floor {
            self.unlink_bucket(src);
        }
        if count + 1 > top_count {
            self.top = dest;
        }

        count + 1
    }

    /// Iterates entries from the highest count bucket down to the floor,
    /// yielding `(&key, count)` pairs in non-increasing count order.
    pub fn ranked(&self) -> Ranked<'_, K> {
        let head = self.buckets.get(self.top).expect(BUCKET_MISSING).head;
        Ranked {
            list: self,
            bucket: Some(self.top),
            entry: head,
        }
    }

    /// Verifies the structural invariants, returning a description of the
    /// first violation found.
    ///
    /// Checked: counts strictly increase from floor to top, the floor is the
    /// lowest bucket and carries count 1, every non-floor bucket holds at
    /// least one entry, entry back-references and list links agree, and the
    /// top anchor is the last bucket in the chain.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let floor = self
            .buckets
            .get(self.floor)
            .ok_or_else(|| InvariantError::new("floor bucket vacated"))?;
        if floor.count != 1 {
            return Err(InvariantError::new("floor bucket count is not 1"));
        }
        if floor.prev.is_some() {
            return Err(InvariantError::new("floor bucket has a predecessor"));
        }

        let mut seen_entries = 0usize;
        let mut last_count = 0u64;
        let mut last_bucket = None;
        let mut cursor = Some(self.floor);
        while let Some(bucket_id) = cursor {
            let bucket = self
                .buckets
                .get(bucket_id)
                .ok_or_else(|| InvariantError::new("bucket chain reaches a vacated slot"))?;
            if bucket.count <= last_count {
                return Err(InvariantError::new("bucket counts are not strictly increasing"));
            }
            if bucket.prev != last_bucket {
                return Err(InvariantError::new("bucket back-link disagrees with chain"));
            }
            if bucket_id != self.floor && bucket.head.is_none() {
                return Err(InvariantError::new("non-floor bucket is empty"));
            }

            let mut entry_cursor = bucket.head;
            let mut last_entry = None;
            while let Some(entry_id) = entry_cursor {
                let entry = self
                    .entries
                    .get(entry_id)
                    .ok_or_else(|| InvariantError::new("entry list reaches a vacated slot"))?;
                if entry.bucket != bucket_id {
                    return Err(InvariantError::new("entry back-reference names the wrong bucket"));
                }
                if entry.prev != last_entry {
                    return Err(InvariantError::new("entry back-link disagrees with list"));
                }
                last_entry = Some(entry_id);
                entry_cursor = entry.next;
                seen_entries += 1;
                if seen_entries > self.entries.len() {
                    return Err(InvariantError::new("entry lists cycle"));
                }
            }

            last_count = bucket.count;
            last_bucket = Some(bucket_id);
            cursor = bucket.next;
        }

        if last_bucket != Some(self.top) {
            return Err(InvariantError::new("top anchor is not the highest bucket"));
        }
        if seen_entries != self.entries.len() {
            return Err(InvariantError::new("entries unreachable from the bucket chain"));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("bucket list invariant violated: {err}");
        }
        self.buckets.debug_validate_invariants();
        self.entries.debug_validate_invariants();
    }

    fn attach_head(&mut self, bucket_id: SlotId, entry_id: SlotId) {
        let old_head = self.buckets.get(bucket_id).expect(BUCKET_MISSING).head;
        {
            let entry = self.entries.get_mut(entry_id).expect(ENTRY_MISSING);
            entry.prev = None;
            entry.next = old_head;
            entry.bucket = bucket_id;
        }
        if let Some(head) = old_head {
            self.entries.get_mut(head).expect(ENTRY_MISSING).prev = Some(entry_id);
        }
        self.buckets.get_mut(bucket_id).expect(BUCKET_MISSING).head = Some(entry_id);
    }

    fn detach(&mut self, entry_id: SlotId) {
        let (bucket_id, prev, next) = {
            let entry = self.entries.get(entry_id).expect(ENTRY_MISSING);
            (entry.bucket, entry.prev, entry.next)
        };
        match prev {
            Some(prev_id) => self.entries.get_mut(prev_id).expect(ENTRY_MISSING).next = next,
            None => self.buckets.get_mut(bucket_id).expect(BUCKET_MISSING).head = next,
        }
        if let Some(next_id) = next {
            self.entries.get_mut(next_id).expect(ENTRY_MISSING).prev = prev;
        }
        let entry = self.entries.get_mut(entry_id).expect(ENTRY_MISSING);
        entry.prev = None;
        entry.next = None;
    }

    fn splice_after(&mut self, after: SlotId, count: u64) -> SlotId {
        let next = self.buckets.get(after).expect(BUCKET_MISSING).next;
        let id = self.buckets.insert(Bucket {
            count,
            prev: Some(after),
            next,
            head: None,
        });
        self.buckets.get_mut(after).expect(BUCKET_MISSING).next = Some(id);
        if let Some(next_id) = next {
            self.buckets.get_mut(next_id).expect(BUCKET_MISSING).prev = Some(id);
        }
        id
    }

    fn unlink_bucket(&mut self, id: SlotId) {
        let bucket = self.buckets.remove(id).expect(BUCKET_MISSING);
        if let Some(prev_id) = bucket.prev {
            self.buckets.get_mut(prev_id).expect(BUCKET_MISSING).next = bucket.next;
        }
        if let Some(next_id) = bucket.next {
            self.buckets.get_mut(next_id).expect(BUCKET_MISSING).prev = bucket.prev;
        }
    }
}

impl<K> Default for BucketList<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(&key, count)` pairs from the top bucket toward the floor.
#[derive(Debug)]
pub struct Ranked<'a, K> {
    list: &'a BucketList<K>,
    bucket: Option<SlotId>,
    entry: Option<SlotId>,
}

impl<'a, K> Iterator for Ranked<'a, K> {
    type Item = (&'a K, u64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.entry {
                let entry = self.list.entries.get(id).expect(ENTRY_MISSING);
                let count = self.list.buckets.get(entry.bucket).expect(BUCKET_MISSING).count;
                self.entry = entry.next;
                return Some((&entry.key, count));
            }
            let bucket_id = self.bucket?;
            let below = self.list.buckets.get(bucket_id).expect(BUCKET_MISSING).prev;
            self.bucket = below;
            self.entry = match below {
                Some(id) => self.list.buckets.get(id).expect(BUCKET_MISSING).head,
                None => None,
            };
        }
    }
}
