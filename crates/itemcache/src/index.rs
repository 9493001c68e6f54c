//! Content-addressed index of canonical items.

use crate::ident::ItemContent;
use crate::invariants::debug_assert_nonempty_bucket;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Result of a dedup lookup for one incoming item.
pub(crate) enum Lookup<T> {
    /// No bucket exists for this fingerprint (true miss).
    Absent,
    /// A bucket exists but no member has equal content (fingerprint
    /// collision).
    NoMatch,
    /// A canonical item with equal content already exists (dedup hit).
    Match(Arc<T>),
}

/// Ordered map from fingerprint to the bucket of canonical items sharing
/// that fingerprint.
///
/// Touched only by the worker thread, so no locking. Buckets keep their
/// items alive until the index is dropped at cache shutdown; destination
/// aggregates share the same items via `Arc`, so references they hold stay
/// valid independently.
pub(crate) struct DedupIndex<T> {
    buckets: BTreeMap<u64, Bucket<T>>,
    items: usize,
}

/// Canonical items sharing one fingerprint, in first-seen order.
///
/// Almost always a single element; fingerprint collisions grow it.
struct Bucket<T> {
    members: Vec<Arc<T>>,
}

impl<T: ItemContent> DedupIndex<T> {
    pub(crate) fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
            items: 0,
        }
    }

    /// Looks up `item` under `fid`, walking the bucket with `content_eq`.
    pub(crate) fn lookup(&self, fid: u64, item: &T) -> Lookup<T> {
        match self.buckets.get(&fid) {
            None => Lookup::Absent,
            Some(bucket) => bucket
                .members
                .iter()
                .find(|canon| canon.content_eq(item))
                .map_or(Lookup::NoMatch, |canon| Lookup::Match(Arc::clone(canon))),
        }
    }

    /// Installs a new canonical item under `fid`.
    ///
    /// Creates a single-element bucket on a true miss, extends the bucket
    /// on a collision.
    pub(crate) fn insert(&mut self, fid: u64, canon: Arc<T>) {
        let bucket = self
            .buckets
            .entry(fid)
            .or_insert_with(|| Bucket {
                members: Vec::with_capacity(1),
            });
        bucket.members.push(canon);
        self.items += 1;

        debug_assert_nonempty_bucket!(bucket.members.len());
    }

    /// Number of distinct fingerprints present.
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of canonical items across all buckets.
    pub(crate) fn item_count(&self) -> usize {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::ItemId;

    #[derive(Debug)]
    struct TestItem {
        fid: u64,
        payload: &'static str,
        id: Option<ItemId>,
    }

    impl TestItem {
        fn new(fid: u64, payload: &'static str) -> Self {
            Self {
                fid,
                payload,
                id: None,
            }
        }
    }

    impl ItemContent for TestItem {
        fn fingerprint(&self) -> u64 {
            self.fid
        }

        fn content_eq(&self, other: &Self) -> bool {
            self.fid == other.fid && self.payload == other.payload
        }

        fn set_id(&mut self, id: ItemId) {
            self.id = Some(id);
        }
    }

    #[test]
    fn test_lookup_absent_then_match() {
        let mut index = DedupIndex::new();
        let item = TestItem::new(1, "a");

        assert!(matches!(index.lookup(1, &item), Lookup::Absent));

        let canon = Arc::new(TestItem::new(1, "a"));
        index.insert(1, Arc::clone(&canon));

        match index.lookup(1, &item) {
            Lookup::Match(found) => assert!(Arc::ptr_eq(&found, &canon)),
            _ => panic!("expected match"),
        }
        assert_eq!(index.bucket_count(), 1);
        assert_eq!(index.item_count(), 1);
    }

    #[test]
    fn test_collision_is_no_match() {
        let mut index = DedupIndex::new();
        index.insert(1, Arc::new(TestItem::new(1, "a")));

        let other = TestItem::new(1, "b");
        assert!(matches!(index.lookup(1, &other), Lookup::NoMatch));

        index.insert(1, Arc::new(TestItem::new(1, "b")));
        assert_eq!(index.bucket_count(), 1);
        assert_eq!(index.item_count(), 2);

        // Both members remain reachable after the collision.
        assert!(matches!(index.lookup(1, &TestItem::new(1, "a")), Lookup::Match(_)));
        assert!(matches!(index.lookup(1, &TestItem::new(1, "b")), Lookup::Match(_)));
    }

    #[test]
    fn test_distinct_fingerprints_get_distinct_buckets() {
        let mut index = DedupIndex::new();
        index.insert(1, Arc::new(TestItem::new(1, "a")));
        index.insert(2, Arc::new(TestItem::new(2, "a")));

        assert_eq!(index.bucket_count(), 2);
        assert_eq!(index.item_count(), 2);
    }
}
