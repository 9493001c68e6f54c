//! Property-based tests over random item streams.
//!
//! Items are drawn from a small (fingerprint, payload) alphabet so that
//! duplicates and fingerprint collisions are both frequent. For every
//! generated stream the following must hold after a flush:
//!
//! - the destination holds one reference per submit, in submission order
//! - the distinct canonical items equal the distinct inputs
//! - equal inputs share one canonical pointer and one id
//! - distinct inputs carry pairwise-distinct ids

use itemcache::{Config, ItemCache, ItemContent, ItemId, VecCollection};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug)]
struct StreamItem {
    fid: u64,
    payload: u8,
    id: Option<ItemId>,
}

impl StreamItem {
    fn new(fid: u64, payload: u8) -> Self {
        Self {
            fid,
            payload,
            id: None,
        }
    }
}

impl ItemContent for StreamItem {
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

fn collect_stream(stream: &[(u64, u8)], config: Config) -> Vec<Arc<StreamItem>> {
    let cache = ItemCache::with_config(config).unwrap();
    let dest: Arc<VecCollection<StreamItem>> = Arc::new(VecCollection::new());

    for &(fid, payload) in stream {
        cache
            .submit(dest.clone(), StreamItem::new(fid, payload))
            .unwrap();
    }
    cache.flush().unwrap();
    dest.snapshot()
}

proptest! {
    #[test]
    fn prop_dedup_matches_distinct_inputs(
        stream in prop::collection::vec((0u64..8, 0u8..4), 1..200),
    ) {
        let collected = collect_stream(&stream, Config::new(4, false));

        // One destination reference per submit.
        prop_assert_eq!(collected.len(), stream.len());

        // Distinct canonicals equal distinct inputs.
        let distinct_inputs: HashSet<(u64, u8)> = stream.iter().copied().collect();
        let canon_ptrs: HashSet<usize> = collected
            .iter()
            .map(|item| Arc::as_ptr(item) as usize)
            .collect();
        prop_assert_eq!(canon_ptrs.len(), distinct_inputs.len());
    }

    #[test]
    fn prop_equal_items_share_canonical_and_id(
        stream in prop::collection::vec((0u64..8, 0u8..4), 1..200),
    ) {
        let collected = collect_stream(&stream, Config::new(4, false));

        let mut canon_by_content: HashMap<(u64, u8), (usize, String)> = HashMap::new();
        for (i, item) in collected.iter().enumerate() {
            let key = stream[i];
            let ptr = Arc::as_ptr(item) as usize;
            let id = item.id.as_ref().unwrap().as_str().to_string();

            match canon_by_content.get(&key) {
                Some((seen_ptr, seen_id)) => {
                    prop_assert_eq!(ptr, *seen_ptr, "equal items must share one canonical");
                    prop_assert_eq!(&id, seen_id, "equal items must share one id");
                }
                None => {
                    canon_by_content.insert(key, (ptr, id));
                }
            }
        }

        // Distinct inputs carry pairwise-distinct ids.
        let ids: HashSet<&String> = canon_by_content.values().map(|(_, id)| id).collect();
        prop_assert_eq!(ids.len(), canon_by_content.len());
    }

    #[test]
    fn prop_order_preserved(
        stream in prop::collection::vec((0u64..8, 0u8..4), 1..200),
    ) {
        let collected = collect_stream(&stream, Config::new(2, false));

        for (i, item) in collected.iter().enumerate() {
            prop_assert_eq!(item.fid, stream[i].0);
            prop_assert_eq!(item.payload, stream[i].1);
        }
    }

    #[test]
    fn prop_small_queues_stay_live(
        stream in prop::collection::vec((0u64..4, 0u8..2), 1..100),
        queue_bits in 1u8..5,
    ) {
        let collected = collect_stream(&stream, Config::new(queue_bits, false));
        prop_assert_eq!(collected.len(), stream.len());
    }
}
