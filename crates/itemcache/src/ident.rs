//! Item identity: the content-digest trait seam and unique-id minting.

use crossbeam_utils::CachePadded;
use std::fmt;
use std::process;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identity operations the cache needs from an item type.
///
/// The cache treats items as opaque structured values; it never inspects
/// their shape beyond these three operations. `fingerprint` must be a pure
/// function of item content (equal content hashes equal), and the id field
/// written by `set_id` must not participate in `fingerprint` or
/// `content_eq`.
pub trait ItemContent: Send + Sync + 'static {
    /// 64-bit digest of the item's content.
    ///
    /// Collisions are expected; they are resolved with [`content_eq`]
    /// inside the dedup index.
    ///
    /// [`content_eq`]: ItemContent::content_eq
    fn fingerprint(&self) -> u64;

    /// Deep content equality, used to resolve fingerprint collisions.
    fn content_eq(&self, other: &Self) -> bool;

    /// Overwrites the item's identifier field in place.
    ///
    /// Called exactly once per canonical item, before the item becomes
    /// shared.
    fn set_id(&mut self, id: ItemId);
}

/// Unique identifier stamped into each canonical item.
///
/// Textual form: the prefix `1`, the zero-padded 5-digit process id, then
/// the decimal sequence number with no padding (e.g. `"1000421"` for pid 42,
/// sequence 1). Ids are unique within one process across all cache
/// instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id, returning the underlying string.
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

/// Process-global sequence counter behind every minted id.
///
/// Shared by all cache instances so ids stay globally unique in the output
/// stream even when a process constructs several caches sequentially. The
/// fetch-and-add is lock-free on all supported targets. The counter wraps
/// after 2^32 distinct items in one process; behavior past that point is
/// unspecified.
static NEXT_SEQ: CachePadded<AtomicU32> = CachePadded::new(AtomicU32::new(1));

/// Mints a fresh unique id.
pub(crate) fn mint() -> ItemId {
    let seq = NEXT_SEQ.fetch_add(1, Ordering::Relaxed);
    ItemId(format!("1{:05}{}", process::id() % 100_000, seq))
}
