//! Debug assertion macros for queue and index invariants.
//!
//! Only active in debug builds (`debug_assert!`), so there is zero overhead
//! in release builds.

/// Assert that the queue count stays within capacity.
///
/// Used in: `WorkQueue::enqueue` after storing an entry.
macro_rules! debug_assert_bounded_len {
    ($len:expr, $capacity:expr) => {
        debug_assert!(
            $len <= $capacity,
            "queue count {} exceeds capacity {}",
            $len,
            $capacity
        )
    };
}

/// Assert that a sequence counter only increases.
///
/// Used in: `WorkQueue::enqueue` for tail, `WorkQueue::dequeue` for head.
macro_rules! debug_assert_monotonic_seq {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "{} decreased from {} to {}",
            $name,
            $old,
            $new
        )
    };
}

/// Assert that a dedup bucket is never left empty.
///
/// Used in: `DedupIndex::insert` after extending a bucket.
macro_rules! debug_assert_nonempty_bucket {
    ($bucket_len:expr) => {
        debug_assert!($bucket_len > 0, "dedup bucket left empty")
    };
}

pub(crate) use {debug_assert_bounded_len, debug_assert_monotonic_seq, debug_assert_nonempty_bucket};
