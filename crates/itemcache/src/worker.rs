//! The single consumer thread: dedup, id stamping, destination appends.

use crate::cache::Shared;
use crate::collection::{AppendError, Collection};
use crate::ident::{self, ItemContent};
use crate::index::{DedupIndex, Lookup};
use crate::queue::WorkEntry;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Worker thread body.
///
/// Drains the queue one entry at a time. The queue lock is released while
/// index, stamping, and append work runs, since `dequeue` hands out owned
/// entries. Exits on the shutdown sentinel, or on a fatal append failure
/// after latching the dead flag and discarding pending work.
pub(crate) fn run<T: ItemContent>(shared: Arc<Shared<T>>) {
    let mut index = DedupIndex::new();
    tracing::debug!(capacity = shared.queue.capacity(), "cache worker started");

    while let Some(entry) = shared.queue.dequeue() {
        match entry {
            WorkEntry::Shutdown => break,
            WorkEntry::Flush { done } => {
                done.complete();
                if shared.config.enable_metrics {
                    shared.metrics.flushes.fetch_add(1, Ordering::Relaxed);
                }
            }
            WorkEntry::Insert { dest, item } => {
                if let Err(err) = process_insert(&shared, &mut index, dest, item) {
                    tracing::error!(
                        error = %err,
                        "destination append failed, stopping cache worker"
                    );
                    shared.worker_dead.store(true, Ordering::Release);
                    discard_pending(shared.queue.close());
                    break;
                }
            }
        }
    }

    tracing::debug!(
        canonical_items = index.item_count(),
        buckets = index.bucket_count(),
        "cache worker exiting"
    );
    // Dropping the index releases every bucket; canonical items still
    // referenced by destination aggregates stay alive through their Arcs.
}

/// Resolves one incoming item against the index and appends its canonical
/// form to the destination.
fn process_insert<T: ItemContent>(
    shared: &Shared<T>,
    index: &mut DedupIndex<T>,
    dest: Arc<dyn Collection<T>>,
    mut item: Box<T>,
) -> Result<(), AppendError> {
    let metrics_on = shared.config.enable_metrics;
    let fid = item.fingerprint();

    let canonical = match index.lookup(fid, item.as_ref()) {
        Lookup::Match(canon) => {
            if metrics_on {
                shared.metrics.dedup_hits.fetch_add(1, Ordering::Relaxed);
            }
            // The incoming duplicate drops here; the canonical keeps the
            // id it was stamped with on first sight.
            canon
        }
        lookup => {
            if metrics_on && matches!(lookup, Lookup::NoMatch) {
                shared
                    .metrics
                    .fingerprint_collisions
                    .fetch_add(1, Ordering::Relaxed);
            }
            item.set_id(ident::mint());
            let canon: Arc<T> = Arc::from(item);
            index.insert(fid, Arc::clone(&canon));
            canon
        }
    };

    dest.append(canonical)?;

    if metrics_on {
        shared.metrics.items_processed.fetch_add(1, Ordering::Relaxed);
    }
    Ok(())
}

/// Completes flush signals among discarded entries so no producer hangs;
/// pending inserts are dropped unprocessed.
fn discard_pending<T>(entries: Vec<WorkEntry<T>>) {
    for entry in entries {
        match entry {
            WorkEntry::Flush { done } => done.complete(),
            WorkEntry::Insert { .. } | WorkEntry::Shutdown => {}
        }
    }
}
