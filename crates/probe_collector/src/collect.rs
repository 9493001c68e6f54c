//! The filtered-submit boundary between a probe and the cache.

use crate::filter::{self, Filter};
use crate::item::ProbeItem;
use itemcache::{Collection, ItemCache, SubmitError};
use std::sync::Arc;
use thiserror::Error;

/// Outcome of a filtered submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collected {
    /// The item passed every filter and was submitted to the cache.
    Accepted,
    /// A filter rejected the item; it was dropped without submission.
    Filtered,
}

/// Errors surfaced by [`CollectContext::collect`].
#[derive(Debug, Error)]
pub enum CollectError {
    /// The cache refused the submit; the item was dropped.
    #[error("cache submit failed: {0}")]
    Submit(#[from] SubmitError),
}

/// Producer-side context binding filters, a destination aggregate, and the
/// cache for one probe session.
///
/// Filter evaluation runs on the calling thread; only survivors reach the
/// cache. Create one context per producer thread.
pub struct CollectContext<'a> {
    cache: &'a ItemCache<ProbeItem>,
    dest: Arc<dyn Collection<ProbeItem>>,
    filters: Vec<Filter>,
}

impl<'a> CollectContext<'a> {
    pub fn new(
        cache: &'a ItemCache<ProbeItem>,
        dest: Arc<dyn Collection<ProbeItem>>,
        filters: Vec<Filter>,
    ) -> Self {
        Self {
            cache,
            dest,
            filters,
        }
    }

    /// Applies the filters, then submits the item for deduplication and
    /// collection. Filtered and failed items are dropped.
    pub fn collect(&self, item: ProbeItem) -> Result<Collected, CollectError> {
        if !filter::accepted(&self.filters, &item) {
            tracing::trace!(item = %item.name, "item rejected by filter");
            return Ok(Collected::Filtered);
        }

        self.cache.submit(Arc::clone(&self.dest), item)?;
        Ok(Collected::Accepted)
    }

    /// Waits until every item this context submitted so far has been
    /// processed into the destination.
    pub fn flush(&self) -> Result<(), CollectError> {
        self.cache.flush()?;
        Ok(())
    }

    /// The destination aggregate this context collects into.
    pub fn dest(&self) -> &Arc<dyn Collection<ProbeItem>> {
        &self.dest
    }
}
