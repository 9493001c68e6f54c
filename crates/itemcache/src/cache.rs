//! Public cache surface and lifecycle.

use crate::collection::Collection;
use crate::config::Config;
use crate::error::{CacheError, SubmitError};
use crate::flush::FlushSignal;
use crate::ident::ItemContent;
use crate::metrics::CacheMetrics;
use crate::queue::{WorkEntry, WorkQueue};
use crate::worker;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// State shared between the cache handle and its worker thread.
pub(crate) struct Shared<T> {
    pub(crate) queue: WorkQueue<T>,
    pub(crate) metrics: CacheMetrics,
    pub(crate) worker_dead: AtomicBool,
    pub(crate) config: Config,
}

/// Item-deduplicating asynchronous collection cache.
///
/// Producers submit owned items together with a destination aggregate;
/// a single background worker deduplicates each item against everything
/// seen so far, stamps new canonical items with a unique id, and appends
/// the canonical reference to the destination. Structural duplicates share
/// one stored copy and one id.
///
/// Submission is synchronous with back-pressure: `submit` blocks while the
/// work queue is full and returns once the entry is queued, not once it is
/// processed. [`flush`] waits until everything submitted before it has been
/// fully processed.
///
/// Dropping the cache drains the queue, joins the worker, and releases the
/// dedup index. Canonical items still referenced by destination aggregates
/// remain valid afterwards.
///
/// # Example
///
/// ```
/// use itemcache::{ItemCache, ItemContent, ItemId, VecCollection};
/// use std::sync::Arc;
///
/// struct Record {
///     key: u64,
///     value: String,
///     id: Option<ItemId>,
/// }
///
/// impl ItemContent for Record {
///     fn fingerprint(&self) -> u64 {
///         self.key
///     }
///     fn content_eq(&self, other: &Self) -> bool {
///         self.key == other.key && self.value == other.value
///     }
///     fn set_id(&mut self, id: ItemId) {
///         self.id = Some(id);
///     }
/// }
///
/// let cache = ItemCache::new().unwrap();
/// let dest: Arc<VecCollection<Record>> = Arc::new(VecCollection::new());
///
/// let record = |v: &str| Record { key: 7, value: v.into(), id: None };
/// cache.submit(dest.clone(), record("etc-passwd")).unwrap();
/// cache.submit(dest.clone(), record("etc-passwd")).unwrap();
/// cache.flush().unwrap();
///
/// // Two references, one canonical item.
/// let items = dest.snapshot();
/// assert_eq!(items.len(), 2);
/// assert!(Arc::ptr_eq(&items[0], &items[1]));
/// ```
///
/// [`flush`]: ItemCache::flush
pub struct ItemCache<T: ItemContent> {
    shared: Arc<Shared<T>>,
    worker: Option<JoinHandle<()>>,
}

impl<T: ItemContent> ItemCache<T> {
    /// Creates a cache with the default configuration and starts its
    /// worker thread.
    pub fn new() -> Result<Self, CacheError> {
        Self::with_config(Config::default())
    }

    /// Creates a cache with the given configuration.
    pub fn with_config(config: Config) -> Result<Self, CacheError> {
        let shared = Arc::new(Shared {
            queue: WorkQueue::new(config),
            metrics: CacheMetrics::new(),
            worker_dead: AtomicBool::new(false),
            config,
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("itemcache-worker".into())
            .spawn(move || worker::run(worker_shared))?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    /// Submits one owned item for deduplication and collection into `dest`.
    ///
    /// Blocks while the work queue is full (back-pressure, no timeout).
    /// Fails fast with [`SubmitError::WorkerStopped`] once the worker has
    /// stopped after a fatal destination failure.
    pub fn submit(&self, dest: Arc<dyn Collection<T>>, item: T) -> Result<(), SubmitError> {
        if self.shared.worker_dead.load(Ordering::Acquire) {
            return Err(SubmitError::WorkerStopped);
        }

        let metrics_on = self.shared.config.enable_metrics;
        if metrics_on && self.shared.queue.is_full() {
            self.shared.metrics.full_waits.fetch_add(1, Ordering::Relaxed);
        }

        self.shared
            .queue
            .enqueue(WorkEntry::Insert {
                dest,
                item: Box::new(item),
            })
            .map_err(|_| SubmitError::WorkerStopped)?;

        if metrics_on {
            self.shared
                .metrics
                .items_submitted
                .fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Flush barrier: blocks until every insert this thread submitted
    /// before the call has been fully processed (canonicalized or
    /// deduplicated, with the destination append done).
    ///
    /// Uses the same back-pressure protocol as [`submit`].
    ///
    /// [`submit`]: ItemCache::submit
    pub fn flush(&self) -> Result<(), SubmitError> {
        let done = Arc::new(FlushSignal::new());
        self.shared
            .queue
            .enqueue(WorkEntry::Flush {
                done: Arc::clone(&done),
            })
            .map_err(|_| SubmitError::WorkerStopped)?;

        done.wait();
        Ok(())
    }

    /// Returns the cache activity counters.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.shared.metrics
    }

    /// Returns the configuration the cache was built with.
    pub fn config(&self) -> Config {
        self.shared.config
    }

    /// True once the worker has stopped after a fatal error.
    pub fn is_worker_dead(&self) -> bool {
        self.shared.worker_dead.load(Ordering::Acquire)
    }
}

impl<T: ItemContent> Drop for ItemCache<T> {
    fn drop(&mut self) {
        // Entries already queued drain ahead of the sentinel, so the
        // destructor processes all pending work before the index is freed.
        // A worker that died fatally has closed the queue; the enqueue is
        // then a no-op and join returns immediately.
        let _ = self.shared.queue.enqueue(WorkEntry::Shutdown);

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("cache worker panicked during shutdown");
            }
        }
    }
}
