//! ItemCache - Deduplicating Collection Cache for Probe Runtimes
//!
//! An item-deduplicating, asynchronous collection cache for
//! security-configuration probe runtimes. Probes submit structured result
//! items as they scan a target; many of those items repeat (same file
//! record, same package tuple). The cache collapses structural duplicates
//! into one canonical stored copy, stamps each canonical item with a
//! process-unique id, and appends canonical references to a caller-supplied
//! destination aggregate.
//!
//! # Key Features
//!
//! - Bounded work queue with back-pressure (producers block when full)
//! - Single worker thread owns the dedup index, so no index locking
//! - 64-bit content fingerprints with explicit collision resolution
//! - Flush barrier: wait until everything submitted so far is processed
//! - Fail-fast submits once the worker has stopped after a fatal error
//!
//! # Example
//!
//! ```
//! use itemcache::{ItemCache, ItemContent, ItemId, VecCollection};
//! use std::sync::Arc;
//!
//! struct PackageRecord {
//!     name: String,
//!     version: String,
//!     id: Option<ItemId>,
//! }
//!
//! impl ItemContent for PackageRecord {
//!     fn fingerprint(&self) -> u64 {
//!         // Any stable 64-bit content digest works; collisions are handled.
//!         self.name.len() as u64 ^ ((self.version.len() as u64) << 32)
//!     }
//!     fn content_eq(&self, other: &Self) -> bool {
//!         self.name == other.name && self.version == other.version
//!     }
//!     fn set_id(&mut self, id: ItemId) {
//!         self.id = Some(id);
//!     }
//! }
//!
//! let cache = ItemCache::new().unwrap();
//! let dest: Arc<VecCollection<PackageRecord>> = Arc::new(VecCollection::new());
//!
//! let record = PackageRecord {
//!     name: "openssl".into(),
//!     version: "3.0.13".into(),
//!     id: None,
//! };
//! cache.submit(dest.clone(), record).unwrap();
//! cache.flush().unwrap();
//!
//! assert_eq!(dest.len(), 1);
//! assert!(dest.snapshot()[0].id.is_some());
//! ```

mod cache;
mod collection;
mod config;
mod error;
mod flush;
mod ident;
mod index;
mod invariants;
mod metrics;
mod queue;
mod worker;

pub use cache::ItemCache;
pub use collection::{AppendError, Collection, VecCollection};
pub use config::{Config, HIGH_THROUGHPUT_CONFIG, SMALL_FOOTPRINT_CONFIG};
pub use error::{CacheError, SubmitError};
pub use ident::{ItemContent, ItemId};
pub use metrics::CacheMetrics;
