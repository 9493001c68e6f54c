//! Probe-Side Collection Boundary
//!
//! The layer between a security-configuration probe and the
//! [`itemcache`] deduplicating cache. A probe scans a target system and
//! produces [`ProbeItem`]s; this crate evaluates filter predicates on the
//! producer thread, submits survivors to the cache, and renders the
//! collected canonical items as JSON reports.
//!
//! # Example
//!
//! ```
//! use itemcache::{ItemCache, VecCollection};
//! use probe_collector::{
//!     Collected, CollectContext, Criterion, Filter, ItemStatus, ProbeItem,
//! };
//! use std::sync::Arc;
//!
//! let cache = ItemCache::new().unwrap();
//! let dest: Arc<VecCollection<ProbeItem>> = Arc::new(VecCollection::new());
//! let filters = vec![Filter::exclude(vec![Criterion::Status(ItemStatus::Error)])];
//!
//! let ctx = CollectContext::new(&cache, dest.clone(), filters);
//!
//! let item = ProbeItem::new("file_item", ItemStatus::Exists)
//!     .with_entry("path", "/etc/passwd");
//! assert_eq!(ctx.collect(item).unwrap(), Collected::Accepted);
//!
//! let broken = ProbeItem::new("file_item", ItemStatus::Error);
//! assert_eq!(ctx.collect(broken).unwrap(), Collected::Filtered);
//!
//! ctx.flush().unwrap();
//! assert_eq!(dest.len(), 1);
//! ```

pub mod collect;
pub mod filter;
pub mod item;
pub mod report;

// Re-export main types
pub use collect::{CollectContext, Collected, CollectError};
pub use filter::{accepted, Criterion, Filter, FilterAction};
pub use item::{ItemEntry, ItemStatus, ProbeItem};
pub use report::{to_json_string, write_json, write_json_file, ReportError};
