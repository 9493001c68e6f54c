//! The destination aggregate seam: where canonical items are collected.

use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

/// Error returned by a destination aggregate when an append fails.
///
/// An append failure is fatal for the cache run: the worker logs it,
/// latches the dead flag, and stops consuming.
#[derive(Debug, Clone, Error)]
#[error("append to collection failed: {reason}")]
pub struct AppendError {
    /// Human-readable failure description.
    pub reason: String,
}

impl AppendError {
    /// Creates an append error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A destination aggregate that accumulates canonical-item references.
///
/// The cache appends from its worker thread only, one item at a time, in
/// the order the corresponding submits completed. Implementations must be
/// shareable across threads; whether *external* readers may observe the
/// aggregate concurrently is the implementor's concern.
pub trait Collection<T>: Send + Sync {
    /// Appends a canonical item reference to the aggregate.
    fn append(&self, item: Arc<T>) -> Result<(), AppendError>;
}

/// In-memory destination aggregate preserving append order.
///
/// The bundled default implementation; suitable for collecting one probe
/// run's items before handing them to a report writer.
pub struct VecCollection<T> {
    items: Mutex<Vec<Arc<T>>>,
}

impl<T> VecCollection<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of collected references.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Returns true if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Returns a snapshot of the collected references, in append order.
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.items.lock().clone()
    }
}

impl<T> Default for VecCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync> Collection<T> for VecCollection<T> {
    fn append(&self, item: Arc<T>) -> Result<(), AppendError> {
        self.items.lock().push(item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let collection = VecCollection::new();
        for i in 0..5u64 {
            collection.append(Arc::new(i)).unwrap();
        }

        let snapshot = collection.snapshot();
        assert_eq!(snapshot.len(), 5);
        for (i, item) in snapshot.iter().enumerate() {
            assert_eq!(**item, i as u64);
        }
    }

    #[test]
    fn test_snapshot_shares_items() {
        let collection = VecCollection::new();
        let item = Arc::new(7u64);
        collection.append(Arc::clone(&item)).unwrap();

        let snapshot = collection.snapshot();
        assert!(Arc::ptr_eq(&snapshot[0], &item));
    }

    #[test]
    fn test_empty() {
        let collection = VecCollection::<u64>::new();
        assert!(collection.is_empty());
        assert_eq!(collection.len(), 0);
    }
}
