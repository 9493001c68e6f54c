//! One-shot completion signal backing the flush barrier.

use parking_lot::{Condvar, Mutex};

/// Completion handle shared between a flushing producer and the worker.
///
/// The completed flag is latched under the mutex, so a signal delivered
/// before the producer starts waiting is never lost.
pub(crate) struct FlushSignal {
    done: Mutex<bool>,
    cond: Condvar,
}

impl FlushSignal {
    pub(crate) fn new() -> Self {
        Self {
            done: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    /// Marks the flush complete and wakes the waiting producer.
    pub(crate) fn complete(&self) {
        let mut done = self.done.lock();
        *done = true;
        self.cond.notify_one();
    }

    /// Blocks until [`complete`] has been called.
    ///
    /// [`complete`]: FlushSignal::complete
    pub(crate) fn wait(&self) {
        let mut done = self.done.lock();
        while !*done {
            self.cond.wait(&mut done);
        }
    }
}
