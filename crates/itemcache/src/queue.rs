//! Fixed-capacity work queue between producer threads and the worker.

use crate::collection::Collection;
use crate::config::Config;
use crate::flush::FlushSignal;
use crate::invariants::{debug_assert_bounded_len, debug_assert_monotonic_seq};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;

/// A unit of work handed from a producer to the worker.
pub(crate) enum WorkEntry<T> {
    /// Deduplicate `item` and append its canonical form to `dest`.
    ///
    /// The entry owns the item until the worker decides its fate: kept as a
    /// new canonical, or dropped in favor of a previously seen one.
    Insert {
        dest: Arc<dyn Collection<T>>,
        item: Box<T>,
    },
    /// Completion signal for a flush barrier.
    Flush { done: Arc<FlushSignal> },
    /// Sentinel enqueued at shutdown; the worker exits after popping it.
    Shutdown,
}

/// The queue was closed while (or before) the operation ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QueueClosed;

/// Fixed-capacity FIFO ring of work entries.
///
/// One mutex guards the slots and both sequence counters; two condition
/// variables provide the blocking edges. Producers wait on **not-full**
/// when the ring is at capacity; the single worker waits on **not-empty**.
/// Each enqueue/dequeue signals one waiter on the opposite edge: there is
/// exactly one worker, and at most one producer can use each freed slot.
///
/// `head` and `tail` are unbounded u64 sequence numbers; slot indices are
/// computed by masking, so `tail - head` is always the live count.
pub(crate) struct WorkQueue<T> {
    state: Mutex<RingState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
    mask: u64,
}

struct RingState<T> {
    slots: Box<[Option<WorkEntry<T>>]>,
    /// Next sequence to dequeue.
    head: u64,
    /// Next sequence to enqueue.
    tail: u64,
    closed: bool,
}

impl<T> RingState<T> {
    #[inline]
    fn len(&self) -> usize {
        self.tail.wrapping_sub(self.head) as usize
    }
}

impl<T> WorkQueue<T> {
    pub(crate) fn new(config: Config) -> Self {
        let capacity = config.capacity();

        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        Self {
            state: Mutex::new(RingState {
                slots: slots.into_boxed_slice(),
                head: 0,
                tail: 0,
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
            mask: config.mask(),
        }
    }

    /// Returns the fixed capacity of the queue.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current number of queued entries.
    pub(crate) fn len(&self) -> usize {
        self.state.lock().len()
    }

    /// Returns true if the queue is at capacity.
    pub(crate) fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Stores one entry, blocking while the queue is full.
    ///
    /// Errors once the queue has been closed, including when the close
    /// happens while this call is blocked on **not-full**.
    pub(crate) fn enqueue(&self, entry: WorkEntry<T>) -> Result<(), QueueClosed> {
        let mut state = self.state.lock();

        while state.len() == self.capacity && !state.closed {
            self.not_full.wait(&mut state);
        }
        if state.closed {
            return Err(QueueClosed);
        }

        let tail = state.tail;
        let idx = (tail & self.mask) as usize;
        debug_assert!(state.slots[idx].is_none(), "enqueue into occupied slot");
        state.slots[idx] = Some(entry);
        state.tail = tail.wrapping_add(1);

        debug_assert_monotonic_seq!("tail", tail, state.tail);
        debug_assert_bounded_len!(state.len(), self.capacity);

        self.not_empty.notify_one();
        Ok(())
    }

    /// Removes the oldest entry, blocking while the queue is empty.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub(crate) fn dequeue(&self) -> Option<WorkEntry<T>> {
        let mut state = self.state.lock();

        while state.len() == 0 && !state.closed {
            self.not_empty.wait(&mut state);
        }
        if state.len() == 0 {
            return None;
        }

        let head = state.head;
        let idx = (head & self.mask) as usize;
        let entry = state.slots[idx].take();
        debug_assert!(entry.is_some(), "dequeue from vacant slot");
        state.head = head.wrapping_add(1);

        debug_assert_monotonic_seq!("head", head, state.head);

        self.not_full.notify_one();
        entry
    }

    /// Closes the queue and hands any remaining entries to the caller.
    ///
    /// Every blocked producer and the worker are woken; subsequent enqueues
    /// fail with [`QueueClosed`]. The caller owns the drained entries and
    /// is responsible for completing any flush signals among them.
    pub(crate) fn close(&self) -> Vec<WorkEntry<T>> {
        let mut state = self.state.lock();
        state.closed = true;

        let mut drained = Vec::with_capacity(state.len());
        while state.len() > 0 {
            let head = state.head;
            let idx = (head & self.mask) as usize;
            if let Some(entry) = state.slots[idx].take() {
                drained.push(entry);
            }
            state.head = head.wrapping_add(1);
        }

        self.not_empty.notify_all();
        self.not_full.notify_all();
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::VecCollection;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    fn insert_entry(value: u64, dest: &Arc<VecCollection<u64>>) -> WorkEntry<u64> {
        WorkEntry::Insert {
            dest: Arc::clone(dest) as Arc<dyn Collection<u64>>,
            item: Box::new(value),
        }
    }

    fn item_of(entry: WorkEntry<u64>) -> u64 {
        match entry {
            WorkEntry::Insert { item, .. } => *item,
            _ => panic!("expected insert entry"),
        }
    }

    #[test]
    fn test_fifo_order() {
        let queue = WorkQueue::new(Config::new(3, false));
        let dest = Arc::new(VecCollection::new());

        for i in 0..8 {
            queue.enqueue(insert_entry(i, &dest)).unwrap();
        }
        assert_eq!(queue.len(), 8);

        for i in 0..8 {
            assert_eq!(item_of(queue.dequeue().unwrap()), i);
        }
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_enqueue_blocks_when_full() {
        let queue = Arc::new(WorkQueue::new(Config::new(1, false))); // 2 slots
        let dest = Arc::new(VecCollection::new());

        queue.enqueue(insert_entry(0, &dest)).unwrap();
        queue.enqueue(insert_entry(1, &dest)).unwrap();
        assert!(queue.is_full());

        let enqueued = Arc::new(AtomicBool::new(false));
        let producer = {
            let queue = Arc::clone(&queue);
            let dest = Arc::clone(&dest);
            let enqueued = Arc::clone(&enqueued);
            thread::spawn(move || {
                queue.enqueue(insert_entry(2, &dest)).unwrap();
                enqueued.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!enqueued.load(Ordering::SeqCst), "producer should block on full queue");

        assert_eq!(item_of(queue.dequeue().unwrap()), 0);
        producer.join().unwrap();
        assert!(enqueued.load(Ordering::SeqCst));
        assert_eq!(item_of(queue.dequeue().unwrap()), 1);
        assert_eq!(item_of(queue.dequeue().unwrap()), 2);
    }

    #[test]
    fn test_close_wakes_blocked_producer() {
        let queue = Arc::new(WorkQueue::new(Config::new(1, false)));
        let dest = Arc::new(VecCollection::new());

        queue.enqueue(insert_entry(0, &dest)).unwrap();
        queue.enqueue(insert_entry(1, &dest)).unwrap();

        let producer = {
            let queue = Arc::clone(&queue);
            let dest = Arc::clone(&dest);
            thread::spawn(move || queue.enqueue(insert_entry(2, &dest)))
        };

        thread::sleep(Duration::from_millis(20));
        let drained = queue.close();
        assert_eq!(drained.len(), 2);

        assert_eq!(producer.join().unwrap(), Err(QueueClosed));
        assert_eq!(queue.enqueue(insert_entry(3, &dest)), Err(QueueClosed));
    }

    #[test]
    fn test_dequeue_returns_none_after_close() {
        let queue = WorkQueue::<u64>::new(Config::new(2, false));
        let drained = queue.close();
        assert!(drained.is_empty());
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn test_wraparound_reuses_slots() {
        let queue = WorkQueue::new(Config::new(1, false)); // 2 slots
        let dest = Arc::new(VecCollection::new());

        for round in 0..10 {
            queue.enqueue(insert_entry(round, &dest)).unwrap();
            assert_eq!(item_of(queue.dequeue().unwrap()), round);
        }
    }
}
