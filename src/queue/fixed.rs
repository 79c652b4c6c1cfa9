//! Fixed-capacity change queue with ring-buffer eviction.

use tracing::trace;

use super::{ChangeQueue, QueuePosition};

#[derive(Clone)]
struct Entry<C> {
    change: C,
    rev: u64,
}

/// A change queue that keeps at most `capacity` entries.
///
/// Storage is a ring: a fixed slot array plus a `start` offset, a logical
/// `size`, and a cursor `current` relative to `start` in `[0, size]`. Slot
/// lookup is `(start + i) % capacity`. Pushing past capacity silently drops
/// the oldest undoable entries; the cursor and size are clamped to capacity.
pub struct FixedSizeChangeQueue<C> {
    slots: Box<[Option<Entry<C>>]>,
    capacity: usize,
    start: usize,
    size: usize,
    /// Cursor relative to `start`, not an absolute slot index.
    current: usize,
    /// Entries lost to eviction or `forget_history`.
    forgotten: u64,
    base_rev: u64,
    next_rev: u64,
}

impl<C> FixedSizeChangeQueue<C> {
    /// # Panics
    ///
    /// Panics if `capacity` is zero. A zero-capacity history is expressed
    /// with [`ZeroSizeChangeQueue`](super::ZeroSizeChangeQueue) instead.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            capacity,
            start: 0,
            size: 0,
            current: 0,
            forgotten: 0,
            base_rev: 0,
            next_rev: 1,
        }
    }

    fn slot(&self, logical: usize) -> &Entry<C> {
        self.slots[(self.start + logical) % self.capacity]
            .as_ref()
            .expect("live ring slot is populated")
    }
}

impl<C: Clone> ChangeQueue<C> for FixedSizeChangeQueue<C> {
    fn has_next(&self) -> bool {
        self.current < self.size
    }

    fn has_prev(&self) -> bool {
        self.current > 0
    }

    fn next(&mut self) -> C {
        assert!(self.has_next(), "next() called with no redoable change");
        let change = self.slot(self.current).change.clone();
        self.current += 1;
        change
    }

    fn prev(&mut self) -> C {
        assert!(self.has_prev(), "prev() called with no undoable change");
        self.current -= 1;
        self.slot(self.current).change.clone()
    }

    fn peek_next(&self) -> Option<&C> {
        if self.has_next() {
            Some(&self.slot(self.current).change)
        } else {
            None
        }
    }

    fn peek_prev(&self) -> Option<&C> {
        if self.has_prev() {
            Some(&self.slot(self.current - 1).change)
        } else {
            None
        }
    }

    fn push(&mut self, changes: Vec<C>) {
        let total = self.current + changes.len();

        if total > self.capacity {
            // The first `evicted` entries of the logical post-push sequence
            // (old entries before the cursor, then the batch) fall off the
            // front. The new front boundary inherits the stamp of the last
            // entry evicted; its rev must be read before the ring is
            // overwritten.
            let evicted = total - self.capacity;
            self.base_rev = if evicted <= self.current {
                self.slot(evicted - 1).rev
            } else {
                // Eviction reaches into the batch itself; that entry's
                // stamp is assigned below, in batch order.
                self.next_rev + (evicted - self.current - 1) as u64
            };
            self.forgotten += evicted as u64;
            trace!(evicted, "fixed-size queue overflowed");
        }

        let mut pos = self.current;
        for change in changes {
            self.slots[(self.start + pos) % self.capacity] = Some(Entry {
                change,
                rev: self.next_rev,
            });
            self.next_rev += 1;
            pos += 1;
        }

        if pos > self.capacity {
            self.start = (self.start + pos) % self.capacity;
            self.current = self.capacity;
            self.size = self.capacity;
        } else {
            self.current = pos;
            self.size = pos;
        }
    }

    fn current_position(&self) -> QueuePosition {
        let rev = if self.current == 0 {
            self.base_rev
        } else {
            self.slot(self.current - 1).rev
        };
        QueuePosition::new(self.forgotten + self.current as u64, rev)
    }

    fn forget_history(&mut self) {
        if self.current > 0 {
            self.base_rev = self.slot(self.current - 1).rev;
            for i in 0..self.current {
                self.slots[(self.start + i) % self.capacity] = None;
            }
            self.forgotten += self.current as u64;
            self.start = (self.start + self.current) % self.capacity;
            self.size -= self.current;
            self.current = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn zero_capacity_is_rejected() {
        let _ = FixedSizeChangeQueue::<i32>::new(0);
    }

    #[test]
    fn overflow_keeps_the_newest_entries() {
        let mut queue = FixedSizeChangeQueue::new(5);
        queue.push(vec![1, 2, 3]);
        queue.push(vec![4, 5, 6, 7, 8, 9]);

        assert!(!queue.has_next());
        assert!(queue.has_prev());
        assert_eq!(queue.prev(), 9);
        assert!(queue.has_next());
        assert_eq!(queue.prev(), 8);
        assert_eq!(queue.prev(), 7);
        assert_eq!(queue.prev(), 6);
        assert_eq!(queue.prev(), 5);
        assert!(!queue.has_prev());
        assert!(queue.has_next());
    }

    #[test]
    fn fill_to_exact_capacity_evicts_nothing() {
        let mut queue = FixedSizeChangeQueue::new(3);
        queue.push(vec![1, 2, 3]);

        assert_eq!(queue.prev(), 3);
        assert_eq!(queue.prev(), 2);
        assert_eq!(queue.prev(), 1);
        assert!(!queue.has_prev());
    }

    #[test]
    fn batch_larger_than_capacity_keeps_its_tail() {
        let mut queue = FixedSizeChangeQueue::new(2);
        queue.push(vec![1, 2, 3, 4, 5]);

        assert_eq!(queue.prev(), 5);
        assert_eq!(queue.prev(), 4);
        assert!(!queue.has_prev());
    }

    #[test]
    fn push_mid_history_discards_redo_tail() {
        let mut queue = FixedSizeChangeQueue::new(5);
        queue.push(vec![1, 2, 3]);
        queue.prev();
        queue.prev();
        assert!(queue.has_next());

        queue.push(vec![9]);
        assert!(!queue.has_next());
        assert_eq!(queue.prev(), 9);
        assert_eq!(queue.prev(), 1);
        assert!(!queue.has_prev());
    }

    #[test]
    fn empty_push_is_truncate_only() {
        let mut queue = FixedSizeChangeQueue::new(3);
        queue.push(vec![1, 2]);
        queue.prev();

        queue.push(vec![]);
        assert!(!queue.has_next());
        assert_eq!(queue.prev(), 1);
    }

    #[test]
    fn boundary_sweep() {
        // Capacities and batch sizes around the overflow edge; contents
        // must always equal the tail of the pushed sequence.
        for capacity in [1usize, 2, 5] {
            for batch in [0usize, 1, capacity, capacity + 1, 2 * capacity] {
                let mut queue = FixedSizeChangeQueue::new(capacity);
                let values: Vec<usize> = (0..batch).collect();
                queue.push(values.clone());

                assert!(!queue.has_next(), "cap={capacity} batch={batch}");
                let mut walked = Vec::new();
                while queue.has_prev() {
                    walked.push(queue.prev());
                }
                walked.reverse();

                let kept = batch.min(capacity);
                assert_eq!(
                    walked,
                    values[batch - kept..].to_vec(),
                    "cap={capacity} batch={batch}"
                );
            }
        }
    }

    #[test]
    fn repeated_single_pushes_wrap_cleanly() {
        let mut queue = FixedSizeChangeQueue::new(2);
        for i in 0..7 {
            queue.push(vec![i]);
        }

        assert_eq!(queue.prev(), 6);
        assert_eq!(queue.prev(), 5);
        assert!(!queue.has_prev());
        assert_eq!(queue.next(), 5);
        assert_eq!(queue.next(), 6);
    }

    #[test]
    fn position_survives_undo_back_to_it() {
        let mut queue = FixedSizeChangeQueue::new(5);
        queue.push(vec![1]);
        let saved = queue.current_position();

        queue.push(vec![2]);
        assert_ne!(queue.current_position(), saved);
        queue.prev();
        assert_eq!(queue.current_position(), saved);
    }

    #[test]
    fn evicted_position_never_matches_again() {
        let mut queue = FixedSizeChangeQueue::new(2);
        queue.push(vec![1]);
        let saved = queue.current_position();

        // Evicts two entries; every boundary at or before the mark is gone.
        queue.push(vec![2, 3, 4]);
        queue.prev();
        queue.prev();
        assert!(!queue.has_prev());
        assert_ne!(queue.current_position(), saved);
    }

    #[test]
    fn boundary_at_eviction_edge_stays_valid() {
        let mut queue = FixedSizeChangeQueue::new(2);
        queue.push(vec![1]);
        let saved = queue.current_position();

        // One more entry evicts exactly the history before the mark; the
        // marked boundary itself becomes the front of the ring.
        queue.push(vec![2, 3]);
        queue.push(vec![]); // no-op
        let mut back = queue.current_position();
        assert_ne!(back, saved);
        queue.prev();
        queue.prev();
        back = queue.current_position();
        assert_eq!(back, saved);
    }

    #[test]
    fn forget_history_clears_undo_side_only() {
        let mut queue = FixedSizeChangeQueue::new(4);
        queue.push(vec![1, 2, 3]);
        queue.prev();

        queue.forget_history();
        assert!(!queue.has_prev());
        assert!(queue.has_next());
        assert_eq!(queue.next(), 3);
    }
}
