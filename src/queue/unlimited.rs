//! Growable change queue with no eviction.

use super::{ChangeQueue, QueuePosition};

struct Entry<C> {
    change: C,
    rev: u64,
}

/// A change queue backed by a growable `Vec`; history is only ever lost
/// through truncation on push or [`forget_history`].
///
/// [`forget_history`]: ChangeQueue::forget_history
pub struct UnlimitedChangeQueue<C> {
    entries: Vec<Entry<C>>,
    /// Cursor into `entries`, in `[0, entries.len()]`.
    current: usize,
    /// How many entries have been dropped from the front by `forget_history`.
    forgotten: u64,
    /// Stamp of the entry just before the front boundary (0 initially).
    base_rev: u64,
    next_rev: u64,
}

impl<C> UnlimitedChangeQueue<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            current: 0,
            forgotten: 0,
            base_rev: 0,
            next_rev: 1,
        }
    }
}

impl<C> Default for UnlimitedChangeQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clone> ChangeQueue<C> for UnlimitedChangeQueue<C> {
    fn has_next(&self) -> bool {
        self.current < self.entries.len()
    }

    fn has_prev(&self) -> bool {
        self.current > 0
    }

    fn next(&mut self) -> C {
        assert!(self.has_next(), "next() called with no redoable change");
        let change = self.entries[self.current].change.clone();
        self.current += 1;
        change
    }

    fn prev(&mut self) -> C {
        assert!(self.has_prev(), "prev() called with no undoable change");
        self.current -= 1;
        self.entries[self.current].change.clone()
    }

    fn peek_next(&self) -> Option<&C> {
        self.entries.get(self.current).map(|e| &e.change)
    }

    fn peek_prev(&self) -> Option<&C> {
        if self.current > 0 {
            Some(&self.entries[self.current - 1].change)
        } else {
            None
        }
    }

    fn push(&mut self, changes: Vec<C>) {
        self.entries.truncate(self.current);
        for change in changes {
            self.entries.push(Entry {
                change,
                rev: self.next_rev,
            });
            self.next_rev += 1;
        }
        self.current = self.entries.len();
    }

    fn current_position(&self) -> QueuePosition {
        let rev = if self.current == 0 {
            self.base_rev
        } else {
            self.entries[self.current - 1].rev
        };
        QueuePosition::new(self.forgotten + self.current as u64, rev)
    }

    fn forget_history(&mut self) {
        if self.current > 0 {
            self.base_rev = self.entries[self.current - 1].rev;
            self.entries.drain(..self.current);
            self.forgotten += self.current as u64;
            self.current = 0;
        }
    }
}
