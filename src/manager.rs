//! The undo manager: records changes from a source, replays them on demand.
//!
//! An [`UndoManager`] owns one change queue and a live subscription to the
//! document's change source. Every emitted change is recorded (merged into
//! the previous entry when the merge policy allows), and `undo`/`redo` walk
//! the queue while replaying the caller-supplied callbacks.
//!
//! Replay must not be re-captured: while a callback runs, the manager is in
//! the `Replaying` state and the subscription handler drops everything it
//! sees. The state is an explicit two-value enum rather than a buried flag
//! so the invariant can be asserted and tested in isolation.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::event::{EventSource, Subscription};
use crate::queue::{
    ChangeQueue, FixedSizeChangeQueue, QueuePosition, UnlimitedChangeQueue, ZeroSizeChangeQueue,
};

/// Whether the manager is currently replaying one of its own changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplayState {
    Idle,
    Replaying,
}

struct Inner<C> {
    queue: Box<dyn ChangeQueue<C>>,
    merge: Box<dyn Fn(&C, &C) -> Option<C>>,
    /// True when the next incoming change may merge with the latest entry.
    /// Set after every recorded change, cleared by undo/redo and
    /// `prevent_merge`.
    can_merge: bool,
    state: ReplayState,
    mark: QueuePosition,
}

impl<C> Inner<C> {
    fn add_change(&mut self, change: C) {
        // Merge is attempted against a peek so a declined merge leaves the
        // previous entry untouched; only a successful merge rewrites it.
        let merged = if self.can_merge {
            match self.queue.peek_prev() {
                Some(prev) => (self.merge)(prev, &change),
                None => None,
            }
        } else {
            None
        };

        match merged {
            Some(combined) => {
                trace!("merged incoming change into previous entry");
                self.queue.prev();
                self.queue.push(vec![combined]);
            }
            None => self.queue.push(vec![change]),
        }
        self.can_merge = true;
    }
}

/// Sets `Replaying` on construction and restores `Idle` on drop, so the
/// state is released even if a replay callback panics. Merge eligibility is
/// cleared on the way out: a change recorded after an undo/redo must start
/// a fresh history entry.
struct ReplayGuard<'a, C> {
    inner: &'a RefCell<Inner<C>>,
}

impl<'a, C> ReplayGuard<'a, C> {
    fn engage(inner: &'a RefCell<Inner<C>>) -> Self {
        inner.borrow_mut().state = ReplayState::Replaying;
        Self { inner }
    }
}

impl<C> Drop for ReplayGuard<'_, C> {
    fn drop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.state = ReplayState::Idle;
        inner.can_merge = false;
    }
}

/// Lets the inactivity wrapper force a merge boundary without borrowing the
/// whole manager. Holds a weak reference so a leaked handle cannot keep the
/// manager's state alive.
pub(crate) struct PreventMergeHandle<C> {
    inner: Weak<RefCell<Inner<C>>>,
}

impl<C> PreventMergeHandle<C> {
    pub(crate) fn prevent_merge(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().can_merge = false;
        }
    }
}

/// A merge-aware linear undo/redo controller over an opaque change type.
///
/// Constructed from a change queue, three callbacks, and a change source:
///
/// - `apply`: executes a change forward (the redo path)
/// - `undo`: executes a change's inverse (the undo path)
/// - `merge`: pure policy combining two adjacent changes into one history
///   entry, or `None` to keep them separate (see [`never_merge`])
///
/// The manager subscribes to the source at construction and records every
/// emission until [`close`](UndoManager::close) severs the subscription.
///
/// [`never_merge`]: crate::factory::never_merge
pub struct UndoManager<C> {
    inner: Rc<RefCell<Inner<C>>>,
    apply: Box<dyn FnMut(&C)>,
    undo: Box<dyn FnMut(&C)>,
    subscription: Option<Subscription>,
}

impl<C: Clone + 'static> UndoManager<C> {
    /// Builds a manager over an explicit queue. Most callers want one of
    /// [`unlimited_history`](UndoManager::unlimited_history),
    /// [`fixed_size_history`](UndoManager::fixed_size_history), or
    /// [`zero_history`](UndoManager::zero_history).
    pub fn with_queue(
        queue: Box<dyn ChangeQueue<C>>,
        source: &EventSource<C>,
        apply: impl FnMut(&C) + 'static,
        undo: impl FnMut(&C) + 'static,
        merge: impl Fn(&C, &C) -> Option<C> + 'static,
    ) -> Self {
        let mark = queue.current_position();
        let inner = Rc::new(RefCell::new(Inner {
            queue,
            merge: Box::new(merge),
            can_merge: false,
            state: ReplayState::Idle,
            mark,
        }));

        let handler_inner = Rc::clone(&inner);
        let subscription = source.subscribe(move |change: &C| {
            let mut inner = handler_inner.borrow_mut();
            if inner.state == ReplayState::Replaying {
                trace!("change emitted during replay, not recorded");
                return;
            }
            inner.add_change(change.clone());
        });

        Self {
            inner,
            apply: Box::new(apply),
            undo: Box::new(undo),
            subscription: Some(subscription),
        }
    }

    /// Manager with an unbounded history.
    pub fn unlimited_history(
        source: &EventSource<C>,
        apply: impl FnMut(&C) + 'static,
        undo: impl FnMut(&C) + 'static,
        merge: impl Fn(&C, &C) -> Option<C> + 'static,
    ) -> Self {
        Self::with_queue(Box::new(UnlimitedChangeQueue::new()), source, apply, undo, merge)
    }

    /// Manager that remembers at most `capacity` entries, silently
    /// forgetting the oldest ones.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn fixed_size_history(
        capacity: usize,
        source: &EventSource<C>,
        apply: impl FnMut(&C) + 'static,
        undo: impl FnMut(&C) + 'static,
        merge: impl Fn(&C, &C) -> Option<C> + 'static,
    ) -> Self {
        Self::with_queue(
            Box::new(FixedSizeChangeQueue::new(capacity)),
            source,
            apply,
            undo,
            merge,
        )
    }

    /// Manager that retains no history at all; undo and redo are never
    /// available.
    pub fn zero_history(source: &EventSource<C>) -> Self {
        Self::with_queue(
            Box::new(ZeroSizeChangeQueue::new()),
            source,
            |_| {},
            |_| {},
            |_, _| None,
        )
    }

    /// Undoes the most recently recorded (or redone) change.
    ///
    /// Returns `false` when nothing is undoable. The `undo` callback runs
    /// while the manager is replaying, so a change the callback causes the
    /// document to emit is not re-recorded.
    pub fn undo(&mut self) -> bool {
        let change = {
            let mut inner = self.inner.borrow_mut();
            if !inner.queue.has_prev() {
                return false;
            }
            inner.queue.prev()
        };

        debug!("undoing one change");
        let guard = ReplayGuard::engage(&self.inner);
        (self.undo)(&change);
        drop(guard);
        true
    }

    /// Reapplies the most recently undone change.
    ///
    /// Returns `false` when nothing is redoable.
    pub fn redo(&mut self) -> bool {
        let change = {
            let mut inner = self.inner.borrow_mut();
            if !inner.queue.has_next() {
                return false;
            }
            inner.queue.next()
        };

        debug!("redoing one change");
        let guard = ReplayGuard::engage(&self.inner);
        (self.apply)(&change);
        drop(guard);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.inner.borrow().queue.has_prev()
    }

    pub fn can_redo(&self) -> bool {
        self.inner.borrow().queue.has_next()
    }

    /// A clone of the change the next [`undo`](UndoManager::undo) would
    /// revert, if any. UI affordances such as "Undo typing" hang off this.
    pub fn next_to_undo(&self) -> Option<C> {
        self.inner.borrow().queue.peek_prev().cloned()
    }

    /// A clone of the change the next [`redo`](UndoManager::redo) would
    /// reapply, if any.
    pub fn next_to_redo(&self) -> Option<C> {
        self.inner.borrow().queue.peek_next().cloned()
    }

    /// True while an `apply`/`undo` callback invoked by this manager is on
    /// the stack.
    pub fn is_performing_action(&self) -> bool {
        self.inner.borrow().state == ReplayState::Replaying
    }

    /// Forces the next recorded change to start a new history entry instead
    /// of merging with the previous one.
    pub fn prevent_merge(&mut self) {
        self.inner.borrow_mut().can_merge = false;
    }

    /// Drops all undoable history. Redoable entries survive.
    pub fn forget_history(&mut self) {
        debug!("forgetting undoable history");
        self.inner.borrow_mut().queue.forget_history();
    }

    /// Token for the current history position.
    pub fn current_position(&self) -> QueuePosition {
        self.inner.borrow().queue.current_position()
    }

    /// Remembers the current history position, typically at save time. A
    /// fresh manager starts marked at its initial position.
    pub fn mark(&mut self) {
        let mut inner = self.inner.borrow_mut();
        let position = inner.queue.current_position();
        inner.mark = position;
    }

    /// True when the history cursor sits exactly at the marked position;
    /// the usual backing for a "modified since last save" flag.
    pub fn at_marked_position(&self) -> bool {
        let inner = self.inner.borrow();
        inner.mark == inner.queue.current_position()
    }

    /// Stops listening to the change source. Idempotent; also happens on
    /// drop. After closing, the manager no longer records anything, but
    /// existing history can still be walked.
    pub fn close(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            debug!("closing undo manager subscription");
            subscription.unsubscribe();
        }
    }

    pub(crate) fn prevent_merge_handle(&self) -> PreventMergeHandle<C> {
        PreventMergeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }
}
