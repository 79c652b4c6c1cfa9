//! Change queues: the storage layer of the undo engine.
//!
//! A change queue records an ordered sequence of opaque change values and a
//! single cursor separating the undoable part (before the cursor, retrieved
//! with [`ChangeQueue::prev`]) from the redoable part (at or after the
//! cursor, retrieved with [`ChangeQueue::next`]). Recording a new change
//! while the cursor is mid-history discards the redoable tail; there is no
//! branching history.
//!
//! Three storage policies share the contract:
//!
//! - [`UnlimitedChangeQueue`]: growable, never evicts
//! - [`FixedSizeChangeQueue`]: ring buffer, silently evicts the oldest
//!   undoable entries on overflow
//! - [`ZeroSizeChangeQueue`]: records nothing (undo explicitly disabled)

mod fixed;
mod unlimited;
mod zero;

pub use fixed::FixedSizeChangeQueue;
pub use unlimited::UnlimitedChangeQueue;
pub use zero::ZeroSizeChangeQueue;

/// An opaque token identifying a cursor position in a queue's history.
///
/// Tokens compare equal only when they denote the same history boundary:
/// `abs` is the absolute boundary index (monotonic across eviction and
/// [`ChangeQueue::forget_history`]), and `rev` stamps the entry immediately
/// preceding the boundary. Rewriting history past a boundary gives the
/// replacement entries fresh stamps, so a stale token never compares equal
/// to any later position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuePosition {
    abs: u64,
    rev: u64,
}

impl QueuePosition {
    pub(crate) fn new(abs: u64, rev: u64) -> Self {
        Self { abs, rev }
    }
}

/// A bidirectional cursor over a recorded sequence of changes.
///
/// `next`/`prev` hand back clones of the stored changes; the entries stay in
/// the queue so the cursor can move over them again. Both panic when their
/// `has_*` guard is false -- the [`UndoManager`] always checks first, so a
/// panic here is a contract violation, not a user-facing condition.
///
/// [`UndoManager`]: crate::UndoManager
pub trait ChangeQueue<C> {
    /// True iff a redoable change sits at the cursor.
    fn has_next(&self) -> bool;

    /// True iff an undoable change sits before the cursor.
    fn has_prev(&self) -> bool;

    /// Returns the change at the cursor and advances past it (redo).
    ///
    /// # Panics
    ///
    /// Panics if [`has_next`](ChangeQueue::has_next) is false.
    fn next(&mut self) -> C;

    /// Moves the cursor back one entry and returns that change (undo).
    ///
    /// # Panics
    ///
    /// Panics if [`has_prev`](ChangeQueue::has_prev) is false.
    fn prev(&mut self) -> C;

    /// The next redoable change, without moving the cursor.
    fn peek_next(&self) -> Option<&C>;

    /// The most recent undoable change, without moving the cursor.
    fn peek_prev(&self) -> Option<&C>;

    /// Discards everything from the cursor to the end, appends the batch in
    /// order, and advances the cursor to the new end.
    ///
    /// An empty batch is a legal truncate-only call. The batch form exists
    /// because a merge replaces two entries with one, and a failed merge
    /// attempt re-pushes both originals.
    fn push(&mut self, changes: Vec<C>);

    /// Token for the current cursor position; see [`QueuePosition`].
    fn current_position(&self) -> QueuePosition;

    /// Drops every undoable entry. The redoable tail survives and the
    /// cursor lands at the front of it.
    fn forget_history(&mut self);
}
