//! No-op change queue for hosts that disable undo entirely.

use std::marker::PhantomData;

use super::{ChangeQueue, QueuePosition};

/// A change queue that records nothing.
///
/// Every push is discarded, so undo and redo are never available. Used when
/// a host wants the [`UndoManager`](crate::UndoManager) wiring without any
/// history retention.
pub struct ZeroSizeChangeQueue<C> {
    _marker: PhantomData<C>,
}

impl<C> ZeroSizeChangeQueue<C> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<C> Default for ZeroSizeChangeQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clone> ChangeQueue<C> for ZeroSizeChangeQueue<C> {
    fn has_next(&self) -> bool {
        false
    }

    fn has_prev(&self) -> bool {
        false
    }

    fn next(&mut self) -> C {
        panic!("next() called with no redoable change");
    }

    fn prev(&mut self) -> C {
        panic!("prev() called with no undoable change");
    }

    fn peek_next(&self) -> Option<&C> {
        None
    }

    fn peek_prev(&self) -> Option<&C> {
        None
    }

    fn push(&mut self, _changes: Vec<C>) {}

    fn current_position(&self) -> QueuePosition {
        QueuePosition::new(0, 0)
    }

    fn forget_history(&mut self) {}
}
