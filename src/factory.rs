//! Factory seam between a document model and the undo engine.
//!
//! A host that wants to keep its history policy configurable accepts any
//! [`UndoManagerFactory`] and hands it the four integration points: the
//! change source and the `apply`/`undo`/`merge` callbacks. Nothing else is
//! shared; the host gets back an opaque [`UndoManager`].

use crate::event::EventSource;
use crate::manager::UndoManager;

/// Merge policy that never combines changes. The conservative default for
/// hosts without a coalescing rule.
pub fn never_merge<C>(_previous: &C, _incoming: &C) -> Option<C> {
    None
}

/// Constructs [`UndoManager`]s with a fixed history policy.
pub trait UndoManagerFactory {
    fn create<C: Clone + 'static>(
        &self,
        source: &EventSource<C>,
        apply: impl FnMut(&C) + 'static,
        undo: impl FnMut(&C) + 'static,
        merge: impl Fn(&C, &C) -> Option<C> + 'static,
    ) -> UndoManager<C>;
}

/// Factory for managers with unbounded history.
pub struct UnlimitedHistoryFactory;

impl UndoManagerFactory for UnlimitedHistoryFactory {
    fn create<C: Clone + 'static>(
        &self,
        source: &EventSource<C>,
        apply: impl FnMut(&C) + 'static,
        undo: impl FnMut(&C) + 'static,
        merge: impl Fn(&C, &C) -> Option<C> + 'static,
    ) -> UndoManager<C> {
        UndoManager::unlimited_history(source, apply, undo, merge)
    }
}

/// Factory for managers that keep at most `capacity` history entries.
pub struct FixedSizeHistoryFactory {
    capacity: usize,
}

impl FixedSizeHistoryFactory {
    /// # Panics
    ///
    /// Panics if `capacity` is zero; use [`ZeroHistoryFactory`] to disable
    /// history.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        Self { capacity }
    }
}

impl UndoManagerFactory for FixedSizeHistoryFactory {
    fn create<C: Clone + 'static>(
        &self,
        source: &EventSource<C>,
        apply: impl FnMut(&C) + 'static,
        undo: impl FnMut(&C) + 'static,
        merge: impl Fn(&C, &C) -> Option<C> + 'static,
    ) -> UndoManager<C> {
        UndoManager::fixed_size_history(self.capacity, source, apply, undo, merge)
    }
}

/// Factory for managers that retain no history; the callbacks are accepted
/// and ignored so hosts can swap policies without rewiring.
pub struct ZeroHistoryFactory;

impl UndoManagerFactory for ZeroHistoryFactory {
    fn create<C: Clone + 'static>(
        &self,
        source: &EventSource<C>,
        _apply: impl FnMut(&C) + 'static,
        _undo: impl FnMut(&C) + 'static,
        _merge: impl Fn(&C, &C) -> Option<C> + 'static,
    ) -> UndoManager<C> {
        UndoManager::zero_history(source)
    }
}
