//! Merge prevention after a period of change-source inactivity.
//!
//! Coalescing every keystroke into one history entry makes undo useless;
//! never coalescing makes it tedious. The usual editor compromise is to
//! merge bursts of typing and break the chain once the user pauses. This
//! wrapper implements the pause detection: a change arriving after the
//! configured idle delay never merges with its predecessor, regardless of
//! the delegate's merge policy.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::event::{EventSource, Subscription};
use crate::manager::{PreventMergeHandle, UndoManager};
use crate::queue::QueuePosition;

/// Idle delay used by [`InactivityUndoManager::with_default_delay`];
/// matches the feel of mainstream editors.
pub const DEFAULT_PREVENT_MERGE_DELAY: Duration = Duration::from_millis(500);

/// An [`UndoManager`] decorated with inactivity-based merge prevention.
///
/// The wrapper watches the same change source as the delegate and compares
/// each emission's arrival time with the previous one; on a gap of at least
/// `prevent_merge_delay` it calls [`prevent_merge`] on the delegate before
/// the delegate records the change. The gap detector therefore has to run
/// first, which is why construction takes a factory closure for the
/// delegate rather than an already-subscribed manager: subscription order
/// on the source is registration order.
///
/// All other operations forward to the delegate unchanged.
///
/// [`prevent_merge`]: UndoManager::prevent_merge
pub struct InactivityUndoManager<C> {
    delegate: UndoManager<C>,
    subscription: Option<Subscription>,
}

impl<C: Clone + 'static> InactivityUndoManager<C> {
    /// Builds the gap detector on `source`, then builds the delegate via
    /// `make_delegate` (which should subscribe its manager to the same
    /// source, as every [`UndoManager`] constructor does).
    pub fn new(
        source: &EventSource<C>,
        prevent_merge_delay: Duration,
        make_delegate: impl FnOnce(&EventSource<C>) -> UndoManager<C>,
    ) -> Self {
        let handle: Rc<RefCell<Option<PreventMergeHandle<C>>>> = Rc::new(RefCell::new(None));
        let last_emission: Cell<Option<Instant>> = Cell::new(None);

        let detector_handle = Rc::clone(&handle);
        let subscription = source.subscribe(move |_| {
            let now = Instant::now();
            if let Some(previous) = last_emission.get() {
                if now.duration_since(previous) >= prevent_merge_delay {
                    trace!("change source idle past delay, breaking merge chain");
                    if let Some(handle) = detector_handle.borrow().as_ref() {
                        handle.prevent_merge();
                    }
                }
            }
            last_emission.set(Some(now));
        });

        let delegate = make_delegate(source);
        *handle.borrow_mut() = Some(delegate.prevent_merge_handle());

        Self {
            delegate,
            subscription: Some(subscription),
        }
    }

    /// Like [`new`](InactivityUndoManager::new) with
    /// [`DEFAULT_PREVENT_MERGE_DELAY`].
    pub fn with_default_delay(
        source: &EventSource<C>,
        make_delegate: impl FnOnce(&EventSource<C>) -> UndoManager<C>,
    ) -> Self {
        Self::new(source, DEFAULT_PREVENT_MERGE_DELAY, make_delegate)
    }

    pub fn undo(&mut self) -> bool {
        self.delegate.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.delegate.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.delegate.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.delegate.can_redo()
    }

    pub fn next_to_undo(&self) -> Option<C> {
        self.delegate.next_to_undo()
    }

    pub fn next_to_redo(&self) -> Option<C> {
        self.delegate.next_to_redo()
    }

    pub fn is_performing_action(&self) -> bool {
        self.delegate.is_performing_action()
    }

    pub fn prevent_merge(&mut self) {
        self.delegate.prevent_merge()
    }

    pub fn forget_history(&mut self) {
        self.delegate.forget_history()
    }

    pub fn current_position(&self) -> QueuePosition {
        self.delegate.current_position()
    }

    pub fn mark(&mut self) {
        self.delegate.mark()
    }

    pub fn at_marked_position(&self) -> bool {
        self.delegate.at_marked_position()
    }

    /// Releases the wrapper's own subscription and closes the delegate.
    /// Idempotent, like [`UndoManager::close`].
    pub fn close(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.delegate.close();
    }
}
