//! Change-source plumbing: a minimal synchronous event stream.
//!
//! The undo engine never polls the document for edits; the document pushes
//! them through an [`EventSource`]. Delivery is synchronous and ordered:
//! every live subscriber runs, in registration order, before `emit` returns.
//!
//! This is a single-threaded seam. Handlers must not subscribe, unsubscribe,
//! or emit on the same source from inside an emission (the interior `RefCell`
//! turns a violation into a panic during development rather than silent
//! corruption).

use std::cell::RefCell;
use std::rc::Rc;

struct Subscribers<C> {
    next_id: u64,
    handlers: Vec<(u64, Box<dyn FnMut(&C)>)>,
}

/// A shared handle to a stream of change values.
///
/// Cloning the handle is cheap; all clones feed the same subscriber list.
/// The document model keeps one handle for emitting, and hands another to
/// the undo manager at construction time.
pub struct EventSource<C> {
    inner: Rc<RefCell<Subscribers<C>>>,
}

impl<C: 'static> EventSource<C> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Subscribers {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Register a handler for every future emission.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// unsubscribed or dropped. The subscription holds the source's
    /// subscriber list alive, which is why an [`UndoManager`] must be
    /// closed (or dropped) when its document goes away.
    ///
    /// [`UndoManager`]: crate::UndoManager
    pub fn subscribe(&self, handler: impl FnMut(&C) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.handlers.push((id, Box::new(handler)));
            id
        };
        let inner = Rc::clone(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                inner.borrow_mut().handlers.retain(|(hid, _)| *hid != id);
            })),
        }
    }

    /// Deliver one change to every subscriber, synchronously.
    pub fn emit(&self, change: &C) {
        let mut inner = self.inner.borrow_mut();
        for (_, handler) in inner.handlers.iter_mut() {
            handler(change);
        }
    }

    /// Number of live subscriptions. Exposed for tests and diagnostics.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }
}

impl<C> Clone for EventSource<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C: 'static> Default for EventSource<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle that removes a subscriber when unsubscribed or dropped.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the handler from the source. Safe to call once; dropping the
    /// handle afterwards does nothing further.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
