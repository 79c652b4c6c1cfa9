//! Retrace - a generic, merge-aware undo/redo engine
//!
//! This crate provides the history-tracking core a text editor (or any
//! document host) needs: a linear change history with a cursor, bounded or
//! unbounded capacity, merge-aware recording of incoming changes, and
//! replay suppression so the engine's own undo/redo work is never recorded
//! as new history.
//!
//! # Architecture
//!
//! The core components are:
//!
//! - [`EventSource`] / [`Subscription`]: the seam through which the
//!   document pushes change values into the engine
//! - [`ChangeQueue`]: bidirectional cursor over recorded changes, in
//!   unlimited, fixed-size (ring buffer), and zero-size variants
//! - [`UndoManager`]: the stateful controller; records, merges, undoes,
//!   redoes, and tracks the marked (saved) position
//! - [`InactivityUndoManager`]: breaks merge chains after typing pauses
//! - [`UndoManagerFactory`]: pluggable history policy for hosts
//!
//! The change type is entirely opaque: the engine stores it, passes it to
//! the host's callbacks, and optionally merges two adjacent values through
//! a host-supplied policy. Only `Clone` is required.
//!
//! # Example
//!
//! ```
//! use retrace::{never_merge, EventSource, UndoManager};
//! use std::{cell::RefCell, rc::Rc};
//!
//! // The "document": a shared running total.
//! let total = Rc::new(RefCell::new(0i64));
//! let source: EventSource<i64> = EventSource::new();
//!
//! let applied = Rc::clone(&total);
//! let undone = Rc::clone(&total);
//! let mut manager = UndoManager::unlimited_history(
//!     &source,
//!     move |delta| *applied.borrow_mut() += delta,
//!     move |delta| *undone.borrow_mut() -= delta,
//!     never_merge,
//! );
//!
//! // Edits happen outside the engine and are reported through the source.
//! *total.borrow_mut() += 5;
//! source.emit(&5);
//! *total.borrow_mut() += 2;
//! source.emit(&2);
//!
//! manager.undo();
//! assert_eq!(*total.borrow(), 5);
//! manager.redo();
//! assert_eq!(*total.borrow(), 7);
//! ```

pub mod event;
pub mod factory;
pub mod inactivity;
pub mod manager;
pub mod queue;

// Re-export commonly used types
pub use event::{EventSource, Subscription};
pub use factory::{
    never_merge, FixedSizeHistoryFactory, UndoManagerFactory, UnlimitedHistoryFactory,
    ZeroHistoryFactory,
};
pub use inactivity::{InactivityUndoManager, DEFAULT_PREVENT_MERGE_DELAY};
pub use manager::UndoManager;
pub use queue::{
    ChangeQueue, FixedSizeChangeQueue, QueuePosition, UnlimitedChangeQueue, ZeroSizeChangeQueue,
};
