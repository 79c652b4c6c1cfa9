//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use retrace::{EventSource, UndoManager, UndoManagerFactory};
use ropey::Rope;

/// One reversible edit against a rope buffer. Positions are char indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub position: usize,
    pub removed: String,
    pub inserted: String,
}

impl TextChange {
    pub fn insert(position: usize, text: &str) -> Self {
        Self {
            position,
            removed: String::new(),
            inserted: text.to_string(),
        }
    }

    pub fn remove(position: usize, text: &str) -> Self {
        Self {
            position,
            removed: text.to_string(),
            inserted: String::new(),
        }
    }

    /// The change that exactly reverts this one.
    pub fn inverted(&self) -> Self {
        Self {
            position: self.position,
            removed: self.inserted.clone(),
            inserted: self.removed.clone(),
        }
    }
}

/// Apply a change's forward effect to a buffer.
pub fn apply_change(buffer: &mut Rope, change: &TextChange) {
    let end = change.position + change.removed.chars().count();
    buffer.remove(change.position..end);
    buffer.insert(change.position, &change.inserted);
}

/// Coalesce consecutive insertions, the way editors fold a typed word into
/// one undoable unit.
pub fn merge_insertions(previous: &TextChange, incoming: &TextChange) -> Option<TextChange> {
    let adjacent = incoming.position == previous.position + previous.inserted.chars().count();
    if previous.removed.is_empty() && incoming.removed.is_empty() && adjacent {
        Some(TextChange {
            position: previous.position,
            removed: String::new(),
            inserted: format!("{}{}", previous.inserted, incoming.inserted),
        })
    } else {
        None
    }
}

/// A minimal document host: a rope buffer plus a change source. Every edit
/// mutates the buffer first, then reports the change, exactly the protocol
/// an undo manager expects from a real editor.
pub struct TextHost {
    pub buffer: Rc<RefCell<Rope>>,
    pub source: EventSource<TextChange>,
}

impl TextHost {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(Rope::from_str(text))),
            source: EventSource::new(),
        }
    }

    /// Undo manager with unbounded history and insertion coalescing.
    pub fn manager(&self) -> UndoManager<TextChange> {
        let apply_buffer = Rc::clone(&self.buffer);
        let undo_buffer = Rc::clone(&self.buffer);
        UndoManager::unlimited_history(
            &self.source,
            move |change: &TextChange| apply_change(&mut apply_buffer.borrow_mut(), change),
            move |change: &TextChange| {
                apply_change(&mut undo_buffer.borrow_mut(), &change.inverted())
            },
            merge_insertions,
        )
    }

    /// Same wiring, but the history policy comes from a factory.
    pub fn manager_from<F: UndoManagerFactory>(&self, factory: &F) -> UndoManager<TextChange> {
        let apply_buffer = Rc::clone(&self.buffer);
        let undo_buffer = Rc::clone(&self.buffer);
        factory.create(
            &self.source,
            move |change: &TextChange| apply_change(&mut apply_buffer.borrow_mut(), change),
            move |change: &TextChange| {
                apply_change(&mut undo_buffer.borrow_mut(), &change.inverted())
            },
            merge_insertions,
        )
    }

    pub fn insert(&self, position: usize, text: &str) {
        self.buffer.borrow_mut().insert(position, text);
        self.source.emit(&TextChange::insert(position, text));
    }

    pub fn remove(&self, position: usize, len: usize) {
        let removed: String = {
            let buffer = self.buffer.borrow();
            buffer.slice(position..position + len).to_string()
        };
        self.buffer.borrow_mut().remove(position..position + len);
        self.source.emit(&TextChange::remove(position, &removed));
    }

    /// Emit one change per character, like keystrokes.
    pub fn type_text(&self, position: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.insert(position + i, &ch.to_string());
        }
    }

    pub fn text(&self) -> String {
        self.buffer.borrow().to_string()
    }
}
