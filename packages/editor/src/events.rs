//! Signals the editing session sends to the surrounding UI.

use crate::history::HistoryState;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Receiver of editor signals. Every method defaults to doing nothing.
pub trait EditorEvents {
    /// Emitted after every committed mutation, and when a save clears the
    /// dirty flag
    fn dirty_state_changed(&self, _is_dirty: bool) {}

    /// Undo/redo availability changed
    fn history_changed(&self, _state: HistoryState) {}

    /// A premium-gated drop was rejected
    fn upgrade_prompt(&self, _feature: &str) {}

    /// A committed change wants to be persisted (autosave)
    fn save_requested(&self) {}
}

impl<T: EditorEvents + ?Sized> EditorEvents for Rc<T> {
    fn dirty_state_changed(&self, is_dirty: bool) {
        (**self).dirty_state_changed(is_dirty)
    }

    fn history_changed(&self, state: HistoryState) {
        (**self).history_changed(state)
    }

    fn upgrade_prompt(&self, feature: &str) {
        (**self).upgrade_prompt(feature)
    }

    fn save_requested(&self) {
        (**self).save_requested()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl EditorEvents for NoopEvents {}

/// A recorded signal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    #[serde(rename_all = "camelCase")]
    DirtyStateChanged { is_dirty: bool },
    HistoryChanged(HistoryState),
    UpgradePrompt { feature: String },
    SaveRequested,
}

/// Records signals until someone drains them
#[derive(Debug, Default)]
pub struct EventQueue {
    events: RefCell<Vec<EditorEvent>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<EditorEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    fn push(&self, event: EditorEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl EditorEvents for EventQueue {
    fn dirty_state_changed(&self, is_dirty: bool) {
        self.push(EditorEvent::DirtyStateChanged { is_dirty });
    }

    fn history_changed(&self, state: HistoryState) {
        self.push(EditorEvent::HistoryChanged(state));
    }

    fn upgrade_prompt(&self, feature: &str) {
        self.push(EditorEvent::UpgradePrompt {
            feature: feature.to_string(),
        });
    }

    fn save_requested(&self) {
        self.push(EditorEvent::SaveRequested);
    }
}
