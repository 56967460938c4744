//! # Undo/Redo History
//!
//! Snapshot-based history for the editing session.
//!
//! ## Design
//!
//! - Callers checkpoint explicitly with [`HistoryManager::commit`]; nothing
//!   is recorded automatically
//! - A checkpoint is the state the next undo returns to, so it is taken from
//!   the tree as it was *before* the mutation
//! - Undo stores the current tree on the redo stack and hands back the last
//!   checkpoint; redo is the mirror image
//! - New commits clear the redo stack
//! - The undo stack is bounded; the oldest checkpoint is evicted first
//!
//! ```text
//! commit(T0), mutate → T1
//! ┌──────────────────────────────┐
//! │ undo: [T0]      redo: []     │
//! └──────────────────────────────┘
//! undo(T1) → T0
//! ┌──────────────────────────────┐
//! │ undo: []        redo: [T1]   │
//! └──────────────────────────────┘
//! redo(T0) → T1
//! ┌──────────────────────────────┐
//! │ undo: [T0]      redo: []     │
//! └──────────────────────────────┘
//! ```

use crate::document::DocumentTree;
use crate::snapshot::{Snapshot, SnapshotError};
use serde::Serialize;
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_MAX_DEPTH: usize = 50;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Could not capture history checkpoint: {0}")]
    Capture(#[from] SnapshotError),
}

/// Undo/redo availability, as shown on the toolbar buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Bounded undo/redo stacks of document snapshots
#[derive(Debug)]
pub struct HistoryManager {
    /// Checkpoints available for undo (most recent last)
    undo_stack: VecDeque<Snapshot>,

    /// States available for redo (most recent last)
    redo_stack: Vec<Snapshot>,

    max_depth: usize,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// A depth of 0 is treated as 1
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Checkpoint `tree`. On a capture failure nothing changes.
    pub fn commit(&mut self, tree: &DocumentTree) -> Result<HistoryState, HistoryError> {
        let snapshot = Snapshot::capture(tree).map_err(|e| {
            warn!(error = %e, "history commit skipped");
            e
        })?;
        Ok(self.push_checkpoint(snapshot))
    }

    /// Record an already captured checkpoint
    pub fn push_checkpoint(&mut self, snapshot: Snapshot) -> HistoryState {
        self.undo_stack.push_back(snapshot);

        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }

        self.redo_stack.clear();
        debug!(undo = self.undo_stack.len(), "history checkpoint");

        self.state()
    }

    /// Step back. Returns the snapshot the caller should restore, or `None`
    /// when there is nothing to undo.
    pub fn undo(&mut self, current: &DocumentTree) -> Result<Option<Snapshot>, HistoryError> {
        if self.undo_stack.is_empty() {
            return Ok(None);
        }

        let present = Snapshot::capture(current).map_err(|e| {
            warn!(error = %e, "undo skipped");
            e
        })?;

        self.redo_stack.push(present);
        Ok(self.undo_stack.pop_back())
    }

    /// Step forward. Returns the snapshot the caller should restore, or
    /// `None` when there is nothing to redo.
    pub fn redo(&mut self, current: &DocumentTree) -> Result<Option<Snapshot>, HistoryError> {
        if self.redo_stack.is_empty() {
            return Ok(None);
        }

        let present = Snapshot::capture(current).map_err(|e| {
            warn!(error = %e, "redo skipped");
            e
        })?;

        // Never exceeds max_depth: this slot was freed by the matching undo
        self.undo_stack.push_back(present);
        Ok(self.redo_stack.pop())
    }

    /// Put back the stacks after an undo whose snapshot could not be restored
    pub fn revert_undo(&mut self, popped: Snapshot) {
        self.redo_stack.pop();
        self.undo_stack.push_back(popped);
    }

    /// Put back the stacks after a redo whose snapshot could not be restored
    pub fn revert_redo(&mut self, popped: Snapshot) {
        self.undo_stack.pop_back();
        self.redo_stack.push(popped);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn state(&self) -> HistoryState {
        HistoryState {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Drop all history (after loading a different document)
    pub fn clear(&mut self) -> HistoryState {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.state()
    }

    /// Oldest retained checkpoint
    pub fn oldest(&self) -> Option<&Snapshot> {
        self.undo_stack.front()
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}
