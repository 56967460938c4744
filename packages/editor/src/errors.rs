//! Error types for the editor

use crate::document::DocumentError;
use crate::history::HistoryError;
use crate::mutations::MutationError;
use crate::persistence::{Operation, PersistenceError};
use crate::snapshot::SnapshotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl EditorError {
    /// A save or load was refused because another one is still running
    pub fn is_already_in_progress(&self) -> bool {
        self.in_progress_operation().is_some()
    }

    pub fn in_progress_operation(&self) -> Option<Operation> {
        match self {
            EditorError::Persistence(PersistenceError::AlreadyInProgress(op)) => Some(*op),
            _ => None,
        }
    }
}
