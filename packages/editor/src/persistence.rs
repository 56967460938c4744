//! # Persistence Boundary
//!
//! The editor does not know how documents travel (form post, REST, local
//! storage). It hands a [`Snapshot`] to a [`Persistence`] implementation and
//! reacts to the result.
//!
//! Saves and loads are not re-entrant. While one is outstanding, a second
//! request of the same kind is rejected, not queued, and never reaches the
//! backend. The in-flight flag is held by a ticket that clears it on drop,
//! so an abandoned future cannot wedge the gate.

use crate::document::DocumentTree;
use crate::snapshot::{Snapshot, SnapshotError};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("A {0} is already in progress")]
    AlreadyInProgress(Operation),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Save,
    Load,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Save => write!(f, "save"),
            Operation::Load => write!(f, "load"),
        }
    }
}

/// Acknowledgement returned by a backend after a successful save
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReceipt {
    /// Backend-specific identifier of the stored document (post id, key, ...)
    #[serde(default)]
    pub key: Option<String>,
}

/// Where documents are stored
#[allow(async_fn_in_trait)]
pub trait Persistence {
    async fn save(&self, snapshot: &Snapshot) -> Result<SaveReceipt, PersistenceError>;

    async fn load(&self, key: &str) -> Result<DocumentTree, PersistenceError>;
}

/// Re-entrancy guard for save and load
#[derive(Debug, Clone, Default)]
pub struct PersistenceGate {
    saving: Rc<Cell<bool>>,
    loading: Rc<Cell<bool>>,
}

impl PersistenceGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.get()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Claim the save slot
    pub fn begin_save(&self, revision: u64) -> Result<SaveTicket, PersistenceError> {
        Ok(SaveTicket {
            revision,
            _flag: InFlight::claim(&self.saving, Operation::Save)?,
        })
    }

    /// Claim the load slot
    pub fn begin_load(&self) -> Result<LoadTicket, PersistenceError> {
        Ok(LoadTicket {
            _flag: InFlight::claim(&self.loading, Operation::Load)?,
        })
    }
}

#[derive(Debug)]
struct InFlight {
    flag: Rc<Cell<bool>>,
}

impl InFlight {
    fn claim(flag: &Rc<Cell<bool>>, operation: Operation) -> Result<Self, PersistenceError> {
        if flag.replace(true) {
            return Err(PersistenceError::AlreadyInProgress(operation));
        }
        Ok(Self { flag: flag.clone() })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Proof that a save is in flight. Dropping it frees the save slot.
#[derive(Debug)]
pub struct SaveTicket {
    revision: u64,
    _flag: InFlight,
}

impl SaveTicket {
    /// Document revision the save was started from
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Proof that a load is in flight. Dropping it frees the load slot.
#[derive(Debug)]
pub struct LoadTicket {
    _flag: InFlight,
}

/// Result of a finished save, fed back to the session
#[derive(Debug)]
pub struct SaveCompletion {
    pub revision: u64,
    pub result: Result<SaveReceipt, PersistenceError>,
}

/// Run a save against `backend`, holding `ticket` until it finishes
pub async fn run_save<P: Persistence>(
    backend: &P,
    ticket: SaveTicket,
    snapshot: Snapshot,
) -> SaveCompletion {
    let result = backend.save(&snapshot).await;
    let revision = ticket.revision();
    drop(ticket);
    SaveCompletion { revision, result }
}

/// Run a load against `backend`, holding `ticket` until it finishes
pub async fn run_load<P: Persistence>(
    backend: &P,
    ticket: LoadTicket,
    key: String,
) -> Result<DocumentTree, PersistenceError> {
    let result = backend.load(&key).await;
    drop(ticket);
    result
}
