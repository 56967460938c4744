//! # Snapshot Store
//!
//! Captures a [`DocumentTree`] into an immutable, self-contained value and
//! rebuilds trees from it.
//!
//! A snapshot holds the serialized document, not a reference to live state,
//! so later edits to the tree never leak into recorded history. The payload
//! sits behind an `Arc`: cloning a snapshot (history bookkeeping, handing it
//! to the persistence layer) never copies the document.
//!
//! Round-trip law: `Snapshot::capture(&snapshot.restore()?)? == snapshot`.

use crate::document::{DocumentError, DocumentTree};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Document is corrupt: {0}")]
    Corrupt(#[from] DocumentError),

    #[error("Serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Malformed snapshot: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// Immutable serialization of a document tree at one point in time
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    data: Arc<str>,
    section_count: usize,
    component_count: usize,
}

impl Snapshot {
    /// Serialize `tree`.
    ///
    /// The tree is validated first; a tree with duplicate or empty ids is
    /// reported as corrupt instead of being recorded.
    pub fn capture(tree: &DocumentTree) -> Result<Self, SnapshotError> {
        tree.validate()?;
        let data = serde_json::to_string(tree).map_err(SnapshotError::Serialize)?;

        Ok(Self {
            data: Arc::from(data),
            section_count: tree.sections.len(),
            component_count: tree.component_count(),
        })
    }

    /// Rebuild the document tree this snapshot was captured from
    pub fn restore(&self) -> Result<DocumentTree, SnapshotError> {
        let tree: DocumentTree =
            serde_json::from_str(&self.data).map_err(SnapshotError::Deserialize)?;
        tree.validate()?;
        Ok(tree)
    }

    /// Accept a snapshot produced elsewhere (persistence layer, bindings)
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let tree: DocumentTree = serde_json::from_str(json).map_err(SnapshotError::Deserialize)?;
        Self::capture(&tree)
    }

    pub fn to_json(&self) -> &str {
        &self.data
    }

    pub fn section_count(&self) -> usize {
        self.section_count
    }

    pub fn component_count(&self) -> usize {
        self.component_count
    }

    pub fn is_empty(&self) -> bool {
        self.section_count == 0
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("sections", &self.section_count)
            .field("components", &self.component_count)
            .field("bytes", &self.data.len())
            .finish()
    }
}
