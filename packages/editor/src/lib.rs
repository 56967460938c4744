//! # Media Kit Editor
//!
//! Editing engine for the Media Kit Builder: the document tree, snapshot
//! history with undo/redo, and drag-and-drop for palette items, placed
//! components and whole sections.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host: pointer / touch / keys, zone geometry │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ drag: adapters → DragController             │
//! │  - Touch threshold and ghost position       │
//! │  - Zone lookup via DropZoneRegistry         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: EditSession                        │
//! │  - Resolver (premium gating, atomic moves)  │
//! │  - Mutations for non-drag edits             │
//! │  - HistoryManager checkpoints               │
//! │  - EditorEvents signals, persistence gate   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: DocumentTree (source of truth)    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the source of truth**: the page is rendered from it,
//!    never read back from it
//! 2. **Checkpoint only real changes**: no-op drops and rejected edits
//!    leave history alone
//! 3. **One drop path**: pointer, touch and scripted drops all go through
//!    the same resolver
//! 4. **No ambient state**: catalog, access and event sink are injected
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mediakit_editor::{DocumentTree, EditSession, EditorConfig, Mutation, SectionLayout};
//!
//! let mut session = EditSession::new(DocumentTree::new(), EditorConfig::default());
//!
//! session.apply(&Mutation::AddSection {
//!     section_type: "about".to_string(),
//!     layout: SectionLayout::FullWidth,
//!     index: None,
//! })?;
//! let column_id = session.document().sections[0].columns[0].id.clone();
//!
//! session.add_component("bio", &column_id)?;
//! session.undo()?;
//! session.redo()?;
//! ```

mod access;
mod catalog;
mod config;
mod document;
mod drag;
mod drop_zone;
mod errors;
mod events;
mod history;
mod mutations;
mod persistence;
mod session;
mod snapshot;

pub use access::{AccessControl, CapabilitySet, Tier, PREMIUM_COMPONENTS};
pub use catalog::{ComponentCatalog, ComponentTemplate, ComponentTemplates};
pub use config::{EditorConfig, DEFAULT_TOUCH_DRAG_THRESHOLD};
pub use document::{
    Column, ColumnLocation, Component, ComponentLocation, DocumentError, DocumentTree, FieldValue,
    IdGenerator, Section, SectionLayout,
};
pub use drag::{
    CancelReason, DragController, DragEvent, DragFeedback, DragOutcome, DragSession, DragState,
    DropRequest, Indicator, InputKind, PointerAdapter, PointerInput, TouchAdapter, TouchInput,
};
pub use drop_zone::{
    ChildBounds, DropZoneRegistry, InsertionPoint, Point, Rect, StaticZone, ZoneGeometry, ZoneKind,
    ZoneState,
};
pub use errors::EditorError;
pub use events::{EditorEvent, EditorEvents, EventQueue, NoopEvents};
pub use history::{HistoryError, HistoryManager, HistoryState, DEFAULT_MAX_DEPTH};
pub use mutations::{DragSource, EditOutcome, Mutation, MutationError, MutationResult, Resolver};
pub use persistence::{
    LoadTicket, Operation, Persistence, PersistenceError, PersistenceGate, SaveCompletion,
    SaveReceipt, SaveTicket,
};
pub use session::{DragUpdate, EditSession, EditorKey};
pub use snapshot::{Snapshot, SnapshotError};
