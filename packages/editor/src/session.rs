//! # Edit Session
//!
//! Owns everything one open media kit needs: the document tree, its
//! history, the drop-zone registry, the drag controller with its input
//! adapters, and the collaborators (component catalog, access control,
//! event sink, persistence gate).
//!
//! Nothing here is global. The host builds a session, feeds it input, and
//! listens to the [`EditorEvents`] it was given.
//!
//! Every change that lands in the tree goes through [`EditSession::record`]:
//! the pre-change checkpoint is pushed onto the history, the revision is
//! bumped, and `history_changed` / `dirty_state_changed` / `save_requested`
//! are emitted before the call returns.

use crate::access::{AccessControl, Tier};
use crate::catalog::{ComponentCatalog, ComponentTemplates};
use crate::config::EditorConfig;
use crate::document::{DocumentTree, IdGenerator};
use crate::drag::{
    CancelReason, DragController, DragEvent, DragFeedback, DragOutcome, DragState, DropRequest,
    PointerAdapter, PointerInput, TouchAdapter, TouchInput,
};
use crate::drop_zone::{DropZoneRegistry, InsertionPoint, ZoneGeometry, ZoneKind};
use crate::errors::EditorError;
use crate::events::{EditorEvents, NoopEvents};
use crate::history::{HistoryManager, HistoryState};
use crate::mutations::{DragSource, EditOutcome, Mutation, MutationResult, Resolver};
use crate::persistence::{
    run_load, run_save, LoadTicket, Persistence, PersistenceError, PersistenceGate, SaveCompletion,
    SaveReceipt, SaveTicket,
};
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, info, instrument, warn};

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorKey {
    Escape,
    Undo,
    Redo,
}

/// What a piece of drag input did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DragUpdate {
    /// Nothing happened (no drag in progress, touch still below threshold)
    Idle,
    Dragging(DragFeedback),
    Dropped(MutationResult),
    #[serde(rename_all = "camelCase")]
    Cancelled { reason: CancelReason },
}

/// One client's editing session
pub struct EditSession {
    document: DocumentTree,
    history: HistoryManager,
    zones: DropZoneRegistry,
    drag: DragController,
    pointer: PointerAdapter,
    touch: TouchAdapter,
    templates: Box<dyn ComponentTemplates>,
    access: Box<dyn AccessControl>,
    events: Box<dyn EditorEvents>,
    ids: IdGenerator,
    persistence: PersistenceGate,
    config: EditorConfig,

    /// Increments on every change to the tree (commits, undo, redo, load)
    revision: u64,
    dirty: bool,
}

impl EditSession {
    /// Session over `document` with the built-in catalog, free-tier access
    /// and no event listener
    pub fn new(document: DocumentTree, config: EditorConfig) -> Self {
        Self {
            ids: IdGenerator::seeded_from(&document),
            document,
            history: HistoryManager::with_max_depth(config.max_history_depth),
            zones: DropZoneRegistry::new(),
            drag: DragController::new(),
            pointer: PointerAdapter,
            touch: TouchAdapter::new(config.touch_drag_threshold),
            templates: Box::new(ComponentCatalog::builtin()),
            access: Box::new(Tier::Free),
            events: Box::new(NoopEvents),
            persistence: PersistenceGate::new(),
            config,
            revision: 0,
            dirty: false,
        }
    }

    pub fn with_events(mut self, events: impl EditorEvents + 'static) -> Self {
        self.events = Box::new(events);
        self
    }

    pub fn with_access(mut self, access: impl AccessControl + 'static) -> Self {
        self.access = Box::new(access);
        self
    }

    pub fn with_templates(mut self, templates: impl ComponentTemplates + 'static) -> Self {
        self.templates = Box::new(templates);
        self
    }

    pub fn document(&self) -> &DocumentTree {
        &self.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn history_state(&self) -> HistoryState {
        self.history.state()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn zones(&self) -> &DropZoneRegistry {
        &self.zones
    }

    pub fn is_saving(&self) -> bool {
        self.persistence.is_saving()
    }

    pub fn is_loading(&self) -> bool {
        self.persistence.is_loading()
    }

    // ====================================================================
    // Drop zones
    // ====================================================================

    pub fn register_zone(
        &mut self,
        zone_id: impl Into<String>,
        kind: ZoneKind,
        geometry: impl ZoneGeometry + 'static,
    ) {
        self.zones.register(zone_id, kind, geometry);
    }

    pub fn unregister_zone(&mut self, zone_id: &str) -> bool {
        self.zones.unregister(zone_id)
    }

    // ====================================================================
    // Editing
    // ====================================================================

    /// Apply an editing operation and checkpoint it if the tree changed
    #[instrument(skip_all, fields(mutation = mutation.name()))]
    pub fn apply(&mut self, mutation: &Mutation) -> Result<EditOutcome, EditorError> {
        let checkpoint = self.checkpoint()?;
        let outcome = mutation.apply(&mut self.document, &mut self.ids)?;

        if outcome.is_changed() {
            self.record(checkpoint);
        }

        Ok(outcome)
    }

    /// Drop `source` into a zone without a pointer (keyboard, palette
    /// click, scripted replay). Same resolver path as a real drag.
    pub fn drop_into(
        &mut self,
        source: DragSource,
        target: ZoneKind,
        before: Option<String>,
    ) -> Result<MutationResult, EditorError> {
        let insertion = InsertionPoint {
            before,
            indicator_y: 0.0,
        };
        self.resolve_drop(DropRequest {
            source,
            zone_id: String::new(),
            target,
            insertion,
        })
    }

    /// Append a new component of `component_type` to a column
    pub fn add_component(
        &mut self,
        component_type: &str,
        column_id: &str,
    ) -> Result<MutationResult, EditorError> {
        self.drop_into(
            DragSource::palette(component_type),
            ZoneKind::Column {
                column_id: column_id.to_string(),
            },
            None,
        )
    }

    // ====================================================================
    // Drag input
    // ====================================================================

    pub fn handle_pointer(&mut self, input: PointerInput) -> Result<DragUpdate, EditorError> {
        let events = self.pointer.translate(input);
        self.dispatch(events)
    }

    pub fn handle_touch(&mut self, input: TouchInput) -> Result<DragUpdate, EditorError> {
        let events = self.touch.translate(input);
        self.dispatch(events)
    }

    /// Returns whether the key did anything
    pub fn handle_key(&mut self, key: EditorKey) -> Result<bool, EditorError> {
        match key {
            EditorKey::Escape => Ok(self.cancel_drag(CancelReason::Escape).is_some()),
            EditorKey::Undo => self.undo(),
            EditorKey::Redo => self.redo(),
        }
    }

    /// Abort any drag in progress. Returns the reason if one was cancelled.
    pub fn cancel_drag(&mut self, reason: CancelReason) -> Option<CancelReason> {
        self.touch.reset();
        match self.drag.cancel(reason) {
            DragOutcome::Cancelled(reason) => Some(reason),
            _ => None,
        }
    }

    fn dispatch(&mut self, events: Vec<DragEvent>) -> Result<DragUpdate, EditorError> {
        let mut update = DragUpdate::Idle;

        for event in events {
            match self.drag.handle(event, &self.zones) {
                DragOutcome::Ignored => {}
                DragOutcome::Dragging(feedback) => update = DragUpdate::Dragging(feedback),
                DragOutcome::Cancelled(reason) => {
                    self.touch.reset();
                    update = DragUpdate::Cancelled { reason };
                }
                DragOutcome::Dropped(request) => {
                    update = DragUpdate::Dropped(self.resolve_drop(request)?);
                }
            }
        }

        Ok(update)
    }

    #[instrument(skip_all, fields(zone = %request.zone_id))]
    fn resolve_drop(&mut self, request: DropRequest) -> Result<MutationResult, EditorError> {
        let checkpoint = self.checkpoint()?;

        let resolver = Resolver::new(
            self.templates.as_ref(),
            self.access.as_ref(),
            &self.config.premium_capability,
        );
        let result = resolver.apply(
            &mut self.document,
            &mut self.ids,
            &request.source,
            &request.target,
            &request.insertion,
        );

        match &result {
            MutationResult::Inserted { .. } | MutationResult::Moved { .. } => {
                self.record(checkpoint);
            }
            MutationResult::PremiumRequired { feature, .. } => {
                self.events.upgrade_prompt(feature);
            }
            MutationResult::NoOp => debug!("drop left the document unchanged"),
            other => warn!(result = ?other, "drop rejected"),
        }

        Ok(result)
    }

    // ====================================================================
    // History
    // ====================================================================

    /// Capture the current tree for use as a checkpoint
    fn checkpoint(&self) -> Result<Snapshot, EditorError> {
        Snapshot::capture(&self.document).map_err(|e| {
            warn!(error = %e, "checkpoint failed, operation skipped");
            EditorError::from(e)
        })
    }

    fn record(&mut self, checkpoint: Snapshot) {
        let state = self.history.push_checkpoint(checkpoint);
        self.revision += 1;
        self.dirty = true;

        self.events.history_changed(state);
        self.events.dirty_state_changed(true);
        if self.config.autosave {
            self.events.save_requested();
        }
    }

    /// Returns `false` when there is nothing to undo
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let Some(snapshot) = self.history.undo(&self.document)? else {
            return Ok(false);
        };

        match snapshot.restore() {
            Ok(tree) => {
                self.document = tree;
                self.after_history_step();
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "undo snapshot could not be restored");
                self.history.revert_undo(snapshot);
                Err(e.into())
            }
        }
    }

    /// Returns `false` when there is nothing to redo
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let Some(snapshot) = self.history.redo(&self.document)? else {
            return Ok(false);
        };

        match snapshot.restore() {
            Ok(tree) => {
                self.document = tree;
                self.after_history_step();
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "redo snapshot could not be restored");
                self.history.revert_redo(snapshot);
                Err(e.into())
            }
        }
    }

    fn after_history_step(&mut self) {
        self.revision += 1;
        self.dirty = true;
        self.events.history_changed(self.history.state());
        self.events.dirty_state_changed(true);
    }

    // ====================================================================
    // Persistence
    // ====================================================================

    /// Start saving the current document.
    ///
    /// Fails immediately with an "already in progress" error while another
    /// save is outstanding; the backend is not called in that case. The
    /// returned future borrows only the backend; hand its output to
    /// [`EditSession::complete_save`].
    pub fn save<'p, P: Persistence>(
        &self,
        backend: &'p P,
    ) -> Result<impl Future<Output = SaveCompletion> + 'p, EditorError> {
        let (ticket, snapshot) = self.begin_save()?;
        Ok(run_save(backend, ticket, snapshot))
    }

    /// Claim the save slot and capture what to send. For hosts that do the
    /// network call themselves; finish with [`EditSession::finish_save`].
    pub fn begin_save(&self) -> Result<(SaveTicket, Snapshot), EditorError> {
        let ticket = self.persistence.begin_save(self.revision)?;
        let snapshot = self.checkpoint()?;
        debug!(revision = self.revision, "save started");
        Ok((ticket, snapshot))
    }

    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<SaveReceipt, PersistenceError>,
    ) -> Result<SaveReceipt, EditorError> {
        let completion = SaveCompletion {
            revision: ticket.revision(),
            result,
        };
        drop(ticket);
        self.complete_save(completion)
    }

    /// React to a finished save. The document only becomes clean if it was
    /// not edited while the save was running.
    pub fn complete_save(
        &mut self,
        completion: SaveCompletion,
    ) -> Result<SaveReceipt, EditorError> {
        let receipt = completion.result.map_err(|e| {
            warn!(error = %e, "save failed");
            EditorError::from(e)
        })?;

        if completion.revision == self.revision && self.dirty {
            self.dirty = false;
            self.events.dirty_state_changed(false);
        }
        info!(revision = completion.revision, "document saved");

        Ok(receipt)
    }

    /// Start loading a document. Rejected while another load is
    /// outstanding; hand the output to [`EditSession::replace_document`].
    pub fn load<'p, P: Persistence>(
        &self,
        backend: &'p P,
        key: &str,
    ) -> Result<impl Future<Output = Result<DocumentTree, PersistenceError>> + 'p, EditorError>
    {
        let ticket = self.begin_load()?;
        Ok(run_load(backend, ticket, key.to_string()))
    }

    pub fn begin_load(&self) -> Result<LoadTicket, EditorError> {
        Ok(self.persistence.begin_load()?)
    }

    /// Swap in a freshly loaded document. History, drop zones and any drag
    /// in progress belong to the old document and are discarded.
    pub fn replace_document(&mut self, document: DocumentTree) -> Result<(), EditorError> {
        document.validate()?;

        self.cancel_drag(CancelReason::DocumentReplaced);
        self.zones.clear();
        self.ids = IdGenerator::seeded_from(&document);
        self.document = document;
        self.revision += 1;

        let state = self.history.clear();
        self.events.history_changed(state);
        if self.dirty {
            self.dirty = false;
            self.events.dirty_state_changed(false);
        }
        info!(sections = self.document.sections.len(), "document loaded");

        Ok(())
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("sections", &self.document.sections.len())
            .field("revision", &self.revision)
            .field("dirty", &self.dirty)
            .field("history", &self.history)
            .field("drag", self.drag.state())
            .finish()
    }
}
