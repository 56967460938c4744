//! JS-agnostic side of the bindings. Everything crosses the boundary as
//! JSON strings and errors are plain messages, so this can be tested
//! without a browser.

use mediakit_editor::{
    CapabilitySet, DocumentTree, DragSource, EditSession, EditorConfig, EditorKey, EventQueue,
    LoadTicket, Mutation, PersistenceError, PointerInput, SaveReceipt, SaveTicket, StaticZone,
    TouchInput, ZoneKind,
};
use serde::Serialize;
use std::fmt::Display;
use std::rc::Rc;

pub type HandleResult<T> = Result<T, String>;

fn describe(context: &str, e: impl Display) -> String {
    format!("{}: {}", context, e)
}

fn parse<T: serde::de::DeserializeOwned>(what: &str, json: &str) -> HandleResult<T> {
    serde_json::from_str(json).map_err(|e| describe(what, e))
}

fn to_json<T: Serialize>(value: &T) -> HandleResult<String> {
    serde_json::to_string(value).map_err(|e| describe("Serialization error", e))
}

pub struct EditorHandle {
    session: EditSession,
    events: Rc<EventQueue>,
    pending_save: Option<SaveTicket>,
    pending_load: Option<LoadTicket>,
}

impl EditorHandle {
    /// `document_json` and `config_json` may be omitted; `capabilities_json`
    /// is a JSON array of granted capability names
    pub fn new(
        document_json: Option<&str>,
        config_json: Option<&str>,
        capabilities_json: Option<&str>,
    ) -> HandleResult<Self> {
        let document: DocumentTree = match document_json {
            Some(json) => parse("Invalid document", json)?,
            None => DocumentTree::new(),
        };
        document
            .validate()
            .map_err(|e| describe("Invalid document", e))?;

        let config = match config_json {
            Some(json) => EditorConfig::from_json(json).map_err(|e| describe("Invalid config", e))?,
            None => EditorConfig::default(),
        };

        let capabilities: Vec<String> = match capabilities_json {
            Some(json) => parse("Invalid capabilities", json)?,
            None => Vec::new(),
        };

        let events = Rc::new(EventQueue::new());
        let session = EditSession::new(document, config)
            .with_access(capabilities.into_iter().collect::<CapabilitySet>())
            .with_events(events.clone());

        Ok(Self {
            session,
            events,
            pending_save: None,
            pending_load: None,
        })
    }

    pub fn document_json(&self) -> HandleResult<String> {
        to_json(self.session.document())
    }

    /// Signals recorded since the last call, oldest first
    pub fn drain_events(&self) -> HandleResult<String> {
        to_json(&self.events.drain())
    }

    pub fn register_zone(
        &mut self,
        zone_id: &str,
        kind_json: &str,
        geometry_json: &str,
    ) -> HandleResult<()> {
        let kind: ZoneKind = parse("Invalid zone kind", kind_json)?;
        let geometry: StaticZone = parse("Invalid zone geometry", geometry_json)?;
        self.session.register_zone(zone_id, kind, geometry);
        Ok(())
    }

    pub fn unregister_zone(&mut self, zone_id: &str) -> bool {
        self.session.unregister_zone(zone_id)
    }

    pub fn pointer(&mut self, input_json: &str) -> HandleResult<String> {
        let input: PointerInput = parse("Invalid pointer input", input_json)?;
        let update = self
            .session
            .handle_pointer(input)
            .map_err(|e| describe("Drop failed", e))?;
        to_json(&update)
    }

    pub fn touch(&mut self, input_json: &str) -> HandleResult<String> {
        let input: TouchInput = parse("Invalid touch input", input_json)?;
        let update = self
            .session
            .handle_touch(input)
            .map_err(|e| describe("Drop failed", e))?;
        to_json(&update)
    }

    /// `key` is `"escape"`, `"undo"` or `"redo"`
    pub fn key(&mut self, key: &str) -> HandleResult<bool> {
        let key: EditorKey = parse("Unknown key", &format!("\"{}\"", key))?;
        self.session
            .handle_key(key)
            .map_err(|e| describe("Key failed", e))
    }

    /// Returns whether the document changed
    pub fn apply(&mut self, mutation_json: &str) -> HandleResult<bool> {
        let mutation: Mutation = parse("Invalid mutation", mutation_json)?;
        let outcome = self
            .session
            .apply(&mutation)
            .map_err(|e| describe("Mutation failed", e))?;
        Ok(outcome.is_changed())
    }

    pub fn drop_into(
        &mut self,
        source_json: &str,
        target_json: &str,
        before: Option<String>,
    ) -> HandleResult<String> {
        let source: DragSource = parse("Invalid drag source", source_json)?;
        let target: ZoneKind = parse("Invalid drop target", target_json)?;
        let result = self
            .session
            .drop_into(source, target, before)
            .map_err(|e| describe("Drop failed", e))?;
        to_json(&result)
    }

    pub fn undo(&mut self) -> HandleResult<bool> {
        self.session.undo().map_err(|e| describe("Undo failed", e))
    }

    pub fn redo(&mut self) -> HandleResult<bool> {
        self.session.redo().map_err(|e| describe("Redo failed", e))
    }

    pub fn history_state_json(&self) -> HandleResult<String> {
        to_json(&self.session.history_state())
    }

    pub fn is_dirty(&self) -> bool {
        self.session.is_dirty()
    }

    pub fn is_saving(&self) -> bool {
        self.session.is_saving()
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    /// Claim the save slot and return the document to send
    pub fn begin_save(&mut self) -> HandleResult<String> {
        let (ticket, snapshot) = self
            .session
            .begin_save()
            .map_err(|e| describe("Save failed", e))?;
        self.pending_save = Some(ticket);
        Ok(snapshot.to_json().to_string())
    }

    /// Report how the host's save went. Returns whether the document is
    /// still dirty.
    pub fn complete_save(
        &mut self,
        key: Option<String>,
        error: Option<String>,
    ) -> HandleResult<bool> {
        let ticket = self
            .pending_save
            .take()
            .ok_or_else(|| "Save failed: no save in progress".to_string())?;

        let result = match error {
            Some(message) => Err(PersistenceError::Backend(message)),
            None => Ok(SaveReceipt { key }),
        };
        self.session
            .finish_save(ticket, result)
            .map_err(|e| describe("Save failed", e))?;

        Ok(self.session.is_dirty())
    }

    pub fn begin_load(&mut self) -> HandleResult<()> {
        let ticket = self
            .session
            .begin_load()
            .map_err(|e| describe("Load failed", e))?;
        self.pending_load = Some(ticket);
        Ok(())
    }

    /// Hand over the fetched document, or the reason fetching failed
    pub fn complete_load(
        &mut self,
        document_json: Option<&str>,
        error: Option<String>,
    ) -> HandleResult<()> {
        let ticket = self
            .pending_load
            .take()
            .ok_or_else(|| "Load failed: no load in progress".to_string())?;

        let result = match (document_json, error) {
            (_, Some(message)) => Err(format!("Load failed: {}", message)),
            (Some(json), None) => parse::<DocumentTree>("Invalid document", json).and_then(|tree| {
                self.session
                    .replace_document(tree)
                    .map_err(|e| describe("Invalid document", e))
            }),
            (None, None) => Err("Load failed: no document".to_string()),
        };
        drop(ticket);
        result
    }
}
