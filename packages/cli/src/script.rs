//! Editing scripts: a JSON array of steps replayed against a session, used
//! to reproduce editor behavior without a browser.
//!
//! ```json
//! [
//!   { "step": "zone", "zoneId": "left",
//!     "kind": { "kind": "column", "columnId": "column-2" },
//!     "geometry": { "bounds": { "x": 0, "y": 0, "width": 200, "height": 400 } } },
//!   { "step": "pointer", "input": { "type": "dragStart",
//!     "source": { "kind": "palette", "componentType": "bio" }, "at": { "x": 500, "y": 0 } } },
//!   { "step": "pointer", "input": { "type": "up", "at": { "x": 20, "y": 20 } } },
//!   { "step": "undo" }
//! ]
//! ```

use anyhow::{Context, Result};
use mediakit_editor::{
    DragSource, DragUpdate, EditSession, EditorKey, Mutation, PointerInput, StaticZone, TouchInput,
    ZoneKind,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum ScriptStep {
    /// Register (or re-measure) a drop zone
    #[serde(rename_all = "camelCase")]
    Zone {
        zone_id: String,
        kind: ZoneKind,
        geometry: StaticZone,
    },

    #[serde(rename_all = "camelCase")]
    Unzone { zone_id: String },

    Apply { mutation: Mutation },

    Drop {
        source: DragSource,
        target: ZoneKind,
        #[serde(default)]
        before: Option<String>,
    },

    Pointer { input: PointerInput },

    Touch { input: TouchInput },

    Key { key: EditorKey },

    Undo,

    Redo,
}

impl ScriptStep {
    pub fn label(&self) -> &'static str {
        match self {
            ScriptStep::Zone { .. } => "zone",
            ScriptStep::Unzone { .. } => "unzone",
            ScriptStep::Apply { .. } => "apply",
            ScriptStep::Drop { .. } => "drop",
            ScriptStep::Pointer { .. } => "pointer",
            ScriptStep::Touch { .. } => "touch",
            ScriptStep::Key { .. } => "key",
            ScriptStep::Undo => "undo",
            ScriptStep::Redo => "redo",
        }
    }
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>> {
    serde_json::from_str(json).context("Invalid editing script")
}

/// What one step did
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub index: usize,
    pub label: &'static str,
    pub outcome: String,
}

fn describe_update(update: &DragUpdate) -> Result<String> {
    Ok(match update {
        DragUpdate::Idle => "idle".to_string(),
        DragUpdate::Dragging(feedback) => match &feedback.hovered_zone {
            Some(zone) => format!("dragging over {}", zone),
            None => "dragging".to_string(),
        },
        DragUpdate::Dropped(result) => format!("dropped: {}", serde_json::to_string(result)?),
        DragUpdate::Cancelled { reason } => format!("cancelled ({:?})", reason),
    })
}

/// Run `steps` in order. The first failing step aborts the replay.
pub fn run_script(session: &mut EditSession, steps: Vec<ScriptStep>) -> Result<Vec<StepReport>> {
    let mut reports = Vec::with_capacity(steps.len());

    for (index, step) in steps.into_iter().enumerate() {
        let label = step.label();
        let outcome = run_step(session, step)
            .with_context(|| format!("Step {} ({}) failed", index + 1, label))?;
        info!(step = index + 1, label, %outcome, "step replayed");

        reports.push(StepReport {
            index: index + 1,
            label,
            outcome,
        });
    }

    Ok(reports)
}

fn run_step(session: &mut EditSession, step: ScriptStep) -> Result<String> {
    let outcome = match step {
        ScriptStep::Zone {
            zone_id,
            kind,
            geometry,
        } => {
            session.register_zone(zone_id.clone(), kind, geometry);
            format!("registered {}", zone_id)
        }
        ScriptStep::Unzone { zone_id } => {
            if session.unregister_zone(&zone_id) {
                format!("unregistered {}", zone_id)
            } else {
                format!("{} was not registered", zone_id)
            }
        }
        ScriptStep::Apply { mutation } => {
            let outcome = session.apply(&mutation)?;
            if outcome.is_changed() {
                format!("{} applied", mutation.name())
            } else {
                format!("{} left the document unchanged", mutation.name())
            }
        }
        ScriptStep::Drop {
            source,
            target,
            before,
        } => {
            let result = session.drop_into(source, target, before)?;
            serde_json::to_string(&result)?
        }
        ScriptStep::Pointer { input } => describe_update(&session.handle_pointer(input)?)?,
        ScriptStep::Touch { input } => describe_update(&session.handle_touch(input)?)?,
        ScriptStep::Key { key } => {
            let handled = session.handle_key(key)?;
            format!("{:?} {}", key, if handled { "handled" } else { "ignored" })
        }
        ScriptStep::Undo => {
            if session.undo()? { "undone" } else { "nothing to undo" }.to_string()
        }
        ScriptStep::Redo => {
            if session.redo()? { "redone" } else { "nothing to redo" }.to_string()
        }
    };

    Ok(outcome)
}
