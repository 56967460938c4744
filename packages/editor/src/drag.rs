//! # Drag Controller
//!
//! One state machine for every way a drag can happen.
//!
//! ```text
//!            Start                 End over compatible zone
//!   Idle ───────────▶ Dragging ─────────────────────────────▶ Dropped ─┐
//!    ▲                   │ Move (re-query zones, advisory only)       │
//!    │                   │ End elsewhere / Cancel                     │
//!    │                   └──────────────────────────────▶ Cancelled ──┤
//!    └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Raw input never reaches the controller directly. [`PointerAdapter`] and
//! [`TouchAdapter`] translate their events into [`DragEvent`]s, so both
//! paths share the same drop and cancel handling. Touch additionally gets
//! a movement threshold (taps and scrolls must not start drags) and a ghost
//! position, since touch has no native drag image.

use crate::config::DEFAULT_TOUCH_DRAG_THRESHOLD;
use crate::drop_zone::{DropZoneRegistry, InsertionPoint, Point, ZoneKind, ZoneState};
use crate::mutations::DragSource;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which input produced a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    Pointer,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CancelReason {
    /// Released outside every drop zone
    NoDropZone,
    /// Released over a zone that does not take this kind of item
    IncompatibleZone,
    Escape,
    PointerLeftDocument,
    TouchCancelled,
    /// A different document was loaded mid-drag
    DocumentReplaced,
}

impl CancelReason {
    /// The input this reason belongs to; `None` applies to any drag
    pub fn input(self) -> Option<InputKind> {
        match self {
            CancelReason::PointerLeftDocument => Some(InputKind::Pointer),
            CancelReason::TouchCancelled => Some(InputKind::Touch),
            _ => None,
        }
    }
}

/// Input-agnostic drag events. `Move` and `End` only drive a drag started
/// by the same input.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    Start {
        source: DragSource,
        at: Point,
        /// Grab position relative to the dragged element's top-left corner
        offset: Point,
        input: InputKind,
    },
    Move {
        at: Point,
        input: InputKind,
    },
    End {
        at: Point,
        input: InputKind,
    },
    Cancel {
        reason: CancelReason,
    },
}

/// Raw pointer (native HTML5 drag) input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PointerInput {
    DragStart {
        source: DragSource,
        at: Point,
        #[serde(default)]
        offset: Point,
    },
    Move {
        at: Point,
    },
    Up {
        at: Point,
    },
    LeaveDocument,
}

/// Raw touch input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TouchInput {
    Start {
        source: DragSource,
        at: Point,
        #[serde(default)]
        offset: Point,
    },
    Move {
        at: Point,
    },
    End {
        at: Point,
    },
    Cancel,
}

/// Pointer drags start as soon as the browser reports a drag start
#[derive(Debug, Default, Clone)]
pub struct PointerAdapter;

impl PointerAdapter {
    pub fn translate(&mut self, input: PointerInput) -> Vec<DragEvent> {
        let event = match input {
            PointerInput::DragStart { source, at, offset } => DragEvent::Start {
                source,
                at,
                offset,
                input: InputKind::Pointer,
            },
            PointerInput::Move { at } => DragEvent::Move {
                at,
                input: InputKind::Pointer,
            },
            PointerInput::Up { at } => DragEvent::End {
                at,
                input: InputKind::Pointer,
            },
            PointerInput::LeaveDocument => DragEvent::Cancel {
                reason: CancelReason::PointerLeftDocument,
            },
        };
        vec![event]
    }
}

#[derive(Debug, Clone)]
struct ArmedTouch {
    source: DragSource,
    origin: Point,
    offset: Point,
    started: bool,
}

/// Touch drags start once the finger has moved past the threshold
#[derive(Debug, Clone)]
pub struct TouchAdapter {
    threshold: f64,
    armed: Option<ArmedTouch>,
}

impl TouchAdapter {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            armed: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn translate(&mut self, input: TouchInput) -> Vec<DragEvent> {
        match input {
            TouchInput::Start { source, at, offset } => {
                self.armed = Some(ArmedTouch {
                    source,
                    origin: at,
                    offset,
                    started: false,
                });
                Vec::new()
            }

            TouchInput::Move { at } => {
                let Some(armed) = self.armed.as_mut() else {
                    return Vec::new();
                };

                if armed.started {
                    return vec![DragEvent::Move {
                        at,
                        input: InputKind::Touch,
                    }];
                }

                if armed.origin.axis_distance(at) <= self.threshold {
                    return Vec::new();
                }

                armed.started = true;
                vec![
                    DragEvent::Start {
                        source: armed.source.clone(),
                        at: armed.origin,
                        offset: armed.offset,
                        input: InputKind::Touch,
                    },
                    DragEvent::Move {
                        at,
                        input: InputKind::Touch,
                    },
                ]
            }

            TouchInput::End { at } => match self.armed.take() {
                Some(armed) if armed.started => vec![DragEvent::End {
                    at,
                    input: InputKind::Touch,
                }],
                // A tap
                _ => Vec::new(),
            },

            TouchInput::Cancel => match self.armed.take() {
                Some(armed) if armed.started => vec![DragEvent::Cancel {
                    reason: CancelReason::TouchCancelled,
                }],
                _ => Vec::new(),
            },
        }
    }

    /// Forget a pending touch (the controller was cancelled by other means)
    pub fn reset(&mut self) {
        self.armed = None;
    }
}

impl Default for TouchAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_TOUCH_DRAG_THRESHOLD)
    }
}

/// The live drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub source: DragSource,
    pub input: InputKind,
    pub offset: Point,
    pub current: Point,
    pub hovered_zone: Option<String>,
    pub insertion: Option<InsertionPoint>,
}

impl DragSession {
    /// Top-left corner of the translucent clone following the finger
    pub fn ghost_position(&self) -> Option<Point> {
        match self.input {
            InputKind::Touch => Some(Point::new(
                self.current.x - self.offset.x,
                self.current.y - self.offset.y,
            )),
            InputKind::Pointer => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Insertion marker placement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub zone_id: String,
    pub y: f64,
}

/// What the UI should show while dragging
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragFeedback {
    pub hovered_zone: Option<String>,
    /// Empty or occupied, for the hovered zone's placeholder styling
    pub zone_state: Option<ZoneState>,
    pub indicator: Option<Indicator>,
    pub ghost: Option<Point>,
}

/// A completed drop, ready for the resolver
#[derive(Debug, Clone, PartialEq)]
pub struct DropRequest {
    pub source: DragSource,
    pub zone_id: String,
    pub target: ZoneKind,
    pub insertion: InsertionPoint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// The event did not apply in the current state
    Ignored,
    /// Still dragging; refresh the affordances
    Dragging(DragFeedback),
    Dropped(DropRequest),
    /// Affordances must be cleared
    Cancelled(CancelReason),
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    fn is_dragging_with(&self, input: InputKind) -> bool {
        self.session().is_some_and(|session| session.input == input)
    }

    pub fn handle(&mut self, event: DragEvent, zones: &DropZoneRegistry) -> DragOutcome {
        match event {
            DragEvent::Start {
                source,
                at,
                offset,
                input,
            } => {
                if self.is_dragging() {
                    return DragOutcome::Ignored;
                }
                debug!(?source, ?input, "drag started");
                let mut session = DragSession {
                    source,
                    input,
                    offset,
                    current: at,
                    hovered_zone: None,
                    insertion: None,
                };
                let feedback = track(&mut session, at, zones);
                self.state = DragState::Dragging(session);
                DragOutcome::Dragging(feedback)
            }

            DragEvent::Move { at, input } => match &mut self.state {
                DragState::Dragging(session) if session.input == input => {
                    DragOutcome::Dragging(track(session, at, zones))
                }
                _ => DragOutcome::Ignored,
            },

            DragEvent::End { at, input } => {
                if !self.is_dragging_with(input) {
                    return DragOutcome::Ignored;
                }
                let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
                    return DragOutcome::Ignored;
                };
                finish(session, at, zones)
            }

            DragEvent::Cancel { reason } => match reason.input() {
                Some(input) if !self.is_dragging_with(input) => DragOutcome::Ignored,
                _ => self.cancel(reason),
            },
        }
    }

    /// Abort the drag, if any. Always leaves the controller idle.
    pub fn cancel(&mut self, reason: CancelReason) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(_) => {
                debug!(?reason, "drag cancelled");
                DragOutcome::Cancelled(reason)
            }
            DragState::Idle => DragOutcome::Ignored,
        }
    }
}

/// Re-query the zone under `at` and update the session's advisory state
fn track(session: &mut DragSession, at: Point, zones: &DropZoneRegistry) -> DragFeedback {
    session.current = at;

    let hovered = zones
        .find_zone_matching(at, |kind| session.source.accepts(kind))
        .map(str::to_string);
    let insertion = hovered
        .as_deref()
        .and_then(|zone| zones.find_insertion_point(zone, at.y, session.source.node_id()));

    let indicator = match (&hovered, &insertion) {
        (Some(zone_id), Some(point)) => Some(Indicator {
            zone_id: zone_id.clone(),
            y: point.indicator_y,
        }),
        _ => None,
    };

    let zone_state = hovered.as_deref().and_then(|zone| zones.zone_state(zone));

    session.hovered_zone = hovered.clone();
    session.insertion = insertion;

    DragFeedback {
        hovered_zone: hovered,
        zone_state,
        indicator,
        ghost: session.ghost_position(),
    }
}

/// Resolve the release position into a drop or a cancellation
fn finish(session: DragSession, at: Point, zones: &DropZoneRegistry) -> DragOutcome {
    let Some(zone_id) = zones.find_zone_at(at.x, at.y) else {
        debug!("released outside drop zones");
        return DragOutcome::Cancelled(CancelReason::NoDropZone);
    };

    // An incompatible inner zone may sit on top of a compatible outer one
    let zone_id = if zones
        .kind(zone_id)
        .is_some_and(|kind| session.source.accepts(kind))
    {
        zone_id
    } else {
        match zones.find_zone_matching(at, |kind| session.source.accepts(kind)) {
            Some(zone_id) => zone_id,
            None => return DragOutcome::Cancelled(CancelReason::IncompatibleZone),
        }
    };

    let (Some(target), Some(insertion)) = (
        zones.kind(zone_id).cloned(),
        zones.find_insertion_point(zone_id, at.y, session.source.node_id()),
    ) else {
        return DragOutcome::Cancelled(CancelReason::NoDropZone);
    };

    DragOutcome::Dropped(DropRequest {
        source: session.source,
        zone_id: zone_id.to_string(),
        target,
        insertion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drop_zone::{Rect, StaticZone};

    fn zones() -> DropZoneRegistry {
        let mut zones = DropZoneRegistry::new();
        zones.register(
            "sections",
            ZoneKind::SectionList,
            StaticZone::new(Rect::new(0.0, 0.0, 400.0, 400.0))
                .with_child("section-1", Rect::new(0.0, 0.0, 400.0, 200.0)),
        );
        zones.register(
            "zone-col",
            ZoneKind::Column {
                column_id: "column-2".to_string(),
            },
            StaticZone::new(Rect::new(0.0, 0.0, 200.0, 200.0))
                .with_child("component-4", Rect::new(0.0, 0.0, 200.0, 50.0)),
        );
        zones
    }

    fn pointer_start(source: DragSource) -> DragEvent {
        DragEvent::Start {
            source,
            at: Point::new(10.0, 10.0),
            offset: Point::default(),
            input: InputKind::Pointer,
        }
    }

    fn pointer_end(at: Point) -> DragEvent {
        DragEvent::End {
            at,
            input: InputKind::Pointer,
        }
    }

    #[test]
    fn test_drag_move_reports_feedback() {
        let zones = zones();
        let mut drag = DragController::new();

        drag.handle(pointer_start(DragSource::palette("bio")), &zones);
        let outcome = drag.handle(
            DragEvent::Move {
                at: Point::new(50.0, 100.0),
                input: InputKind::Pointer,
            },
            &zones,
        );

        let DragOutcome::Dragging(feedback) = outcome else {
            panic!("expected feedback");
        };
        assert_eq!(feedback.hovered_zone.as_deref(), Some("zone-col"));
        assert_eq!(feedback.zone_state, Some(ZoneState::Occupied));
        assert_eq!(
            feedback.indicator,
            Some(Indicator {
                zone_id: "zone-col".to_string(),
                y: 50.0,
            })
        );
        assert_eq!(feedback.ghost, None);
    }

    #[test]
    fn test_drop_over_zone() {
        let zones = zones();
        let mut drag = DragController::new();

        drag.handle(pointer_start(DragSource::palette("bio")), &zones);
        let outcome = drag.handle(pointer_end(Point::new(50.0, 10.0)), &zones);

        let DragOutcome::Dropped(request) = outcome else {
            panic!("expected drop, got {:?}", outcome);
        };
        assert_eq!(request.zone_id, "zone-col");
        assert_eq!(request.insertion.before.as_deref(), Some("component-4"));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_section_drag_skips_column_zones() {
        let zones = zones();
        let mut drag = DragController::new();

        drag.handle(pointer_start(DragSource::section("section-1")), &zones);
        let outcome = drag.handle(pointer_end(Point::new(50.0, 300.0)), &zones);

        let DragOutcome::Dropped(request) = outcome else {
            panic!("expected drop, got {:?}", outcome);
        };
        assert_eq!(request.target, ZoneKind::SectionList);
        // The dragged section does not compete with itself
        assert_eq!(request.insertion.before, None);
    }

    #[test]
    fn test_release_outside_zones_cancels() {
        let zones = zones();
        let mut drag = DragController::new();

        drag.handle(pointer_start(DragSource::palette("bio")), &zones);
        let outcome = drag.handle(pointer_end(Point::new(900.0, 900.0)), &zones);

        assert_eq!(outcome, DragOutcome::Cancelled(CancelReason::NoDropZone));
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_component_released_on_section_list_cancels() {
        let zones = zones();
        let mut drag = DragController::new();

        drag.handle(pointer_start(DragSource::component("component-4")), &zones);
        let outcome = drag.handle(pointer_end(Point::new(300.0, 300.0)), &zones);

        assert_eq!(outcome, DragOutcome::Cancelled(CancelReason::IncompatibleZone));
    }

    #[test]
    fn test_second_start_is_ignored() {
        let zones = zones();
        let mut drag = DragController::new();

        drag.handle(pointer_start(DragSource::palette("bio")), &zones);
        let outcome = drag.handle(pointer_start(DragSource::palette("stats")), &zones);

        assert_eq!(outcome, DragOutcome::Ignored);
        assert_eq!(
            drag.session().unwrap().source,
            DragSource::palette("bio")
        );
    }

    #[test]
    fn test_other_input_cannot_drive_drag() {
        let zones = zones();
        let mut drag = DragController::new();

        drag.handle(pointer_start(DragSource::palette("bio")), &zones);
        let touch_move = DragEvent::Move {
            at: Point::new(50.0, 100.0),
            input: InputKind::Touch,
        };
        let touch_end = DragEvent::End {
            at: Point::new(50.0, 10.0),
            input: InputKind::Touch,
        };
        let touch_cancel = DragEvent::Cancel {
            reason: CancelReason::TouchCancelled,
        };

        assert_eq!(drag.handle(touch_move, &zones), DragOutcome::Ignored);
        assert_eq!(drag.handle(touch_end, &zones), DragOutcome::Ignored);
        assert_eq!(drag.handle(touch_cancel, &zones), DragOutcome::Ignored);
        assert_eq!(drag.session().unwrap().current, Point::new(10.0, 10.0));

        assert!(matches!(
            drag.handle(pointer_end(Point::new(50.0, 10.0)), &zones),
            DragOutcome::Dropped(_)
        ));
    }

    #[test]
    fn test_cancel_resets_to_idle() {
        let zones = zones();
        let mut drag = DragController::new();

        drag.handle(pointer_start(DragSource::palette("bio")), &zones);
        assert_eq!(
            drag.handle(DragEvent::Cancel { reason: CancelReason::Escape }, &zones),
            DragOutcome::Cancelled(CancelReason::Escape)
        );
        assert!(!drag.is_dragging());
        assert_eq!(drag.cancel(CancelReason::Escape), DragOutcome::Ignored);

        drag.handle(pointer_start(DragSource::palette("bio")), &zones);
        assert_eq!(
            drag.cancel(CancelReason::DocumentReplaced),
            DragOutcome::Cancelled(CancelReason::DocumentReplaced)
        );

        // The next drag starts normally
        assert!(matches!(
            drag.handle(pointer_start(DragSource::palette("stats")), &zones),
            DragOutcome::Dragging(_)
        ));
    }

    #[test]
    fn test_touch_tap_never_starts_drag() {
        let mut touch = TouchAdapter::new(10.0);

        assert!(touch
            .translate(TouchInput::Start {
                source: DragSource::component("component-4"),
                at: Point::new(100.0, 100.0),
                offset: Point::default(),
            })
            .is_empty());
        assert!(touch.translate(TouchInput::Move { at: Point::new(108.0, 95.0) }).is_empty());
        assert!(touch.translate(TouchInput::End { at: Point::new(108.0, 95.0) }).is_empty());
        assert!(!touch.is_armed());
    }

    #[test]
    fn test_touch_threshold_starts_drag() {
        let mut touch = TouchAdapter::new(10.0);
        touch.translate(TouchInput::Start {
            source: DragSource::component("component-4"),
            at: Point::new(100.0, 100.0),
            offset: Point::new(5.0, 5.0),
        });

        let events = touch.translate(TouchInput::Move { at: Point::new(100.0, 111.0) });
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            DragEvent::Start { input: InputKind::Touch, at, .. } if at == Point::new(100.0, 100.0)
        ));

        let events = touch.translate(TouchInput::Move { at: Point::new(100.0, 120.0) });
        assert_eq!(
            events,
            vec![DragEvent::Move {
                at: Point::new(100.0, 120.0),
                input: InputKind::Touch,
            }]
        );

        assert_eq!(
            touch.translate(TouchInput::Cancel),
            vec![DragEvent::Cancel { reason: CancelReason::TouchCancelled }]
        );
    }

    #[test]
    fn test_touch_session_has_ghost() {
        let zones = zones();
        let mut drag = DragController::new();

        let outcome = drag.handle(
            DragEvent::Start {
                source: DragSource::palette("bio"),
                at: Point::new(30.0, 30.0),
                offset: Point::new(10.0, 5.0),
                input: InputKind::Touch,
            },
            &zones,
        );

        let DragOutcome::Dragging(feedback) = outcome else {
            panic!("expected feedback");
        };
        assert_eq!(feedback.ghost, Some(Point::new(20.0, 25.0)));
    }

    #[test]
    fn test_pointer_leave_cancels() {
        let mut pointer = PointerAdapter;
        assert_eq!(
            pointer.translate(PointerInput::LeaveDocument),
            vec![DragEvent::Cancel { reason: CancelReason::PointerLeftDocument }]
        );
    }
}
