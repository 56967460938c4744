//! Tests for complete drag sequences
//!
//! This tests:
//! - Touch threshold, taps and ghost position
//! - Cancellation from every direction
//! - Several drags in a row with undo in between
//! - Document integrity after each drop

use mediakit_editor::{
    CancelReason, DocumentTree, DragSource, DragState, DragUpdate, EditSession, EditorConfig,
    InputKind, Mutation, MutationResult, Point, PointerInput, Rect, SectionLayout, StaticZone,
    TouchInput, ZoneKind, ZoneState,
};

/// `section-1` with `column-2` (holding `component-4` and `component-5`)
/// and an empty `column-3`
fn session() -> EditSession {
    let mut session = EditSession::new(DocumentTree::new(), EditorConfig::default());
    session
        .apply(&Mutation::AddSection {
            section_type: "about".to_string(),
            layout: SectionLayout::TwoColumn,
            index: None,
        })
        .unwrap();
    session.add_component("bio", "column-2").unwrap();
    session.add_component("stats", "column-2").unwrap();

    register_columns(&mut session);
    session
}

fn register_columns(session: &mut EditSession) {
    session.register_zone(
        "left",
        ZoneKind::Column {
            column_id: "column-2".to_string(),
        },
        StaticZone::new(Rect::new(0.0, 0.0, 200.0, 400.0))
            .with_child("component-4", Rect::new(0.0, 0.0, 200.0, 100.0))
            .with_child("component-5", Rect::new(0.0, 100.0, 200.0, 100.0)),
    );
    session.register_zone(
        "right",
        ZoneKind::Column {
            column_id: "column-3".to_string(),
        },
        StaticZone::new(Rect::new(200.0, 0.0, 200.0, 400.0)),
    );
}

fn assert_integrity(session: &EditSession) {
    session.document().validate().unwrap();
    for id in session.document().ids() {
        assert_eq!(session.document().occurrences(id), 1, "{} appears twice", id);
    }
}

fn touch_start(session: &mut EditSession, source: DragSource, at: Point) -> DragUpdate {
    session
        .handle_touch(TouchInput::Start {
            source,
            at,
            offset: Point::new(10.0, 10.0),
        })
        .unwrap()
}

#[test]
fn test_touch_drag_moves_component() {
    let mut session = session();

    assert_eq!(
        touch_start(&mut session, DragSource::component("component-4"), Point::new(50.0, 50.0)),
        DragUpdate::Idle
    );

    // Below the threshold on both axes
    let update = session
        .handle_touch(TouchInput::Move {
            at: Point::new(58.0, 42.0),
        })
        .unwrap();
    assert_eq!(update, DragUpdate::Idle);
    assert_eq!(session.drag_state(), &DragState::Idle);

    let update = session
        .handle_touch(TouchInput::Move {
            at: Point::new(250.0, 50.0),
        })
        .unwrap();
    let DragUpdate::Dragging(feedback) = update else {
        panic!("expected drag feedback, got {:?}", update);
    };
    assert_eq!(feedback.hovered_zone.as_deref(), Some("right"));
    assert_eq!(feedback.ghost, Some(Point::new(240.0, 40.0)));
    assert_eq!(feedback.zone_state, Some(ZoneState::Empty));

    let DragState::Dragging(drag) = session.drag_state() else {
        panic!("expected an active drag");
    };
    assert_eq!(drag.input, InputKind::Touch);

    let update = session
        .handle_touch(TouchInput::End {
            at: Point::new(250.0, 50.0),
        })
        .unwrap();

    assert_eq!(
        update,
        DragUpdate::Dropped(MutationResult::Moved {
            node_id: "component-4".to_string(),
        })
    );
    assert_eq!(session.document().column_of("component-4"), Some("column-3"));
    assert_integrity(&session);
}

#[test]
fn test_touch_cannot_take_over_pointer_drag() {
    let mut session = session();
    let before = session.document().clone();

    session
        .handle_pointer(PointerInput::DragStart {
            source: DragSource::palette("bio"),
            at: Point::new(800.0, 50.0),
            offset: Point::default(),
        })
        .unwrap();

    touch_start(&mut session, DragSource::palette("stats"), Point::new(250.0, 300.0));
    let update = session
        .handle_touch(TouchInput::Move {
            at: Point::new(250.0, 50.0),
        })
        .unwrap();
    assert_eq!(update, DragUpdate::Idle);
    let update = session
        .handle_touch(TouchInput::End {
            at: Point::new(250.0, 50.0),
        })
        .unwrap();
    assert_eq!(update, DragUpdate::Idle);
    assert_eq!(session.document(), &before);

    let DragState::Dragging(drag) = session.drag_state() else {
        panic!("pointer drag should still be active");
    };
    assert_eq!(drag.source, DragSource::palette("bio"));
    assert_eq!(drag.input, InputKind::Pointer);

    let update = session
        .handle_pointer(PointerInput::Up {
            at: Point::new(250.0, 50.0),
        })
        .unwrap();
    assert!(matches!(update, DragUpdate::Dropped(MutationResult::Inserted { .. })));
    let column = session.document().column("column-3").unwrap();
    assert_eq!(column.components.len(), 1);
    assert_eq!(column.components[0].component_type, "bio");
    assert_integrity(&session);
}

#[test]
fn test_touch_tap_does_not_drag() {
    let mut session = session();
    let before = session.document().clone();
    let levels = session.history().undo_levels();

    touch_start(&mut session, DragSource::component("component-4"), Point::new(50.0, 50.0));
    session
        .handle_touch(TouchInput::Move {
            at: Point::new(55.0, 55.0),
        })
        .unwrap();
    let update = session
        .handle_touch(TouchInput::End {
            at: Point::new(250.0, 55.0),
        })
        .unwrap();

    assert_eq!(update, DragUpdate::Idle);
    assert_eq!(session.document(), &before);
    assert_eq!(session.history().undo_levels(), levels);
}

#[test]
fn test_touch_threshold_is_exclusive() {
    let mut session = session();

    touch_start(&mut session, DragSource::palette("bio"), Point::new(300.0, 300.0));
    let update = session
        .handle_touch(TouchInput::Move {
            at: Point::new(310.0, 300.0),
        })
        .unwrap();
    assert_eq!(update, DragUpdate::Idle);

    let update = session
        .handle_touch(TouchInput::Move {
            at: Point::new(310.5, 300.0),
        })
        .unwrap();
    assert!(matches!(update, DragUpdate::Dragging(_)));
}

#[test]
fn test_touch_cancel_clears_drag() {
    let mut session = session();

    touch_start(&mut session, DragSource::palette("bio"), Point::new(300.0, 300.0));
    session
        .handle_touch(TouchInput::Move {
            at: Point::new(300.0, 340.0),
        })
        .unwrap();
    let update = session.handle_touch(TouchInput::Cancel).unwrap();

    assert_eq!(
        update,
        DragUpdate::Cancelled {
            reason: CancelReason::TouchCancelled,
        }
    );
    assert_eq!(session.drag_state(), &DragState::Idle);
}

#[test]
fn test_escape_during_touch_drag_disarms_touch() {
    let mut session = session();
    let before = session.document().clone();

    touch_start(&mut session, DragSource::component("component-5"), Point::new(50.0, 150.0));
    session
        .handle_touch(TouchInput::Move {
            at: Point::new(250.0, 150.0),
        })
        .unwrap();
    assert_eq!(
        session.cancel_drag(CancelReason::Escape),
        Some(CancelReason::Escape)
    );

    // The finger lifting afterwards is not a drop
    let update = session
        .handle_touch(TouchInput::End {
            at: Point::new(250.0, 150.0),
        })
        .unwrap();
    assert_eq!(update, DragUpdate::Idle);
    assert_eq!(session.document(), &before);
}

#[test]
fn test_pointer_leaving_document_cancels() {
    let mut session = session();

    session
        .handle_pointer(PointerInput::DragStart {
            source: DragSource::component("component-4"),
            at: Point::new(50.0, 50.0),
            offset: Point::default(),
        })
        .unwrap();
    let update = session.handle_pointer(PointerInput::LeaveDocument).unwrap();

    assert_eq!(
        update,
        DragUpdate::Cancelled {
            reason: CancelReason::PointerLeftDocument,
        }
    );
}

#[test]
fn test_reorder_within_column() {
    let mut session = session();

    session
        .handle_pointer(PointerInput::DragStart {
            source: DragSource::component("component-5"),
            at: Point::new(50.0, 150.0),
            offset: Point::default(),
        })
        .unwrap();
    // Above the midpoint of component-4
    let update = session
        .handle_pointer(PointerInput::Up {
            at: Point::new(50.0, 20.0),
        })
        .unwrap();

    assert!(matches!(update, DragUpdate::Dropped(MutationResult::Moved { .. })));
    let column = session.document().column("column-2").unwrap();
    let order: Vec<&str> = column.components.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, vec!["component-5", "component-4"]);
    assert_integrity(&session);
}

#[test]
fn test_drag_sequence_with_undo() {
    let mut session = session();
    let initial = session.document().clone();

    let drops = [
        (DragSource::palette("topics"), Point::new(300.0, 10.0)),
        (DragSource::component("component-4"), Point::new(300.0, 10.0)),
        (DragSource::palette("contact"), Point::new(50.0, 350.0)),
    ];

    for (source, at) in drops {
        session
            .handle_pointer(PointerInput::DragStart {
                source,
                at: Point::new(800.0, 0.0),
                offset: Point::default(),
            })
            .unwrap();
        let update = session.handle_pointer(PointerInput::Up { at }).unwrap();
        assert!(matches!(update, DragUpdate::Dropped(ref r) if r.is_applied()));
        assert_integrity(&session);
    }

    assert_eq!(session.document().component_count(), 4);

    for _ in 0..3 {
        assert!(session.undo().unwrap());
        assert_integrity(&session);
    }
    assert_eq!(session.document(), &initial);
}

#[test]
fn test_zone_registered_last_wins() {
    let mut session = session();

    // A column zone nested inside another one, registered after it
    session.register_zone(
        "inner",
        ZoneKind::Column {
            column_id: "column-3".to_string(),
        },
        StaticZone::new(Rect::new(0.0, 300.0, 200.0, 100.0)),
    );

    session
        .handle_pointer(PointerInput::DragStart {
            source: DragSource::palette("social"),
            at: Point::new(800.0, 0.0),
            offset: Point::default(),
        })
        .unwrap();
    let update = session
        .handle_pointer(PointerInput::Up {
            at: Point::new(50.0, 350.0),
        })
        .unwrap();

    assert!(matches!(
        update,
        DragUpdate::Dropped(MutationResult::Inserted { ref column_id, .. })
            if column_id == "column-3"
    ));
}
