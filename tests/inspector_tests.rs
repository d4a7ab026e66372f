//! # Inspector Tests
//!
//! End-to-end scenarios through the public API: events go into the stores,
//! a session rebuilds the tree, commands drive expansion and selection.

use std::sync::Arc;

use mavinspect::store::{ParameterEntry, RecordEntry};
use mavinspect::tree::{MESSAGES, PARAMETERS};
use mavinspect::{
    Command, NodeId, Primitive, RecordValue, Session, SourceKey, Stores, TelemetryEvent,
    TreeBuilder,
};
use pretty_assertions::assert_eq;

// ============================================================================
// TEST HELPERS
// ============================================================================

const VEHICLE: SourceKey = SourceKey {
    system: 1,
    component: 1,
};

fn record(type_name: &str, value: RecordValue, timestamp: f64) -> TelemetryEvent {
    TelemetryEvent::Record {
        source: VEHICLE,
        type_name: type_name.into(),
        value,
        timestamp,
    }
}

fn session_with(events: Vec<TelemetryEvent>) -> Session {
    let stores = Arc::new(Stores::default());
    for event in events {
        stores.apply(event);
    }
    let mut session = Session::new(stores);
    session.set_viewport_height(40);
    session.rebuild();
    session
}

fn selected(session: &Session) -> String {
    session.selected().map(|id| id.to_string()).unwrap_or_default()
}

fn labels(session: &Session) -> Vec<String> {
    session.all_rows().into_iter().map(|r| r.label).collect()
}

// ============================================================================
// RECORD STATISTICS
// ============================================================================

#[test]
fn heartbeat_once_per_second_reads_one_hertz() {
    let session = session_with(vec![
        record("HEARTBEAT", RecordValue::fields([("type", 2i64)]), 0.0),
        record("HEARTBEAT", RecordValue::fields([("type", 2i64)]), 1.0),
        record("HEARTBEAT", RecordValue::fields([("type", 2i64)]), 2.0),
    ]);

    let entry = session
        .stores()
        .records
        .get(VEHICLE, "HEARTBEAT")
        .unwrap();
    assert_eq!(entry.count, 3);
    assert!((entry.frequency - 1.0).abs() < 1e-9);

    let mut session = session;
    session.apply(Command::ExpandAll);
    assert!(labels(&session).contains(&"HEARTBEAT [1.0 Hz, 3 msgs]".to_string()));
}

#[test]
fn out_of_order_timestamp_keeps_the_estimate() {
    let session = session_with(vec![
        record("ATTITUDE", RecordValue::fields([("roll", 0.0)]), 10.0),
        record("ATTITUDE", RecordValue::fields([("roll", 0.1)]), 10.5),
        record("ATTITUDE", RecordValue::fields([("roll", 0.2)]), 10.2),
    ]);

    let entry = session
        .stores()
        .records
        .get(VEHICLE, "ATTITUDE")
        .unwrap();
    assert_eq!(entry.count, 3);
    assert!((entry.frequency - 2.0).abs() < 1e-9);
    assert_eq!(entry.value, RecordValue::fields([("roll", 0.2)]));
}

// ============================================================================
// EXPANSION
// ============================================================================

#[test]
fn sys_status_lines_expand_and_collapse() {
    let mut session = session_with(vec![record(
        "SYS_STATUS",
        RecordValue::text("sensors present\nsensors enabled\nsensors health"),
        0.0,
    )]);
    session.apply(Command::MoveDown);
    session.apply(Command::Expand);
    session.apply(Command::MoveDown);
    assert_eq!(selected(&session), "1:1/Messages/SYS_STATUS");

    let collapsed = session.rows().len();
    session.apply(Command::Toggle);
    assert_eq!(session.rows().len(), collapsed + 3);
    assert_eq!(
        labels(&session)[3..6].to_vec(),
        vec![
            "000: sensors present",
            "001: sensors enabled",
            "002: sensors health"
        ]
    );

    session.apply(Command::Toggle);
    assert_eq!(session.rows().len(), collapsed);
}

#[test]
fn expansion_survives_new_data() {
    let mut session = session_with(vec![record(
        "HEARTBEAT",
        RecordValue::fields([("type", 2i64), ("autopilot", 3i64)]),
        0.0,
    )]);
    session.apply(Command::ExpandAll);
    let before = session.rows().len();

    session.stores().apply(record(
        "HEARTBEAT",
        RecordValue::fields([("type", 2i64), ("autopilot", 3i64)]),
        1.0,
    ));
    session.rebuild();

    assert_eq!(session.rows().len(), before);
    assert!(labels(&session).contains(&"autopilot: 3".to_string()));
}

#[test]
fn collapse_all_with_two_vehicles() {
    let gimbal = SourceKey::new(1, 154);
    let mut session = session_with(vec![
        record("HEARTBEAT", RecordValue::fields([("type", 2i64)]), 0.0),
        TelemetryEvent::Parameter {
            source: gimbal,
            name: "MNT1_TYPE".into(),
            value: Primitive::Int(6),
        },
    ]);
    session.apply(Command::ExpandAll);
    session.apply(Command::CollapseAll);

    assert_eq!(
        labels(&session),
        vec!["1:1", MESSAGES, PARAMETERS, "1:154", MESSAGES, PARAMETERS]
    );
    assert_eq!(
        session.status_line(),
        "Selected: 1/6 | Vehicles: 2 | Status msgs: 0"
    );
}

// ============================================================================
// SELECTION
// ============================================================================

#[test]
fn removed_child_moves_selection_to_its_category() {
    let root = NodeId::root(VEHICLE);
    let params = root.child(PARAMETERS);
    let mut session = Session::new(Arc::new(Stores::default()));
    session.set_viewport_height(10);

    let full = vec![
        ParameterEntry::new("ARMING_CHECK", 1i64),
        ParameterEntry::new("SYSID_THISMAV", 1i64),
    ];
    session.install(TreeBuilder::build(VEHICLE, &[], &full));
    session.apply(Command::End);
    session.apply(Command::Expand);
    session.apply(Command::End);
    assert_eq!(selected(&session), params.child("SYSID_THISMAV").to_string());

    let trimmed = vec![ParameterEntry::new("ARMING_CHECK", 1i64)];
    session.install(TreeBuilder::build(VEHICLE, &[], &trimmed));
    assert_eq!(selected(&session), params.to_string());
}

#[test]
fn move_down_stops_on_the_last_row() {
    let mut session = session_with(vec![record("HEARTBEAT", RecordValue::unclassified(), 0.0)]);
    for _ in 0..50 {
        session.apply(Command::MoveDown);
    }
    assert_eq!(
        session.navigation().selected_index(),
        Some(session.rows().len() - 1)
    );
    assert_eq!(selected(&session), "1:1/Parameters");
}

#[test]
fn collapse_on_a_field_selects_the_message() {
    let records = vec![RecordEntry::with_stats(
        "ATTITUDE",
        RecordValue::fields([("roll", 0.1), ("pitch", 0.2)]),
        5,
        10.0,
    )];
    let mut session = Session::new(Arc::new(Stores::default()));
    session.set_viewport_height(10);
    session.install(TreeBuilder::build(VEHICLE, &records, &[]));
    session.apply(Command::ExpandAll);
    for _ in 0..4 {
        session.apply(Command::MoveDown);
    }
    assert_eq!(selected(&session), "1:1/Messages/ATTITUDE/pitch");

    session.apply(Command::Collapse);
    assert_eq!(selected(&session), "1:1/Messages/ATTITUDE");
    session.apply(Command::Collapse);
    assert_eq!(selected(&session), "1:1/Messages/ATTITUDE");
    assert!(!labels(&session).contains(&"pitch: 0.2000".to_string()));
}
