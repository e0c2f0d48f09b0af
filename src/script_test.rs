use super::*;

#[test]
fn events_parse_camel_case() {
    let script = Script::from_json(
        r#"[
            { "atMs": 0, "type": "tap", "hotspot": "tower" },
            { "atMs": 10, "type": "wheel", "dy": -120, "x": 5, "y": 6 },
            { "atMs": 20, "type": "recenter", "keepZoom": true },
            { "atMs": 30, "type": "introShown" },
            { "atMs": 40, "type": "openDetails", "index": 1 }
        ]"#,
    )
    .unwrap();
    let inputs: Vec<_> = script.events().iter().map(|e| e.input.clone()).collect();
    assert_eq!(
        inputs,
        vec![
            ScriptInput::Tap { hotspot: "tower".into() },
            ScriptInput::Wheel { dx: 0.0, dy: -120.0, x: 5.0, y: 6.0 },
            ScriptInput::Recenter { keep_zoom: true, only_if_needed: false },
            ScriptInput::IntroShown,
            ScriptInput::OpenDetails { index: 1 },
        ]
    );
    assert!((script.end_ms() - 40.0).abs() < f64::EPSILON);
}

#[test]
fn events_are_ordered_by_time_keeping_ties() {
    let script = Script::from_json(
        r#"[
            { "atMs": 50, "type": "pointerLeave" },
            { "atMs": 10, "type": "pointerDown", "id": 1, "x": 0, "y": 0 },
            { "atMs": 10, "type": "pointerUp", "id": 1, "x": 0, "y": 0 }
        ]"#,
    )
    .unwrap();
    let kinds: Vec<_> = script.events().iter().map(|e| e.input.clone()).collect();
    assert!(matches!(kinds[0], ScriptInput::PointerDown { .. }));
    assert!(matches!(kinds[1], ScriptInput::PointerUp { .. }));
    assert_eq!(kinds[2], ScriptInput::PointerLeave);
}

#[test]
fn unknown_event_type_is_an_error() {
    let err = Script::from_json(r#"[{ "atMs": 0, "type": "teleport" }]"#).unwrap_err();
    assert!(matches!(err, SimError::Json(_)));
}

#[test]
fn negative_timestamp_is_an_error() {
    let err = Script::from_json(r#"[{ "atMs": 0, "type": "introShown" }, { "atMs": -5, "type": "introShown" }]"#)
        .unwrap_err();
    assert!(matches!(err, SimError::Script { index: 1, .. }));
}

#[test]
fn empty_script_ends_at_zero() {
    let script = Script::from_json("[]").unwrap();
    assert_eq!(script.len(), 0);
    assert!(script.end_ms().abs() < f64::EPSILON);
}
