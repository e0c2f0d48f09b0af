use super::*;
use serde_json::json;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn scene(hotspots: Value) -> Value {
    json!({ "width": 2000, "height": 1200, "hotspots": hotspots })
}

// =============================================================
// Hotspot geometry
// =============================================================

#[test]
fn foot_world_uses_percentages() {
    let h = Hotspot::new("a", 50.0, 50.0);
    assert_eq!(h.foot_world(Size::new(2000.0, 1200.0)), Point::new(1000.0, 600.0));
}

#[test]
fn building_rect_hangs_from_anchor() {
    let h = Hotspot::new("a", 50.0, 50.0);
    let r = h.building_rect_world(Size::new(2000.0, 1200.0));
    assert!(approx_eq(r.left, 1000.0 - 110.0));
    assert!(approx_eq(r.top, 600.0 - 220.0 * 0.92));
    assert!(approx_eq(r.width(), 220.0));
    assert!(approx_eq(r.height(), 220.0));
}

#[test]
fn intro_anchor_is_building_centre_at_foot_height() {
    let mut h = Hotspot::new("a", 10.0, 20.0);
    h.anchor_x = 0.25;
    let canvas = Size::new(1000.0, 1000.0);
    let a = h.intro_anchor_world(canvas);
    assert!(approx_eq(a.x, 100.0 - 55.0 + 110.0));
    assert!(approx_eq(a.y, 200.0));
}

#[test]
fn icon_rect_is_centred_on_foot() {
    let h = Hotspot::new("a", 50.0, 50.0);
    let r = h.icon_rect_world(Size::new(2000.0, 1200.0));
    assert_eq!(r.center(), Point::new(1000.0, 600.0));
    assert!(approx_eq(r.width(), 96.0));
}

// =============================================================
// Scene parsing
// =============================================================

#[test]
fn minimal_record_gets_defaults() {
    let s = SceneContent::from_value(scene(json!([{ "id": "tower", "x": 40, "y": 60 }]))).unwrap();
    let h = &s.hotspots[0];
    assert_eq!(h.id, "tower");
    assert_eq!(h.label, "tower");
    assert!(approx_eq(h.building_width, 220.0));
    assert!(approx_eq(h.anchor_x, 0.5));
    assert!(approx_eq(h.anchor_y, 0.92));
    assert!(approx_eq(h.spawn_duration_ms, 1400.0));
    assert_eq!(h.trigger_mode, TriggerMode::Click);
    assert!(approx_eq(h.icon_width, 96.0));
    assert_eq!(h.preferred_side, None);
    assert!(approx_eq(s.max_zoom_mult, 2.5));
}

#[test]
fn id_falls_back_to_slug_then_label() {
    let s = SceneContent::from_value(scene(json!([
        { "slug": "forge", "x": 1, "y": 1 },
        { "label": "Library", "x": 2, "y": 2, "order": 1 },
        { "id": 17, "x": 3, "y": 3, "order": 2 },
    ])))
    .unwrap();
    let ids: Vec<&str> = s.hotspots.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, ["forge", "Library", "17"]);
}

#[test]
fn anchor_percentages_become_fractions() {
    let s = SceneContent::from_value(scene(json!([
        { "id": "a", "x": 1, "y": 1, "anchorX": 30, "anchorY": 0.8 },
    ])))
    .unwrap();
    assert!(approx_eq(s.hotspots[0].anchor_x, 0.3));
    assert!(approx_eq(s.hotspots[0].anchor_y, 0.8));
}

#[test]
fn asset_sizes_scale_against_desktop_width() {
    let s = SceneContent::from_value(json!({
        "width": 1000, "height": 600, "desktopCanvasWidth": 2000,
        "hotspots": [{ "id": "a", "x": 1, "y": 1, "buildingW": 300, "hotspotIdleW": 101 }],
    }))
    .unwrap();
    let h = &s.hotspots[0];
    assert!(approx_eq(h.building_width, 150.0));
    assert!(approx_eq(h.building_height, 110.0));
    assert!(approx_eq(h.icon_width, 51.0));
}

#[test]
fn intro_fields_are_read() {
    let s = SceneContent::from_value(scene(json!([
        { "id": "a", "x": 1, "y": 1, "triggerMode": "hover",
          "intro": { "title": "Forge", "preferredPlacement": "bottom" },
          "projects": [{ "id": 1 }, { "id": 2 }] },
        { "id": "b", "x": 1, "y": 1, "intro": { "preferredPlacement": "auto" } },
    ])))
    .unwrap();
    let a = s.hotspot("a").unwrap();
    assert_eq!(a.trigger_mode, TriggerMode::Hover);
    assert_eq!(a.intro_title.as_deref(), Some("Forge"));
    assert_eq!(a.preferred_side, Some(Side::Bottom));
    assert_eq!(a.projects.len(), 2);
    assert_eq!(s.hotspot("b").unwrap().preferred_side, None);
}

#[test]
fn invalid_records_are_skipped() {
    let s = SceneContent::from_value(scene(json!([
        { "id": "ok", "x": 1, "y": 1 },
        { "x": 1, "y": 1 },
        { "id": "no-coords" },
        { "id": "bad-type", "x": "left", "y": 1 },
        { "id": "bad-trigger", "x": 1, "y": 1, "triggerMode": "sometimes" },
        { "id": "zero-size", "x": 1, "y": 1, "buildingW": 0 },
    ])))
    .unwrap();
    assert_eq!(s.hotspots.len(), 1);
    assert_eq!(s.hotspots[0].id, "ok");
}

#[test]
fn hotspots_sorted_by_order() {
    let s = SceneContent::from_value(scene(json!([
        { "id": "c", "x": 1, "y": 1, "order": 3 },
        { "id": "a", "x": 1, "y": 1, "order": 1 },
        { "id": "b", "x": 1, "y": 1, "order": 2 },
    ])))
    .unwrap();
    let ids: Vec<&str> = s.hotspots.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[test]
fn max_zoom_mult_is_clamped() {
    let hi = SceneContent::from_value(json!({ "width": 10, "height": 10, "maxZoomMult": 40 })).unwrap();
    assert!(approx_eq(hi.max_zoom_mult, 6.0));
    let lo = SceneContent::from_value(json!({ "width": 10, "height": 10, "maxZoomMult": 1.0 })).unwrap();
    assert!(approx_eq(lo.max_zoom_mult, 1.2));
}

#[test]
fn invalid_canvas_is_an_error() {
    let err = SceneContent::from_value(json!({ "width": 0, "height": 10 })).unwrap_err();
    assert!(matches!(err, ContentError::InvalidCanvas { .. }));
}

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(SceneContent::from_json("{"), Err(ContentError::Json(_))));
    assert!(matches!(SceneContent::from_json(r#"{"height": 10}"#), Err(ContentError::Json(_))));
}

#[test]
fn from_json_parses_text() {
    let s = SceneContent::from_json(r#"{"width": 2000, "height": 1200, "hotspots": [{"id": "a", "xPct": 50, "yPct": 50}]}"#).unwrap();
    assert_eq!(s.canvas, Size::new(2000.0, 1200.0));
    assert_eq!(s.hotspots[0].foot_world(s.canvas), Point::new(1000.0, 600.0));
}
