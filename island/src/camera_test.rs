#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point / Size / Rect ---

#[test]
fn point_distance_and_midpoint() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(3.0, 4.0);
    assert!(approx_eq(a.distance(b), 5.0));
    assert!(point_approx_eq(a.midpoint(b), Point::new(1.5, 2.0)));
}

#[test]
fn point_nan_is_not_finite() {
    assert!(!Point::new(f64::NAN, 1.0).is_finite());
    assert!(Point::new(1.0, 1.0).is_finite());
}

#[test]
fn size_validity() {
    assert!(Size::new(10.0, 10.0).is_valid());
    assert!(!Size::new(0.0, 10.0).is_valid());
    assert!(!Size::new(10.0, -1.0).is_valid());
    assert!(!Size::new(f64::INFINITY, 10.0).is_valid());
}

#[test]
fn rect_geometry() {
    let r = Rect::from_origin(10.0, 20.0, Size::new(100.0, 50.0));
    assert_eq!(r.right, 110.0);
    assert_eq!(r.bottom, 70.0);
    assert!(point_approx_eq(r.center(), Point::new(60.0, 45.0)));
    assert!(r.contains(Point::new(10.0, 20.0)));
    assert!(!r.contains(Point::new(111.0, 20.0)));
}

// --- percent_to_world ---

#[test]
fn percent_to_world_scales_linearly() {
    assert!(approx_eq(percent_to_world(50.0, 2000.0), 1000.0));
    assert!(approx_eq(percent_to_world(0.0, 2000.0), 0.0));
    assert!(approx_eq(percent_to_world(100.0, 1200.0), 1200.0));
}

#[test]
fn percent_to_world_does_not_clamp() {
    assert!(approx_eq(percent_to_world(150.0, 100.0), 150.0));
    assert!(approx_eq(percent_to_world(-10.0, 100.0), -10.0));
}

// --- world_to_screen / screen_to_world ---

#[test]
fn world_to_screen_hotspot_scenario() {
    let world = Point::new(percent_to_world(50.0, 2000.0), percent_to_world(50.0, 1200.0));
    assert!(point_approx_eq(world, Point::new(1000.0, 600.0)));

    let cam = CameraState::new(-400.0, -200.0, 1.0);
    assert!(point_approx_eq(cam.world_to_screen(world), Point::new(600.0, 400.0)));
}

#[test]
fn world_to_screen_with_scale() {
    let cam = CameraState::new(10.0, 20.0, 2.0);
    assert!(point_approx_eq(cam.world_to_screen(Point::new(5.0, 5.0)), Point::new(20.0, 30.0)));
}

#[test]
fn screen_to_world_inverts_world_to_screen() {
    let cam = CameraState::new(-123.5, 44.25, 0.73);
    let world = Point::new(812.0, 307.5);
    let back = cam.screen_to_world(cam.world_to_screen(world));
    assert!(point_approx_eq(back, world));
}

#[test]
fn rect_to_screen_maps_both_corners() {
    let cam = CameraState::new(-100.0, -50.0, 0.5);
    let r = cam.rect_to_screen(Rect::new(200.0, 100.0, 400.0, 300.0));
    assert!(approx_eq(r.left, 0.0));
    assert!(approx_eq(r.top, 0.0));
    assert!(approx_eq(r.right, 100.0));
    assert!(approx_eq(r.bottom, 100.0));
}

#[test]
fn camera_default_is_identity() {
    let cam = CameraState::default();
    assert!(point_approx_eq(cam.world_to_screen(Point::new(7.0, 9.0)), Point::new(7.0, 9.0)));
}

// --- cover scale / clamping ---

#[test]
fn cover_scale_uses_larger_ratio() {
    let s = cover_scale(Size::new(1000.0, 800.0), Size::new(2000.0, 1200.0));
    assert!(approx_eq(s, 800.0 / 1200.0));
}

#[test]
fn cover_scale_invalid_sizes_fall_back_to_one() {
    assert_eq!(cover_scale(Size::new(0.0, 800.0), Size::new(2000.0, 1200.0)), 1.0);
    assert_eq!(cover_scale(Size::new(1000.0, 800.0), Size::default()), 1.0);
}

#[test]
fn clamp_never_panics_on_inverted_range() {
    assert_eq!(clamp(5.0, 10.0, 0.0), 10.0);
    assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
}

#[test]
fn clamp_axis_keeps_canvas_over_viewport() {
    // canvas 2000 wide in a 1000 viewport: x in [-1000, 0]
    assert_eq!(clamp_axis(50.0, 1000.0, 2000.0), 0.0);
    assert_eq!(clamp_axis(-1500.0, 1000.0, 2000.0), -1000.0);
    assert_eq!(clamp_axis(-300.0, 1000.0, 2000.0), -300.0);
}

#[test]
fn clamp_axis_centres_small_canvas() {
    assert_eq!(clamp_axis(-300.0, 1000.0, 600.0), 200.0);
}

#[test]
fn centered_camera_covers_viewport() {
    let viewport = Size::new(1000.0, 800.0);
    let canvas = Size::new(2000.0, 1200.0);
    let scale = cover_scale(viewport, canvas);
    let p = centered(scale, viewport, canvas);
    let cam = CameraState::new(p.x, p.y, scale);
    assert!(covers_viewport(&cam, viewport, canvas));
    assert!(approx_eq(p.y, 0.0));
}

#[test]
fn covers_viewport_detects_exposed_edge() {
    let viewport = Size::new(1000.0, 800.0);
    let canvas = Size::new(2000.0, 1200.0);
    let cam = CameraState::new(10.0, 0.0, 1.0);
    assert!(!covers_viewport(&cam, viewport, canvas));
    let cam = CameraState::new(-1100.0, 0.0, 1.0);
    assert!(!covers_viewport(&cam, viewport, canvas));
}
