use super::*;

const MARGIN: f64 = 14.0;
const GAP: f64 = 14.0;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn viewport() -> Size {
    Size::new(1000.0, 800.0)
}

fn popover() -> Size {
    Size::new(360.0, 170.0)
}

fn building() -> Rect {
    Rect::new(500.0, 100.0, 700.0, 300.0)
}

fn assert_inside(p: &Placement, vp: Size) {
    assert!(p.rect.left >= MARGIN - 1e-9, "left {}", p.rect.left);
    assert!(p.rect.top >= MARGIN - 1e-9, "top {}", p.rect.top);
    assert!(p.rect.right <= vp.width - MARGIN + 1e-9, "right {}", p.rect.right);
    assert!(p.rect.bottom <= vp.height - MARGIN + 1e-9, "bottom {}", p.rect.bottom);
}

// =============================================================
// Side
// =============================================================

#[test]
fn side_parse_accepts_known_values() {
    assert_eq!(Side::parse("top"), Some(Side::Top));
    assert_eq!(Side::parse(" Bottom "), Some(Side::Bottom));
    assert_eq!(Side::parse("left"), Some(Side::Left));
    assert_eq!(Side::parse("right"), Some(Side::Right));
}

#[test]
fn side_parse_auto_is_none() {
    assert_eq!(Side::parse("auto"), None);
    assert_eq!(Side::parse(""), None);
}

#[test]
fn side_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Side::Left).unwrap(), "\"left\"");
}

#[test]
fn candidate_order_puts_preferred_first_without_repeats() {
    assert_eq!(candidate_order(Some(Side::Bottom), &FALLBACK_ORDER), vec![Side::Bottom, Side::Top, Side::Right, Side::Left]);
    assert_eq!(candidate_order(None, &FALLBACK_ORDER), FALLBACK_ORDER.to_vec());
    assert_eq!(candidate_order(Some(Side::Top), &FALLBACK_ORDER), FALLBACK_ORDER.to_vec());
}

// =============================================================
// Available space
// =============================================================

#[test]
fn available_space_subtracts_margin_and_gap() {
    let s = available_space(building(), viewport(), MARGIN, GAP);
    assert!(approx_eq(s.top, 72.0));
    assert!(approx_eq(s.right, 272.0));
    assert!(approx_eq(s.left, 472.0));
    assert!(approx_eq(s.bottom, 472.0));
    assert!(approx_eq(s.toward(Side::Left), 472.0));
}

// =============================================================
// Solve
// =============================================================

#[test]
fn top_and_right_rejected_left_chosen() {
    let b = building();
    let p = solve(b.center(), b, popover(), viewport(), &FALLBACK_ORDER, MARGIN, GAP);
    assert_eq!(p.side, Side::Left);
    assert!(p.fits);
    assert!(approx_eq(p.screen_left(), 126.0));
    assert!((MARGIN..=626.0).contains(&p.screen_left()));
    assert_inside(&p, viewport());
}

#[test]
fn preferred_side_wins_when_it_fits() {
    let b = Rect::new(400.0, 400.0, 500.0, 500.0);
    let order = candidate_order(Some(Side::Bottom), &FALLBACK_ORDER);
    let p = solve(b.center(), b, popover(), viewport(), &order, MARGIN, GAP);
    assert_eq!(p.side, Side::Bottom);
    assert!(approx_eq(p.rect.top, 514.0));
    assert!(approx_eq(p.rect.left, 450.0 - 180.0));
}

#[test]
fn top_placement_sits_above_reference() {
    let b = Rect::new(400.0, 400.0, 500.0, 500.0);
    let p = solve(b.center(), b, popover(), viewport(), &FALLBACK_ORDER, MARGIN, GAP);
    assert_eq!(p.side, Side::Top);
    assert!(approx_eq(p.rect.bottom, 386.0));
}

#[test]
fn anchor_follows_side_convention() {
    let b = Rect::new(400.0, 400.0, 500.0, 500.0);
    let top = solve(b.center(), b, popover(), viewport(), &[Side::Top], MARGIN, GAP);
    assert!(approx_eq(top.anchor.x, top.rect.center().x));
    assert!(approx_eq(top.anchor.y, top.rect.bottom));

    let right = solve(b.center(), b, popover(), viewport(), &[Side::Right], MARGIN, GAP);
    assert!(approx_eq(right.anchor.x, right.rect.left));
    assert!(approx_eq(right.anchor.y, right.rect.center().y));

    let left = solve(b.center(), b, popover(), viewport(), &[Side::Left], MARGIN, GAP);
    assert!(approx_eq(left.anchor.x, left.rect.right));

    let bottom = solve(b.center(), b, popover(), viewport(), &[Side::Bottom], MARGIN, GAP);
    assert!(approx_eq(bottom.anchor.y, bottom.rect.top));
}

#[test]
fn nothing_fits_hard_clamps_first_candidate() {
    // Reference covers almost the whole viewport.
    let b = Rect::new(20.0, 20.0, 980.0, 780.0);
    let p = solve(b.center(), b, popover(), viewport(), &FALLBACK_ORDER, MARGIN, GAP);
    assert_eq!(p.side, Side::Top);
    assert!(!p.fits);
    assert!(approx_eq(p.rect.top, MARGIN));
    assert_inside(&p, viewport());
}

#[test]
fn anchor_near_corner_still_inside() {
    let b = Rect::at_point(Point::new(2.0, 2.0));
    let p = solve(b.center(), b, popover(), viewport(), &FALLBACK_ORDER, MARGIN, GAP);
    assert_inside(&p, viewport());
}

#[test]
fn anchor_offscreen_still_inside() {
    let b = Rect::new(1500.0, -400.0, 1700.0, -200.0);
    let p = solve(b.center(), b, popover(), viewport(), &FALLBACK_ORDER, MARGIN, GAP);
    assert!(!p.fits);
    assert_inside(&p, viewport());
}

#[test]
fn wide_box_is_pre_clamped_to_viewport() {
    let vp = Size::new(320.0, 640.0);
    let b = Rect::new(100.0, 400.0, 200.0, 500.0);
    let p = solve(b.center(), b, Size::new(360.0, 170.0), vp, &FALLBACK_ORDER, MARGIN, GAP);
    assert!(approx_eq(p.rect.width(), 320.0 - 28.0));
    assert_inside(&p, vp);
}

#[test]
fn empty_order_uses_fallback() {
    let b = building();
    let p = solve(b.center(), b, popover(), viewport(), &[], MARGIN, GAP);
    assert_eq!(p.side, Side::Left);
}

#[test]
fn containment_holds_over_a_grid_of_anchors() {
    let vp = viewport();
    let sizes = [Size::new(360.0, 170.0), Size::new(560.0, 280.0), Size::new(972.0, 772.0)];
    for size in sizes {
        for ix in -2..=12 {
            for iy in -2..=10 {
                let a = Point::new(f64::from(ix) * 100.0, f64::from(iy) * 100.0);
                let r = Rect::new(a.x - 60.0, a.y - 150.0, a.x + 60.0, a.y);
                let p = solve(a, r, size, vp, &FALLBACK_ORDER, MARGIN, GAP);
                assert_inside(&p, vp);
            }
        }
    }
}

// =============================================================
// World-space requests
// =============================================================

fn request(anchor: Point, reference: Option<Rect>) -> PlacementRequest {
    PlacementRequest { anchor_world: anchor, reference_world: reference, box_size: popover(), preferred_side: None, margin: MARGIN, gap: GAP }
}

#[test]
fn choose_placement_projects_through_camera() {
    let camera = CameraState::new(-400.0, -200.0, 1.0);
    let building_world = Rect::new(900.0, 300.0, 1100.0, 500.0);
    let p = choose_placement(&request(Point::new(1000.0, 484.0), Some(building_world)), &camera, viewport()).unwrap();
    // Screen reference is {500,100,700,300}, same as the fixed scenario.
    assert_eq!(p.side, Side::Left);
    assert!(approx_eq(p.screen_left(), 126.0));
}

#[test]
fn choose_placement_without_reference_uses_anchor_point() {
    let camera = CameraState::default();
    let p = choose_placement(&request(Point::new(500.0, 500.0), None), &camera, viewport()).unwrap();
    assert_eq!(p.side, Side::Top);
    assert!(approx_eq(p.rect.bottom, 486.0));
    assert!(approx_eq(p.rect.center().x, 500.0));
}

#[test]
fn choose_placement_honours_preferred_side() {
    let mut req = request(Point::new(500.0, 300.0), None);
    req.preferred_side = Some(Side::Bottom);
    let p = choose_placement(&req, &CameraState::default(), viewport()).unwrap();
    assert_eq!(p.side, Side::Bottom);
}

#[test]
fn choose_placement_rejects_bad_input() {
    let camera = CameraState::default();
    assert!(choose_placement(&request(Point::new(f64::NAN, 0.0), None), &camera, viewport()).is_none());
    assert!(choose_placement(&request(Point::new(1.0, 1.0), None), &camera, Size::new(0.0, 800.0)).is_none());
}

// =============================================================
// Details chaining
// =============================================================

#[test]
fn details_prefers_right_of_popover() {
    let vp = Size::new(1400.0, 900.0);
    let b = Rect::new(200.0, 400.0, 300.0, 500.0);
    let pop = solve(b.center(), b, popover(), vp, &FALLBACK_ORDER, MARGIN, GAP);
    let details = chain_details(&pop, Size::new(560.0, 280.0), vp, MARGIN, GAP);
    assert_eq!(details.side, Side::Right);
    assert!(approx_eq(details.rect.left, pop.rect.right + GAP));
    assert_inside(&details, vp);
}

#[test]
fn details_falls_back_to_left_near_right_edge() {
    let vp = Size::new(1400.0, 900.0);
    let b = Rect::new(1100.0, 400.0, 1200.0, 500.0);
    let pop = solve(b.center(), b, popover(), vp, &FALLBACK_ORDER, MARGIN, GAP);
    let details = chain_details(&pop, Size::new(560.0, 280.0), vp, MARGIN, GAP);
    assert_eq!(details.side, Side::Left);
    assert_inside(&details, vp);
}
