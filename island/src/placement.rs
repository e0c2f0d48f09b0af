//! Overlay placement: keeps a popover fully on screen next to a world-anchored
//! reference rectangle.
//!
//! DESIGN
//! ======
//! Candidates are tried in priority order (caller preference first, then a fixed
//! fallback order). Each candidate sits on one side of the reference rectangle,
//! `gap` pixels away, centred on the anchor along the other axis. The first
//! candidate whose box lies inside `[margin, viewport - margin]` on both axes
//! wins. When none fit, the first candidate is hard-clamped into that range;
//! it may then overlap the reference but never leaves the viewport.
//!
//! Each result also carries the side-specific anchor point of the final box
//! (bottom-centre for `Top`, left-centre for `Right`, ...) so enter/exit
//! animations keep the right transform origin after clamping.
//!
//! The details panel chains off the popover: the popover's resolved rectangle
//! becomes the reference for a second solve with its own order.

#[cfg(test)]
#[path = "placement_test.rs"]
mod placement_test;

use serde::{Deserialize, Serialize};

use crate::camera::{CameraState, Point, Rect, Size, clamp};

/// Side of the reference rectangle an overlay sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Popover fallback order after the preferred side.
pub const FALLBACK_ORDER: [Side; 4] = [Side::Top, Side::Right, Side::Left, Side::Bottom];

/// Details panel order relative to the popover.
pub const DETAILS_ORDER: [Side; 4] = [Side::Right, Side::Left, Side::Bottom, Side::Top];

impl Side {
    /// Parse a CMS placement value. Anything else (including `"auto"`) is `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" => Some(Self::Top),
            "right" => Some(Self::Right),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            _ => None,
        }
    }

    /// Fractional position of the animation anchor within the box.
    #[must_use]
    pub fn anchor_fraction(self) -> (f64, f64) {
        match self {
            Self::Top => (0.5, 1.0),
            Self::Bottom => (0.5, 0.0),
            Self::Right => (0.0, 0.5),
            Self::Left => (1.0, 0.5),
        }
    }
}

/// Room between the reference rectangle and each viewport edge, net of margin and gap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AvailableSpace {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl AvailableSpace {
    #[must_use]
    pub fn toward(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }
}

#[must_use]
pub fn available_space(reference: Rect, viewport: Size, margin: f64, gap: f64) -> AvailableSpace {
    AvailableSpace {
        top: reference.top - margin - gap,
        right: viewport.width - reference.right - margin - gap,
        bottom: viewport.height - reference.bottom - margin - gap,
        left: reference.left - margin - gap,
    }
}

/// What to place and where, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    pub anchor_world: Point,
    /// Rectangle to avoid covering, e.g. the building sprite. Defaults to the anchor point.
    pub reference_world: Option<Rect>,
    pub box_size: Size,
    pub preferred_side: Option<Side>,
    pub margin: f64,
    pub gap: f64,
}

/// A resolved overlay position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub side: Side,
    /// Final box, always inside the viewport margins when the box fits at all.
    pub rect: Rect,
    /// Side-specific animation anchor on `rect`.
    pub anchor: Point,
    /// `false` when no candidate fitted and the box was hard-clamped.
    pub fits: bool,
    pub space: AvailableSpace,
}

impl Placement {
    #[must_use]
    pub fn screen_left(&self) -> f64 {
        self.rect.left
    }

    #[must_use]
    pub fn screen_top(&self) -> f64 {
        self.rect.top
    }
}

/// Preferred side first, then `fallback` without repeats.
#[must_use]
pub fn candidate_order(preferred: Option<Side>, fallback: &[Side]) -> Vec<Side> {
    let mut order = Vec::with_capacity(fallback.len() + 1);
    order.extend(preferred);
    for side in fallback {
        if !order.contains(side) {
            order.push(*side);
        }
    }
    order
}

/// Box on `side` of `reference`, centred on `anchor` along the cross axis.
#[must_use]
pub fn candidate_rect(side: Side, anchor: Point, reference: Rect, size: Size, gap: f64) -> Rect {
    let (left, top) = match side {
        Side::Top => (anchor.x - size.width / 2.0, reference.top - gap - size.height),
        Side::Bottom => (anchor.x - size.width / 2.0, reference.bottom + gap),
        Side::Right => (reference.right + gap, anchor.y - size.height / 2.0),
        Side::Left => (reference.left - gap - size.width, anchor.y - size.height / 2.0),
    };
    Rect::from_origin(left, top, size)
}

fn within_margins(rect: Rect, viewport: Size, margin: f64) -> bool {
    rect.left >= margin
        && rect.top >= margin
        && rect.right <= viewport.width - margin
        && rect.bottom <= viewport.height - margin
}

/// Screen-space solve. `order` must not be empty; an empty order falls back to [`FALLBACK_ORDER`].
#[must_use]
pub fn solve(anchor: Point, reference: Rect, size: Size, viewport: Size, order: &[Side], margin: f64, gap: f64) -> Placement {
    let order = if order.is_empty() { &FALLBACK_ORDER[..] } else { order };
    let size = Size::new(size.width.min(viewport.width - 2.0 * margin).max(0.0), size.height.max(0.0));
    let space = available_space(reference, viewport, margin, gap);

    let fitted = order.iter().find_map(|&side| {
        let rect = candidate_rect(side, anchor, reference, size, gap);
        within_margins(rect, viewport, margin).then_some((side, rect))
    });

    let (side, rect, fits) = match fitted {
        Some((side, rect)) => (side, rect, true),
        None => {
            let side = order[0];
            let rect = candidate_rect(side, anchor, reference, size, gap);
            let left = clamp(rect.left, margin, viewport.width - margin - size.width);
            let top = clamp(rect.top, margin, viewport.height - margin - size.height);
            (side, Rect::from_origin(left, top, size), false)
        }
    };

    let (fx, fy) = side.anchor_fraction();
    let anchor = Point::new(rect.left + rect.width() * fx, rect.top + rect.height() * fy);
    Placement { side, rect, anchor, fits, space }
}

/// Place an overlay for a world-space request under the current camera.
///
/// Returns `None` when the viewport is unusable or the anchor isn't finite.
#[must_use]
pub fn choose_placement(request: &PlacementRequest, camera: &CameraState, viewport: Size) -> Option<Placement> {
    if !viewport.is_valid() || !request.anchor_world.is_finite() || !camera.is_finite() {
        return None;
    }
    let anchor = camera.world_to_screen(request.anchor_world);
    let reference = match request.reference_world {
        Some(rect) if rect.is_finite() => camera.rect_to_screen(rect),
        _ => Rect::at_point(anchor),
    };
    let order = candidate_order(request.preferred_side, &FALLBACK_ORDER);
    Some(solve(anchor, reference, request.box_size, viewport, &order, request.margin, request.gap))
}

/// Place the details panel against an already-resolved popover.
#[must_use]
pub fn chain_details(popover: &Placement, size: Size, viewport: Size, margin: f64, gap: f64) -> Placement {
    solve(popover.rect.center(), popover.rect, size, viewport, &DETAILS_ORDER, margin, gap)
}
