//! Camera state and coordinate conversions.
//!
//! Every layer that positions something on screen (hotspots, buildings,
//! popovers, hit-testing) goes through [`CameraState::world_to_screen`] and
//! its inverse. There is exactly one transform:
//!
//! ```text
//! screen = camera.xy + world * camera.scale
//! ```

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::EDGE_TOLERANCE_PX;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Width and height in pixels. Used for the viewport, the world canvas and overlay boxes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and strictly positive.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle given by its edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    #[must_use]
    pub fn from_origin(left: f64, top: f64, size: Size) -> Self {
        Self { left, top, right: left + size.width, bottom: top + size.height }
    }

    /// Zero-area rectangle at `p`.
    #[must_use]
    pub fn at_point(p: Point) -> Self {
        Self { left: p.x, top: p.y, right: p.x, bottom: p.y }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.top.is_finite() && self.right.is_finite() && self.bottom.is_finite()
    }
}

/// Camera transform over the world canvas.
///
/// `x` / `y` are the screen position of the canvas's top-left corner, in CSS pixels.
/// `scale` is the world-to-screen factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: 1.0 }
    }
}

impl CameraState {
    #[must_use]
    pub fn new(x: f64, y: f64, scale: f64) -> Self {
        Self { x, y, scale }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point { x: self.x + world.x * self.scale, y: self.y + world.y * self.scale }
    }

    /// Convert a screen-space point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point { x: (screen.x - self.x) / self.scale, y: (screen.y - self.y) / self.scale }
    }

    /// Map a world rectangle to screen space.
    #[must_use]
    pub fn rect_to_screen(&self, world: Rect) -> Rect {
        let tl = self.world_to_screen(Point::new(world.left, world.top));
        let br = self.world_to_screen(Point::new(world.right, world.bottom));
        Rect::new(tl.x, tl.y, br.x, br.y)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.scale.is_finite() && self.scale > 0.0
    }
}

/// Convert a percentage (0..100) of a dimension to pixels. Out-of-range input is not clamped.
#[must_use]
pub fn percent_to_world(pct: f64, dimension: f64) -> f64 {
    (pct / 100.0) * dimension
}

/// `v` limited to `[lo, hi]`. Never panics; yields `lo` when the range is inverted.
#[must_use]
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.min(hi).max(lo)
}

/// Smallest scale at which the canvas covers the viewport on both axes.
///
/// Returns `1.0` when either size is invalid.
#[must_use]
pub fn cover_scale(viewport: Size, canvas: Size) -> f64 {
    if !viewport.is_valid() || !canvas.is_valid() {
        return 1.0;
    }
    (viewport.width / canvas.width).max(viewport.height / canvas.height)
}

/// Clamp one axis so the scaled canvas covers the viewport, or centre it when it can't.
#[must_use]
pub fn clamp_axis(pos: f64, viewport_len: f64, scaled_len: f64) -> f64 {
    if scaled_len <= viewport_len {
        (viewport_len - scaled_len) / 2.0
    } else {
        clamp(pos, viewport_len - scaled_len, 0.0)
    }
}

/// Clamp a candidate camera position at `scale` against the canvas bounds.
#[must_use]
pub fn clamp_to_bounds(x: f64, y: f64, scale: f64, viewport: Size, canvas: Size) -> Point {
    Point::new(
        clamp_axis(x, viewport.width, canvas.width * scale),
        clamp_axis(y, viewport.height, canvas.height * scale),
    )
}

/// Camera position that centres the canvas at `scale`, already clamped.
#[must_use]
pub fn centered(scale: f64, viewport: Size, canvas: Size) -> Point {
    let x = (viewport.width - canvas.width * scale) / 2.0;
    let y = (viewport.height - canvas.height * scale) / 2.0;
    clamp_to_bounds(x, y, scale, viewport, canvas)
}

/// Whether the canvas at `camera` fully covers the viewport (no visible background).
#[must_use]
pub fn covers_viewport(camera: &CameraState, viewport: Size, canvas: Size) -> bool {
    let cw = canvas.width * camera.scale;
    let ch = canvas.height * camera.scale;
    camera.x <= EDGE_TOLERANCE_PX
        && camera.y <= EDGE_TOLERANCE_PX
        && camera.x + cw >= viewport.width - EDGE_TOLERANCE_PX
        && camera.y + ch >= viewport.height - EDGE_TOLERANCE_PX
}
