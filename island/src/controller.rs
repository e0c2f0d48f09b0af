//! Inertial pan/zoom camera over a fixed-size world canvas.
//!
//! DESIGN
//! ======
//! Input handlers never touch the rendered camera directly. They write a
//! *target* transform; [`CameraController::tick`] eases the *current*
//! transform toward it with frame-rate independent exponential smoothing:
//!
//! ```text
//! current += (target - current) * (1 - exp(-lambda * dt))
//! ```
//!
//! Pan and zoom use separate rates. Released drags seed a velocity that keeps
//! pushing the target with per-frame friction. Wheel and pinch zoom record a
//! zoom anchor (a world point pinned to a screen point) and re-derive the
//! target position every frame so the anchor stays under the cursor.
//!
//! Every written transform is clamped so the canvas covers the viewport.
//! The tick reports whether the camera is still moving; hosts stop scheduling
//! frames once it returns `false` and any input call wakes it again.
//!
//! Invalid viewport or canvas sizes turn every operation into a no-op.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use crate::camera::{CameraState, Point, Size, centered, clamp, clamp_to_bounds, cover_scale, covers_viewport};
use crate::config::CameraConfig;
use crate::consts::{COVER_SCALE_SLACK, NOMINAL_FRAME_MS, SCALE_MOTION_EPS};

/// How a focus request treats the current zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoomMode {
    /// Use the requested scale.
    Exact,
    /// Zoom in to the requested scale but never zoom out.
    #[default]
    AtLeast,
    /// Leave the scale alone.
    Keep,
}

/// Programmatic camera move: put `world` at a fractional viewport position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusRequest {
    pub world: Point,
    /// Fraction of the viewport (0..1 on each axis) where `world` should land.
    pub viewport_anchor: Point,
    pub target_scale: Option<f64>,
    pub zoom_mode: ZoomMode,
}

/// Options for [`CameraController::recenter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecenterOptions {
    /// Keep the current scale (raised to the cover scale if needed).
    pub keep_zoom: bool,
    /// Do nothing when the current transform already covers the viewport.
    pub only_if_needed: bool,
}

/// Classification of a viewport update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeKind {
    /// Size was invalid and has been ignored.
    Ignored,
    /// First valid size; the view has been reset.
    Initial,
    /// Below the jitter threshold on both axes; bounds were re-applied in place.
    Minor,
    /// A real resize. `covered` tells whether the view from before the resize
    /// already filled the new viewport; when it didn't, the caller should
    /// recenter. Bounds have been re-applied either way.
    Major { covered: bool },
}

/// A world point pinned to a screen point while zooming.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ZoomAnchor {
    world: Point,
    screen: Point,
}

/// Last pointer sample of an active drag.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSample {
    screen: Point,
    time_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchState {
    base_scale: f64,
}

/// The camera engine. One per mounted scene.
#[derive(Debug, Clone)]
pub struct CameraController {
    config: CameraConfig,
    viewport: Size,
    canvas: Size,
    current: CameraState,
    target: CameraState,
    /// Inertia in screen pixels per frame.
    velocity: Point,
    drag: Option<DragSample>,
    pinch: Option<PinchState>,
    zoom_anchor: Option<ZoomAnchor>,
    running: bool,
}

impl CameraController {
    #[must_use]
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config: config.sanitized(),
            viewport: Size::default(),
            canvas: Size::default(),
            current: CameraState::default(),
            target: CameraState::default(),
            velocity: Point::default(),
            drag: None,
            pinch: None,
            zoom_anchor: None,
            running: false,
        }
    }

    // --- Queries ---

    /// Both the viewport and the canvas have usable sizes.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.viewport.is_valid() && self.canvas.is_valid()
    }

    /// The rendered camera.
    #[must_use]
    pub fn current(&self) -> CameraState {
        self.current
    }

    /// Where the camera is heading.
    #[must_use]
    pub fn target(&self) -> CameraState {
        self.target
    }

    #[must_use]
    pub fn velocity(&self) -> Point {
        self.velocity
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    #[must_use]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Cover scale: the canvas has no visible edges at or above it.
    #[must_use]
    pub fn min_scale(&self) -> f64 {
        cover_scale(self.viewport, self.canvas)
    }

    #[must_use]
    pub fn max_scale(&self) -> f64 {
        let min = self.min_scale();
        (min * self.config.max_zoom_mult).max(min)
    }

    /// The tick loop still has work to do.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// A drag or pinch is in progress.
    #[must_use]
    pub fn is_gesturing(&self) -> bool {
        self.drag.is_some() || self.pinch.is_some()
    }

    #[must_use]
    pub fn has_zoom_anchor(&self) -> bool {
        self.zoom_anchor.is_some()
    }

    // --- Sizes ---

    /// Update the viewport size and classify the change.
    pub fn set_viewport(&mut self, viewport: Size) -> ResizeKind {
        if !viewport.is_valid() {
            return ResizeKind::Ignored;
        }
        let previous = self.viewport;
        self.viewport = viewport;

        if !previous.is_valid() {
            if self.is_ready() {
                self.reset_view(true);
            }
            return ResizeKind::Initial;
        }

        let dw = (viewport.width - previous.width).abs();
        let dh = (viewport.height - previous.height).abs();
        let threshold = self.config.resize_threshold_px;
        if dw < threshold && dh < threshold {
            self.reclamp();
            tracing::debug!(dw, dh, "viewport change under resize threshold");
            return ResizeKind::Minor;
        }

        let covered = self.covers_at_current();
        self.reclamp();
        tracing::debug!(dw, dh, covered, "viewport resized");
        ResizeKind::Major { covered }
    }

    /// Update the world canvas size (natural size of the background image).
    pub fn set_canvas(&mut self, canvas: Size) {
        if !canvas.is_valid() {
            return;
        }
        let was_ready = self.is_ready();
        self.canvas = canvas;
        if !was_ready && self.is_ready() {
            self.reset_view(true);
        } else {
            self.reclamp();
        }
    }

    // --- Drag ---

    pub fn drag_start(&mut self, screen: Point, time_ms: f64) {
        if !self.is_ready() || !screen.is_finite() {
            return;
        }
        self.drag = Some(DragSample { screen, time_ms });
        self.velocity = Point::default();
        self.zoom_anchor = None;
        self.wake();
    }

    pub fn drag_move(&mut self, screen: Point, time_ms: f64) {
        let Some(last) = self.drag else {
            return;
        };
        if !screen.is_finite() || !time_ms.is_finite() {
            tracing::warn!("ignoring non-finite drag sample");
            return;
        }

        let dt_ms = (time_ms - last.time_ms).max(1.0);
        let dx = screen.x - last.screen.x;
        let dy = screen.y - last.screen.y;
        self.drag = Some(DragSample { screen, time_ms });

        self.target.x += dx;
        self.target.y += dy;

        let cap = self.config.inertia_max_velocity;
        self.velocity = Point::new(
            clamp(dx / dt_ms * NOMINAL_FRAME_MS, -cap, cap),
            clamp(dy / dt_ms * NOMINAL_FRAME_MS, -cap, cap),
        );
        self.wake();
    }

    /// Release the drag; the recorded velocity carries on as inertia.
    pub fn drag_end(&mut self) {
        if self.drag.take().is_some() {
            self.wake();
        }
    }

    /// Abort the drag without inertia.
    pub fn drag_cancel(&mut self) {
        self.drag = None;
        self.velocity = Point::default();
        self.wake();
    }

    // --- Zoom ---

    /// Wheel zoom about `cursor`. Positive `delta_y` zooms out.
    pub fn wheel(&mut self, delta_y: f64, cursor: Point) {
        if !self.is_ready() || !cursor.is_finite() || !delta_y.is_finite() || delta_y == 0.0 {
            return;
        }
        let direction = if delta_y > 0.0 { -1.0 } else { 1.0 };
        let scale = self.current.scale * (1.0 + direction * self.config.wheel_step);
        self.zoom_about(cursor, scale);
    }

    /// Zoom toward `scale` keeping the world point under `screen` fixed.
    pub fn zoom_about(&mut self, screen: Point, scale: f64) {
        if !self.is_ready() || !screen.is_finite() || !scale.is_finite() {
            return;
        }
        self.velocity = Point::default();
        let world = self.current.screen_to_world(screen);
        self.zoom_anchor = Some(ZoomAnchor { world, screen });
        self.target.scale = clamp(scale, self.min_scale(), self.max_scale());
        self.wake();
    }

    /// Set the target scale directly, clamped to the allowed range.
    pub fn set_target_scale(&mut self, scale: f64) {
        if !self.is_ready() || !scale.is_finite() {
            return;
        }
        self.target.scale = clamp(scale, self.min_scale(), self.max_scale());
        self.wake();
    }

    pub fn pinch_start(&mut self, midpoint: Point) {
        if !self.is_ready() || !midpoint.is_finite() {
            return;
        }
        self.drag = None;
        self.velocity = Point::default();
        self.pinch = Some(PinchState { base_scale: self.current.scale });
        let world = self.current.screen_to_world(midpoint);
        self.zoom_anchor = Some(ZoomAnchor { world, screen: midpoint });
        self.wake();
    }

    /// `ratio` is the current finger distance over the distance at pinch start.
    pub fn pinch_move(&mut self, midpoint: Point, ratio: f64) {
        let Some(pinch) = self.pinch else {
            return;
        };
        if !midpoint.is_finite() || !ratio.is_finite() || ratio <= 0.0 {
            return;
        }
        if let Some(anchor) = self.zoom_anchor.as_mut() {
            anchor.screen = midpoint;
        } else {
            let world = self.current.screen_to_world(midpoint);
            self.zoom_anchor = Some(ZoomAnchor { world, screen: midpoint });
        }
        self.target.scale = clamp(pinch.base_scale * ratio, self.min_scale(), self.max_scale());
        self.wake();
    }

    pub fn pinch_end(&mut self) {
        if self.pinch.take().is_some() {
            self.wake();
        }
    }

    // --- Programmatic moves ---

    /// Move the camera so `request.world` lands at `request.viewport_anchor`.
    pub fn focus_world_point(&mut self, request: FocusRequest) {
        if !self.is_ready() || !request.world.is_finite() || !request.viewport_anchor.is_finite() {
            return;
        }
        let current = self.current.scale;
        let scale = match (request.zoom_mode, request.target_scale) {
            (ZoomMode::Keep, _) | (_, None) => current,
            (ZoomMode::Exact, Some(s)) => s,
            (ZoomMode::AtLeast, Some(s)) => current.max(s),
        };
        let scale = if scale.is_finite() { scale } else { current };
        let scale = clamp(scale, self.min_scale(), self.max_scale());

        let sx = self.viewport.width * request.viewport_anchor.x;
        let sy = self.viewport.height * request.viewport_anchor.y;
        let p = clamp_to_bounds(sx - request.world.x * scale, sy - request.world.y * scale, scale, self.viewport, self.canvas);

        self.target = CameraState::new(p.x, p.y, scale);
        self.zoom_anchor = None;
        self.velocity = Point::default();
        self.wake();
    }

    /// Re-centre the canvas, e.g. after a viewport or canvas size change.
    pub fn recenter(&mut self, options: RecenterOptions) {
        if !self.is_ready() {
            return;
        }
        let min = self.min_scale();
        let max = self.max_scale();
        let current = self.current.scale;

        if options.only_if_needed && self.covers_at_current() {
            return;
        }

        let scale = if options.keep_zoom {
            clamp(current.max(min), min, max)
        } else {
            clamp(min * self.config.start_zoom_mult, min, max)
        };
        let p = centered(scale, self.viewport, self.canvas);
        self.target = CameraState::new(p.x, p.y, scale);
        self.zoom_anchor = None;
        self.velocity = Point::default();
        self.wake();
    }

    /// Centre at the start scale. With `immediate`, the current camera jumps there too.
    pub fn reset_view(&mut self, immediate: bool) {
        if !self.is_ready() {
            return;
        }
        let min = self.min_scale();
        let scale = clamp(min * self.config.start_zoom_mult, min, self.max_scale());
        let p = centered(scale, self.viewport, self.canvas);
        self.target = CameraState::new(p.x, p.y, scale);
        if immediate {
            self.current = self.target;
        }
        self.zoom_anchor = None;
        self.velocity = Point::default();
        self.wake();
    }

    /// Jump to `state`, clamped to the bounds. Used to restore a saved view.
    pub fn set_transform(&mut self, state: CameraState) {
        if !self.is_ready() || !state.is_finite() {
            return;
        }
        let scale = clamp(state.scale, self.min_scale(), self.max_scale());
        let p = clamp_to_bounds(state.x, state.y, scale, self.viewport, self.canvas);
        self.current = CameraState::new(p.x, p.y, scale);
        self.target = self.current;
        self.zoom_anchor = None;
        self.velocity = Point::default();
        self.wake();
    }

    /// Stop all motion and the loop. Used on unmount.
    pub fn stop(&mut self) {
        self.drag = None;
        self.pinch = None;
        self.velocity = Point::default();
        self.zoom_anchor = None;
        self.target = self.current;
        self.running = false;
    }

    // --- Simulation ---

    /// Advance one frame by `dt_secs`. Returns whether another frame is needed.
    pub fn tick(&mut self, dt_secs: f64) -> bool {
        if !self.is_ready() {
            self.running = false;
            return false;
        }
        let dt = if dt_secs.is_finite() { clamp(dt_secs, 0.0, self.config.max_dt_secs) } else { 0.0 };
        let cfg = self.config;

        if self.drag.is_none() {
            let v = Point::new(self.velocity.x * cfg.inertia_friction, self.velocity.y * cfg.inertia_friction);
            if v.x.abs() > cfg.inertia_stop_velocity || v.y.abs() > cfg.inertia_stop_velocity {
                self.velocity = v;
                self.target.x += v.x;
                self.target.y += v.y;
            } else {
                self.velocity = Point::default();
            }
        }

        let min = self.min_scale();
        let max = self.max_scale();
        let current = self.current;
        let desired_scale = clamp(self.target.scale, min, max);
        self.target.scale = desired_scale;
        let next_scale = approach(current.scale, desired_scale, cfg.zoom_smooth, dt);
        let zooming = (next_scale - current.scale).abs() > SCALE_MOTION_EPS || self.pinch.is_some();

        let mut unclamped = Point::new(self.target.x, self.target.y);
        if let Some(anchor) = self.zoom_anchor {
            if zooming {
                unclamped = Point::new(
                    anchor.screen.x - anchor.world.x * next_scale,
                    anchor.screen.y - anchor.world.y * next_scale,
                );
            }
        }

        let clamped_target = clamp_to_bounds(unclamped.x, unclamped.y, next_scale, self.viewport, self.canvas);
        self.target.x = clamped_target.x;
        self.target.y = clamped_target.y;

        if self.zoom_anchor.is_some() {
            let dx = (clamped_target.x - unclamped.x).abs();
            let dy = (clamped_target.y - unclamped.y).abs();
            if dx > cfg.anchor_drop_px || dy > cfg.anchor_drop_px {
                tracing::debug!(dx, dy, "zoom anchor dropped at bounds");
                self.zoom_anchor = None;
            }
        }

        let next = if self.zoom_anchor.is_some() && zooming {
            clamped_target
        } else {
            Point::new(
                approach(current.x, self.target.x, cfg.pan_smooth, dt),
                approach(current.y, self.target.y, cfg.pan_smooth, dt),
            )
        };
        let next = clamp_to_bounds(next.x, next.y, next_scale, self.viewport, self.canvas);
        self.current = CameraState::new(next.x, next.y, next_scale);

        let settled = (desired_scale - next_scale).abs() < cfg.settle_scale_eps
            && (self.target.x - next.x).abs() < cfg.settle_position_px
            && (self.target.y - next.y).abs() < cfg.settle_position_px
            && self.velocity.x.abs() < cfg.settle_velocity
            && self.velocity.y.abs() < cfg.settle_velocity
            && !self.is_gesturing();

        if settled {
            self.zoom_anchor = None;
            self.running = false;
        } else {
            self.running = true;
        }
        self.running
    }

    /// Whether the rendered transform fills the viewport at an acceptable scale.
    fn covers_at_current(&self) -> bool {
        self.is_ready()
            && self.current.scale >= self.min_scale() - COVER_SCALE_SLACK
            && covers_viewport(&self.current, self.viewport, self.canvas)
    }

    /// Re-apply scale and position bounds to both transforms after a size change.
    fn reclamp(&mut self) {
        if !self.is_ready() {
            return;
        }
        let min = self.min_scale();
        let max = self.max_scale();
        for state in [&mut self.current, &mut self.target] {
            state.scale = clamp(state.scale, min, max);
            let p = clamp_to_bounds(state.x, state.y, state.scale, self.viewport, self.canvas);
            state.x = p.x;
            state.y = p.y;
        }
        self.wake();
    }

    fn wake(&mut self) {
        self.running = true;
    }
}

/// Exponential approach of `current` toward `target` at rate `lambda` over `dt` seconds.
#[must_use]
pub fn approach(current: f64, target: f64, lambda: f64, dt: f64) -> f64 {
    let t = 1.0 - (-lambda * dt).exp();
    current + (target - current) * t
}
