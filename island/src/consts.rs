//! Shared numeric constants for the island crate.

// ── Camera feel ─────────────────────────────────────────────────

/// Exponential smoothing rate for pan, per second. Bigger is snappier.
pub const PAN_SMOOTH: f64 = 4.5;

/// Exponential smoothing rate for zoom, per second.
pub const ZOOM_SMOOTH: f64 = 3.8;

/// Per-frame velocity multiplier applied during inertial deceleration.
pub const INERTIA_FRICTION: f64 = 0.92;

/// Velocity cap for inertia, in screen pixels per nominal frame.
pub const INERTIA_MAX_VELOCITY: f64 = 55.0;

/// Below this per-axis speed inertia is zeroed.
pub const INERTIA_STOP_VELOCITY: f64 = 0.05;

/// Relative scale change per wheel tick.
pub const WHEEL_STEP: f64 = 0.09;

/// Nominal frame length in milliseconds used to normalise drag velocity.
pub const NOMINAL_FRAME_MS: f64 = 16.0;

/// Frame delta used for the first tick after the loop wakes up.
pub const DEFAULT_FRAME_SECS: f64 = 1.0 / 60.0;

/// Upper bound on a single tick's delta time, in seconds.
pub const MAX_DT_SECS: f64 = 0.05;

// ── Camera bounds ───────────────────────────────────────────────

/// Maximum zoom as a multiple of the cover scale.
pub const MAX_ZOOM_MULT: f64 = 2.5;

/// Lower and upper limits accepted for [`MAX_ZOOM_MULT`] overrides.
pub const MAX_ZOOM_MULT_RANGE: (f64, f64) = (1.2, 6.0);

/// Initial zoom as a multiple of the cover scale.
pub const START_ZOOM_MULT: f64 = 1.05;

/// Clamping that moves the camera further than this from the zoom anchor drops the anchor.
pub const ANCHOR_DROP_PX: f64 = 1.2;

/// Viewport changes smaller than this on both axes are not treated as real resizes.
pub const RESIZE_THRESHOLD_PX: f64 = 80.0;

/// Tolerance for visible-edge checks, in screen pixels.
pub const EDGE_TOLERANCE_PX: f64 = 0.5;

// ── Settling ────────────────────────────────────────────────────

pub const SETTLE_SCALE_EPS: f64 = 0.0005;
pub const SETTLE_POSITION_PX: f64 = 0.3;
pub const SETTLE_VELOCITY: f64 = 0.1;

/// Scale changes smaller than this count as "not zooming" for anchor tracking.
pub const SCALE_MOTION_EPS: f64 = 1e-6;

/// A scale this far under the cover scale still counts as covering.
pub const COVER_SCALE_SLACK: f64 = 1e-4;

// ── Focus ───────────────────────────────────────────────────────

/// Fraction of the viewport where a focused world point lands (below centre).
pub const FOCUS_ANCHOR: (f64, f64) = (0.5, 0.62);

/// Soft zoom on hotspot activation: `min(max(cur, cover) * mult, cap)`.
pub const HOTSPOT_ZOOM: (f64, f64) = (1.06, 1.12);

/// Soft zoom when a built building is opened.
pub const BUILDING_ZOOM: (f64, f64) = (1.08, 1.15);

// ── Discovery ───────────────────────────────────────────────────

pub const DEFAULT_SPAWN_MS: f64 = 1400.0;
pub const HOVER_DEBOUNCE_MS: f64 = 350.0;

// ── Content defaults ────────────────────────────────────────────

pub const DEFAULT_BUILDING_SIZE: f64 = 220.0;
pub const DEFAULT_ICON_SIZE: f64 = 96.0;
pub const DEFAULT_ANCHOR_X: f64 = 0.5;
pub const DEFAULT_ANCHOR_Y: f64 = 0.92;

// ── Placement ───────────────────────────────────────────────────

pub const POPOVER_WIDTH: f64 = 360.0;
pub const POPOVER_HEIGHT: f64 = 170.0;
pub const DETAILS_WIDTH: f64 = 560.0;
pub const DETAILS_HEIGHT: f64 = 280.0;
pub const PLACEMENT_MARGIN: f64 = 14.0;
pub const PLACEMENT_GAP: f64 = 14.0;

/// Viewports narrower than this show the details panel as a bottom sheet.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

// ── Input ───────────────────────────────────────────────────────

/// A press that travels less than this is a tap.
pub const TAP_SLOP_PX: f64 = 6.0;
