//! Tuning configuration for the engine.
//!
//! Every field has a default taken from [`crate::consts`]; hosts override
//! individual values from JSON (`camelCase`), e.g. the scene's `maxZoomMult`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Camera feel and bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CameraConfig {
    /// `maxScale = coverScale * max_zoom_mult`.
    pub max_zoom_mult: f64,
    pub start_zoom_mult: f64,
    pub pan_smooth: f64,
    pub zoom_smooth: f64,
    pub inertia_friction: f64,
    pub inertia_max_velocity: f64,
    pub inertia_stop_velocity: f64,
    pub wheel_step: f64,
    pub max_dt_secs: f64,
    pub anchor_drop_px: f64,
    pub resize_threshold_px: f64,
    pub settle_scale_eps: f64,
    pub settle_position_px: f64,
    pub settle_velocity: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            max_zoom_mult: MAX_ZOOM_MULT,
            start_zoom_mult: START_ZOOM_MULT,
            pan_smooth: PAN_SMOOTH,
            zoom_smooth: ZOOM_SMOOTH,
            inertia_friction: INERTIA_FRICTION,
            inertia_max_velocity: INERTIA_MAX_VELOCITY,
            inertia_stop_velocity: INERTIA_STOP_VELOCITY,
            wheel_step: WHEEL_STEP,
            max_dt_secs: MAX_DT_SECS,
            anchor_drop_px: ANCHOR_DROP_PX,
            resize_threshold_px: RESIZE_THRESHOLD_PX,
            settle_scale_eps: SETTLE_SCALE_EPS,
            settle_position_px: SETTLE_POSITION_PX,
            settle_velocity: SETTLE_VELOCITY,
        }
    }
}

impl CameraConfig {
    /// Copy with out-of-range values pulled back to something the controller can run with.
    ///
    /// Friction outside `(0, 1)` would never settle; a zoom multiplier below 1 would
    /// invert the scale range.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let (lo, hi) = MAX_ZOOM_MULT_RANGE;
        self.max_zoom_mult = if self.max_zoom_mult.is_finite() {
            self.max_zoom_mult.clamp(lo, hi)
        } else {
            defaults.max_zoom_mult
        };
        if !(self.inertia_friction > 0.0 && self.inertia_friction < 1.0) {
            self.inertia_friction = defaults.inertia_friction;
        }
        if !(self.start_zoom_mult.is_finite() && self.start_zoom_mult >= 1.0) {
            self.start_zoom_mult = defaults.start_zoom_mult;
        }
        for (value, fallback) in [
            (&mut self.pan_smooth, defaults.pan_smooth),
            (&mut self.zoom_smooth, defaults.zoom_smooth),
            (&mut self.inertia_max_velocity, defaults.inertia_max_velocity),
            (&mut self.wheel_step, defaults.wheel_step),
            (&mut self.max_dt_secs, defaults.max_dt_secs),
        ] {
            if !(value.is_finite() && *value > 0.0) {
                *value = fallback;
            }
        }
        self
    }
}

/// Discovery timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryConfig {
    pub hover_debounce_ms: f64,
    pub default_spawn_ms: f64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { hover_debounce_ms: HOVER_DEBOUNCE_MS, default_spawn_ms: DEFAULT_SPAWN_MS }
    }
}

/// One soft-zoom step: multiply the current scale, never past an absolute cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftZoom {
    pub mult: f64,
    /// Absolute scale ceiling, not relative to the cover scale.
    pub cap: f64,
}

impl SoftZoom {
    #[must_use]
    pub const fn new(mult: f64, cap: f64) -> Self {
        Self { mult, cap }
    }

    /// Scale to focus at, starting from `current` with cover scale `min`.
    #[must_use]
    pub fn target(&self, current: f64, min: f64) -> f64 {
        (current.max(min) * self.mult).min(self.cap)
    }
}

/// Where focused hotspots land and how far focus zooms in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FocusConfig {
    /// Fractional viewport position (0..1) the focused world point lands on.
    pub viewport_anchor_x: f64,
    pub viewport_anchor_y: f64,
    pub hotspot_zoom: SoftZoom,
    pub building_zoom: SoftZoom,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            viewport_anchor_x: FOCUS_ANCHOR.0,
            viewport_anchor_y: FOCUS_ANCHOR.1,
            hotspot_zoom: SoftZoom::new(HOTSPOT_ZOOM.0, HOTSPOT_ZOOM.1),
            building_zoom: SoftZoom::new(BUILDING_ZOOM.0, BUILDING_ZOOM.1),
        }
    }
}

/// Overlay box sizes and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlacementConfig {
    pub popover_width: f64,
    pub popover_height: f64,
    pub details_width: f64,
    pub details_height: f64,
    pub margin: f64,
    pub gap: f64,
    pub mobile_breakpoint_px: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            popover_width: POPOVER_WIDTH,
            popover_height: POPOVER_HEIGHT,
            details_width: DETAILS_WIDTH,
            details_height: DETAILS_HEIGHT,
            margin: PLACEMENT_MARGIN,
            gap: PLACEMENT_GAP,
            mobile_breakpoint_px: MOBILE_BREAKPOINT_PX,
        }
    }
}

/// Everything the engine can be tuned with.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub camera: CameraConfig,
    pub discovery: DiscoveryConfig,
    pub focus: FocusConfig,
    pub placement: PlacementConfig,
}
