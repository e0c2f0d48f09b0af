//! Input model: pointer events, wheel deltas, and the gesture state machine.
//!
//! `InputState` is the gesture being tracked between pointer-down and
//! pointer-up. A press that lands on a hotspot or building is held as a
//! potential tap and never pans the map; a press on open ground pans; a
//! second finger turns either into a pinch.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::hit::Hit;

/// Host-assigned pointer identifier (the DOM `pointerId`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerId(pub i32);

/// One pointer sample in viewport-relative CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub id: PointerId,
    pub screen: Point,
    /// Host clock in milliseconds.
    pub time_ms: f64,
}

impl PointerEvent {
    #[must_use]
    pub fn new(id: i32, x: f64, y: f64, time_ms: f64) -> Self {
        Self { id: PointerId(id), screen: Point::new(x, y), time_ms }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down = zoom out).
    pub dy: f64,
}

/// Cursor the host should show over the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cursor {
    #[default]
    Grab,
    Grabbing,
    Pointer,
}

/// A pointer currently on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedPointer {
    pub id: PointerId,
    pub screen: Point,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A press on a hotspot or building; becomes a tap if released in place.
    Pressing {
        pointer: PointerId,
        origin: Point,
        /// Furthest distance travelled from `origin`.
        travel: f64,
        hit: Hit,
    },
    /// Dragging the map.
    Panning { pointer: PointerId },
    /// Two-finger zoom.
    Pinching {
        first: TrackedPointer,
        second: TrackedPointer,
        start_distance: f64,
    },
}

impl InputState {
    /// Whether `id` is one of the pointers driving the current gesture.
    #[must_use]
    pub fn tracks(&self, id: PointerId) -> bool {
        match self {
            Self::Idle => false,
            Self::Pressing { pointer, .. } | Self::Panning { pointer } => *pointer == id,
            Self::Pinching { first, second, .. } => first.id == id || second.id == id,
        }
    }

    /// Cursor that matches this gesture.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        match self {
            Self::Idle => Cursor::Grab,
            Self::Pressing { .. } => Cursor::Pointer,
            Self::Panning { .. } | Self::Pinching { .. } => Cursor::Grabbing,
        }
    }
}

/// Midpoint and finger distance of a pinch.
#[must_use]
pub fn pinch_geometry(first: TrackedPointer, second: TrackedPointer) -> (Point, f64) {
    (first.screen.midpoint(second.screen), first.screen.distance(second.screen))
}
