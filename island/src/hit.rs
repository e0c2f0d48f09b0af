#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{CameraState, Point, Size};
use crate::content::Hotspot;
use crate::discovery::HotspotPhase;

/// Which part of a hotspot was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// Idle icon of an undiscovered hotspot.
    Icon,
    /// Building sprite, spawning or built.
    Building,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub hotspot_id: String,
    pub part: HitPart,
}

/// Hotspot under `screen_pt`, topmost first (later hotspots draw over earlier ones).
///
/// Hidden hotspots are hit on their icon; spawning and built ones on their building.
#[must_use]
pub fn hit_test(
    screen_pt: Point,
    hotspots: &[Hotspot],
    camera: &CameraState,
    canvas: Size,
    phase: impl Fn(&str) -> HotspotPhase,
) -> Option<Hit> {
    if !screen_pt.is_finite() || !camera.is_finite() || !canvas.is_valid() {
        return None;
    }
    let world = camera.screen_to_world(screen_pt);
    hotspots.iter().rev().find_map(|h| {
        let (rect, part) = match phase(&h.id) {
            HotspotPhase::Hidden => (h.icon_rect_world(canvas), HitPart::Icon),
            HotspotPhase::Spawning | HotspotPhase::Built => (h.building_rect_world(canvas), HitPart::Building),
        };
        rect.contains(world).then(|| Hit { hotspot_id: h.id.clone(), part })
    })
}
