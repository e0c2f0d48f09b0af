//! Scene content: CMS hotspot records normalised into engine-ready hotspots.
//!
//! Records arrive as loosely-typed JSON. Every optional field falls back to a
//! fixed default, asset sizes are rescaled when the scene was authored against
//! a different canvas width, and records that can't be placed on the map are
//! skipped with a warning instead of failing the whole scene.

#[cfg(test)]
#[path = "content_test.rs"]
mod content_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::camera::{Point, Rect, Size, percent_to_world};
use crate::consts::{
    DEFAULT_ANCHOR_X, DEFAULT_ANCHOR_Y, DEFAULT_BUILDING_SIZE, DEFAULT_ICON_SIZE, DEFAULT_SPAWN_MS, MAX_ZOOM_MULT,
    MAX_ZOOM_MULT_RANGE,
};
use crate::placement::Side;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("scene json is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scene canvas must be positive and finite, got {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
}

/// How a hotspot is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    #[default]
    Click,
    /// Activates after the pointer rests on the icon for the hover debounce.
    Hover,
}

/// A normalised hotspot. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub id: String,
    pub label: String,
    pub order: f64,
    /// Foot point as a percentage of the map (0..100).
    pub x_pct: f64,
    pub y_pct: f64,
    /// Building sprite size in world pixels.
    pub building_width: f64,
    pub building_height: f64,
    /// Foot point as a fraction (0..1) of the building sprite.
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub spawn_duration_ms: f64,
    pub trigger_mode: TriggerMode,
    pub icon_width: f64,
    pub icon_height: f64,
    pub intro_title: Option<String>,
    /// Side the popover should try first; `None` means automatic.
    pub preferred_side: Option<Side>,
    /// Linked projects. Opaque to the engine.
    pub projects: Vec<Value>,
}

impl Hotspot {
    /// A hotspot at `(x_pct, y_pct)` with every other field defaulted.
    #[must_use]
    pub fn new(id: impl Into<String>, x_pct: f64, y_pct: f64) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            order: 0.0,
            x_pct,
            y_pct,
            building_width: DEFAULT_BUILDING_SIZE,
            building_height: DEFAULT_BUILDING_SIZE,
            anchor_x: DEFAULT_ANCHOR_X,
            anchor_y: DEFAULT_ANCHOR_Y,
            spawn_duration_ms: DEFAULT_SPAWN_MS,
            trigger_mode: TriggerMode::Click,
            icon_width: DEFAULT_ICON_SIZE,
            icon_height: DEFAULT_ICON_SIZE,
            intro_title: None,
            preferred_side: None,
            projects: Vec::new(),
        }
    }

    /// The foot point in world pixels.
    #[must_use]
    pub fn foot_world(&self, canvas: Size) -> Point {
        Point::new(percent_to_world(self.x_pct, canvas.width), percent_to_world(self.y_pct, canvas.height))
    }

    /// Building sprite bounds: the foot point sits at `(anchor_x, anchor_y)` of the box.
    #[must_use]
    pub fn building_rect_world(&self, canvas: Size) -> Rect {
        let foot = self.foot_world(canvas);
        let size = Size::new(self.building_width, self.building_height);
        Rect::from_origin(foot.x - size.width * self.anchor_x, foot.y - size.height * self.anchor_y, size)
    }

    /// Popover anchor: horizontally centred on the building, vertically at the foot.
    #[must_use]
    pub fn intro_anchor_world(&self, canvas: Size) -> Point {
        let foot = self.foot_world(canvas);
        Point::new(self.building_rect_world(canvas).center().x, foot.y)
    }

    /// Idle icon bounds, centred on the foot point.
    #[must_use]
    pub fn icon_rect_world(&self, canvas: Size) -> Rect {
        let foot = self.foot_world(canvas);
        let size = Size::new(self.icon_width, self.icon_height);
        Rect::from_origin(foot.x - size.width / 2.0, foot.y - size.height / 2.0, size)
    }

    fn is_placeable(&self) -> bool {
        !self.id.is_empty()
            && self.x_pct.is_finite()
            && self.y_pct.is_finite()
            && self.anchor_x.is_finite()
            && self.anchor_y.is_finite()
            && Size::new(self.building_width, self.building_height).is_valid()
            && Size::new(self.icon_width, self.icon_height).is_valid()
    }
}

/// A map scene: canvas size, zoom ceiling and its hotspots in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneContent {
    pub canvas: Size,
    pub max_zoom_mult: f64,
    pub hotspots: Vec<Hotspot>,
}

impl SceneContent {
    /// Parse and normalise a scene document.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Json`] when the document isn't a scene object and
    /// [`ContentError::InvalidCanvas`] when its canvas size is unusable.
    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let scene: RawScene = serde_json::from_str(raw)?;
        Self::from_raw(scene)
    }

    /// Same as [`SceneContent::from_json`] for an already-parsed value.
    ///
    /// # Errors
    ///
    /// See [`SceneContent::from_json`].
    pub fn from_value(value: Value) -> Result<Self, ContentError> {
        let scene: RawScene = serde_json::from_value(value)?;
        Self::from_raw(scene)
    }

    #[must_use]
    pub fn hotspot(&self, id: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    fn from_raw(scene: RawScene) -> Result<Self, ContentError> {
        let canvas = Size::new(scene.width, scene.height);
        if !canvas.is_valid() {
            return Err(ContentError::InvalidCanvas { width: scene.width, height: scene.height });
        }

        let size_scale = match scene.desktop_canvas_width {
            Some(desktop) if desktop.is_finite() && desktop > 0.0 => canvas.width / desktop,
            _ => 1.0,
        };

        let mut hotspots = Vec::with_capacity(scene.hotspots.len());
        for (index, record) in scene.hotspots.into_iter().enumerate() {
            match serde_json::from_value::<RawHotspot>(record) {
                Ok(raw) => match raw.normalise(size_scale) {
                    Some(hotspot) => hotspots.push(hotspot),
                    None => tracing::warn!(index, "skipping hotspot without id or coordinates"),
                },
                Err(err) => tracing::warn!(index, %err, "skipping malformed hotspot record"),
            }
        }
        hotspots.sort_by(|a, b| a.order.total_cmp(&b.order));

        let max_zoom_mult = match scene.max_zoom_mult {
            Some(m) if m.is_finite() && m > 0.0 => m.clamp(MAX_ZOOM_MULT_RANGE.0, MAX_ZOOM_MULT_RANGE.1),
            _ => MAX_ZOOM_MULT,
        };

        Ok(Self { canvas, max_zoom_mult, hotspots })
    }
}

// ── Raw CMS records ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScene {
    width: f64,
    height: f64,
    #[serde(default)]
    max_zoom_mult: Option<f64>,
    #[serde(default)]
    desktop_canvas_width: Option<f64>,
    #[serde(default)]
    hotspots: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawIntro {
    title: Option<String>,
    preferred_placement: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawHotspot {
    id: Option<RawId>,
    #[serde(rename = "_id")]
    alt_id: Option<RawId>,
    slug: Option<String>,
    label: Option<String>,
    order: Option<f64>,
    #[serde(alias = "xPct")]
    x: Option<f64>,
    #[serde(alias = "yPct")]
    y: Option<f64>,
    hotspot_idle_w: Option<f64>,
    hotspot_idle_h: Option<f64>,
    #[serde(alias = "buildingWidth")]
    building_w: Option<f64>,
    #[serde(alias = "buildingHeight")]
    building_h: Option<f64>,
    #[serde(alias = "anchorXPct")]
    anchor_x: Option<f64>,
    #[serde(alias = "anchorYPct")]
    anchor_y: Option<f64>,
    spawn_duration_ms: Option<f64>,
    trigger_mode: Option<TriggerMode>,
    intro: Option<RawIntro>,
    projects: Option<Vec<Value>>,
}

impl RawHotspot {
    fn normalise(self, size_scale: f64) -> Option<Hotspot> {
        let label = self.label.filter(|l| !l.is_empty());
        let id = self
            .id
            .or(self.alt_id)
            .map(RawId::into_string)
            .filter(|id| !id.is_empty())
            .or_else(|| self.slug.filter(|s| !s.is_empty()))
            .or_else(|| label.clone())?;

        let scaled = |v: Option<f64>, fallback: f64| (v.unwrap_or(fallback) * size_scale).round();
        let intro = self.intro.unwrap_or_default();

        let hotspot = Hotspot {
            label: label.unwrap_or_else(|| id.clone()),
            order: self.order.unwrap_or(0.0),
            x_pct: self.x?,
            y_pct: self.y?,
            building_width: scaled(self.building_w, DEFAULT_BUILDING_SIZE),
            building_height: scaled(self.building_h, DEFAULT_BUILDING_SIZE),
            anchor_x: anchor_fraction(self.anchor_x, DEFAULT_ANCHOR_X),
            anchor_y: anchor_fraction(self.anchor_y, DEFAULT_ANCHOR_Y),
            spawn_duration_ms: self.spawn_duration_ms.filter(|ms| ms.is_finite() && *ms >= 0.0).unwrap_or(DEFAULT_SPAWN_MS),
            trigger_mode: self.trigger_mode.unwrap_or_default(),
            icon_width: scaled(self.hotspot_idle_w, DEFAULT_ICON_SIZE),
            icon_height: scaled(self.hotspot_idle_h, DEFAULT_ICON_SIZE),
            intro_title: intro.title.filter(|t| !t.is_empty()),
            preferred_side: intro.preferred_placement.as_deref().and_then(Side::parse),
            projects: self.projects.unwrap_or_default(),
            id,
        };
        hotspot.is_placeable().then_some(hotspot)
    }
}

/// Sprite anchors are authored as percentages; values of 1 or less are already fractions.
fn anchor_fraction(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 1.0 => v / 100.0,
        Some(v) if v.is_finite() => v,
        _ => fallback,
    }
}
