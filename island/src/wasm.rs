//! Browser bindings: a `#[wasm_bindgen]` handle over [`EngineCore`] plus a
//! `localStorage`-backed [`KeyValueStore`].
//!
//! Every handler returns the resulting [`Action`]s as a JSON array string.
//! The JS host owns the DOM: it forwards pointer, wheel and resize events,
//! drives `tick` from `requestAnimationFrame` while `wantsFrame` is true, and
//! applies the actions (cursor, popover, spawn animation) to its elements.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::camera::{CameraState, Point, Size};
use crate::config::{EngineConfig, SoftZoom};
use crate::content::SceneContent;
use crate::controller::{FocusRequest, RecenterOptions, ZoomMode};
use crate::discovery::HotspotPhase;
use crate::engine::{Action, EngineCore};
use crate::input::{PointerEvent, PointerId, WheelDelta};
use crate::observe::SubscriptionId;
use crate::storage::{KeyValueStore, Persistence, PlayerId, StoreError};

/// `window.localStorage` as a [`KeyValueStore`].
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] outside a browser window or when
    /// storage access is denied.
    pub fn open() -> Result<Self, StoreError> {
        let Some(window) = web_sys::window() else {
            return Err(StoreError::Unavailable("no window".into()));
        };
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(StoreError::Unavailable("localStorage disabled".into())),
            Err(err) => Err(StoreError::Unavailable(describe(&err))),
        }
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(|err| StoreError::Unavailable(describe(&err)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(|err| StoreError::Unavailable(describe(&err)))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage.remove_item(key).map_err(|err| StoreError::Unavailable(describe(&err)))
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn to_json<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(error = %err, "failed to serialize engine output");
            "null".to_string()
        }
    }
}

fn actions_json(actions: &[Action]) -> String {
    if actions.is_empty() { "[]".to_string() } else { to_json(&actions) }
}

fn zoom_mode(name: &str) -> ZoomMode {
    match name {
        "exact" => ZoomMode::Exact,
        "keep" => ZoomMode::Keep,
        _ => ZoomMode::AtLeast,
    }
}

/// The island engine as seen from JavaScript.
#[wasm_bindgen]
pub struct IslandHandle {
    core: EngineCore,
}

#[wasm_bindgen]
impl IslandHandle {
    /// Build from the scene document JSON and optional engine config JSON.
    ///
    /// # Errors
    ///
    /// Fails when either document is malformed.
    #[wasm_bindgen(constructor)]
    pub fn new(scene_json: &str, config_json: Option<String>) -> Result<IslandHandle, JsError> {
        let scene = SceneContent::from_json(scene_json).map_err(|err| JsError::new(&err.to_string()))?;
        let config = match config_json.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str::<EngineConfig>(raw).map_err(|err| JsError::new(&err.to_string()))?
            }
            _ => EngineConfig::default(),
        };
        let persistence = match LocalStorageStore::open() {
            Ok(store) => Persistence::for_selected_player(Box::new(store)),
            Err(err) => {
                tracing::warn!(error = %err, "progress will not persist");
                Persistence::in_memory()
            }
        };
        Ok(Self { core: EngineCore::new(config, scene, persistence) })
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width: f64, height: f64) -> String {
        actions_json(&self.core.set_viewport(Size::new(width, height)))
    }

    // --- Input ---

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, id: i32, x: f64, y: f64, time_ms: f64) -> String {
        actions_json(&self.core.pointer_down(PointerEvent::new(id, x, y, time_ms)))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, id: i32, x: f64, y: f64, time_ms: f64) -> String {
        actions_json(&self.core.pointer_move(PointerEvent::new(id, x, y, time_ms)))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, id: i32, x: f64, y: f64, time_ms: f64) -> String {
        actions_json(&self.core.pointer_up(PointerEvent::new(id, x, y, time_ms)))
    }

    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self, id: i32) -> String {
        actions_json(&self.core.pointer_cancel(PointerId(id)))
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> String {
        actions_json(&self.core.pointer_leave())
    }

    pub fn wheel(&mut self, dx: f64, dy: f64, x: f64, y: f64) {
        self.core.wheel(WheelDelta { dx, dy }, Point::new(x, y));
    }

    // --- Discovery ---

    pub fn activate(&mut self, id: &str, now_ms: f64) -> String {
        actions_json(&self.core.activate(id, now_ms))
    }

    #[wasm_bindgen(js_name = introShown)]
    pub fn intro_shown(&mut self, now_ms: f64) -> String {
        actions_json(&self.core.intro_shown(now_ms))
    }

    pub fn discover(&mut self, id: &str) -> String {
        actions_json(&self.core.discover(id))
    }

    #[wasm_bindgen(js_name = isDiscovered)]
    pub fn is_discovered(&self, id: &str) -> bool {
        self.core.is_discovered(id)
    }

    /// `"hidden"`, `"spawning"` or `"built"`.
    pub fn phase(&self, id: &str) -> String {
        match self.core.phase(id) {
            HotspotPhase::Hidden => "hidden",
            HotspotPhase::Spawning => "spawning",
            HotspotPhase::Built => "built",
        }
        .to_string()
    }

    #[wasm_bindgen(js_name = resetDiscovery)]
    pub fn reset_discovery(&mut self) -> String {
        actions_json(&self.core.reset_discovery())
    }

    #[wasm_bindgen(js_name = switchPlayer)]
    pub fn switch_player(&mut self, player_id: &str) -> String {
        actions_json(&self.core.switch_player(PlayerId::new(player_id)))
    }

    // --- Camera ---

    #[wasm_bindgen(js_name = focusHotspot)]
    pub fn focus_hotspot(&mut self, id: &str, zoom_mult: f64, zoom_cap: f64) -> bool {
        self.core.focus_hotspot(id, SoftZoom::new(zoom_mult, zoom_cap))
    }

    /// Put world point `(x, y)` at fractional viewport position `(anchor_x, anchor_y)`.
    #[wasm_bindgen(js_name = focusWorldPoint)]
    pub fn focus_world_point(&mut self, x: f64, y: f64, anchor_x: f64, anchor_y: f64, target_scale: Option<f64>, mode: &str) {
        self.core.focus(FocusRequest {
            world: Point::new(x, y),
            viewport_anchor: Point::new(anchor_x, anchor_y),
            target_scale,
            zoom_mode: zoom_mode(mode),
        });
    }

    pub fn recenter(&mut self, keep_zoom: bool, only_if_needed: bool) {
        self.core.recenter(RecenterOptions { keep_zoom, only_if_needed });
    }

    #[wasm_bindgen(js_name = setTransform)]
    pub fn set_transform(&mut self, x: f64, y: f64, scale: f64) {
        self.core.set_transform(CameraState::new(x, y, scale));
    }

    /// Current transform as `{"x", "y", "scale"}` JSON.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        to_json(&self.core.get_state())
    }

    /// Call `callback(x, y, scale)` whenever the camera changes.
    pub fn subscribe(&mut self, callback: js_sys::Function) -> u64 {
        let id = self.core.subscribe(move |state: &CameraState| {
            let (x, y, scale) = (JsValue::from_f64(state.x), JsValue::from_f64(state.y), JsValue::from_f64(state.scale));
            if let Err(err) = callback.call3(&JsValue::NULL, &x, &y, &scale) {
                tracing::warn!(error = %describe(&err), "camera subscriber threw");
            }
        });
        u64::from(id)
    }

    pub fn unsubscribe(&mut self, id: u64) -> bool {
        self.core.unsubscribe(SubscriptionId::from(id))
    }

    #[wasm_bindgen(js_name = saveTransform)]
    pub fn save_transform(&mut self) {
        self.core.save_transform();
    }

    #[wasm_bindgen(js_name = restoreTransform)]
    pub fn restore_transform(&mut self) -> bool {
        self.core.restore_transform()
    }

    // --- Locks and overlays ---

    #[wasm_bindgen(js_name = setLock)]
    pub fn set_lock(&mut self, source: &str, locked: bool) -> String {
        actions_json(&self.core.set_lock(source, locked))
    }

    #[wasm_bindgen(js_name = isLocked)]
    pub fn is_locked(&self) -> bool {
        self.core.is_locked()
    }

    #[wasm_bindgen(js_name = closePopover)]
    pub fn close_popover(&mut self) -> String {
        actions_json(&self.core.close_popover())
    }

    #[wasm_bindgen(js_name = openDetails)]
    pub fn open_details(&mut self, project_index: usize) -> String {
        actions_json(&self.core.open_details(project_index))
    }

    #[wasm_bindgen(js_name = closeDetails)]
    pub fn close_details(&mut self) -> String {
        actions_json(&self.core.close_details())
    }

    /// Open overlay placement JSON, or `null` when nothing is open.
    pub fn placement(&self) -> String {
        to_json(&self.core.placement())
    }

    // --- Frame loop ---

    pub fn tick(&mut self, now_ms: f64) -> String {
        actions_json(&self.core.tick(now_ms))
    }

    #[wasm_bindgen(js_name = wantsFrame)]
    pub fn wants_frame(&self) -> bool {
        self.core.wants_frame()
    }

    pub fn unmount(&mut self) -> String {
        actions_json(&self.core.unmount())
    }
}
