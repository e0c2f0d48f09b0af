//! The island engine: camera, discovery, gesture locks and overlays behind one handle.
//!
//! DESIGN
//! ======
//! `EngineCore` is the only thing a host talks to. Input handlers update the
//! gesture state machine and write camera targets; [`EngineCore::tick`] is the
//! single per-frame step that fires discovery timers, applies deferred
//! recenters, advances the camera and publishes the new transform. Anything
//! the host must react to (a spawn starting, a popover opening, a cursor
//! change) comes back as a list of [`Action`]s.
//!
//! Placement is computed on demand from the current post-tick camera, so a
//! popover always tracks the camera with no lag.
//!
//! TRADE-OFFS
//! ==========
//! - One popover at a time. Opening one closes the previous.
//! - While a hotspot spawns, further activations are held in a one-slot queue
//!   (latest wins) and replayed when the host reports the intro shown.
//! - A press on a hotspot or building never pans the map.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;

use crate::camera::{CameraState, Point, Size};
use crate::config::{EngineConfig, SoftZoom};
use crate::consts::{DEFAULT_FRAME_SECS, TAP_SLOP_PX};
use crate::content::{Hotspot, SceneContent, TriggerMode};
use crate::controller::{CameraController, FocusRequest, RecenterOptions, ResizeKind, ZoomMode};
use crate::discovery::{Activation, Discovery, DiscoveryEvent, HotspotPhase};
use crate::hit::{Hit, hit_test};
use crate::input::{Cursor, InputState, PointerEvent, PointerId, TrackedPointer, WheelDelta, pinch_geometry};
use crate::locks::{LOCK_PROJECTS, LockRegistry};
use crate::observe::{Listeners, SubscriptionId};
use crate::placement::{Placement, PlacementRequest, chain_details, choose_placement};
use crate::storage::{Persistence, PlayerId, TransformSnapshot};

/// Recenter after a large resize the old view no longer covers.
const RESIZE_RECENTER: RecenterOptions = RecenterOptions { keep_zoom: true, only_if_needed: false };

/// Things the host must react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    SpawnStarted { id: String, until_ms: f64 },
    Built { id: String },
    PopoverOpened { id: String },
    PopoverClosed { id: String },
    DetailsOpened { id: String, project_index: usize },
    DetailsClosed,
    Focused { id: String },
    LockChanged { locked: bool },
    SetCursor { cursor: Cursor },
    RenderNeeded,
}

/// Open overlays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    /// Hotspot whose popover is open.
    pub popover: Option<String>,
    /// Index into that hotspot's projects.
    pub details: Option<usize>,
}

/// Where the details panel goes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DetailsPlacement {
    Docked(Placement),
    /// Narrow viewports show details as a full-width bottom sheet.
    Sheet,
}

/// Placement of every open overlay for the current frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayPlacement {
    pub hotspot_id: String,
    pub popover: Placement,
    pub details: Option<DetailsPlacement>,
}

/// Turns host timestamps into frame deltas.
#[derive(Debug, Clone, Copy, Default)]
struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    fn delta_secs(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_ms {
            Some(last) if now_ms.is_finite() && now_ms >= last => (now_ms - last) / 1000.0,
            _ => DEFAULT_FRAME_SECS,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
        }
        dt
    }

    fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Holds clicks while a hotspot spawns.
#[derive(Debug, Clone, Default)]
struct ClickGate {
    locked: bool,
    queued: Option<String>,
}

pub struct EngineCore {
    config: EngineConfig,
    scene: SceneContent,
    camera: CameraController,
    discovery: Discovery,
    locks: LockRegistry,
    input: InputState,
    pointers: Vec<TrackedPointer>,
    hovered: Option<String>,
    cursor: Cursor,
    clock: FrameClock,
    gate: ClickGate,
    overlay: Overlay,
    listeners: Listeners<CameraState>,
    published: Option<CameraState>,
    pending_recenter: bool,
    pending_restore: Option<TransformSnapshot>,
}

impl std::fmt::Debug for EngineCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCore")
            .field("camera", &self.camera.current())
            .field("input", &self.input)
            .field("overlay", &self.overlay)
            .field("locked", &self.locks.is_locked())
            .finish_non_exhaustive()
    }
}

impl EngineCore {
    /// Build an engine for `scene`. The scene's zoom ceiling overrides the configured one.
    #[must_use]
    pub fn new(config: EngineConfig, scene: SceneContent, persistence: Persistence) -> Self {
        let mut camera_config = config.camera;
        camera_config.max_zoom_mult = scene.max_zoom_mult;
        let mut camera = CameraController::new(camera_config);
        camera.set_canvas(scene.canvas);
        let discovery = Discovery::load(persistence, config.discovery);
        tracing::debug!(hotspots = scene.hotspots.len(), player = %discovery.player(), "engine created");
        Self {
            config,
            scene,
            camera,
            discovery,
            locks: LockRegistry::new(),
            input: InputState::Idle,
            pointers: Vec::new(),
            hovered: None,
            cursor: Cursor::Grab,
            clock: FrameClock::default(),
            gate: ClickGate::default(),
            overlay: Overlay::default(),
            listeners: Listeners::new(),
            published: None,
            pending_recenter: false,
            pending_restore: None,
        }
    }

    // --- Viewport ---

    /// Host container resized. A big change that left the old view short of
    /// the new viewport recenters, deferred during gestures and locks.
    pub fn set_viewport(&mut self, viewport: Size) -> Vec<Action> {
        match self.camera.set_viewport(viewport) {
            ResizeKind::Ignored => {
                tracing::debug!(width = viewport.width, height = viewport.height, "ignoring unusable viewport");
            }
            ResizeKind::Initial => {
                if let Some(snapshot) = self.pending_restore.take() {
                    self.camera.set_transform(snapshot.into());
                }
            }
            ResizeKind::Minor | ResizeKind::Major { covered: true } => {}
            ResizeKind::Major { covered: false } => {
                if self.camera.is_gesturing() || self.locks.is_locked() {
                    self.pending_recenter = true;
                } else {
                    self.camera.recenter(RESIZE_RECENTER);
                }
            }
        }
        let mut actions = Vec::new();
        if self.publish_camera() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Pointer input ---

    pub fn pointer_down(&mut self, event: PointerEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.locks.is_locked() || !self.camera.is_ready() {
            return actions;
        }
        if !event.screen.is_finite() {
            tracing::warn!(pointer = event.id.0, "ignoring non-finite pointer down");
            return actions;
        }
        self.track_pointer(event.id, event.screen);

        match self.input.clone() {
            InputState::Idle => {
                if let Some(hit) = self.hit_at(event.screen) {
                    self.input = InputState::Pressing { pointer: event.id, origin: event.screen, travel: 0.0, hit };
                } else {
                    self.camera.drag_start(event.screen, event.time_ms);
                    self.input = InputState::Panning { pointer: event.id };
                }
            }
            InputState::Pressing { pointer, .. } | InputState::Panning { pointer } if pointer != event.id => {
                if let Some(first) = self.tracked(pointer) {
                    let second = TrackedPointer { id: event.id, screen: event.screen };
                    let (midpoint, distance) = pinch_geometry(first, second);
                    if distance > 0.0 {
                        self.camera.pinch_start(midpoint);
                        self.input = InputState::Pinching { first, second, start_distance: distance };
                    }
                }
            }
            _ => {}
        }
        self.sync_cursor(&mut actions);
        actions
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        if !event.screen.is_finite() {
            return actions;
        }
        if self.tracked(event.id).is_some() {
            self.track_pointer(event.id, event.screen);
        }

        match &mut self.input {
            InputState::Idle => {}
            InputState::Pressing { pointer, origin, travel, .. } if *pointer == event.id => {
                *travel = travel.max(origin.distance(event.screen));
            }
            InputState::Panning { pointer } if *pointer == event.id => {
                self.camera.drag_move(event.screen, event.time_ms);
            }
            InputState::Pinching { first, second, start_distance } => {
                if first.id == event.id {
                    first.screen = event.screen;
                } else if second.id == event.id {
                    second.screen = event.screen;
                }
                let (midpoint, distance) = pinch_geometry(*first, *second);
                self.camera.pinch_move(midpoint, distance / *start_distance);
            }
            _ => {}
        }

        if matches!(self.input, InputState::Idle) && !self.locks.is_locked() {
            self.update_hover(event.screen, event.time_ms);
        }
        self.sync_cursor(&mut actions);
        actions
    }

    pub fn pointer_up(&mut self, event: PointerEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        self.untrack(event.id);

        match self.input.clone() {
            InputState::Pressing { pointer, origin, travel, hit } if pointer == event.id => {
                self.input = InputState::Idle;
                let release = if event.screen.is_finite() { origin.distance(event.screen) } else { 0.0 };
                if travel.max(release) <= TAP_SLOP_PX {
                    actions.extend(self.activate(&hit.hotspot_id, event.time_ms));
                }
            }
            InputState::Panning { pointer } if pointer == event.id => {
                self.camera.drag_end();
                self.input = InputState::Idle;
            }
            InputState::Pinching { first, second, .. } if first.id == event.id || second.id == event.id => {
                self.camera.pinch_end();
                self.input = InputState::Idle;
            }
            _ => {}
        }
        self.sync_cursor(&mut actions);
        actions
    }

    /// The host lost the pointer. Ends its gesture without a tap or inertia.
    pub fn pointer_cancel(&mut self, id: PointerId) -> Vec<Action> {
        self.untrack(id);
        if self.input.tracks(id) {
            self.cancel_gesture();
        }
        let mut actions = Vec::new();
        self.sync_cursor(&mut actions);
        actions
    }

    /// The pointer left the map.
    pub fn pointer_leave(&mut self) -> Vec<Action> {
        if let Some(previous) = self.hovered.take() {
            self.discovery.hover_leave(&previous);
        }
        let mut actions = Vec::new();
        self.sync_cursor(&mut actions);
        actions
    }

    /// Wheel zoom about `cursor`. Ignored over hotspots and buildings, and while locked.
    pub fn wheel(&mut self, delta: WheelDelta, cursor: Point) {
        if self.locks.is_locked() || !cursor.is_finite() || self.hit_at(cursor).is_some() {
            return;
        }
        self.camera.wheel(delta.dy, cursor);
    }

    // --- Discovery ---

    /// Activate a hotspot: spawn it if hidden, open its popover if built.
    pub fn activate(&mut self, id: &str, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.gate.locked {
            if self.discovery.phase(id) != HotspotPhase::Built {
                tracing::debug!(%id, "activation queued behind running spawn");
                self.gate.queued = Some(id.to_string());
            }
            return actions;
        }
        let Some(spawn_ms) = self.scene.hotspot(id).map(|h| h.spawn_duration_ms) else {
            tracing::warn!(%id, "activation for unknown hotspot");
            return actions;
        };

        match self.discovery.activate(id, spawn_ms, now_ms) {
            Activation::Spawning { id, until_ms, superseded } => {
                self.gate.locked = true;
                if let Some(previous) = superseded {
                    actions.push(Action::Built { id: previous });
                }
                self.close_popover_into(&mut actions);
                actions.push(Action::SpawnStarted { id: id.clone(), until_ms });
                if self.focus_hotspot(&id, self.config.focus.hotspot_zoom) {
                    actions.push(Action::Focused { id });
                }
            }
            Activation::AlreadyBuilt { id } => {
                if self.focus_hotspot(&id, self.config.focus.building_zoom) {
                    actions.push(Action::Focused { id: id.clone() });
                }
                self.open_popover_into(&id, &mut actions);
            }
            Activation::Ignored => {}
        }
        self.sync_cursor(&mut actions);
        actions
    }

    /// The host finished showing the intro UI: release the click gate and replay any queued click.
    pub fn intro_shown(&mut self, now_ms: f64) -> Vec<Action> {
        self.gate.locked = false;
        match self.gate.queued.take() {
            Some(id) => self.activate(&id, now_ms),
            None => Vec::new(),
        }
    }

    #[must_use]
    pub fn is_discovered(&self, id: &str) -> bool {
        self.discovery.is_discovered(id)
    }

    #[must_use]
    pub fn phase(&self, id: &str) -> HotspotPhase {
        self.discovery.phase(id)
    }

    /// Mark `id` discovered without a spawn, as a host restoring progress
    /// from elsewhere would. Unknown and already discovered ids are ignored.
    pub fn discover(&mut self, id: &str) -> Vec<Action> {
        if self.scene.hotspot(id).is_none() {
            tracing::warn!(%id, "discover for unknown hotspot");
            return Vec::new();
        }
        if !self.discovery.discover(id) {
            return Vec::new();
        }
        vec![Action::Built { id: id.to_string() }, Action::RenderNeeded]
    }

    /// Forget every discovery. Closes overlays and drops pending spawns.
    pub fn reset_discovery(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.close_popover_into(&mut actions);
        self.gate = ClickGate::default();
        self.discovery.reset();
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn switch_player(&mut self, player: PlayerId) -> Vec<Action> {
        let mut actions = Vec::new();
        self.close_popover_into(&mut actions);
        self.gate = ClickGate::default();
        self.discovery.switch_player(player);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Camera ---

    /// Soft-zoom focus on a hotspot's popover anchor. Returns `false` if nothing moved.
    pub fn focus_hotspot(&mut self, id: &str, zoom: SoftZoom) -> bool {
        if !self.camera.is_ready() {
            return false;
        }
        let Some(hotspot) = self.scene.hotspot(id) else {
            return false;
        };
        let world = hotspot.intro_anchor_world(self.scene.canvas);
        let scale = zoom.target(self.camera.current().scale, self.camera.min_scale());
        let focus = self.config.focus;
        self.camera.focus_world_point(FocusRequest {
            world,
            viewport_anchor: Point::new(focus.viewport_anchor_x, focus.viewport_anchor_y),
            target_scale: Some(scale),
            zoom_mode: ZoomMode::AtLeast,
        });
        true
    }

    pub fn focus(&mut self, request: FocusRequest) {
        self.camera.focus_world_point(request);
    }

    pub fn recenter(&mut self, options: RecenterOptions) {
        self.camera.recenter(options);
    }

    /// Jump to `state` (clamped) and notify subscribers.
    pub fn set_transform(&mut self, state: CameraState) {
        self.camera.set_transform(state);
        self.publish_camera();
    }

    /// The rendered camera.
    #[must_use]
    pub fn get_state(&self) -> CameraState {
        self.camera.current()
    }

    /// Called with the camera every time it changes.
    pub fn subscribe(&mut self, listener: impl FnMut(&CameraState) + 'static) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Persist the current transform for a later [`EngineCore::restore_transform`].
    pub fn save_transform(&mut self) {
        if self.camera.is_ready() {
            let snapshot = TransformSnapshot::from(self.camera.current());
            self.discovery.persistence_mut().save_transform(snapshot);
        }
    }

    /// Restore the saved transform, now or as soon as the viewport is known.
    pub fn restore_transform(&mut self) -> bool {
        let Some(snapshot) = self.discovery.persistence().load_transform() else {
            return false;
        };
        if self.camera.is_ready() {
            self.set_transform(snapshot.into());
        } else {
            self.pending_restore = Some(snapshot);
        }
        true
    }

    // --- Locks ---

    /// Set a named gesture lock. Locking cancels the gesture in progress.
    pub fn set_lock(&mut self, source: &str, locked: bool) -> Vec<Action> {
        let mut actions = Vec::new();
        self.set_lock_into(source, locked, &mut actions);
        actions
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locks.is_locked()
    }

    // --- Overlays ---

    pub fn close_popover(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.close_popover_into(&mut actions);
        actions
    }

    /// Open the details panel for one of the open popover's projects.
    pub fn open_details(&mut self, project_index: usize) -> Vec<Action> {
        let Some(id) = self.overlay.popover.clone() else {
            return Vec::new();
        };
        let count = self.scene.hotspot(&id).map_or(0, |h| h.projects.len());
        if project_index >= count {
            tracing::warn!(%id, project_index, count, "details requested for missing project");
            return Vec::new();
        }
        self.overlay.details = Some(project_index);
        vec![Action::DetailsOpened { id, project_index }]
    }

    pub fn close_details(&mut self) -> Vec<Action> {
        if self.overlay.details.take().is_some() { vec![Action::DetailsClosed] } else { Vec::new() }
    }

    /// Placement of the open overlays under the current camera.
    #[must_use]
    pub fn placement(&self) -> Option<OverlayPlacement> {
        let id = self.overlay.popover.as_deref()?;
        let hotspot = self.scene.hotspot(id)?;
        let cfg = self.config.placement;
        let canvas = self.scene.canvas;
        let viewport = self.camera.viewport();

        let request = PlacementRequest {
            anchor_world: hotspot.intro_anchor_world(canvas),
            reference_world: Some(hotspot.building_rect_world(canvas)),
            box_size: Size::new(cfg.popover_width, cfg.popover_height),
            preferred_side: hotspot.preferred_side,
            margin: cfg.margin,
            gap: cfg.gap,
        };
        let popover = self.place(&request)?;

        let details = self.overlay.details.map(|_| {
            if viewport.width < cfg.mobile_breakpoint_px {
                DetailsPlacement::Sheet
            } else {
                let size = Size::new(cfg.details_width, cfg.details_height);
                DetailsPlacement::Docked(chain_details(&popover, size, viewport, cfg.margin, cfg.gap))
            }
        });

        Some(OverlayPlacement { hotspot_id: id.to_string(), popover, details })
    }

    /// Place an arbitrary world-anchored box under the current camera.
    #[must_use]
    pub fn place(&self, request: &PlacementRequest) -> Option<Placement> {
        choose_placement(request, &self.camera.current(), self.camera.viewport())
    }

    // --- Frame loop ---

    /// One simulation step at host time `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        let dt = self.clock.delta_secs(now_ms);

        for event in self.discovery.advance(now_ms) {
            match event {
                DiscoveryEvent::HoverFired { id } => {
                    if self.discovery.phase(&id) == HotspotPhase::Hidden {
                        actions.extend(self.activate(&id, now_ms));
                    }
                }
                DiscoveryEvent::Built { id } => {
                    actions.push(Action::Built { id: id.clone() });
                    self.open_popover_into(&id, &mut actions);
                }
            }
        }

        if self.recenter_due() {
            self.pending_recenter = false;
            self.camera.recenter(RESIZE_RECENTER);
        }
        if self.camera.is_running() {
            self.camera.tick(dt);
        }
        if self.publish_camera() {
            actions.push(Action::RenderNeeded);
        }
        if !self.wants_frame() {
            self.clock.reset();
        }
        actions
    }

    /// Whether the host should schedule another [`EngineCore::tick`].
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        self.camera.is_running() || self.discovery.has_pending_timers() || self.recenter_due()
    }

    /// Tear down: cancel timers, stop the camera, close overlays, release
    /// locks and drop subscribers. The returned actions are the last the host
    /// should apply.
    pub fn unmount(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.close_popover_into(&mut actions);
        self.discovery.cancel_timers();
        self.camera.stop();
        self.input = InputState::Idle;
        self.pointers.clear();
        self.hovered = None;
        self.gate = ClickGate::default();
        self.overlay = Overlay::default();
        if self.locks.clear() {
            actions.push(Action::LockChanged { locked: false });
        }
        self.listeners.clear();
        self.clock.reset();
        self.pending_recenter = false;
        self.pending_restore = None;
        tracing::debug!("engine unmounted");
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    #[must_use]
    pub fn discovery(&self) -> &Discovery {
        &self.discovery
    }

    #[must_use]
    pub fn scene(&self) -> &SceneContent {
        &self.scene
    }

    #[must_use]
    pub fn hotspot(&self, id: &str) -> Option<&Hotspot> {
        self.scene.hotspot(id)
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.camera.viewport()
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[must_use]
    pub fn is_click_locked(&self) -> bool {
        self.gate.locked
    }

    #[must_use]
    pub fn queued_activation(&self) -> Option<&str> {
        self.gate.queued.as_deref()
    }

    // --- Internals ---

    fn hit_at(&self, screen: Point) -> Option<Hit> {
        let discovery = &self.discovery;
        hit_test(screen, &self.scene.hotspots, &self.camera.current(), self.scene.canvas, |id| discovery.phase(id))
    }

    fn tracked(&self, id: PointerId) -> Option<TrackedPointer> {
        self.pointers.iter().find(|p| p.id == id).copied()
    }

    fn track_pointer(&mut self, id: PointerId, screen: Point) {
        match self.pointers.iter_mut().find(|p| p.id == id) {
            Some(p) => p.screen = screen,
            None => self.pointers.push(TrackedPointer { id, screen }),
        }
    }

    fn untrack(&mut self, id: PointerId) {
        self.pointers.retain(|p| p.id != id);
    }

    fn cancel_gesture(&mut self) {
        match self.input {
            InputState::Panning { .. } => self.camera.drag_cancel(),
            InputState::Pinching { .. } => self.camera.pinch_end(),
            InputState::Idle | InputState::Pressing { .. } => {}
        }
        self.input = InputState::Idle;
    }

    fn update_hover(&mut self, screen: Point, now_ms: f64) {
        let hovered = self.hit_at(screen).map(|hit| hit.hotspot_id);
        if hovered == self.hovered {
            return;
        }
        if let Some(previous) = self.hovered.take() {
            self.discovery.hover_leave(&previous);
        }
        if let Some(id) = &hovered {
            let hover_triggered = self.scene.hotspot(id).is_some_and(|h| h.trigger_mode == TriggerMode::Hover);
            if hover_triggered && self.discovery.phase(id) == HotspotPhase::Hidden {
                self.discovery.hover_enter(id, now_ms);
            }
        }
        self.hovered = hovered;
    }

    fn sync_cursor(&mut self, actions: &mut Vec<Action>) {
        let cursor = match &self.input {
            InputState::Idle if self.hovered.is_some() => Cursor::Pointer,
            state => state.cursor(),
        };
        if cursor != self.cursor {
            self.cursor = cursor;
            actions.push(Action::SetCursor { cursor });
        }
    }

    fn set_lock_into(&mut self, source: &str, locked: bool, actions: &mut Vec<Action>) {
        if !self.locks.set(source, locked) {
            return;
        }
        actions.push(Action::LockChanged { locked });
        if locked {
            self.cancel_gesture();
            self.pointers.clear();
            self.sync_cursor(actions);
        }
    }

    fn open_popover_into(&mut self, id: &str, actions: &mut Vec<Action>) {
        if self.overlay.popover.as_deref() == Some(id) {
            return;
        }
        self.close_popover_into(actions);
        self.overlay.popover = Some(id.to_string());
        actions.push(Action::PopoverOpened { id: id.to_string() });
        self.set_lock_into(LOCK_PROJECTS, true, actions);
    }

    fn close_popover_into(&mut self, actions: &mut Vec<Action>) {
        let Some(id) = self.overlay.popover.take() else {
            return;
        };
        if self.overlay.details.take().is_some() {
            actions.push(Action::DetailsClosed);
        }
        actions.push(Action::PopoverClosed { id });
        self.set_lock_into(LOCK_PROJECTS, false, actions);
    }

    fn recenter_due(&self) -> bool {
        self.pending_recenter && !self.camera.is_gesturing() && !self.locks.is_locked()
    }

    /// Notify subscribers when the rendered camera changed since the last call.
    fn publish_camera(&mut self) -> bool {
        if !self.camera.is_ready() {
            return false;
        }
        let state = self.camera.current();
        if self.published == Some(state) {
            return false;
        }
        self.published = Some(state);
        self.listeners.notify(&state);
        true
    }
}
