//! Fixed-step replay of a [`Script`] against an [`EngineCore`].
//!
//! DESIGN
//! ======
//! The simulation owns a virtual clock. Each step applies every script event
//! due at the current time, then ticks the engine once and advances the clock
//! by one frame. [`Simulation::run`] steps as fast as possible;
//! [`Simulation::run_realtime`] paces the same steps on a `tokio` interval,
//! standing in for the browser's animation frame loop.
//!
//! A run ends once the script is exhausted and the engine stops asking for
//! frames.

#[cfg(test)]
#[path = "sim_test.rs"]
mod sim_test;

use std::path::Path;
use std::time::Duration;

use island::camera::{CameraState, Point, Size};
use island::config::EngineConfig;
use island::content::SceneContent;
use island::controller::RecenterOptions;
use island::engine::{Action, EngineCore};
use island::input::{PointerEvent, PointerId, WheelDelta};
use island::storage::{JsonFileStore, KeyValueStore, MemoryStore, Persistence, PlayerId};
use serde::Serialize;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::script::{Script, ScriptInput};

/// Gap between the synthetic press and release of a `tap`.
const TAP_HOLD_MS: f64 = 40.0;

/// Pointer id used for synthetic taps.
const TAP_POINTER: i32 = 99;

/// One action with the simulated time it was produced at.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedAction {
    pub at_ms: f64,
    pub action: Action,
}

/// Outcome of a full run. Render requests are not recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub frames: u64,
    pub end_ms: f64,
    pub camera: CameraState,
    pub discovered: Vec<String>,
    pub actions: Vec<TimedAction>,
}

/// Read the scene and script named by `config` and mount an engine on them.
///
/// # Errors
///
/// Fails when either file can't be read or parsed.
pub fn load(config: &SimConfig) -> Result<Simulation, SimError> {
    let scene = SceneContent::from_json(&read(&config.scene)?)?;
    let script = Script::from_json(&read(&config.script)?)?;
    let store: Box<dyn KeyValueStore> = match &config.store {
        Some(path) => Box::new(JsonFileStore::new(path.clone())),
        None => Box::new(MemoryStore::new()),
    };
    tracing::info!(
        hotspots = scene.hotspots.len(),
        events = script.len(),
        script_end_ms = script.end_ms(),
        player = %config.player,
        fps = config.fps,
        "simulation loaded"
    );
    let core = EngineCore::new(EngineConfig::default(), scene, Persistence::new(store, config.player.clone()));
    Ok(Simulation::new(core, script, config.viewport, config.frame_ms(), config.max_frames))
}

fn read(path: &Path) -> Result<String, SimError> {
    std::fs::read_to_string(path).map_err(|source| SimError::Read { path: path.to_path_buf(), source })
}

pub struct Simulation {
    core: EngineCore,
    script: Script,
    next_event: usize,
    now_ms: f64,
    frame_ms: f64,
    frames: u64,
    max_frames: u64,
    actions: Vec<TimedAction>,
}

impl Simulation {
    /// Mount `core` on `viewport` and restore any saved transform.
    #[must_use]
    pub fn new(mut core: EngineCore, script: Script, viewport: Size, frame_ms: f64, max_frames: u64) -> Self {
        core.restore_transform();
        let mut sim = Self {
            core,
            script,
            next_event: 0,
            now_ms: 0.0,
            frame_ms,
            frames: 0,
            max_frames,
            actions: Vec::new(),
        };
        let mounted = sim.core.set_viewport(viewport);
        sim.record(mounted);
        sim
    }

    /// Whether the script has events left or the engine wants more frames.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.next_event < self.script.len() || self.core.wants_frame()
    }

    /// Apply due events, tick once, advance the clock.
    pub fn step(&mut self) {
        while let Some(event) = self.script.events().get(self.next_event) {
            if event.at_ms > self.now_ms {
                break;
            }
            let input = event.input.clone();
            self.next_event += 1;
            self.apply(input);
        }
        let actions = self.core.tick(self.now_ms);
        self.record(actions);
        self.frames += 1;
        self.now_ms += self.frame_ms;
    }

    /// Step until idle, as fast as possible.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotSettled`] when the frame budget runs out first.
    pub fn run(mut self) -> Result<Report, SimError> {
        while self.is_active() {
            self.check_budget()?;
            self.step();
        }
        Ok(self.finish())
    }

    /// Step until idle, one step per wall-clock frame.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotSettled`] when the frame budget runs out first.
    pub async fn run_realtime(mut self) -> Result<Report, SimError> {
        let mut interval = tokio::time::interval(Duration::from_secs_f64(self.frame_ms / 1000.0));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        while self.is_active() {
            self.check_budget()?;
            interval.tick().await;
            self.step();
        }
        Ok(self.finish())
    }

    fn check_budget(&self) -> Result<(), SimError> {
        if self.frames >= self.max_frames {
            return Err(SimError::NotSettled { frames: self.frames });
        }
        Ok(())
    }

    fn finish(mut self) -> Report {
        self.core.save_transform();
        tracing::info!(frames = self.frames, end_ms = self.now_ms, "simulation finished");
        Report {
            frames: self.frames,
            end_ms: self.now_ms,
            camera: self.core.get_state(),
            discovered: self.core.discovery().discovered_ids().iter().cloned().collect(),
            actions: self.actions,
        }
    }

    fn apply(&mut self, input: ScriptInput) {
        let now = self.now_ms;
        tracing::debug!(at_ms = now, ?input, "script event");
        let actions = match input {
            ScriptInput::PointerDown { id, x, y } => self.core.pointer_down(PointerEvent::new(id, x, y, now)),
            ScriptInput::PointerMove { id, x, y } => self.core.pointer_move(PointerEvent::new(id, x, y, now)),
            ScriptInput::PointerUp { id, x, y } => self.core.pointer_up(PointerEvent::new(id, x, y, now)),
            ScriptInput::PointerCancel { id } => self.core.pointer_cancel(PointerId(id)),
            ScriptInput::PointerLeave => self.core.pointer_leave(),
            ScriptInput::Wheel { dx, dy, x, y } => {
                self.core.wheel(WheelDelta { dx, dy }, Point::new(x, y));
                Vec::new()
            }
            ScriptInput::Tap { hotspot } => self.tap(&hotspot),
            ScriptInput::Activate { hotspot } => self.core.activate(&hotspot, now),
            ScriptInput::Discover { hotspot } => self.core.discover(&hotspot),
            ScriptInput::IntroShown => self.core.intro_shown(now),
            ScriptInput::Resize { width, height } => self.core.set_viewport(Size::new(width, height)),
            ScriptInput::Lock { source, locked } => self.core.set_lock(&source, locked),
            ScriptInput::ClosePopover => self.core.close_popover(),
            ScriptInput::OpenDetails { index } => self.core.open_details(index),
            ScriptInput::CloseDetails => self.core.close_details(),
            ScriptInput::Recenter { keep_zoom, only_if_needed } => {
                self.core.recenter(RecenterOptions { keep_zoom, only_if_needed });
                Vec::new()
            }
            ScriptInput::ResetDiscovery => self.core.reset_discovery(),
            ScriptInput::SwitchPlayer { player } => self.core.switch_player(PlayerId::new(player)),
            ScriptInput::SaveTransform => {
                self.core.save_transform();
                Vec::new()
            }
            ScriptInput::RestoreTransform => {
                self.core.restore_transform();
                Vec::new()
            }
        };
        self.record(actions);
    }

    fn tap(&mut self, hotspot: &str) -> Vec<Action> {
        let Some(h) = self.core.hotspot(hotspot) else {
            tracing::warn!(%hotspot, "tap on unknown hotspot");
            return Vec::new();
        };
        let screen = self.core.get_state().world_to_screen(h.foot_world(self.core.scene().canvas));
        let now = self.now_ms;
        let mut actions = self.core.pointer_down(PointerEvent::new(TAP_POINTER, screen.x, screen.y, now));
        actions.extend(self.core.pointer_up(PointerEvent::new(TAP_POINTER, screen.x, screen.y, now + TAP_HOLD_MS)));
        actions
    }

    fn record(&mut self, actions: Vec<Action>) {
        for action in actions {
            if matches!(action, Action::RenderNeeded) {
                continue;
            }
            tracing::info!(at_ms = self.now_ms, ?action, "engine action");
            self.actions.push(TimedAction { at_ms: self.now_ms, action });
        }
    }
}
