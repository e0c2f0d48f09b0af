//! Timed input scripts.
//!
//! A script is a JSON array of events, each with an `atMs` timestamp and a
//! `type`. Events are applied in timestamp order (ties keep file order)
//! before the frame whose clock reaches them.
//!
//! ```json
//! [
//!   { "atMs": 0,    "type": "tap", "hotspot": "lighthouse" },
//!   { "atMs": 1600, "type": "introShown" },
//!   { "atMs": 2000, "type": "wheel", "dy": -120, "x": 640, "y": 400 }
//! ]
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use serde::Deserialize;

use crate::error::SimError;

/// One input fed to the engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScriptInput {
    PointerDown { id: i32, x: f64, y: f64 },
    PointerMove { id: i32, x: f64, y: f64 },
    PointerUp { id: i32, x: f64, y: f64 },
    PointerCancel { id: i32 },
    PointerLeave,
    Wheel {
        #[serde(default)]
        dx: f64,
        dy: f64,
        x: f64,
        y: f64,
    },
    /// Press and release on a hotspot's current screen position.
    Tap { hotspot: String },
    Activate { hotspot: String },
    /// Mark discovered without a spawn.
    Discover { hotspot: String },
    IntroShown,
    Resize { width: f64, height: f64 },
    Lock { source: String, locked: bool },
    ClosePopover,
    OpenDetails { index: usize },
    CloseDetails,
    Recenter {
        #[serde(default)]
        keep_zoom: bool,
        #[serde(default)]
        only_if_needed: bool,
    },
    ResetDiscovery,
    SwitchPlayer { player: String },
    SaveTransform,
    RestoreTransform,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptEvent {
    pub at_ms: f64,
    #[serde(flatten)]
    pub input: ScriptInput,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    events: Vec<ScriptEvent>,
}

impl Script {
    /// Parse and order a script.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Json`] for malformed JSON and [`SimError::Script`]
    /// for events with a negative or non-finite timestamp.
    pub fn from_json(raw: &str) -> Result<Self, SimError> {
        let events: Vec<ScriptEvent> = serde_json::from_str(raw)?;
        Self::new(events)
    }

    /// # Errors
    ///
    /// Returns [`SimError::Script`] for events with a negative or non-finite timestamp.
    pub fn new(mut events: Vec<ScriptEvent>) -> Result<Self, SimError> {
        if let Some(index) = events.iter().position(|e| !(e.at_ms.is_finite() && e.at_ms >= 0.0)) {
            return Err(SimError::Script { index, message: format!("bad timestamp {}", events[index].at_ms) });
        }
        events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
        Ok(Self { events })
    }

    #[must_use]
    pub fn events(&self) -> &[ScriptEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Timestamp of the last event.
    #[must_use]
    pub fn end_ms(&self) -> f64 {
        self.events.last().map_or(0.0, |e| e.at_ms)
    }
}
