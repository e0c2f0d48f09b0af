//! Hotspot discovery: `Hidden -> Spawning -> Built`, persisted per player.
//!
//! Activation records the hotspot as discovered immediately, then holds it in
//! `Spawning` until its spawn timer expires. Timers are plain deadlines on the
//! host clock, advanced by [`Discovery::advance`] from the frame tick; nothing
//! here schedules callbacks of its own.
//!
//! Only one hotspot spawns at a time. Activating another while one is spawning
//! completes the first immediately (it is already discovered) and reports it
//! as superseded. Gating clicks during a spawn belongs to the caller.

#[cfg(test)]
#[path = "discovery_test.rs"]
mod discovery_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::DiscoveryConfig;
use crate::storage::{Persistence, PlayerId};

/// Lifecycle of one hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotspotPhase {
    /// Icon visible, no building.
    Hidden,
    /// Spawn animation playing.
    Spawning,
    /// Terminal.
    Built,
}

/// Outcome of [`Discovery::activate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    Spawning {
        id: String,
        until_ms: f64,
        /// Hotspot whose spawn was cut short by this activation.
        superseded: Option<String>,
    },
    /// Already built: open its popover, no state change.
    AlreadyBuilt { id: String },
    /// Empty id, or the hotspot is already spawning.
    Ignored,
}

/// Timer expiries reported by [`Discovery::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// The pointer rested on a hover-triggered hotspot long enough.
    HoverFired { id: String },
    /// A spawn finished.
    Built { id: String },
}

#[derive(Debug, Clone)]
struct Deadline {
    id: String,
    at_ms: f64,
}

#[derive(Debug)]
pub struct Discovery {
    persistence: Persistence,
    config: DiscoveryConfig,
    discovered: BTreeSet<String>,
    spawning: Option<Deadline>,
    hover: Option<Deadline>,
}

impl Discovery {
    /// Load the current player's discovered set. Unreadable data starts empty.
    #[must_use]
    pub fn load(persistence: Persistence, config: DiscoveryConfig) -> Self {
        let discovered = persistence.load_discovered();
        tracing::debug!(player = %persistence.player(), count = discovered.len(), "discovery loaded");
        Self { persistence, config, discovered, spawning: None, hover: None }
    }

    #[must_use]
    pub fn is_discovered(&self, id: &str) -> bool {
        self.discovered.contains(id)
    }

    /// Mark `id` discovered and persist. Returns `false` if it already was.
    pub fn discover(&mut self, id: &str) -> bool {
        if id.is_empty() || !self.discovered.insert(id.to_string()) {
            return false;
        }
        self.persistence.save_discovered(&self.discovered);
        true
    }

    /// Forget every discovery for the current player and drop pending timers.
    pub fn reset(&mut self) {
        self.discovered.clear();
        self.cancel_timers();
        self.persistence.clear_discovered();
        tracing::debug!(player = %self.persistence.player(), "discovery reset");
    }

    #[must_use]
    pub fn phase(&self, id: &str) -> HotspotPhase {
        if self.spawning_id() == Some(id) {
            HotspotPhase::Spawning
        } else if self.discovered.contains(id) {
            HotspotPhase::Built
        } else {
            HotspotPhase::Hidden
        }
    }

    /// User activation at `now_ms`. `spawn_ms` that isn't a finite non-negative
    /// duration falls back to the configured default.
    pub fn activate(&mut self, id: &str, spawn_ms: f64, now_ms: f64) -> Activation {
        if id.is_empty() {
            return Activation::Ignored;
        }
        match self.phase(id) {
            HotspotPhase::Spawning => Activation::Ignored,
            HotspotPhase::Built => Activation::AlreadyBuilt { id: id.to_string() },
            HotspotPhase::Hidden => {
                let duration =
                    if spawn_ms.is_finite() && spawn_ms >= 0.0 { spawn_ms } else { self.config.default_spawn_ms };
                let superseded = self.spawning.take().map(|d| d.id);
                if let Some(previous) = &superseded {
                    tracing::debug!(%previous, next = %id, "spawn superseded");
                }
                self.discover(id);
                if self.hover.as_ref().is_some_and(|h| h.id == id) {
                    self.hover = None;
                }
                let until_ms = now_ms + duration;
                self.spawning = Some(Deadline { id: id.to_string(), at_ms: until_ms });
                tracing::debug!(%id, until_ms, "spawn started");
                Activation::Spawning { id: id.to_string(), until_ms, superseded }
            }
        }
    }

    /// Start the hover debounce for `id`. Re-entering the same hotspot keeps the original deadline.
    pub fn hover_enter(&mut self, id: &str, now_ms: f64) {
        if self.hover.as_ref().is_some_and(|h| h.id == id) {
            return;
        }
        self.hover = Some(Deadline { id: id.to_string(), at_ms: now_ms + self.config.hover_debounce_ms });
    }

    pub fn hover_leave(&mut self, id: &str) {
        if self.hover.as_ref().is_some_and(|h| h.id == id) {
            self.hover = None;
        }
    }

    /// Fire every timer due at `now_ms`.
    pub fn advance(&mut self, now_ms: f64) -> Vec<DiscoveryEvent> {
        let mut events = Vec::new();
        if let Some(hover) = self.hover.take_if(|h| h.at_ms <= now_ms) {
            events.push(DiscoveryEvent::HoverFired { id: hover.id });
        }
        if let Some(spawn) = self.spawning.take_if(|s| s.at_ms <= now_ms) {
            tracing::debug!(id = %spawn.id, "building built");
            events.push(DiscoveryEvent::Built { id: spawn.id });
        }
        events
    }

    /// Drop spawn and hover timers. A cancelled spawn is already discovered, so it reads as built.
    pub fn cancel_timers(&mut self) {
        self.spawning = None;
        self.hover = None;
    }

    #[must_use]
    pub fn has_pending_timers(&self) -> bool {
        self.spawning.is_some() || self.hover.is_some()
    }

    /// Earliest pending deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        [&self.spawning, &self.hover].into_iter().flatten().map(|d| d.at_ms).reduce(f64::min)
    }

    #[must_use]
    pub fn spawning_id(&self) -> Option<&str> {
        self.spawning.as_ref().map(|d| d.id.as_str())
    }

    #[must_use]
    pub fn hovering_id(&self) -> Option<&str> {
        self.hover.as_ref().map(|d| d.id.as_str())
    }

    #[must_use]
    pub fn discovered_ids(&self) -> &BTreeSet<String> {
        &self.discovered
    }

    #[must_use]
    pub fn player(&self) -> &PlayerId {
        self.persistence.player()
    }

    /// Rebind to another player's progress.
    pub fn switch_player(&mut self, player: PlayerId) {
        self.cancel_timers();
        self.persistence.set_player(player);
        self.discovered = self.persistence.load_discovered();
        tracing::debug!(player = %self.persistence.player(), count = self.discovered.len(), "player switched");
    }

    #[must_use]
    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut Persistence {
        &mut self.persistence
    }
}
