//! Named gesture locks combined with logical OR.
//!
//! Overlays that need the map to hold still (the projects popover, a dialog,
//! the boot dock) each own one source. The map is locked while any source is.

#[cfg(test)]
#[path = "locks_test.rs"]
mod locks_test;

use std::collections::BTreeSet;

use crate::observe::{Listeners, SubscriptionId};

pub const LOCK_PROJECTS: &str = "projects";
pub const LOCK_DIALOG: &str = "dialog";
pub const LOCK_BOOT_DOCK: &str = "bootDock";

#[derive(Debug, Default)]
pub struct LockRegistry {
    active: BTreeSet<String>,
    listeners: Listeners<bool>,
}

impl LockRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one source. Returns `true` when the combined state changed; listeners
    /// are only notified then.
    pub fn set(&mut self, source: &str, locked: bool) -> bool {
        let before = self.is_locked();
        if locked {
            self.active.insert(source.to_string());
        } else {
            self.active.remove(source);
        }
        let after = self.is_locked();
        if before == after {
            return false;
        }
        tracing::debug!(source, locked = after, "gesture lock changed");
        self.listeners.notify(&after);
        true
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        !self.active.is_empty()
    }

    #[must_use]
    pub fn is_source_locked(&self, source: &str) -> bool {
        self.active.contains(source)
    }

    /// Release every source. Returns `true` if that unlocked the map.
    pub fn clear(&mut self) -> bool {
        if self.active.is_empty() {
            return false;
        }
        self.active.clear();
        self.listeners.notify(&false);
        true
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&bool) + 'static) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}
