//! The client-side store that mirrors controller state.

use tracing::debug;

use super::events::PushEvent;
use super::records::{AppStatus, AppStatusPatch, PinStatus, TopBarStatus};

/// Latest known machine state, one record per push event.
///
/// The store starts with the pre-connection defaults of each record and is
/// updated only through [`ApplicationStore::apply`] or the three setters.
/// `revision` increases on every update so renderers can skip redraws when
/// nothing arrived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationStore {
    status: AppStatus,
    top_bar: TopBarStatus,
    pins: PinStatus,
    revision: u64,
}

impl ApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &AppStatus {
        &self.status
    }

    pub fn top_bar(&self) -> &TopBarStatus {
        &self.top_bar
    }

    pub fn pins(&self) -> &PinStatus {
        &self.pins
    }

    /// Number of updates applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies one decoded push event.
    pub fn apply(&mut self, event: PushEvent) {
        debug!(event = event.name(), revision = self.revision + 1, "applying push event");
        match event {
            PushEvent::StatusUpdate(patch) => self.set_status(patch),
            PushEvent::PinUpdate(pins) => self.set_pins(pins),
            PushEvent::TopBarUpdate(top_bar) => self.set_top_bar(top_bar),
        }
    }

    /// Shallow-merges a partial dashboard status.
    pub fn set_status(&mut self, patch: AppStatusPatch) {
        self.status.merge(patch);
        self.revision += 1;
    }

    /// Replaces the top-bar record.
    pub fn set_top_bar(&mut self, top_bar: TopBarStatus) {
        self.top_bar = top_bar;
        self.revision += 1;
    }

    /// Replaces the pin levels.
    pub fn set_pins(&mut self, pins: PinStatus) {
        self.pins = pins;
        self.revision += 1;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
