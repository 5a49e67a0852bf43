//! Named push events and their payload decoding.
//!
//! A Socket.IO event arrives as a name plus one JSON value.  [`PushEvent::decode`]
//! turns that pair into a typed event, or explains why it could not.

use serde_json::Value;
use thiserror::Error;

use super::records::{AppStatusPatch, PinStatus, TopBarStatus};

/// Event carrying a (possibly partial) [`crate::AppStatus`].
pub const STATUS_UPDATE: &str = "status_update";
/// Event carrying a complete [`PinStatus`].
pub const PIN_UPDATE: &str = "pin_update";
/// Event carrying a complete [`TopBarStatus`].
pub const TOP_BAR_UPDATE: &str = "top_bar_update";

/// Errors that can occur while decoding a push event.
#[derive(Debug, Error)]
pub enum EventError {
    /// The event name is not one the panel subscribes to.
    #[error("unknown push event: {0}")]
    UnknownEvent(String),

    /// The payload does not match the record schema for this event.
    #[error("malformed {event} payload: {source}")]
    Payload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A decoded push event, ready to be applied to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    StatusUpdate(AppStatusPatch),
    PinUpdate(PinStatus),
    TopBarUpdate(TopBarStatus),
}

impl PushEvent {
    /// Decodes the payload of the event called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnknownEvent`] for unsubscribed names and
    /// [`EventError::Payload`] when the JSON does not fit the record.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use panel_core::PushEvent;
    ///
    /// let event = PushEvent::decode("status_update", serde_json::json!({"object_count": 4})).unwrap();
    /// assert_eq!(event.name(), "status_update");
    /// ```
    pub fn decode(name: &str, data: Value) -> Result<Self, EventError> {
        match name {
            STATUS_UPDATE => serde_json::from_value(data)
                .map(PushEvent::StatusUpdate)
                .map_err(|source| EventError::Payload { event: STATUS_UPDATE, source }),
            PIN_UPDATE => serde_json::from_value(data)
                .map(PushEvent::PinUpdate)
                .map_err(|source| EventError::Payload { event: PIN_UPDATE, source }),
            TOP_BAR_UPDATE => serde_json::from_value(data)
                .map(PushEvent::TopBarUpdate)
                .map_err(|source| EventError::Payload { event: TOP_BAR_UPDATE, source }),
            other => Err(EventError::UnknownEvent(other.to_string())),
        }
    }

    /// The wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            PushEvent::StatusUpdate(_) => STATUS_UPDATE,
            PushEvent::PinUpdate(_) => PIN_UPDATE,
            PushEvent::TopBarUpdate(_) => TOP_BAR_UPDATE,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
