//! Panel configuration types.
//!
//! [`PanelConfig`] is the single source of truth for all runtime settings.
//! Every field has a default, so an empty (or absent) config file yields a
//! panel that talks to a controller on the same machine.
//!
//! ```toml
//! server_url = "ws://192.168.1.20:5001/socket.io/?EIO=4&transport=websocket"
//! reconnect_delay_ms = 2000
//! log_level = "info"
//!
//! [keyboard]
//! container_id = "virtual-keyboard-container"
//! field_marker = "virtual-keyboard-input"
//! compensation_delay_ms = 100
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// All runtime configuration for the operator panel.
///
/// # Example
///
/// ```rust
/// use panel_client::domain::PanelConfig;
///
/// let cfg = PanelConfig::default();
/// assert!(cfg.server_url.starts_with("ws://127.0.0.1:5001/"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// WebSocket URL of the controller's Socket.IO endpoint.
    pub server_url: String,

    /// Pause between a lost push connection and the next attempt.
    pub reconnect_delay_ms: u64,

    /// `tracing` level used when `RUST_LOG` is not set.
    pub log_level: String,

    pub keyboard: KeyboardConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:5001/socket.io/?EIO=4&transport=websocket".to_string(),
            reconnect_delay_ms: 2000,
            log_level: "info".to_string(),
            keyboard: KeyboardConfig::default(),
        }
    }
}

impl PanelConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

/// Settings for the on-screen keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Identifier of the page element the keyboard mounts into.
    pub container_id: String,

    /// Marker shared by every text field that should open the keyboard.
    pub field_marker: String,

    /// Delay before the shown keyboard is measured and the page is padded.
    ///
    /// Measuring earlier reads a height of zero because layout has not run yet.
    pub compensation_delay_ms: u64,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            container_id: "virtual-keyboard-container".to_string(),
            field_marker: "virtual-keyboard-input".to_string(),
            compensation_delay_ms: 100,
        }
    }
}

impl KeyboardConfig {
    pub fn compensation_delay(&self) -> Duration {
        Duration::from_millis(self.compensation_delay_ms)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_url_targets_local_socket_io_websocket() {
        let cfg = PanelConfig::default();
        assert!(cfg.server_url.contains(":5001/socket.io/"));
        assert!(cfg.server_url.ends_with("transport=websocket"));
    }

    #[test]
    fn test_default_reconnect_delay_is_2s() {
        assert_eq!(PanelConfig::default().reconnect_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_default_keyboard_ids_match_page_markup() {
        let kb = KeyboardConfig::default();
        assert_eq!(kb.container_id, "virtual-keyboard-container");
        assert_eq!(kb.field_marker, "virtual-keyboard-input");
    }

    #[test]
    fn test_default_compensation_delay_is_100ms() {
        assert_eq!(
            KeyboardConfig::default().compensation_delay(),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_config_can_be_cloned() {
        let cfg = PanelConfig::default();
        assert_eq!(cfg.clone(), cfg);
    }
}
