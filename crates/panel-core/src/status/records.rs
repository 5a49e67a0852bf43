//! Flat status records, exactly as they appear in push-event payloads.
//!
//! Field names match the JSON keys the controller emits, so serde can map
//! them without any renaming except for the pin record, whose keys are the
//! upper-case pin names (`"IR_SENSOR"`, `"GATE_RELAY"`, ...).

use serde::{Deserialize, Serialize};

use super::pins::PinName;

// ── Dashboard status ──────────────────────────────────────────────────────────

/// Counting and gate state shown on the main dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStatus {
    pub object_count: u32,
    pub batch_target: u32,
    pub gate_status: String,
    pub ir_status: String,
    pub system_status: String,
    pub batches_completed: u32,
    pub last_printed_payload: String,
}

impl Default for AppStatus {
    /// Values shown before the first `status_update` arrives.
    fn default() -> Self {
        Self {
            object_count: 0,
            batch_target: 0,
            gate_status: "Initializing".to_string(),
            ir_status: "Initializing".to_string(),
            system_status: "Connecting...".to_string(),
            batches_completed: 0,
            last_printed_payload: "N/A".to_string(),
        }
    }
}

/// A partial [`AppStatus`]: every field the controller left out is `None`.
///
/// `status_update` payloads are allowed to carry only the fields that
/// changed, so they deserialize into this type and are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppStatusPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_target: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ir_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batches_completed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_printed_payload: Option<String>,
}

impl AppStatusPatch {
    /// `true` when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AppStatus {
    /// Overwrites every field that is present in `patch`, keeping the rest.
    pub fn merge(&mut self, patch: AppStatusPatch) {
        if let Some(v) = patch.object_count {
            self.object_count = v;
        }
        if let Some(v) = patch.batch_target {
            self.batch_target = v;
        }
        if let Some(v) = patch.gate_status {
            self.gate_status = v;
        }
        if let Some(v) = patch.ir_status {
            self.ir_status = v;
        }
        if let Some(v) = patch.system_status {
            self.system_status = v;
        }
        if let Some(v) = patch.batches_completed {
            self.batches_completed = v;
        }
        if let Some(v) = patch.last_printed_payload {
            self.last_printed_payload = v;
        }
    }
}

// ── Top bar ───────────────────────────────────────────────────────────────────

/// Network and printer-radio state shown in the top status bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopBarStatus {
    pub internet_active: bool,
    pub ip_address: String,
    pub eth_active: bool,
    pub wifi_active: bool,
    /// Signal quality as reported by the controller (percent).
    pub wifi_strength: i32,
    pub wifi_ssid: String,
    /// A BLE printer address has been saved on the controller.
    pub ble_saved: bool,
    pub ble_connected: bool,
}

impl Default for TopBarStatus {
    fn default() -> Self {
        Self {
            internet_active: false,
            ip_address: "N/A".to_string(),
            eth_active: false,
            wifi_active: false,
            wifi_strength: 0,
            wifi_ssid: "N/A".to_string(),
            ble_saved: false,
            ble_connected: false,
        }
    }
}

// ── Pins ──────────────────────────────────────────────────────────────────────

/// Live electrical level (0 or 1) of every catalogued pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PinStatus {
    pub ir_sensor: u8,
    pub gate_relay: u8,
    pub green_led: u8,
    pub red_led: u8,
    pub buzzer: u8,
}

impl PinStatus {
    /// Level of one pin.
    pub fn level(&self, pin: PinName) -> u8 {
        match pin {
            PinName::IrSensor => self.ir_sensor,
            PinName::GateRelay => self.gate_relay,
            PinName::GreenLed => self.green_led,
            PinName::RedLed => self.red_led,
            PinName::Buzzer => self.buzzer,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_status_default_matches_pre_connection_values() {
        let status = AppStatus::default();
        assert_eq!(status.object_count, 0);
        assert_eq!(status.gate_status, "Initializing");
        assert_eq!(status.system_status, "Connecting...");
        assert_eq!(status.last_printed_payload, "N/A");
    }

    #[test]
    fn test_merge_overwrites_only_present_fields() {
        // Arrange
        let mut status = AppStatus::default();
        let patch = AppStatusPatch {
            object_count: Some(7),
            gate_status: Some("Open".to_string()),
            ..AppStatusPatch::default()
        };

        // Act
        status.merge(patch);

        // Assert
        assert_eq!(status.object_count, 7);
        assert_eq!(status.gate_status, "Open");
        assert_eq!(status.ir_status, "Initializing");
        assert_eq!(status.system_status, "Connecting...");
    }

    #[test]
    fn test_patch_deserializes_from_partial_json() {
        let patch: AppStatusPatch =
            serde_json::from_str(r#"{"object_count":3,"ir_status":"Blocked"}"#).unwrap();
        assert_eq!(patch.object_count, Some(3));
        assert_eq!(patch.ir_status.as_deref(), Some("Blocked"));
        assert_eq!(patch.batch_target, None);
    }

    #[test]
    fn test_patch_ignores_unknown_controller_fields() {
        // The controller's state dict carries extra keys such as gate_wait_time.
        let patch: AppStatusPatch =
            serde_json::from_str(r#"{"gate_wait_time":10,"batch_target":20}"#).unwrap();
        assert_eq!(patch.batch_target, Some(20));
    }

    #[test]
    fn test_empty_patch_is_empty() {
        assert!(AppStatusPatch::default().is_empty());
        let patch = AppStatusPatch {
            batches_completed: Some(1),
            ..AppStatusPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_pin_status_uses_upper_case_pin_names_on_the_wire() {
        let json = r#"{"IR_SENSOR":1,"GATE_RELAY":0,"GREEN_LED":1,"RED_LED":0,"BUZZER":0}"#;
        let pins: PinStatus = serde_json::from_str(json).unwrap();
        assert_eq!(pins.level(PinName::IrSensor), 1);
        assert_eq!(pins.level(PinName::GreenLed), 1);
        assert_eq!(pins.level(PinName::Buzzer), 0);
    }

    #[test]
    fn test_top_bar_default_is_offline() {
        let bar = TopBarStatus::default();
        assert!(!bar.internet_active);
        assert!(!bar.wifi_active);
        assert_eq!(bar.ip_address, "N/A");
    }
}
