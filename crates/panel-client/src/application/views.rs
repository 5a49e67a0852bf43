//! Read-only views over the [`ApplicationStore`] snapshot.
//!
//! Each view is built from the store's current records and implements
//! `Display`, so the binary can print it to a terminal whenever the store's
//! revision changes.
//!
//! [`ApplicationStore`]: panel_core::status::store::ApplicationStore

use std::fmt;

use panel_core::status::pins::{PinName, PIN_CATALOGUE};
use panel_core::status::records::{AppStatus, PinStatus, TopBarStatus};

// ── Dashboard ─────────────────────────────────────────────────────────────────

/// Production counters and machine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub count: u32,
    pub target: u32,
    /// Batch progress, 0 to 100.
    pub progress_percent: u8,
    pub gate: String,
    pub ir_sensor: String,
    pub system: String,
    pub batches_completed: u32,
    pub last_printed_payload: String,
}

impl DashboardView {
    pub fn from_status(status: &AppStatus) -> Self {
        Self {
            count: status.object_count,
            target: status.batch_target,
            progress_percent: progress_percent(status.object_count, status.batch_target),
            gate: status.gate_status.clone(),
            ir_sensor: status.ir_status.clone(),
            system: status.system_status.clone(),
            batches_completed: status.batches_completed,
            last_printed_payload: status.last_printed_payload.clone(),
        }
    }
}

/// Share of `target` reached by `count`, capped at 100. A zero target is 0%.
fn progress_percent(count: u32, target: u32) -> u8 {
    if target == 0 {
        return 0;
    }
    let percent = u64::from(count) * 100 / u64::from(target);
    // Capped at 100, so the narrowing cannot truncate.
    percent.min(100) as u8
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Batch   {} / {} ({}%)",
            self.count, self.target, self.progress_percent
        )?;
        writeln!(f, "Gate    {}", self.gate)?;
        writeln!(f, "IR      {}", self.ir_sensor)?;
        writeln!(f, "System  {}", self.system)?;
        writeln!(f, "Batches {}", self.batches_completed)?;
        write!(f, "Printed {}", self.last_printed_payload)
    }
}

// ── Diagnostics ───────────────────────────────────────────────────────────────

/// One pin's wiring and live level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRow {
    pub name: PinName,
    pub gpio: u8,
    pub kind: &'static str,
    pub level: u8,
}

impl PinRow {
    /// `HIGH` for any non-zero level.
    pub fn label(&self) -> &'static str {
        if self.level == 0 {
            "LOW"
        } else {
            "HIGH"
        }
    }
}

/// Every catalogue pin with its current level, in catalogue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsView {
    pub rows: Vec<PinRow>,
}

impl DiagnosticsView {
    pub fn from_pins(pins: &PinStatus) -> Self {
        let rows = PIN_CATALOGUE
            .iter()
            .map(|spec| PinRow {
                name: spec.name,
                gpio: spec.gpio,
                kind: spec.kind,
                level: pins.level(spec.name),
            })
            .collect();
        Self { rows }
    }
}

impl fmt::Display for DiagnosticsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:<11} GPIO {:>2}  {:<15} {} {}",
                row.name.as_str(),
                row.gpio,
                row.kind,
                row.level,
                row.label()
            )?;
        }
        Ok(())
    }
}

// ── Top bar ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkLink {
    Ethernet,
    Wifi { ssid: String, strength: i32 },
    Offline,
}

impl fmt::Display for NetworkLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkLink::Ethernet => f.write_str("Ethernet"),
            NetworkLink::Wifi { ssid, strength } => write!(f, "Wi-Fi {ssid} ({strength}%)"),
            NetworkLink::Offline => f.write_str("Offline"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterLink {
    Connected,
    Saved,
    NotConfigured,
}

impl fmt::Display for PrinterLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrinterLink::Connected => "Connected",
            PrinterLink::Saved => "Saved",
            PrinterLink::NotConfigured => "Not configured",
        })
    }
}

/// Connectivity summary shown across the top of every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopBarView {
    pub network: NetworkLink,
    pub ip_address: String,
    pub internet: bool,
    pub printer: PrinterLink,
}

impl TopBarView {
    /// Ethernet wins over Wi-Fi when both are up.
    pub fn from_status(top_bar: &TopBarStatus) -> Self {
        let network = if top_bar.eth_active {
            NetworkLink::Ethernet
        } else if top_bar.wifi_active {
            NetworkLink::Wifi {
                ssid: top_bar.wifi_ssid.clone(),
                strength: top_bar.wifi_strength,
            }
        } else {
            NetworkLink::Offline
        };
        let printer = if top_bar.ble_connected {
            PrinterLink::Connected
        } else if top_bar.ble_saved {
            PrinterLink::Saved
        } else {
            PrinterLink::NotConfigured
        };
        Self {
            network,
            ip_address: top_bar.ip_address.clone(),
            internet: top_bar.internet_active,
            printer,
        }
    }
}

impl fmt::Display for TopBarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | IP {} | Internet {} | Printer {}",
            self.network,
            self.ip_address,
            if self.internet { "up" } else { "down" },
            self.printer
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_zero_without_target() {
        let view = DashboardView::from_status(&AppStatus::default());
        assert_eq!(view.progress_percent, 0);
    }

    #[test]
    fn test_progress_is_capped_at_100() {
        let status = AppStatus {
            object_count: 15,
            batch_target: 10,
            ..AppStatus::default()
        };
        assert_eq!(DashboardView::from_status(&status).progress_percent, 100);
    }

    #[test]
    fn test_progress_rounds_down() {
        let status = AppStatus {
            object_count: 1,
            batch_target: 3,
            ..AppStatus::default()
        };
        assert_eq!(DashboardView::from_status(&status).progress_percent, 33);
    }

    #[test]
    fn test_dashboard_display_shows_count_and_target() {
        let status = AppStatus {
            object_count: 4,
            batch_target: 8,
            ..AppStatus::default()
        };
        let text = DashboardView::from_status(&status).to_string();
        assert!(text.contains("4 / 8 (50%)"));
        assert!(text.contains("Connecting..."));
    }

    #[test]
    fn test_diagnostics_rows_follow_catalogue() {
        // Arrange
        let pins = PinStatus {
            ir_sensor: 1,
            buzzer: 1,
            ..PinStatus::default()
        };

        // Act
        let view = DiagnosticsView::from_pins(&pins);

        // Assert
        let gpios: Vec<u8> = view.rows.iter().map(|r| r.gpio).collect();
        assert_eq!(gpios, vec![17, 22, 27, 23, 24]);
        assert_eq!(view.rows[0].label(), "HIGH");
        assert_eq!(view.rows[1].label(), "LOW");
        assert_eq!(view.rows[4].label(), "HIGH");
    }

    #[test]
    fn test_diagnostics_display_has_one_line_per_pin() {
        let text = DiagnosticsView::from_pins(&PinStatus::default()).to_string();
        assert_eq!(text.lines().count(), 5);
        assert!(text.starts_with("IR_SENSOR"));
    }

    #[test]
    fn test_top_bar_prefers_ethernet() {
        let top_bar = TopBarStatus {
            eth_active: true,
            wifi_active: true,
            ..TopBarStatus::default()
        };
        assert_eq!(TopBarView::from_status(&top_bar).network, NetworkLink::Ethernet);
    }

    #[test]
    fn test_top_bar_wifi_summary() {
        let top_bar = TopBarStatus {
            wifi_active: true,
            wifi_ssid: "line-3".to_string(),
            wifi_strength: 72,
            ..TopBarStatus::default()
        };
        let view = TopBarView::from_status(&top_bar);
        assert_eq!(view.network.to_string(), "Wi-Fi line-3 (72%)");
    }

    #[test]
    fn test_top_bar_defaults_are_offline_and_unconfigured() {
        let view = TopBarView::from_status(&TopBarStatus::default());
        assert_eq!(
            view.to_string(),
            "Offline | IP N/A | Internet down | Printer Not configured"
        );
    }

    #[test]
    fn test_printer_connected_wins_over_saved() {
        let top_bar = TopBarStatus {
            ble_saved: true,
            ble_connected: true,
            ..TopBarStatus::default()
        };
        assert_eq!(TopBarView::from_status(&top_bar).printer, PrinterLink::Connected);
    }
}
