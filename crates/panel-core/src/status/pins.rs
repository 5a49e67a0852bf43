//! Static catalogue of the machine's GPIO pins, shown on the diagnostics view.

/// The five pins the controller reports in `pin_update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinName {
    IrSensor,
    GateRelay,
    GreenLed,
    RedLed,
    Buzzer,
}

impl PinName {
    /// The upper-case name used as the JSON key and on screen.
    pub fn as_str(self) -> &'static str {
        match self {
            PinName::IrSensor => "IR_SENSOR",
            PinName::GateRelay => "GATE_RELAY",
            PinName::GreenLed => "GREEN_LED",
            PinName::RedLed => "RED_LED",
            PinName::Buzzer => "BUZZER",
        }
    }
}

/// Wiring metadata for one pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSpec {
    pub name: PinName,
    /// BCM GPIO number.
    pub gpio: u8,
    pub kind: &'static str,
}

/// Every pin, in diagnostics display order.
pub static PIN_CATALOGUE: [PinSpec; 5] = [
    PinSpec { name: PinName::IrSensor, gpio: 17, kind: "Input (NPN)" },
    PinSpec { name: PinName::GateRelay, gpio: 22, kind: "Output (Relay)" },
    PinSpec { name: PinName::GreenLed, gpio: 27, kind: "Output (Relay)" },
    PinSpec { name: PinName::RedLed, gpio: 23, kind: "Output (Relay)" },
    PinSpec { name: PinName::Buzzer, gpio: 24, kind: "Output (Relay)" },
];
