//! # panel-core
//!
//! Shared library for the conveyor operator panel containing the on-screen
//! keyboard layout, the machine status records pushed by the controller, and
//! the Socket.IO text-packet codec used to receive them.
//!
//! It has zero dependencies on page/DOM APIs, async runtimes, or network
//! sockets, so every type here can be unit-tested on any machine.
//!
//! # Architecture overview (for beginners)
//!
//! The panel is a touchscreen front-end for a sorting/counting machine (gate,
//! IR sensor, relay, LEDs, buzzer).  The machine controller pushes its state
//! over a Socket.IO connection; the panel mirrors that state into a local
//! store and renders it, and it offers an on-screen keyboard so operators can
//! edit settings without a physical keyboard.
//!
//! This crate (`panel-core`) is the shared foundation.  It defines:
//!
//! - **`keyboard`** – The fixed key table: which keys exist, in what order,
//!   what each one does, and how each one is drawn.
//!
//! - **`status`** – The three records the controller pushes (`AppStatus`,
//!   `TopBarStatus`, `PinStatus`), the named push events that carry them, and
//!   the `ApplicationStore` that merges them.
//!
//! - **`transport`** – How push events travel as text: Engine.IO packets
//!   wrapping Socket.IO packets (`42["status_update",{...}]`).

pub mod keyboard;
pub mod status;
pub mod transport;

// Re-export the most-used types at the crate root so callers can write
// `panel_core::KeyDescriptor` instead of `panel_core::keyboard::layout::KeyDescriptor`.
pub use keyboard::layout::{KeyDescriptor, KeyFace, KeyRole, KeyTone, KeyWidth, KEY_LAYOUT};
pub use status::events::{EventError, PushEvent};
pub use status::records::{AppStatus, AppStatusPatch, PinStatus, TopBarStatus};
pub use status::store::ApplicationStore;
pub use transport::packet::{decode_packet, encode_packet, EnginePacket, PacketError, SocketPacket};
