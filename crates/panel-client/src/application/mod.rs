//! Application layer for panel-client.
//!
//! - [`keyboard`]: the on-screen keyboard widget and the host-page traits it
//!   talks through.
//! - [`views`]: terminal renderings of the status records kept in the store.

pub mod keyboard;
pub mod views;

pub use keyboard::{HostPage, InputField, KeySurface, OnScreenKeyboard, RenderedKey, Scheduler};
pub use views::{DashboardView, DiagnosticsView, NetworkLink, PinRow, PrinterLink, TopBarView};
