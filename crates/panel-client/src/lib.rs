//! panel-client library crate.
//!
//! This crate is the operator panel of the conveyor sorter: it hosts the
//! on-screen keyboard, mirrors the controller's pushed state into a local
//! store, and renders the dashboard, diagnostics and top-bar views.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Machine controller (Socket.IO over WebSocket)
//!         ↓
//! [panel-client]
//!   ├── domain/           Pure types: PanelConfig, KeyboardConfig
//!   ├── application/      On-screen keyboard widget, status views
//!   └── infrastructure/
//!         ├── headless_page/ In-memory host page for the keyboard
//!         ├── scheduler/     Deferred one-shot tasks (tokio, manual)
//!         ├── push_feed/     Socket.IO client feeding the store
//!         └── config_file/   TOML config loading
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async, no frameworks).
//! - `application` depends on `domain` and `panel-core` only; it talks to the
//!   page through the [`application::keyboard::HostPage`] family of traits.
//! - `infrastructure` depends on all other layers plus `tokio` and `tungstenite`.

/// Domain layer: configuration types (no I/O).
pub mod domain;

/// Application layer: keyboard widget and view models.
pub mod application;

/// Infrastructure layer: host page, schedulers, push feed, config file.
pub mod infrastructure;
