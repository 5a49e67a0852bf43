//! Domain layer for panel-client.
//!
//! Pure configuration types with no dependencies on I/O or async runtimes.
//! The infrastructure layer fills them from a TOML file and CLI arguments.

pub mod config;

pub use config::{KeyboardConfig, PanelConfig};
