//! Infrastructure layer for panel-client.
//!
//! - [`headless_page`]: in-memory host page implementing the keyboard's
//!   page traits.
//! - [`scheduler`]: Tokio-backed and manually driven one-shot schedulers.
//! - [`push_feed`]: Socket.IO client that mirrors push events into the store.
//! - [`config_file`]: TOML config file loading.

pub mod config_file;
pub mod headless_page;
pub mod push_feed;
pub mod scheduler;

pub use config_file::{load_config, parse_config, ConfigError};
pub use headless_page::{HeadlessField, HeadlessPage, HeadlessSurface};
pub use push_feed::{handle_frame, run_feed, FrameOutcome};
pub use scheduler::{ManualScheduler, SchedulerError, TokioScheduler};
