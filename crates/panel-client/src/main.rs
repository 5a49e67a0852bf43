//! Operator panel client: entry point.
//!
//! Connects to the sorting machine's controller, mirrors its pushed state
//! into a local store, and prints the dashboard, diagnostics and top-bar
//! views to the terminal whenever that state changes.
//!
//! # Usage
//!
//! ```text
//! panel-client [OPTIONS]
//!
//! Options:
//!   --config <PATH>              TOML config file
//!   --server-url <URL>           Controller Socket.IO WebSocket URL
//!   --reconnect-delay-ms <MS>    Pause before reconnecting
//!   --self-check                 Drive the on-screen keyboard on a headless page and exit
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                | Description                          |
//! |-------------------------|--------------------------------------|
//! | `PANEL_CONFIG`          | Config file path                     |
//! | `PANEL_SERVER_URL`      | Controller WebSocket URL             |
//! | `PANEL_RECONNECT_DELAY` | Reconnect delay in milliseconds      |
//! | `RUST_LOG`              | Log filter (overrides `log_level`)   |
//!
//! CLI args take precedence over environment variables, which take
//! precedence over the config file.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use panel_client::application::keyboard::{HostPage, InputField, OnScreenKeyboard, Scheduler};
use panel_client::application::views::{DashboardView, DiagnosticsView, TopBarView};
use panel_client::domain::PanelConfig;
use panel_client::infrastructure::{load_config, run_feed, HeadlessPage, TokioScheduler};
use panel_core::status::store::ApplicationStore;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Operator panel client for the sorting machine.
#[derive(Debug, Parser)]
#[command(
    name = "panel-client",
    about = "Operator panel client: push-event mirror and on-screen keyboard",
    version
)]
struct Cli {
    /// TOML config file.  Every setting is optional.
    #[arg(long, env = "PANEL_CONFIG")]
    config: Option<PathBuf>,

    /// Controller Socket.IO endpoint (ws:// or wss://).
    #[arg(long, env = "PANEL_SERVER_URL")]
    server_url: Option<String>,

    /// Milliseconds to wait before reconnecting a lost push session.
    #[arg(long, env = "PANEL_RECONNECT_DELAY")]
    reconnect_delay_ms: Option<u64>,

    /// Type a word with the on-screen keyboard on a headless page, then exit.
    #[arg(long)]
    self_check: bool,
}

impl Cli {
    /// Builds the effective [`PanelConfig`]: file (or defaults), then flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the server
    /// URL is not a WebSocket URL.
    fn into_panel_config(self) -> anyhow::Result<PanelConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => PanelConfig::default(),
        };

        if let Some(url) = self.server_url {
            config.server_url = url;
        }
        if let Some(ms) = self.reconnect_delay_ms {
            config.reconnect_delay_ms = ms;
        }

        if !(config.server_url.starts_with("ws://") || config.server_url.starts_with("wss://")) {
            anyhow::bail!(
                "server URL must start with ws:// or wss://, got '{}'",
                config.server_url
            );
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let self_check = cli.self_check;
    let config = cli.into_panel_config()?;

    // `RUST_LOG` wins; otherwise the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    if self_check {
        return run_self_check(&config).await;
    }

    info!("operator panel starting, controller={}", config.server_url);

    // ── Graceful shutdown flag ────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    // ── Store, renderer and feed ──────────────────────────────────────────────
    let store = Arc::new(Mutex::new(ApplicationStore::new()));
    let (revisions_tx, revisions_rx) = watch::channel(0u64);

    let render_store = Arc::clone(&store);
    let renderer = tokio::spawn(render_views(render_store, revisions_rx));

    // The feed owns the sender; when it returns the renderer sees the channel
    // close and exits too.
    run_feed(config, store, revisions_tx, running).await;
    renderer.await.context("view renderer task panicked")?;

    info!("operator panel stopped");
    Ok(())
}

/// Prints all three views now and after every store change.
async fn render_views(store: Arc<Mutex<ApplicationStore>>, mut revisions: watch::Receiver<u64>) {
    loop {
        let snapshot = store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        println!("{}", TopBarView::from_status(snapshot.top_bar()));
        println!("{}", DashboardView::from_status(snapshot.status()));
        println!("{}", DiagnosticsView::from_pins(snapshot.pins()));
        println!();

        if revisions.changed().await.is_err() {
            break;
        }
    }
}

/// Types "panel" on a headless page and checks the field and page padding.
async fn run_self_check(config: &PanelConfig) -> anyhow::Result<()> {
    const WORD: &str = "panel";
    const LAYOUT_HEIGHT: u32 = 280;

    let page = Arc::new(HeadlessPage::new());
    let surface = page.add_container(&config.keyboard.container_id);
    surface.set_layout_height(LAYOUT_HEIGHT);
    let field = page.add_field(&config.keyboard.field_marker);
    let scheduler = TokioScheduler::current().context("self-check needs a tokio runtime")?;

    let keyboard = OnScreenKeyboard::attach(
        Arc::clone(&page) as Arc<dyn HostPage>,
        Arc::new(scheduler) as Arc<dyn Scheduler>,
        &config.keyboard,
    );

    field.tap();
    for key in WORD.chars() {
        surface.click(&key.to_string());
    }
    tokio::time::sleep(config.keyboard.compensation_delay() + Duration::from_millis(50)).await;

    let typed = field.value();
    let padding = page.bottom_padding();
    info!(typed = %typed, padding, visible = keyboard.is_visible(), "keyboard self-check");
    anyhow::ensure!(typed == WORD, "typed '{typed}', expected '{WORD}'");
    anyhow::ensure!(
        padding == LAYOUT_HEIGHT,
        "page padding {padding}px, expected {LAYOUT_HEIGHT}px"
    );

    keyboard.hide();
    anyhow::ensure!(page.bottom_padding() == 0, "padding left after hide");
    println!("keyboard self-check passed");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["panel-client"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_server_url_flag_overrides_default() {
        // Arrange
        let cli = cli(&["--server-url", "wss://panel.local/socket.io/?EIO=4&transport=websocket"]);

        // Act
        let config = cli.into_panel_config().unwrap();

        // Assert
        assert!(config.server_url.starts_with("wss://panel.local"));
    }

    #[test]
    fn test_reconnect_delay_flag_overrides_default() {
        let config = cli(&["--reconnect-delay-ms", "500"]).into_panel_config().unwrap();
        assert_eq!(config.reconnect_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_http_url_is_rejected() {
        let result = cli(&["--server-url", "http://127.0.0.1:5001"]).into_panel_config();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/panel.toml")),
            server_url: None,
            reconnect_delay_ms: None,
            self_check: false,
        };
        assert!(cli.into_panel_config().is_err());
    }

    #[test]
    fn test_self_check_flag_parses() {
        assert!(cli(&["--self-check"]).self_check);
    }

    #[tokio::test]
    async fn test_self_check_passes_with_defaults() {
        run_self_check(&PanelConfig::default()).await.unwrap();
    }
}
