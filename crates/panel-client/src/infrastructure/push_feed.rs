//! Push feed: a Socket.IO client over a raw WebSocket.
//!
//! The controller pushes `status_update`, `pin_update` and `top_bar_update`
//! events.  This module keeps one WebSocket open to it and mirrors every
//! event into the shared [`ApplicationStore`].
//!
//! # Session
//!
//! ```text
//! controller                       panel
//!   0{"sid":..}  ───────────────►
//!                ◄───────────────  40          (join the default namespace)
//!   40{"sid":..} ───────────────►              ("connected successfully")
//!   2            ───────────────►
//!                ◄───────────────  3           (every ping gets a pong)
//!   42["status_update",{..}] ────►             (decode, apply, bump revision)
//! ```
//!
//! Frame handling is the pure function [`handle_frame`]; the async
//! [`run_feed`] loop only moves frames between it and the socket, and
//! reconnects after `reconnect_delay` until the `running` flag is cleared.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::watch;
use tokio::time::{timeout, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{debug, info, warn};

use panel_core::status::events::PushEvent;
use panel_core::status::store::ApplicationStore;
use panel_core::transport::packet::{decode_packet, encode_packet, EnginePacket, SocketPacket};

use crate::domain::config::PanelConfig;

/// How long a read may block before the loop rechecks the shutdown flag.
const READ_POLL: Duration = Duration::from_millis(200);

/// Upper bound on one WebSocket connect attempt, handshake included.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ── Frame handling ────────────────────────────────────────────────────────────

/// What the session loop should do after one inbound frame.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Text frame to send back, if any.
    pub reply: Option<String>,
    /// New store revision when the frame updated the store.
    pub revision: Option<u64>,
    /// The controller ended the session.
    pub closed: bool,
}

/// Handles one text frame from the controller.
///
/// Malformed frames and undecodable events are logged and dropped; they never
/// end the session.
pub fn handle_frame(frame: &str, store: &Mutex<ApplicationStore>) -> FrameOutcome {
    let packet = match decode_packet(frame) {
        Ok(packet) => packet,
        Err(e) => {
            warn!("dropping undecodable frame {frame:?}: {e}");
            return FrameOutcome::default();
        }
    };

    match packet {
        EnginePacket::Open(handshake) => {
            debug!(sid = %handshake.sid, ping_interval = handshake.ping_interval, "engine.io session opened");
            FrameOutcome {
                reply: Some(encode_packet(&EnginePacket::Message(SocketPacket::Connect(None)))),
                ..FrameOutcome::default()
            }
        }
        EnginePacket::Ping => FrameOutcome {
            reply: Some(encode_packet(&EnginePacket::Pong)),
            ..FrameOutcome::default()
        },
        EnginePacket::Message(SocketPacket::Connect(_)) => {
            info!("push feed connected successfully");
            FrameOutcome::default()
        }
        EnginePacket::Message(SocketPacket::Event { name, data }) => {
            match PushEvent::decode(&name, data) {
                Ok(event) => {
                    let mut store = store.lock().unwrap_or_else(PoisonError::into_inner);
                    store.apply(event);
                    FrameOutcome {
                        revision: Some(store.revision()),
                        ..FrameOutcome::default()
                    }
                }
                Err(e) => {
                    warn!("dropping push event: {e}");
                    FrameOutcome::default()
                }
            }
        }
        EnginePacket::Message(SocketPacket::ConnectError(payload)) => {
            warn!(?payload, "controller refused the namespace connection");
            closed()
        }
        EnginePacket::Message(SocketPacket::Disconnect) | EnginePacket::Close => {
            info!("controller closed the push session");
            closed()
        }
        EnginePacket::Pong | EnginePacket::Upgrade | EnginePacket::Noop => FrameOutcome::default(),
    }
}

fn closed() -> FrameOutcome {
    FrameOutcome {
        closed: true,
        ..FrameOutcome::default()
    }
}

// ── Feed loop ─────────────────────────────────────────────────────────────────

/// Runs the push feed until `running` is set to `false`.
///
/// Every store change is announced on `revisions`.  Connection failures are
/// logged and retried after `config.reconnect_delay()`.
pub async fn run_feed(
    config: PanelConfig,
    store: Arc<Mutex<ApplicationStore>>,
    revisions: watch::Sender<u64>,
    running: Arc<AtomicBool>,
) {
    while running.load(Ordering::Relaxed) {
        match run_session(&config, &store, &revisions, &running).await {
            Ok(()) => info!("push session ended"),
            Err(e) => warn!("push session failed: {e:#}"),
        }

        if running.load(Ordering::Relaxed) {
            info!("reconnecting in {:?}", config.reconnect_delay());
            sleep_while_running(config.reconnect_delay(), &running).await;
        }
    }
    info!("push feed stopped");
}

/// Sleeps for `delay`, returning early once `running` is cleared.
async fn sleep_while_running(delay: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + delay;
    while running.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        tokio::time::sleep((deadline - now).min(READ_POLL)).await;
    }
}

/// One WebSocket connection, from handshake to close.
async fn run_session(
    config: &PanelConfig,
    store: &Mutex<ApplicationStore>,
    revisions: &watch::Sender<u64>,
    running: &AtomicBool,
) -> anyhow::Result<()> {
    let (ws_stream, _response) = timeout(CONNECT_TIMEOUT, connect_async(config.server_url.as_str()))
        .await
        .with_context(|| format!("timed out connecting to {}", config.server_url))?
        .with_context(|| format!("failed to connect to {}", config.server_url))?;
    info!("WebSocket connected to {}", config.server_url);

    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; leaving push session");
            let goodbye = encode_packet(&EnginePacket::Message(SocketPacket::Disconnect));
            // Best effort: the controller may already be gone.
            let _ = ws_tx.send(WsMessage::Text(goodbye)).await;
            let _ = ws_tx.close().await;
            return Ok(());
        }

        let message = match timeout(READ_POLL, ws_rx.next()).await {
            Err(_) => continue,
            Ok(None) => return Ok(()),
            Ok(Some(result)) => result.context("WebSocket read failed")?,
        };

        match message {
            WsMessage::Text(frame) => {
                let outcome = handle_frame(&frame, store);
                if let Some(reply) = outcome.reply {
                    ws_tx
                        .send(WsMessage::Text(reply))
                        .await
                        .context("WebSocket send failed")?;
                }
                if let Some(revision) = outcome.revision {
                    revisions.send_replace(revision);
                }
                if outcome.closed {
                    return Ok(());
                }
            }
            WsMessage::Close(frame) => {
                debug!(?frame, "WebSocket close frame received");
                return Ok(());
            }
            // WebSocket-level ping/pong is answered by tungstenite; binary
            // frames carry attachments the panel never subscribes to.
            _ => {}
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Mutex<ApplicationStore> {
        Mutex::new(ApplicationStore::new())
    }

    #[test]
    fn test_open_is_answered_with_namespace_connect() {
        let frame = r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#;
        let outcome = handle_frame(frame, &store());
        assert_eq!(outcome.reply.as_deref(), Some("40"));
        assert!(!outcome.closed);
    }

    #[test]
    fn test_ping_is_answered_with_pong() {
        let outcome = handle_frame("2", &store());
        assert_eq!(outcome.reply.as_deref(), Some("3"));
    }

    #[test]
    fn test_namespace_ack_needs_no_reply() {
        let outcome = handle_frame(r#"40{"sid":"xyz"}"#, &store());
        assert_eq!(outcome, FrameOutcome::default());
    }

    #[test]
    fn test_status_event_updates_store_and_reports_revision() {
        // Arrange
        let store = store();

        // Act
        let outcome = handle_frame(r#"42["status_update",{"object_count":7}]"#, &store);

        // Assert
        assert_eq!(outcome.revision, Some(1));
        let store = store.lock().unwrap();
        assert_eq!(store.status().object_count, 7);
        assert_eq!(store.status().system_status, "Connecting...");
    }

    #[test]
    fn test_pin_event_replaces_pin_levels() {
        // Arrange
        let store = store();
        let frame = format!(
            "42{}",
            serde_json::json!(["pin_update", {
                "IR_SENSOR": 1, "GATE_RELAY": 0, "GREEN_LED": 1, "RED_LED": 0, "BUZZER": 0
            }])
        );

        // Act
        let outcome = handle_frame(&frame, &store);

        // Assert
        assert_eq!(outcome.revision, Some(1));
        let store = store.lock().unwrap();
        assert_eq!(store.pins().ir_sensor, 1);
        assert_eq!(store.pins().green_led, 1);
    }

    #[test]
    fn test_unknown_event_is_dropped() {
        let store = store();
        let outcome = handle_frame(r#"42["firmware_update",{}]"#, &store);
        assert_eq!(outcome, FrameOutcome::default());
        assert_eq!(store.lock().unwrap().revision(), 0);
    }

    #[test]
    fn test_malformed_payload_is_dropped() {
        let store = store();
        let outcome = handle_frame(r#"42["pin_update","not a record"]"#, &store);
        assert_eq!(outcome, FrameOutcome::default());
        assert_eq!(store.lock().unwrap().revision(), 0);
    }

    #[test]
    fn test_garbage_frame_does_not_close_session() {
        let outcome = handle_frame("x", &store());
        assert!(!outcome.closed);
        assert!(outcome.reply.is_none());
    }

    #[test]
    fn test_disconnect_and_close_end_session() {
        assert!(handle_frame("41", &store()).closed);
        assert!(handle_frame("1", &store()).closed);
        assert!(handle_frame(r#"44{"message":"unauthorized"}"#, &store()).closed);
    }

    #[tokio::test]
    async fn test_reconnect_wait_ends_when_shutdown_is_requested() {
        let running = AtomicBool::new(false);
        let waited = timeout(
            Duration::from_secs(1),
            sleep_while_running(Duration::from_secs(60), &running),
        )
        .await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn test_reconnect_wait_sleeps_full_delay_while_running() {
        let running = AtomicBool::new(true);
        let started = Instant::now();
        sleep_while_running(Duration::from_millis(50), &running).await;
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_feed_stops_promptly_after_shutdown_during_reconnect_delay() {
        // Arrange: nothing listens on port 1, and the delay is far longer
        // than the test allows
        let config = PanelConfig {
            server_url: "ws://127.0.0.1:1/socket.io/?EIO=4&transport=websocket".to_string(),
            reconnect_delay_ms: 60_000,
            ..PanelConfig::default()
        };
        let store = Arc::new(Mutex::new(ApplicationStore::new()));
        let (revisions, _rx) = watch::channel(0u64);
        let running = Arc::new(AtomicBool::new(true));
        let stopper = Arc::clone(&running);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            stopper.store(false, Ordering::Relaxed);
        });

        // Act
        let finished = timeout(
            Duration::from_secs(3),
            run_feed(config, store, revisions, running),
        )
        .await;

        // Assert
        assert!(finished.is_ok(), "feed kept waiting after shutdown");
    }
}
