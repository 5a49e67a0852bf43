//! Engine.IO v4 / Socket.IO v5 text packet codec.
//!
//! Wire format (one WebSocket text frame per packet):
//! ```text
//! <engine type:1>[<engine payload>]
//!
//! engine type 4 ("message") payload:
//! <socket type:1>[<namespace>,][<ack id>][<json>]
//! ```
//!
//! Examples:
//!
//! | Frame                               | Meaning                              |
//! |-------------------------------------|--------------------------------------|
//! | `0{"sid":"x","pingInterval":25000…}` | Engine.IO open handshake             |
//! | `2` / `3`                           | ping / pong                          |
//! | `40`                                | Socket.IO connect, default namespace |
//! | `42["pin_update",{"BUZZER":1,…}]`   | Socket.IO event                      |
//!
//! Binary attachments (Socket.IO types 5 and 6) are not used by the
//! controller and are rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while decoding a text packet.
#[derive(Debug, Error)]
pub enum PacketError {
    /// The frame was empty.
    #[error("empty packet")]
    Empty,

    /// The first character is not a known Engine.IO packet type.
    #[error("unknown engine.io packet type: {0:?}")]
    UnknownEngineType(char),

    /// The Socket.IO type character is not a known packet type.
    #[error("unknown socket.io packet type: {0:?}")]
    UnknownSocketType(char),

    /// The packet type is valid but not supported over this text channel.
    #[error("unsupported socket.io packet type: {0:?}")]
    Unsupported(char),

    /// The packet structure is invalid (e.g. an event without a name).
    #[error("malformed packet: {0}")]
    Malformed(String),

    /// The JSON part of the packet could not be parsed.
    #[error("invalid packet json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parameters the server announces in its Engine.IO `open` packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenHandshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Milliseconds between server pings.
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong.
    pub ping_timeout: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_payload: Option<u64>,
}

/// One Engine.IO packet.
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(OpenHandshake),
    Close,
    Ping,
    Pong,
    Message(SocketPacket),
    Upgrade,
    Noop,
}

/// One Socket.IO packet on the default namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    /// Namespace connect request (client) or acknowledgement (server, with `{"sid":…}`).
    Connect(Option<Value>),
    Disconnect,
    /// A named event with its first argument (`Value::Null` if none was sent).
    Event { name: String, data: Value },
    /// The server refused the namespace connection.
    ConnectError(Option<Value>),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes one text frame.
///
/// Packets addressed to a non-default namespace are decoded as if they were
/// on the default one; the panel only ever joins `/`.
///
/// # Errors
///
/// Returns [`PacketError`] if the frame is empty, carries an unknown type, or
/// contains invalid JSON.
///
/// # Examples
///
/// ```rust
/// use panel_core::transport::{decode_packet, EnginePacket, SocketPacket};
///
/// let packet = decode_packet(r#"42["status_update",{"object_count":3}]"#).unwrap();
/// match packet {
///     EnginePacket::Message(SocketPacket::Event { name, .. }) => assert_eq!(name, "status_update"),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub fn decode_packet(frame: &str) -> Result<EnginePacket, PacketError> {
    let mut chars = frame.chars();
    let kind = chars.next().ok_or(PacketError::Empty)?;
    let rest = chars.as_str();

    match kind {
        '0' => Ok(EnginePacket::Open(serde_json::from_str(rest)?)),
        '1' => Ok(EnginePacket::Close),
        '2' => Ok(EnginePacket::Ping),
        '3' => Ok(EnginePacket::Pong),
        '4' => decode_socket_packet(rest).map(EnginePacket::Message),
        '5' => Ok(EnginePacket::Upgrade),
        '6' => Ok(EnginePacket::Noop),
        other => Err(PacketError::UnknownEngineType(other)),
    }
}

/// Encodes one packet into a text frame.
pub fn encode_packet(packet: &EnginePacket) -> String {
    match packet {
        // Serializing a plain struct of strings and integers cannot fail.
        EnginePacket::Open(handshake) => {
            format!("0{}", serde_json::to_string(handshake).unwrap_or_default())
        }
        EnginePacket::Close => "1".to_string(),
        EnginePacket::Ping => "2".to_string(),
        EnginePacket::Pong => "3".to_string(),
        EnginePacket::Message(socket) => format!("4{}", encode_socket_packet(socket)),
        EnginePacket::Upgrade => "5".to_string(),
        EnginePacket::Noop => "6".to_string(),
    }
}

// ── Socket.IO layer ───────────────────────────────────────────────────────────

fn decode_socket_packet(body: &str) -> Result<SocketPacket, PacketError> {
    let mut chars = body.chars();
    let kind = chars
        .next()
        .ok_or_else(|| PacketError::Malformed("message packet without socket.io type".into()))?;
    let json = strip_ack_id(strip_namespace(chars.as_str()));

    match kind {
        '0' => Ok(SocketPacket::Connect(optional_json(json)?)),
        '1' => Ok(SocketPacket::Disconnect),
        '2' => decode_event(json),
        '4' => Ok(SocketPacket::ConnectError(optional_json(json)?)),
        // ACK carries no event for the panel; binary variants need attachments.
        '3' | '5' | '6' => Err(PacketError::Unsupported(kind)),
        other => Err(PacketError::UnknownSocketType(other)),
    }
}

fn encode_socket_packet(packet: &SocketPacket) -> String {
    match packet {
        SocketPacket::Connect(None) => "0".to_string(),
        SocketPacket::Connect(Some(payload)) => format!("0{payload}"),
        SocketPacket::Disconnect => "1".to_string(),
        SocketPacket::Event { name, data } => {
            let args = if data.is_null() {
                Value::Array(vec![Value::String(name.clone())])
            } else {
                Value::Array(vec![Value::String(name.clone()), data.clone()])
            };
            format!("2{args}")
        }
        SocketPacket::ConnectError(None) => "4".to_string(),
        SocketPacket::ConnectError(Some(payload)) => format!("4{payload}"),
    }
}

fn decode_event(json: &str) -> Result<SocketPacket, PacketError> {
    let args: Vec<Value> = serde_json::from_str(json)?;
    let mut args = args.into_iter();
    let name = match args.next() {
        Some(Value::String(name)) => name,
        Some(other) => {
            return Err(PacketError::Malformed(format!(
                "event name must be a string, got {other}"
            )))
        }
        None => return Err(PacketError::Malformed("event without a name".into())),
    };
    let data = args.next().unwrap_or(Value::Null);
    Ok(SocketPacket::Event { name, data })
}

/// Drops a leading `/namespace,` prefix.
fn strip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        match body.find(',') {
            Some(comma) => &body[comma + 1..],
            None => "",
        }
    } else {
        body
    }
}

/// Drops a leading numeric acknowledgement id.
fn strip_ack_id(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn optional_json(json: &str) -> Result<Option<Value>, PacketError> {
    if json.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::from_str(json)?))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
