//! Text framing for the controller's push channel.
//!
//! The controller runs a Socket.IO server.  Over a WebSocket transport every
//! text frame is one Engine.IO packet; Engine.IO `message` packets wrap one
//! Socket.IO packet.  The panel only needs the text (non-binary) subset.

pub mod packet;

pub use packet::{decode_packet, encode_packet, EnginePacket, OpenHandshake, PacketError, SocketPacket};
