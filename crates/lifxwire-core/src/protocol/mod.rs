//! LIFX LAN protocol packet codec.
//!
//! A packet is a fixed 36-byte header followed by a body whose shape is
//! selected by the message type code:
//! - `layout`: sizes, byte offsets and bit positions (source of truth)
//! - `reader` / `writer`: byte-order aware field access
//! - `frame`, `frame_address`, `protocol_header`: the three header blocks
//! - `header`: the three blocks encoded back to back
//! - `registry`: message type code to body decoder
//! - `packet`: header plus body, with the frame size computed on encode
//! - `error`: explicit, actionable errors
//!
//! Codecs are pure and contain no I/O beyond the stream they are handed.
//! Range checks run before any byte is written.
//!
//! Version française (résumé):
//! Le module encode et décode les paquets LIFX : en-tête fixe de 36 octets
//! puis corps choisi par le type de message. Les positions sont dans `layout`,
//! la table des types dans `registry`.
//!
//! # Examples
//! ```
//! use lifxwire_core::payloads::{Payload, PowerLevel};
//! use lifxwire_core::protocol::{
//!     ByteOrder, Frame, FrameAddress, Header, MessageType, Packet, ProtocolHeader,
//! };
//!
//! let header = Header::new(
//!     Frame::default(),
//!     FrameAddress::default(),
//!     ProtocolHeader::new(MessageType::LightStatePower),
//! );
//! let packet = Packet::new(header, Payload::LightPower(PowerLevel::ON));
//! let bytes = packet.encode(ByteOrder::Little)?;
//! assert_eq!(bytes.len(), 38);
//!
//! let decoded = Packet::from_bytes(&bytes, ByteOrder::Little)?;
//! assert_eq!(decoded.payload, packet.payload);
//! # Ok::<(), lifxwire_core::protocol::ProtocolError>(())
//! ```

mod address;
mod byte_order;
mod error;
mod frame;
mod frame_address;
mod header;
pub mod layout;
mod message_type;
mod packet;
mod protocol_header;
mod reader;
pub mod registry;
mod writer;

pub use address::{DeviceAddress, decode_address, encode_address};
pub use byte_order::ByteOrder;
pub use error::{ProtocolError, Result};
pub use frame::Frame;
pub use frame_address::FrameAddress;
pub use header::Header;
pub use message_type::{MessageType, UNKNOWN_TYPE_NAME, type_name};
pub use packet::Packet;
pub use protocol_header::ProtocolHeader;
pub use reader::WireReader;
pub use writer::WireWriter;
