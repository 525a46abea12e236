use std::fmt;
use std::io::Read;

use serde::Serialize;

use super::byte_order::ByteOrder;
use super::error::{ProtocolError, Result};
use super::frame::Frame;
use super::header::Header;
use super::layout;
use super::message_type::MessageType;
use super::reader::WireReader;
use super::registry;
use super::writer::WireWriter;
use crate::payloads::Payload;

/// A complete message: header plus the body selected by its message type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Packet {
    pub header: Header,
    pub payload: Payload,
}

impl Packet {
    pub fn new(header: Header, payload: Payload) -> Self {
        Self { header, payload }
    }

    pub fn message_type(&self) -> Option<MessageType> {
        self.header.protocol_header.known_type()
    }

    /// Total encoded length: header plus body.
    pub fn wire_size(&self) -> usize {
        layout::HEADER_SIZE + self.payload.wire_size()
    }

    /// Encode header and body.
    ///
    /// The body is encoded first so the frame size can be filled in; the
    /// caller's `frame.size` is ignored and `self` is left untouched.
    ///
    /// # Errors
    /// `PayloadMismatch` when the body is not the one registered for the
    /// message type, `SizeOverflow` when the total exceeds 65535 bytes, or any
    /// range error from the header and body.
    pub fn encode(&self, order: ByteOrder) -> Result<Vec<u8>> {
        let code = self.header.protocol_header.message_type;
        if !registry::accepts(code, &self.payload) {
            return Err(ProtocolError::PayloadMismatch { code });
        }
        let payload = self.payload.encode(order)?;
        let total = layout::HEADER_SIZE + payload.len();
        let size = u16::try_from(total).map_err(|_| ProtocolError::SizeOverflow { size: total })?;

        let header = Header {
            frame: Frame {
                size,
                ..self.header.frame
            },
            ..self.header
        };

        let mut writer = WireWriter::with_capacity(total, order);
        header.write_to(&mut writer)?;
        writer.put_slice(&payload);
        Ok(writer.into_bytes())
    }

    /// Decode a header, then the body registered for its message type.
    ///
    /// Reads exactly the header and body; trailing bytes stay in the stream.
    /// The frame size field is not cross-checked against the bytes read.
    ///
    /// # Errors
    /// `UnknownType` (carrying the decoded header) when no body codec is
    /// registered for the code, or `Io` when the stream is short.
    pub fn decode<R: Read + ?Sized>(stream: &mut R, order: ByteOrder) -> Result<Self> {
        let header = Header::read_from(&mut WireReader::new(stream, order))?;
        let code = header.protocol_header.message_type;
        let decoder = registry::lookup(code).ok_or_else(|| ProtocolError::UnknownType {
            code,
            header: Box::new(header),
        })?;
        let mut body = stream;
        let payload = decoder(&mut body, order)?;
        Ok(Self::new(header, payload))
    }

    pub fn from_bytes(bytes: &[u8], order: ByteOrder) -> Result<Self> {
        Self::decode(&mut &bytes[..], order)
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} payload: {}", self.header, self.payload)
    }
}
