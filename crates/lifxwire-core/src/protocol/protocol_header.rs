use std::fmt;
use std::io::Read;

use serde::Serialize;

use super::byte_order::ByteOrder;
use super::error::Result;
use super::layout;
use super::message_type::{MessageType, type_name};
use super::reader::WireReader;
use super::writer::WireWriter;

/// Third header block: reserved fields around the message type code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProtocolHeader {
    pub reserved: u64,
    /// Raw message type code; selects the payload codec on decode.
    #[serde(rename = "type")]
    pub message_type: u16,
    pub reserved_end: u16,
}

impl ProtocolHeader {
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_type: message_type.code(),
            ..Self::default()
        }
    }

    /// Known message type, if the code is in the protocol table.
    pub fn known_type(&self) -> Option<MessageType> {
        MessageType::from_code(self.message_type)
    }

    pub fn type_name(&self) -> &'static str {
        type_name(self.message_type)
    }

    pub fn encode(&self, order: ByteOrder) -> Result<Vec<u8>> {
        let mut writer = WireWriter::with_capacity(layout::PROTOCOL_HEADER_SIZE, order);
        self.write_to(&mut writer);
        Ok(writer.into_bytes())
    }

    pub fn decode<R: Read + ?Sized>(stream: &mut R, order: ByteOrder) -> Result<Self> {
        Self::read_from(&mut WireReader::new(stream, order))
    }

    pub(crate) fn write_to(&self, writer: &mut WireWriter) {
        writer.put_u64(self.reserved);
        writer.put_u16(self.message_type);
        writer.put_u16(self.reserved_end);
    }

    pub(crate) fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        Ok(Self {
            reserved: reader.read_u64()?,
            message_type: reader.read_u16()?,
            reserved_end: reader.read_u16()?,
        })
    }
}

impl fmt::Display for ProtocolHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type={}({})", self.type_name(), self.message_type)
    }
}

#[cfg(test)]
mod tests {
    use super::ProtocolHeader;
    use crate::protocol::{ByteOrder, MessageType, ProtocolError, layout};

    #[test]
    fn display_names_the_type() {
        assert_eq!(
            ProtocolHeader::new(MessageType::LightStatePower).to_string(),
            "type=LightStatePower(118)"
        );
        let unknown = ProtocolHeader {
            message_type: 4242,
            ..ProtocolHeader::default()
        };
        assert_eq!(unknown.to_string(), "type=UnknownType(4242)");
    }

    #[test]
    fn encodes_three_plain_fields() {
        let header = ProtocolHeader {
            reserved: 200,
            message_type: MessageType::DeviceEchoResponse.code(),
            reserved_end: 2020,
        };
        let bytes = header.encode(ByteOrder::Little).unwrap();
        assert_eq!(bytes.len(), layout::PROTOCOL_HEADER_SIZE);
        assert_eq!(bytes[0..8], 200u64.to_le_bytes());
        assert_eq!(bytes[8..10], 59u16.to_le_bytes());
        assert_eq!(bytes[10..12], 2020u16.to_le_bytes());
    }

    #[test]
    fn unconstrained_values_round_trip() {
        let header = ProtocolHeader {
            reserved: u64::MAX,
            message_type: u16::MAX,
            reserved_end: 1,
        };
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let bytes = header.encode(order).unwrap();
            assert_eq!(ProtocolHeader::decode(&mut &bytes[..], order).unwrap(), header);
        }
    }

    #[test]
    fn unknown_code_only_affects_the_label() {
        let header = ProtocolHeader {
            message_type: 4242,
            ..ProtocolHeader::default()
        };
        assert_eq!(header.type_name(), "UnknownType");
        assert!(header.known_type().is_none());
        assert!(header.encode(ByteOrder::Little).is_ok());
    }

    #[test]
    fn short_stream_fails() {
        let bytes = [0u8; 10];
        let err = ProtocolHeader::decode(&mut &bytes[..], ByteOrder::Big).unwrap_err();
        assert!(matches!(err, ProtocolError::Io(_)));
    }
}
