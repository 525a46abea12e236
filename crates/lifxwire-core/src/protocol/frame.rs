use std::fmt;
use std::io::Read;

use serde::Serialize;

use super::byte_order::ByteOrder;
use super::error::{ProtocolError, Result};
use super::layout;
use super::reader::WireReader;
use super::writer::WireWriter;

/// First header block: message size, addressing flags, protocol, source.
///
/// `size` is owned by [`Packet`](super::Packet): it is recomputed on every
/// packet encode and only meaningful on decoded frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub size: u16,
    /// Message origin indicator, 2 bits on the wire.
    pub origin: u8,
    /// Set when the target should be ignored (discovery broadcasts).
    pub tagged: bool,
    pub addressable: bool,
    /// Protocol number, 12 bits on the wire.
    pub protocol: u16,
    /// Client-chosen identifier echoed back in responses.
    pub source: u32,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            size: 0,
            origin: 0,
            tagged: false,
            addressable: true,
            protocol: layout::DEFAULT_PROTOCOL,
            source: 0,
        }
    }
}

impl Frame {
    /// Encode the 8-byte frame block.
    ///
    /// # Errors
    /// `OriginOverflow` when `origin > 3`, `ProtocolOverflow` when
    /// `protocol > 4095`. Nothing is written in either case.
    pub fn encode(&self, order: ByteOrder) -> Result<Vec<u8>> {
        let mut writer = WireWriter::with_capacity(layout::FRAME_SIZE, order);
        self.write_to(&mut writer)?;
        Ok(writer.into_bytes())
    }

    pub fn decode<R: Read + ?Sized>(stream: &mut R, order: ByteOrder) -> Result<Self> {
        Self::read_from(&mut WireReader::new(stream, order))
    }

    pub(crate) fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        let flags = self.pack_flags()?;
        writer.put_u16(self.size);
        writer.put_u16(flags);
        writer.put_u32(self.source);
        Ok(())
    }

    pub(crate) fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        let size = reader.read_u16()?;
        let flags = reader.read_u16()?;
        let source = reader.read_u32()?;
        let (origin, tagged, addressable, protocol) = unpack_flags(flags);
        Ok(Self {
            size,
            origin,
            tagged,
            addressable,
            protocol,
            source,
        })
    }

    fn pack_flags(&self) -> Result<u16> {
        if self.origin > layout::MAX_ORIGIN {
            return Err(ProtocolError::OriginOverflow { value: self.origin });
        }
        if self.protocol > layout::MAX_PROTOCOL {
            return Err(ProtocolError::ProtocolOverflow {
                value: self.protocol,
            });
        }
        let mut flags = (u16::from(self.origin) << layout::ORIGIN_SHIFT) | self.protocol;
        if self.tagged {
            flags |= layout::TAGGED_BIT;
        }
        if self.addressable {
            flags |= layout::ADDRESSABLE_BIT;
        }
        Ok(flags)
    }
}

fn unpack_flags(flags: u16) -> (u8, bool, bool, u16) {
    let origin = (flags >> layout::ORIGIN_SHIFT) as u8;
    let tagged = flags & layout::TAGGED_BIT != 0;
    let addressable = flags & layout::ADDRESSABLE_BIT != 0;
    let protocol = flags & layout::PROTOCOL_MASK;
    (origin, tagged, addressable, protocol)
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "size={} origin={} tagged={} addressable={} protocol={} source={}",
            self.size, self.origin, self.tagged, self.addressable, self.protocol, self.source
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use crate::protocol::{ByteOrder, ProtocolError, layout};

    fn sample() -> Frame {
        Frame {
            size: 100,
            origin: 3,
            tagged: true,
            addressable: true,
            protocol: layout::DEFAULT_PROTOCOL,
            source: 0xdead_beef,
        }
    }

    #[test]
    fn display_lists_every_field() {
        assert_eq!(
            sample().to_string(),
            "size=100 origin=3 tagged=true addressable=true protocol=1024 source=3735928559"
        );
    }

    #[test]
    fn encodes_fields_at_fixed_offsets() {
        let bytes = sample().encode(ByteOrder::Little).unwrap();
        assert_eq!(bytes.len(), layout::FRAME_SIZE);
        assert_eq!(bytes[layout::SIZE_RANGE], 100u16.to_le_bytes());
        let flags = u16::from_le_bytes([bytes[2], bytes[3]]);
        assert_eq!(flags >> 14, 3);
        assert_eq!(flags >> 13 & 1, 1);
        assert_eq!(flags >> 12 & 1, 1);
        assert_eq!(flags & 0x0fff, 1024);
        assert_eq!(bytes[layout::SOURCE_RANGE], 0xdead_beefu32.to_le_bytes());
    }

    #[test]
    fn decodes_big_endian_layout() {
        let mut bytes = vec![0u8; layout::FRAME_SIZE];
        bytes[layout::SIZE_RANGE].copy_from_slice(&36u16.to_be_bytes());
        bytes[layout::FRAME_FLAGS_RANGE].copy_from_slice(&(0b01_1_0_0000_0000_0111u16).to_be_bytes());
        bytes[layout::SOURCE_RANGE].copy_from_slice(&7u32.to_be_bytes());

        let frame = Frame::decode(&mut &bytes[..], ByteOrder::Big).unwrap();
        assert_eq!(frame.size, 36);
        assert_eq!(frame.origin, 1);
        assert!(frame.tagged);
        assert!(!frame.addressable);
        assert_eq!(frame.protocol, 7);
        assert_eq!(frame.source, 7);
    }

    #[test]
    fn every_flag_combination_round_trips() {
        for order in [ByteOrder::Little, ByteOrder::Big] {
            for origin in 0..=layout::MAX_ORIGIN {
                for tagged in [false, true] {
                    for addressable in [false, true] {
                        for protocol in [0, 1, layout::DEFAULT_PROTOCOL, layout::MAX_PROTOCOL] {
                            let frame = Frame {
                                size: u16::MAX,
                                origin,
                                tagged,
                                addressable,
                                protocol,
                                source: u32::MAX,
                            };
                            let bytes = frame.encode(order).unwrap();
                            assert_eq!(Frame::decode(&mut &bytes[..], order).unwrap(), frame);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn origin_boundary() {
        let ok = Frame { origin: 3, ..sample() };
        assert!(ok.encode(ByteOrder::Little).is_ok());

        let err = Frame { origin: 4, ..sample() }
            .encode(ByteOrder::Little)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::OriginOverflow { value: 4 }));
    }

    #[test]
    fn protocol_boundary() {
        let ok = Frame { protocol: 4095, ..sample() };
        assert!(ok.encode(ByteOrder::Little).is_ok());

        let err = Frame { protocol: 4096, ..sample() }
            .encode(ByteOrder::Little)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::ProtocolOverflow { value: 4096 }));
    }

    #[test]
    fn short_stream_fails() {
        let bytes = [0u8; layout::FRAME_SIZE - 1];
        let err = Frame::decode(&mut &bytes[..], ByteOrder::Little).unwrap_err();
        assert!(matches!(err, ProtocolError::Io(_)));
    }

    #[test]
    fn default_uses_protocol_1024_and_addressable() {
        let frame = Frame::default();
        assert_eq!(frame.protocol, 1024);
        assert!(frame.addressable);
        assert!(!frame.tagged);
    }
}
