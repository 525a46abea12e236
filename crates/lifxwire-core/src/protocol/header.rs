use std::fmt;
use std::io::Read;

use serde::Serialize;

use super::byte_order::ByteOrder;
use super::error::Result;
use super::frame::Frame;
use super::frame_address::FrameAddress;
use super::layout;
use super::protocol_header::ProtocolHeader;
use super::reader::WireReader;
use super::writer::WireWriter;

/// The fixed 36-byte header: frame, frame address and protocol header.
///
/// All three parts are required to build a `Header`, so an incomplete header
/// cannot exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Header {
    pub frame: Frame,
    pub frame_address: FrameAddress,
    pub protocol_header: ProtocolHeader,
}

impl Header {
    pub fn new(frame: Frame, frame_address: FrameAddress, protocol_header: ProtocolHeader) -> Self {
        Self {
            frame,
            frame_address,
            protocol_header,
        }
    }

    /// Encode frame, frame address and protocol header into one buffer.
    ///
    /// The first failing part aborts the encode; no bytes are returned.
    pub fn encode(&self, order: ByteOrder) -> Result<Vec<u8>> {
        let mut writer = WireWriter::with_capacity(layout::HEADER_SIZE, order);
        self.write_to(&mut writer)?;
        Ok(writer.into_bytes())
    }

    pub fn decode<R: Read + ?Sized>(stream: &mut R, order: ByteOrder) -> Result<Self> {
        Self::read_from(&mut WireReader::new(stream, order))
    }

    pub(crate) fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        self.frame.write_to(writer)?;
        self.frame_address.write_to(writer)?;
        self.protocol_header.write_to(writer);
        Ok(())
    }

    pub(crate) fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        let frame = Frame::read_from(reader)?;
        let frame_address = FrameAddress::read_from(reader)?;
        let protocol_header = ProtocolHeader::read_from(reader)?;
        Ok(Self::new(frame, frame_address, protocol_header))
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.frame, self.frame_address, self.protocol_header)
    }
}
