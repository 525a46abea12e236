use std::fmt;
use std::io::Read;

use serde::Serialize;

use super::address::{DeviceAddress, decode_address, encode_address};
use super::byte_order::ByteOrder;
use super::error::{ProtocolError, Result};
use super::layout;
use super::reader::WireReader;
use super::writer::WireWriter;

/// Second header block: target device, acknowledgement flags, sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameAddress {
    /// Device the message is for; broadcast when `Frame::tagged` is set.
    pub target: DeviceAddress,
    pub reserved_block: [u8; layout::RESERVED_BLOCK_LEN],
    /// 6 bits on the wire.
    pub reserved: u8,
    pub ack_required: bool,
    pub res_required: bool,
    /// Wrap-around counter used to pair requests with responses.
    pub sequence: u8,
}

impl FrameAddress {
    /// Build a frame address from a raw target (see
    /// [`DeviceAddress::from_slice`] for the accepted shapes).
    pub fn with_target_bytes(target: &[u8]) -> Result<Self> {
        Ok(Self {
            target: DeviceAddress::from_slice(target)?,
            ..Self::default()
        })
    }

    /// Encode the 16-byte frame address block.
    ///
    /// # Errors
    /// `ReservedOverflow` when `reserved > 63`; nothing is written.
    pub fn encode(&self, order: ByteOrder) -> Result<Vec<u8>> {
        let mut writer = WireWriter::with_capacity(layout::FRAME_ADDRESS_SIZE, order);
        self.write_to(&mut writer)?;
        Ok(writer.into_bytes())
    }

    pub fn decode<R: Read + ?Sized>(stream: &mut R, order: ByteOrder) -> Result<Self> {
        Self::read_from(&mut WireReader::new(stream, order))
    }

    pub(crate) fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        let flags = self.pack_flags()?;
        writer.put_u64(encode_address(&self.target));
        writer.put_slice(&self.reserved_block);
        writer.put_u8(flags);
        writer.put_u8(self.sequence);
        Ok(())
    }

    pub(crate) fn read_from<R: Read + ?Sized>(reader: &mut WireReader<'_, R>) -> Result<Self> {
        let target = decode_address(reader.read_u64()?);
        let reserved_block = reader.read_array()?;
        let (reserved, ack_required, res_required) = unpack_flags(reader.read_u8()?);
        let sequence = reader.read_u8()?;
        Ok(Self {
            target,
            reserved_block,
            reserved,
            ack_required,
            res_required,
            sequence,
        })
    }

    fn pack_flags(&self) -> Result<u8> {
        if self.reserved > layout::MAX_RESERVED {
            return Err(ProtocolError::ReservedOverflow {
                value: self.reserved,
            });
        }
        let mut flags = self.reserved << layout::RESERVED_SHIFT;
        if self.ack_required {
            flags |= layout::ACK_REQUIRED_BIT;
        }
        if self.res_required {
            flags |= layout::RES_REQUIRED_BIT;
        }
        Ok(flags)
    }
}

fn unpack_flags(flags: u8) -> (u8, bool, bool) {
    (
        flags >> layout::RESERVED_SHIFT,
        flags & layout::ACK_REQUIRED_BIT != 0,
        flags & layout::RES_REQUIRED_BIT != 0,
    )
}

impl fmt::Display for FrameAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "target={} ack_required={} res_required={} sequence={}",
            self.target, self.ack_required, self.res_required, self.sequence
        )
    }
}
