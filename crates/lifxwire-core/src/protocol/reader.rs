use std::io::Read;

use super::byte_order::ByteOrder;
use super::error::Result;

/// Byte-order aware field reader over a stream.
///
/// Every read is of a fixed length; a short stream surfaces as
/// `ProtocolError::Io` with `UnexpectedEof`.
pub struct WireReader<'a, R: Read + ?Sized> {
    inner: &'a mut R,
    order: ByteOrder,
}

impl<'a, R: Read + ?Sized> WireReader<'a, R> {
    pub fn new(inner: &'a mut R, order: ByteOrder) -> Self {
        Self { inner, order }
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let [value] = self.read_array::<1>()?;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_array()?;
        Ok(match self.order {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        })
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let bytes = self.read_array()?;
        Ok(match self.order {
            ByteOrder::Little => i16::from_le_bytes(bytes),
            ByteOrder::Big => i16::from_be_bytes(bytes),
        })
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_array()?;
        Ok(match self.order {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        })
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.read_array()?;
        Ok(match self.order {
            ByteOrder::Little => u64::from_le_bytes(bytes),
            ByteOrder::Big => u64::from_be_bytes(bytes),
        })
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_u32().map(f32::from_bits)
    }
}
