use bytes::BufMut;

use super::byte_order::ByteOrder;

/// Byte-order aware field writer into a local buffer.
///
/// Encoders fill a `WireWriter` and hand back its bytes only once every field
/// has been written, so callers never observe a partial encoding.
#[derive(Debug)]
pub struct WireWriter {
    buf: Vec<u8>,
    order: ByteOrder,
}

impl WireWriter {
    pub fn with_capacity(capacity: usize, order: ByteOrder) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            order,
        }
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        match self.order {
            ByteOrder::Little => self.buf.put_u16_le(value),
            ByteOrder::Big => self.buf.put_u16(value),
        }
    }

    pub fn put_i16(&mut self, value: i16) {
        match self.order {
            ByteOrder::Little => self.buf.put_i16_le(value),
            ByteOrder::Big => self.buf.put_i16(value),
        }
    }

    pub fn put_u32(&mut self, value: u32) {
        match self.order {
            ByteOrder::Little => self.buf.put_u32_le(value),
            ByteOrder::Big => self.buf.put_u32(value),
        }
    }

    pub fn put_u64(&mut self, value: u64) {
        match self.order {
            ByteOrder::Little => self.buf.put_u64_le(value),
            ByteOrder::Big => self.buf.put_u64(value),
        }
    }

    pub fn put_f32(&mut self, value: f32) {
        self.put_u32(value.to_bits());
    }

    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
