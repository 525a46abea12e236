use super::error::UdpError;
use super::layout;

/// Bounds-checked view over a UDP segment (header plus payload).
pub struct UdpSegment<'a> {
    bytes: &'a [u8],
}

impl<'a> UdpSegment<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn require_len(&self, needed: usize) -> Result<(), UdpError> {
        if self.bytes.len() < needed {
            return Err(UdpError::TooShort {
                needed,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }

    /// Declared segment length, header included; 0 marks an IPv6 jumbogram.
    pub fn declared_len(&self) -> Result<u16, UdpError> {
        self.require_len(layout::UDP_HEADER_LEN)?;
        let field = &self.bytes[layout::UDP_LENGTH_RANGE];
        Ok(u16::from_be_bytes([field[0], field[1]]))
    }

    /// Datagram payload limited to the declared length, so link-layer
    /// padding never reaches the codec.
    pub fn payload(&self) -> Result<&'a [u8], UdpError> {
        let end = match usize::from(self.declared_len()?) {
            0 => self.bytes.len(),
            declared if declared < layout::UDP_HEADER_LEN || declared > self.bytes.len() => {
                return Err(UdpError::BadLength {
                    declared,
                    available: self.bytes.len(),
                });
            }
            declared => declared,
        };
        Ok(&self.bytes[layout::UDP_HEADER_LEN..end])
    }
}
