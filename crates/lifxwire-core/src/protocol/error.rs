use thiserror::Error;

use super::header::Header;
use super::layout;

/// Errors returned by the packet codec.
///
/// Range checks fire before any byte is written, so a failed encode never
/// yields partial output. Decode failures never return a partially filled
/// value; `UnknownType` carries the header that was fully decoded before the
/// payload lookup failed.
///
/// # Examples
/// ```
/// use lifxwire_core::protocol::{ByteOrder, Frame, ProtocolError};
///
/// let frame = Frame { origin: 4, ..Frame::default() };
/// let err = frame.encode(ByteOrder::Little).unwrap_err();
/// assert!(matches!(err, ProtocolError::OriginOverflow { value: 4 }));
/// ```
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("origin {value} does not fit in 2 bits (max {max})", max = layout::MAX_ORIGIN)]
    OriginOverflow { value: u8 },
    #[error("protocol {value} does not fit in 12 bits (max {max})", max = layout::MAX_PROTOCOL)]
    ProtocolOverflow { value: u16 },
    #[error("frame address reserved {value} does not fit in 6 bits (max {max})", max = layout::MAX_RESERVED)]
    ReservedOverflow { value: u8 },
    #[error("malformed target: expected 6 bytes or 8 bytes ending in two zeros, got {len} bytes")]
    MalformedTarget { len: usize },
    #[error("invalid device address '{input}'")]
    InvalidAddress { input: String },
    #[error("packet size {size} overflows the 16-bit size field (max {max})", max = layout::MAX_PACKET_SIZE)]
    SizeOverflow { size: usize },
    #[error("payload does not match message type {code}")]
    PayloadMismatch { code: u16 },
    #[error("unknown message type {code}")]
    UnknownType { code: u16, header: Box<Header> },
    #[error("{field} of {millis}ms overflows the 32-bit millisecond field")]
    DurationOverflow { field: &'static str, millis: u128 },
    #[error("label of {len} bytes exceeds {max} bytes")]
    LabelTooLong { len: usize, max: usize },
    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
