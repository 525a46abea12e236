//! Wire layout of the 36-byte LIFX header.
//!
//! ```text
//! offset  bytes  field
//!   0       2    size
//!   2       2    origin(2) | tagged(1) | addressable(1) | protocol(12)
//!   4       4    source
//!   8       8    target (packed device address)
//!  16       6    reserved block
//!  22       1    reserved(6) | ack_required(1) | res_required(1)
//!  23       1    sequence
//!  24       8    protocol header reserved
//!  32       2    message type
//!  34       2    protocol header reserved end
//!  36       N    payload
//! ```

pub const FRAME_SIZE: usize = 8;
pub const FRAME_ADDRESS_SIZE: usize = 16;
pub const PROTOCOL_HEADER_SIZE: usize = 12;
pub const HEADER_SIZE: usize = FRAME_SIZE + FRAME_ADDRESS_SIZE + PROTOCOL_HEADER_SIZE;

pub const SIZE_RANGE: std::ops::Range<usize> = 0..2;
pub const FRAME_FLAGS_RANGE: std::ops::Range<usize> = 2..4;
pub const SOURCE_RANGE: std::ops::Range<usize> = 4..8;
pub const TARGET_RANGE: std::ops::Range<usize> = 8..16;
pub const RESERVED_BLOCK_RANGE: std::ops::Range<usize> = 16..22;
pub const ADDRESS_FLAGS_OFFSET: usize = 22;
pub const SEQUENCE_OFFSET: usize = 23;
pub const PROTOCOL_RESERVED_RANGE: std::ops::Range<usize> = 24..32;
pub const MESSAGE_TYPE_RANGE: std::ops::Range<usize> = 32..34;
pub const PROTOCOL_RESERVED_END_RANGE: std::ops::Range<usize> = 34..36;
pub const PAYLOAD_OFFSET: usize = HEADER_SIZE;

// Frame flags word: origin in the top two bits, protocol in the low twelve.
pub const ORIGIN_SHIFT: u32 = 14;
pub const TAGGED_BIT: u16 = 1 << 13;
pub const ADDRESSABLE_BIT: u16 = 1 << 12;
pub const PROTOCOL_MASK: u16 = 0x0FFF;

// Frame address flags byte: reserved in the top six bits.
pub const RESERVED_SHIFT: u32 = 2;
pub const ACK_REQUIRED_BIT: u8 = 1 << 1;
pub const RES_REQUIRED_BIT: u8 = 1;

pub const MAX_ORIGIN: u8 = 0b11;
pub const MAX_PROTOCOL: u16 = PROTOCOL_MASK;
pub const MAX_RESERVED: u8 = 0b0011_1111;

pub const DEVICE_ADDRESS_LEN: usize = 6;
pub const PADDED_TARGET_LEN: usize = 8;
pub const RESERVED_BLOCK_LEN: usize = 6;

pub const DEFAULT_PROTOCOL: u16 = 1024;
pub const MAX_PACKET_SIZE: usize = u16::MAX as usize;
pub const LIFX_PORT: u16 = 56700;
