use std::fmt;

use serde::Serialize;

/// Byte order applied to every multi-byte field of a packet.
///
/// The LIFX LAN protocol is little-endian; big-endian exists for peers that
/// deviate from it and for testing layout independence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::Little => f.write_str("little"),
            ByteOrder::Big => f.write_str("big"),
        }
    }
}
