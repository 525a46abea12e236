//! UDP datagram extraction from captured link-layer frames.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{UdpPacket, parse_udp_packet};
