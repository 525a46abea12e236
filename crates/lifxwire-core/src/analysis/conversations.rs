use std::collections::BTreeMap;
use std::net::SocketAddr;

use crate::ConversationSummary;

use super::timing::InterArrival;
use super::udp::UdpPacket;

/// A client talking to one device endpoint, in either direction.
///
/// The device is the endpoint bound to the LIFX port; when both or neither
/// side uses it, the destination is taken as the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Conversation {
    pub client: SocketAddr,
    pub device: SocketAddr,
}

/// Which way a datagram travelled within its conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    ToDevice,
    FromDevice,
}

impl Conversation {
    pub fn of(packet: &UdpPacket<'_>, device_port: u16) -> (Self, Direction) {
        let src = SocketAddr::new(packet.src_ip, packet.src_port);
        let dst = SocketAddr::new(packet.dst_ip, packet.dst_port);
        if packet.src_port == device_port && packet.dst_port != device_port {
            (
                Self {
                    client: dst,
                    device: src,
                },
                Direction::FromDevice,
            )
        } else {
            (
                Self {
                    client: src,
                    device: dst,
                },
                Direction::ToDevice,
            )
        }
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ConversationStats {
    pub to_device: u64,
    pub from_device: u64,
    /// Datagrams whose 36-byte header decoded.
    pub lifx_messages: u64,
    pub bytes: u64,
    pub timing: InterArrival,
}

impl ConversationStats {
    pub fn datagrams(&self) -> u64 {
        self.to_device + self.from_device
    }
}

#[derive(Debug)]
pub(crate) struct Conversations {
    device_port: u16,
    stats: BTreeMap<Conversation, ConversationStats>,
}

impl Conversations {
    pub fn new(device_port: u16) -> Self {
        Self {
            device_port,
            stats: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, packet: &UdpPacket<'_>, ts: Option<f64>, carried_header: bool) {
        let (key, direction) = Conversation::of(packet, self.device_port);
        let entry = self.stats.entry(key).or_default();
        match direction {
            Direction::ToDevice => entry.to_device += 1,
            Direction::FromDevice => entry.from_device += 1,
        }
        if carried_header {
            entry.lifx_messages += 1;
        }
        entry.bytes += packet.payload.len() as u64;
        entry.timing.observe(ts);
    }

    /// Summaries ordered by client then device address.
    pub fn into_summaries(self, duration_s: Option<f64>) -> Vec<ConversationSummary> {
        self.stats
            .into_iter()
            .map(|(key, stats)| {
                let (pps, bps) = match duration_s {
                    Some(d) => (
                        Some(stats.datagrams() as f64 / d),
                        Some(stats.bytes as f64 / d),
                    ),
                    None => (None, None),
                };
                // Decided by decoded headers, not by port.
                let app_proto = if stats.lifx_messages > 0 { "lifx" } else { "udp" };
                ConversationSummary {
                    app_proto: app_proto.to_string(),
                    client: key.client.to_string(),
                    device: key.device.to_string(),
                    to_device: stats.to_device,
                    from_device: stats.from_device,
                    lifx_messages: stats.lifx_messages,
                    bytes: stats.bytes,
                    pps,
                    bps,
                    iat_jitter_ms: stats.timing.jitter_ms(),
                    max_iat_ms: stats.timing.max_iat_ms(),
                }
            })
            .collect()
    }
}
