use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::protocol::{ByteOrder, Header, Packet, ProtocolError, layout, type_name};
use crate::{ComplianceSummary, ClientSummary, MessageSummary};

use super::clients::{ClientKey, ClientStats, add_client_packet, build_client_summaries};
use super::compliance::{Check, ComplianceTracker};
use super::timing::ts_to_rfc3339;
use super::udp::UdpPacket;

/// Aggregates decoded LIFX datagrams into report sections.
#[derive(Debug, Default)]
pub(crate) struct LifxStats {
    pub packets: u64,
    messages: BTreeMap<u16, u64>,
    clients: HashMap<ClientKey, ClientStats>,
    compliance: ComplianceTracker,
}

impl LifxStats {
    /// Returns whether the datagram carried a decodable header.
    pub fn inspect(&mut self, udp: &UdpPacket<'_>, ts: Option<f64>, order: ByteOrder) -> bool {
        self.packets += 1;
        let failed = self.inspect_payload(udp, ts, order);
        let context = format!(
            "source {} @ {}",
            udp.src_endpoint(),
            ts_to_rfc3339(ts).unwrap_or_else(|| "unknown".to_string())
        );
        self.compliance.record(&failed, &context);
        !failed.contains(&Check::TooShort)
    }

    fn inspect_payload(&mut self, udp: &UdpPacket<'_>, ts: Option<f64>, order: ByteOrder) -> Vec<Check> {
        let datagram = udp.payload;
        if datagram.len() < layout::HEADER_SIZE {
            debug!(
                len = datagram.len(),
                src = %udp.src_endpoint(),
                dst = %udp.dst_endpoint(),
                "datagram shorter than header"
            );
            return vec![Check::TooShort];
        }

        let mut failed = Vec::new();
        let header = match Header::decode(&mut &datagram[..], order) {
            Ok(header) => header,
            Err(err) => {
                debug!(error = %err, "header decode failed");
                return vec![Check::TooShort];
            }
        };
        let code = header.protocol_header.message_type;
        *self.messages.entry(code).or_default() += 1;
        add_client_packet(&mut self.clients, udp.src_endpoint(), &header, ts);

        if usize::from(header.frame.size) != datagram.len() {
            failed.push(Check::SizeMismatch);
        }
        if header.frame.protocol != layout::DEFAULT_PROTOCOL {
            failed.push(Check::ProtocolNumber);
        }
        if !header.frame.addressable {
            failed.push(Check::NotAddressable);
        }

        match Packet::from_bytes(datagram, order) {
            Ok(_) => {}
            Err(ProtocolError::UnknownType { code, .. }) => {
                debug!(code, "no payload codec for message type");
                failed.push(Check::UnknownType);
            }
            Err(ProtocolError::Io(err)) => {
                debug!(code, name = type_name(code), error = %err, "payload truncated");
                failed.push(Check::TruncatedPayload);
            }
            Err(err) => debug!(code, error = %err, "payload decode failed"),
        }
        failed.sort();
        failed
    }

    pub fn message_summaries(&self) -> Vec<MessageSummary> {
        self.messages
            .iter()
            .map(|(&code, &count)| MessageSummary {
                code,
                name: type_name(code).to_string(),
                count,
            })
            .collect()
    }

    pub fn into_sections(self) -> (Vec<MessageSummary>, Vec<ClientSummary>, Option<ComplianceSummary>) {
        let messages = self.message_summaries();
        (
            messages,
            build_client_summaries(self.clients),
            self.compliance.into_summary(),
        )
    }
}
