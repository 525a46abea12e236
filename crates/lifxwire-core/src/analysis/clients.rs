use std::collections::{BTreeSet, HashMap};

use crate::ClientSummary;
use crate::protocol::{DeviceAddress, Header, MessageType};

use super::timing::InterArrival;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub(crate) struct ClientKey {
    pub endpoint: String,
    pub source: u32,
}

#[derive(Debug, Default)]
pub(crate) struct ClientStats {
    pub packets: u64,
    pub tagged: u64,
    pub targets: BTreeSet<DeviceAddress>,
    pub sequence: SequenceTracker,
    pub timing: InterArrival,
}

/// Per-stream sequence accounting with 8-bit wrap-around.
///
/// A forward gap below 128 counts as loss; a repeat of the last number is a
/// duplicate; anything further back is reordered and does not move the
/// expected sequence.
#[derive(Debug, Default, Clone)]
pub(crate) struct SequenceTracker {
    pub frames: u64,
    pub loss: u64,
    pub duplicates: u64,
    pub reordered: u64,
    pub burst_count: u64,
    pub max_burst_len: u64,
    current_burst: u64,
    last_seq: Option<u8>,
}

impl SequenceTracker {
    pub fn observe(&mut self, seq: u8) {
        self.frames += 1;
        let Some(last) = self.last_seq else {
            self.last_seq = Some(seq);
            return;
        };

        if seq == last {
            self.duplicates += 1;
            return;
        }
        let gap = seq.wrapping_sub(last.wrapping_add(1)) as u16;
        if gap >= 128 {
            self.reordered += 1;
            return;
        }
        if gap > 0 {
            self.loss += gap as u64;
            if self.current_burst == 0 {
                self.burst_count += 1;
            }
            self.current_burst += gap as u64;
            if self.current_burst > self.max_burst_len {
                self.max_burst_len = self.current_burst;
            }
        } else {
            self.current_burst = 0;
        }
        self.last_seq = Some(seq);
    }

    fn tracked(&self) -> bool {
        self.last_seq.is_some() && self.frames > 1
    }
}

pub(crate) fn add_client_packet(
    stats: &mut HashMap<ClientKey, ClientStats>,
    endpoint: String,
    header: &Header,
    ts: Option<f64>,
) {
    let key = ClientKey {
        endpoint,
        source: header.frame.source,
    };
    let entry = stats.entry(key).or_default();
    entry.packets += 1;
    if header.frame.tagged {
        entry.tagged += 1;
    } else {
        entry.targets.insert(header.frame_address.target);
    }
    // Acknowledgements reuse the sequence of the response they precede.
    if header.protocol_header.known_type() != Some(MessageType::DeviceAcknowledgement) {
        entry.sequence.observe(header.frame_address.sequence);
    }
    entry.timing.observe(ts);
}

pub(crate) fn build_client_summaries(stats: HashMap<ClientKey, ClientStats>) -> Vec<ClientSummary> {
    let mut clients: Vec<ClientSummary> = stats
        .into_iter()
        .map(|(key, stats)| {
            let seq = &stats.sequence;
            let tracked = seq.tracked();
            let when_tracked = |value: u64| tracked.then_some(value);
            let loss_rate = tracked
                .then(|| seq.frames + seq.loss)
                .filter(|&denom| denom > 0)
                .map(|denom| seq.loss as f64 / denom as f64);

            ClientSummary {
                endpoint: key.endpoint,
                source: key.source,
                packets: stats.packets,
                tagged_packets: stats.tagged,
                targets: stats.targets.iter().map(ToString::to_string).collect(),
                lost_packets: when_tracked(seq.loss),
                loss_rate,
                duplicate_packets: when_tracked(seq.duplicates),
                reordered_packets: when_tracked(seq.reordered),
                burst_count: when_tracked(seq.burst_count),
                max_burst_len: when_tracked(seq.max_burst_len),
                jitter_ms: stats.timing.jitter_ms(),
            }
        })
        .collect();

    clients.sort_by(|a, b| {
        a.endpoint
            .cmp(&b.endpoint)
            .then_with(|| a.source.cmp(&b.source))
    });
    clients
}
