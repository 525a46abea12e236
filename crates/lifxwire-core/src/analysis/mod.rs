//! Offline capture analysis.
//!
//! Frame sources feed link-layer frames; UDP datagrams on the configured
//! port are decoded with the LIFX codec and aggregated into message counts,
//! per-client sequence statistics, client/device conversations and
//! compliance findings.
//!
//! Version française (résumé):
//! Les sources fournissent les trames ; les datagrammes UDP du port choisi
//! sont décodés puis agrégés (messages, clients, conversations, conformité).

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::protocol::ByteOrder;
use crate::protocol::layout::LIFX_PORT;
use crate::source::{CaptureError, CaptureFile, CapturedFrame, FrameSource};
use crate::{CaptureSummary, DEFAULT_GENERATED_AT, Report, make_stub_report};

mod clients;
mod compliance;
mod conversations;
mod lifx;
mod timing;
mod udp;

use conversations::Conversations;
use lifx::LifxStats;
use timing::{ts_to_rfc3339, update_ts_bounds};
use udp::parse_udp_packet;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),
}

/// Analysis options.
///
/// # Examples
/// ```
/// use lifxwire_core::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.port, Some(56700));
/// let any = AnalysisConfig { port: None, ..config };
/// assert!(any.port.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Only datagrams with this source or destination port are decoded;
    /// `None` decodes every UDP datagram.
    pub port: Option<u16>,
    pub byte_order: ByteOrder,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            port: Some(LIFX_PORT),
            byte_order: ByteOrder::Little,
        }
    }
}

pub fn analyze_pcap_file(path: &Path, config: &AnalysisConfig) -> Result<Report, AnalysisError> {
    let source = CaptureFile::open(path)?;
    analyze_source(path, source, config)
}

pub fn analyze_source<S: FrameSource>(
    path: &Path,
    mut source: S,
    config: &AnalysisConfig,
) -> Result<Report, AnalysisError> {
    let mut packets_total = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;
    let mut conversations = Conversations::new(config.port.unwrap_or(LIFX_PORT));
    let mut lifx = LifxStats::default();

    while let Some(CapturedFrame {
        number,
        timestamp,
        linktype,
        bytes,
    }) = source.next_frame()?
    {
        packets_total += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, timestamp);
        let udp = match parse_udp_packet(linktype, &bytes) {
            Ok(Some(udp)) => udp,
            Ok(None) => continue,
            Err(err) => {
                debug!(frame = number, error = %err, "skipping undecodable frame");
                continue;
            }
        };
        if config.port.is_some_and(|port| !udp.touches_port(port)) {
            continue;
        }
        let carried_header = lifx.inspect(&udp, timestamp, config.byte_order);
        conversations.record(&udp, timestamp, carried_header);
    }

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.capture_summary = Some(CaptureSummary {
        packets_total,
        lifx_packets: lifx.packets,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
    });
    report.generated_at = report
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());

    let duration_s = match (first_ts, last_ts) {
        (Some(start), Some(end)) if end > start => Some(end - start),
        _ => None,
    };

    report.conversations = conversations.into_summaries(duration_s);
    let (messages, clients, compliance) = lifx.into_sections();
    report.messages = messages;
    report.clients = clients;
    report.compliance = compliance.into_iter().collect();

    info!(
        packets = packets_total,
        lifx = report.capture_summary.as_ref().map_or(0, |s| s.lifx_packets),
        message_types = report.messages.len(),
        clients = report.clients.len(),
        conversations = report.conversations.len(),
        "capture analysed"
    );
    Ok(report)
}
