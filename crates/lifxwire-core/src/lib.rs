//! lifxwire core library: LIFX LAN packet codec and offline capture analysis.
//!
//! The crate has two layers. `protocol` and `payloads` implement the wire
//! codec: a fixed 36-byte header plus a body selected by message type. The
//! analysis layer reads PCAP/PCAPNG captures, extracts UDP datagrams, decodes
//! them with the codec and aggregates the results into a deterministic report.
//! The codec is pure and performs no I/O beyond the stream it is handed; all
//! file access lives in `source` modules.
//!
//! Invariants:
//! - Encoding validates every bit-packed field before writing a byte.
//! - Decoding never returns a partially filled value.
//! - Report outputs are deterministic and stable across runs.
//!
//! Version française (résumé):
//! Cette crate fournit le codec LIFX (en-tête de 36 octets, corps choisi par le
//! type de message) et l'analyse hors ligne de captures : sources -> UDP ->
//! décodage -> rapport déterministe.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use lifxwire_core::{AnalysisConfig, analyze_pcap_file};
//!
//! let report = analyze_pcap_file(Path::new("capture.pcapng"), &AnalysisConfig::default())?;
//! println!("messages: {}", report.messages.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
pub mod payloads;
pub mod protocol;
mod source;

pub use analysis::{AnalysisConfig, AnalysisError, analyze_pcap_file, analyze_source};
pub use protocol::{ByteOrder, Header, MessageType, Packet, ProtocolError};
pub use source::{CaptureError, CaptureFile, CaptureFormat, CapturedFrame, FrameSource};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Aggregated analysis report with deterministic ordering.
///
/// # Examples
/// ```
/// use lifxwire_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.report_version, lifxwire_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input capture metadata.
    pub input: InputInfo,

    /// Optional capture summary (may be empty when unavailable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Per message type counts, sorted by code.
    pub messages: Vec<MessageSummary>,
    /// Per client (endpoint and frame source) summaries in stable order.
    pub clients: Vec<ClientSummary>,
    /// Client/device conversations ordered by client then device.
    pub conversations: Vec<ConversationSummary>,
    /// Protocol compliance summaries in stable order.
    pub compliance: Vec<ComplianceSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "lifxwire").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Basic capture summary (timestamps may be absent).
///
/// # Examples
/// ```
/// use lifxwire_core::CaptureSummary;
///
/// let summary = CaptureSummary {
///     packets_total: 10,
///     lifx_packets: 4,
///     time_start: None,
///     time_end: None,
/// };
/// assert_eq!(summary.packets_total, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Total packet count observed in the capture.
    pub packets_total: u64,
    /// UDP datagrams inspected as LIFX traffic.
    pub lifx_packets: u64,
    /// RFC3339 timestamp of the first packet (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the last packet (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Count of one message type code.
///
/// # Examples
/// ```
/// use lifxwire_core::MessageSummary;
///
/// let summary = MessageSummary {
///     code: 107,
///     name: "LightState".to_string(),
///     count: 3,
/// };
/// assert_eq!(summary.code, 107);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSummary {
    /// Raw message type code from the protocol header.
    pub code: u16,
    /// Message type name, or "UnknownType".
    pub name: String,
    pub count: u64,
}

/// Traffic seen from one UDP endpoint under one frame source identifier.
///
/// # Examples
/// ```
/// use lifxwire_core::ClientSummary;
///
/// let client = ClientSummary {
///     endpoint: "192.168.1.10:56700".to_string(),
///     source: 42,
///     packets: 0,
///     tagged_packets: 0,
///     targets: Vec::new(),
///     lost_packets: None,
///     loss_rate: None,
///     duplicate_packets: None,
///     reordered_packets: None,
///     burst_count: None,
///     max_burst_len: None,
///     jitter_ms: None,
/// };
/// assert_eq!(client.source, 42);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSummary {
    /// Sender endpoint in `ip:port` form.
    pub endpoint: String,
    /// Frame source identifier chosen by the client.
    pub source: u32,
    /// Packets with a decodable header.
    pub packets: u64,
    /// Packets with the tagged (broadcast) bit set.
    pub tagged_packets: u64,
    /// Distinct target device addresses, sorted.
    pub targets: Vec<String>,
    /// Sequence numbers skipped, when sequence tracking is available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lost_packets: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_rate: Option<f64>,
    /// Packets repeating the previous sequence number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_packets: Option<u64>,
    /// Packets arriving with an older sequence number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reordered_packets: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burst_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_burst_len: Option<u64>,
    /// Inter-arrival jitter in milliseconds, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jitter_ms: Option<f64>,
}

/// Datagrams exchanged between one client endpoint and one device endpoint.
///
/// The device side is the endpoint bound to the LIFX port, so a request and
/// its reply land in the same conversation.
///
/// # Examples
/// ```
/// use lifxwire_core::ConversationSummary;
///
/// let conversation = ConversationSummary {
///     app_proto: "lifx".to_string(),
///     client: "192.168.0.10:50000".to_string(),
///     device: "192.168.0.255:56700".to_string(),
///     to_device: 1,
///     from_device: 0,
///     lifx_messages: 1,
///     bytes: 36,
///     pps: None,
///     bps: None,
///     iat_jitter_ms: None,
///     max_iat_ms: None,
/// };
/// assert_eq!(conversation.to_device + conversation.from_device, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// "lifx" once any datagram carried a decodable header, else "udp".
    pub app_proto: String,
    /// Client endpoint in `ip:port` form.
    pub client: String,
    /// Device endpoint in `ip:port` form.
    pub device: String,
    pub to_device: u64,
    pub from_device: u64,
    /// Datagrams whose LIFX header decoded.
    pub lifx_messages: u64,
    /// UDP payload bytes in both directions.
    pub bytes: u64,
    /// Datagrams per second over the capture duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pps: Option<f64>,
    /// Bytes per second over the capture duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bps: Option<f64>,
    /// Inter-arrival jitter in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat_jitter_ms: Option<f64>,
    /// Maximum inter-arrival time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iat_ms: Option<u64>,
}

/// Compliance summary for a protocol.
///
/// # Examples
/// ```
/// use lifxwire_core::{ComplianceSummary, Violation};
///
/// let summary = ComplianceSummary {
///     protocol: "lifx".to_string(),
///     compliance_percentage: 100.0,
///     violations: vec![Violation {
///         id: "LX-PROTOCOL-NUMBER".to_string(),
///         severity: "warning".to_string(),
///         message: "Protocol number is not 1024".to_string(),
///         count: 1,
///         examples: Vec::new(),
///     }],
/// };
/// assert_eq!(summary.violations.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceSummary {
    /// Protocol name ("lifx").
    pub protocol: String,
    /// Share of inspected packets without violations (0.0–100.0).
    pub compliance_percentage: f64,
    /// Violations sorted by severity and ID.
    pub violations: Vec<Violation>,
}

/// Single compliance violation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Stable violation identifier (e.g., `LX-UNKNOWN-TYPE`).
    pub id: String,
    /// Severity label (`error` or `warning`).
    pub severity: String,
    /// Human-readable message explaining the violation.
    pub message: String,
    /// Number of occurrences aggregated into this violation.
    pub count: u64,
    /// At most three example contexts, formatted as `source ip:port @ ts`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use lifxwire_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert_eq!(report.tool.name, "lifxwire");
/// assert!(report.messages.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "lifxwire".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        messages: vec![],
        clients: vec![],
        conversations: vec![],
        compliance: vec![],
    }
}
