use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use pcap_parser::Linktype;

use super::layout;

/// On-disk capture container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Pcap,
    PcapNg,
}

impl CaptureFormat {
    pub fn name(self) -> &'static str {
        match self {
            CaptureFormat::Pcap => "pcap",
            CaptureFormat::PcapNg => "pcapng",
        }
    }

    /// Peek at the leading magic and rewind so the parser sees the whole file.
    ///
    /// # Errors
    /// I/O errors when fewer than four bytes can be read or the reader cannot
    /// seek back.
    pub fn sniff<R: Read + Seek>(reader: &mut R) -> std::io::Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(if magic == layout::PCAPNG_MAGIC {
            CaptureFormat::PcapNg
        } else {
            CaptureFormat::Pcap
        })
    }
}

impl fmt::Display for CaptureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Link type and clock of one PCAPNG interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Interface {
    pub linktype: Linktype,
    units_per_second: f64,
    offset_seconds: i64,
}

impl Default for Interface {
    fn default() -> Self {
        Self {
            linktype: Linktype::ETHERNET,
            units_per_second: layout::DEFAULT_UNITS_PER_SECOND,
            offset_seconds: 0,
        }
    }
}

impl Interface {
    /// `if_tsresol` uses a power of ten unless its top bit selects a power of two.
    pub fn new(linktype: Linktype, if_tsresol: u8, if_tsoffset: i64) -> Self {
        let exponent = i32::from(if_tsresol & 0x7f);
        let units_per_second = if if_tsresol & 0x80 == 0 {
            10f64.powi(exponent)
        } else {
            2f64.powi(exponent)
        };
        Self {
            linktype,
            units_per_second,
            offset_seconds: if_tsoffset,
        }
    }

    pub fn ts_to_seconds(&self, ts_high: u32, ts_low: u32) -> f64 {
        let units = (u64::from(ts_high) << 32) | u64::from(ts_low);
        units as f64 / self.units_per_second + self.offset_seconds as f64
    }
}

/// Interfaces are numbered in the order their description blocks appear;
/// unknown ids fall back to Ethernet with microsecond resolution.
pub(crate) fn interface_for(interfaces: &[Interface], if_id: u32) -> Interface {
    usize::try_from(if_id)
        .ok()
        .and_then(|idx| interfaces.get(idx))
        .copied()
        .unwrap_or_default()
}

/// Legacy PCAP stores seconds plus a micro- or nanosecond fraction.
pub(crate) fn legacy_ts_to_seconds(ts_sec: u32, ts_frac: u32, nanosecond: bool) -> f64 {
    let scale = if nanosecond { 1e-9 } else { 1e-6 };
    f64::from(ts_sec) + f64::from(ts_frac) * scale
}
