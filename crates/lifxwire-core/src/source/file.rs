use std::fs::File;
use std::path::Path;

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader,
    traits::PcapReaderIterator,
};
use tracing::debug;

use super::format::{CaptureFormat, Interface, interface_for, legacy_ts_to_seconds};
use super::layout;
use super::{CaptureError, CapturedFrame, FrameSource};

/// Frames read from a `.pcap` or `.pcapng` file; the container is picked from
/// the leading magic bytes, not the file name.
pub struct CaptureFile {
    format: CaptureFormat,
    reader: ContainerReader,
    delivered: u64,
}

enum ContainerReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
        nanosecond: bool,
    },
    Ng {
        reader: PcapNGReader<File>,
        interfaces: Vec<Interface>,
    },
}

/// Timestamp and link-layer bytes of one packet block.
type RawFrame = (Option<f64>, Linktype, Vec<u8>);

impl CaptureFile {
    pub fn open(path: &Path) -> Result<Self, CaptureError> {
        let mut file = File::open(path)?;
        let format = CaptureFormat::sniff(&mut file)?;
        let reader = match format {
            CaptureFormat::PcapNg => ContainerReader::Ng {
                reader: PcapNGReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
                    .map_err(|e| malformed(format, "reading the section header", e))?,
                interfaces: Vec::new(),
            },
            CaptureFormat::Pcap => ContainerReader::Legacy {
                reader: LegacyPcapReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
                    .map_err(|e| malformed(format, "reading the file header", e))?,
                linktype: None,
                nanosecond: false,
            },
        };
        debug!(path = %path.display(), %format, "capture opened");
        Ok(Self {
            format,
            reader,
            delivered: 0,
        })
    }

    pub fn format(&self) -> CaptureFormat {
        self.format
    }

    fn next_raw(&mut self) -> Result<Option<RawFrame>, CaptureError> {
        let format = self.format;
        loop {
            match &mut self.reader {
                ContainerReader::Legacy {
                    reader,
                    linktype,
                    nanosecond,
                } => match reader.next() {
                    Ok((offset, block)) => {
                        let raw = match block {
                            PcapBlockOwned::LegacyHeader(header) => {
                                *linktype = Some(header.network);
                                *nanosecond = header.is_nanosecond_precision();
                                None
                            }
                            PcapBlockOwned::Legacy(packet) => Some((
                                Some(legacy_ts_to_seconds(packet.ts_sec, packet.ts_usec, *nanosecond)),
                                linktype.unwrap_or(Linktype::ETHERNET),
                                packet.data.to_vec(),
                            )),
                            _ => None,
                        };
                        reader.consume(offset);
                        if raw.is_some() {
                            return Ok(raw);
                        }
                    }
                    Err(PcapError::Eof) => return Ok(None),
                    Err(PcapError::Incomplete(_)) => reader
                        .refill()
                        .map_err(|e| malformed(format, "refilling the read buffer", e))?,
                    Err(e) => return Err(malformed(format, "reading a record", e)),
                },
                ContainerReader::Ng { reader, interfaces } => match reader.next() {
                    Ok((offset, block)) => {
                        let raw = match block {
                            PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                                interfaces.push(Interface::new(
                                    intf.linktype,
                                    intf.if_tsresol,
                                    intf.if_tsoffset,
                                ));
                                None
                            }
                            PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => {
                                let interface = interface_for(interfaces, packet.if_id);
                                Some((
                                    Some(interface.ts_to_seconds(packet.ts_high, packet.ts_low)),
                                    interface.linktype,
                                    packet.data.to_vec(),
                                ))
                            }
                            _ => None,
                        };
                        reader.consume(offset);
                        if raw.is_some() {
                            return Ok(raw);
                        }
                    }
                    Err(PcapError::Eof) => return Ok(None),
                    Err(PcapError::Incomplete(_)) => reader
                        .refill()
                        .map_err(|e| malformed(format, "refilling the read buffer", e))?,
                    Err(e) => return Err(malformed(format, "reading a block", e)),
                },
            }
        }
    }
}

impl FrameSource for CaptureFile {
    fn next_frame(&mut self) -> Result<Option<CapturedFrame>, CaptureError> {
        let Some((timestamp, linktype, bytes)) = self.next_raw()? else {
            return Ok(None);
        };
        self.delivered += 1;
        Ok(Some(CapturedFrame {
            number: self.delivered,
            timestamp,
            linktype,
            bytes,
        }))
    }
}

fn malformed<E: std::fmt::Display>(format: CaptureFormat, stage: &'static str, err: E) -> CaptureError {
    CaptureError::Malformed {
        format,
        stage,
        message: err.to_string(),
    }
}
