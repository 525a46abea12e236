//! Capture file constants.

/// Section header block type; PCAPNG files start with these bytes.
pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];

/// Buffer size handed to the `pcap-parser` streaming readers.
pub const PCAP_READER_BUFFER_SIZE: usize = 65536;

/// PCAPNG timestamp units per second when `if_tsresol` is absent.
pub const DEFAULT_UNITS_PER_SECOND: f64 = 1e6;
