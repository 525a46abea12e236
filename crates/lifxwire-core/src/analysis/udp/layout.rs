//! UDP header layout.

use std::ops::Range;

/// Fixed UDP header length (source port, destination port, length, checksum).
pub const UDP_HEADER_LEN: usize = 8;

/// Big-endian segment length, header included.
pub const UDP_LENGTH_RANGE: Range<usize> = 4..6;
