use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::protocol::{ProtocolError, Result};

pub const LABEL_LEN: usize = 32;

/// Fixed 32-byte, NUL-padded label as carried on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label([u8; LABEL_LEN]);

impl Label {
    /// Build a label from text.
    ///
    /// # Errors
    /// `LabelTooLong` when the UTF-8 encoding exceeds 32 bytes.
    pub fn new(text: &str) -> Result<Self> {
        let bytes = text.as_bytes();
        if bytes.len() > LABEL_LEN {
            return Err(ProtocolError::LabelTooLong {
                len: bytes.len(),
                max: LABEL_LEN,
            });
        }
        Ok(Self::truncated(bytes))
    }

    /// Build a label from the first 32 bytes of `bytes`.
    pub fn truncated(bytes: &[u8]) -> Self {
        Self(copy_truncated(bytes))
    }

    pub const fn from_raw(raw: [u8; LABEL_LEN]) -> Self {
        Self(raw)
    }

    pub fn as_bytes(&self) -> &[u8; LABEL_LEN] {
        &self.0
    }

    /// Text with NUL padding trimmed; invalid UTF-8 is replaced.
    pub fn to_text(&self) -> String {
        trimmed_text(&self.0)
    }
}

impl Default for Label {
    fn default() -> Self {
        Self([0; LABEL_LEN])
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({:?})", self.to_text())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

pub(crate) fn copy_truncated<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    let len = bytes.len().min(N);
    out[..len].copy_from_slice(&bytes[..len]);
    out
}

pub(crate) fn trimmed_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\0')
        .to_string()
}

/// Convert a transition duration to the 32-bit millisecond wire value.
pub(crate) fn duration_to_millis(field: &'static str, duration: Duration) -> Result<u32> {
    let millis = duration.as_millis();
    u32::try_from(millis).map_err(|_| ProtocolError::DurationOverflow { field, millis })
}

pub(crate) fn millis_to_duration(millis: u32) -> Duration {
    Duration::from_millis(u64::from(millis))
}

/// Interpret a nanosecond UNIX timestamp; zero means "not set".
pub fn nanos_to_datetime(nanos: u64) -> Option<OffsetDateTime> {
    if nanos == 0 {
        return None;
    }
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos)).ok()
}

pub(crate) fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub(crate) fn serialize_hex<T: AsRef<[u8]>, S: Serializer>(
    bytes: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex_string(bytes.as_ref()))
}

pub(crate) fn serialize_millis<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

pub(crate) fn serialize_nanos_time<S: Serializer>(
    nanos: &u64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let formatted = nanos_to_datetime(*nanos).and_then(|dt| dt.format(&Rfc3339).ok());
    match formatted {
        Some(text) => serializer.serialize_str(&text),
        None => serializer.serialize_u64(*nanos),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{
        Label, duration_to_millis, hex_string, millis_to_duration, nanos_to_datetime, trimmed_text,
    };
    use crate::protocol::ProtocolError;

    #[test]
    fn label_trims_padding() {
        let label = Label::new("Kitchen").unwrap();
        assert_eq!(label.as_bytes()[..7], *b"Kitchen");
        assert_eq!(label.as_bytes()[7], 0);
        assert_eq!(label.to_text(), "Kitchen");
    }

    #[test]
    fn only_trailing_padding_is_trimmed() {
        let mut raw = [0u8; 32];
        raw[1..4].copy_from_slice(b"den");
        assert_eq!(trimmed_text(&raw), "\0den");
        assert_eq!(Label::truncated(b"den\0\0").to_text(), "den");
    }

    #[test]
    fn label_rejects_oversized_text() {
        let text = "x".repeat(33);
        let err = Label::new(&text).unwrap_err();
        assert!(matches!(err, ProtocolError::LabelTooLong { len: 33, max: 32 }));
        assert_eq!(Label::truncated(text.as_bytes()).to_text().len(), 32);
    }

    #[test]
    fn duration_converts_to_millis() {
        assert_eq!(duration_to_millis("duration", Duration::from_millis(42)).unwrap(), 42);
        assert_eq!(millis_to_duration(66), Duration::from_millis(66));
    }

    #[test]
    fn duration_overflow_is_explicit() {
        let too_long = Duration::from_millis(u64::from(u32::MAX) + 1);
        let err = duration_to_millis("duration", too_long).unwrap_err();
        assert!(matches!(err, ProtocolError::DurationOverflow { millis, .. } if millis == u128::from(u32::MAX) + 1));

        let max = Duration::from_millis(u64::from(u32::MAX));
        assert_eq!(duration_to_millis("duration", max).unwrap(), u32::MAX);
    }

    #[test]
    fn zero_timestamp_is_unset() {
        assert!(nanos_to_datetime(0).is_none());
        let dt = nanos_to_datetime(1_500_000_000_000_000_000).unwrap();
        assert_eq!(dt.unix_timestamp(), 1_500_000_000);
    }

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(hex_string(&[0x00, 0x0a, 0xff]), "000aff");
    }
}
