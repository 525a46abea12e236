use thiserror::Error;

/// Reasons a captured frame yields no UDP datagram.
#[derive(Debug, Error)]
pub enum UdpError {
    #[error("packet slice error: {0}")]
    Slice(String),
    #[error("missing network layer in packet")]
    MissingNetworkLayer,
    #[error("missing IP payload in packet")]
    MissingIpPayload,
    #[error("segment too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("UDP length {declared} does not fit the {available}-byte segment")]
    BadLength { declared: usize, available: usize },
}
