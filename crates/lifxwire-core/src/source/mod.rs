//! Captured link-layer frames.
//!
//! A `FrameSource` hands the analyzer one frame at a time, numbered from 1 in
//! capture order; `CaptureFile` reads them from legacy PCAP or PCAPNG. Frames
//! are never buffered past the one being returned.

mod file;
mod format;
mod layout;

pub use file::CaptureFile;
pub use format::CaptureFormat;

use pcap_parser::Linktype;
use thiserror::Error;

/// One frame as recorded by the capture tool.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// 1-based position in the capture.
    pub number: u64,
    /// Seconds since the UNIX epoch, when the capture recorded a time.
    pub timestamp: Option<f64>,
    pub linktype: Linktype,
    pub bytes: Vec<u8>,
}

/// Pull-based frame stream; `Ok(None)` marks the end of the capture.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<CapturedFrame>, CaptureError>;
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("cannot read capture: {0}")]
    Io(#[from] std::io::Error),
    /// The container itself is damaged; frames before it were delivered.
    #[error("malformed {format} capture while {stage}: {message}")]
    Malformed {
        format: CaptureFormat,
        stage: &'static str,
        message: String,
    },
}
