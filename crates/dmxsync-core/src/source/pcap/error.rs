use std::fmt;

use thiserror::Error;

/// Container format of a capture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Pcap,
    PcapNg,
}

impl fmt::Display for CaptureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureFormat::Pcap => f.write_str("pcap"),
            CaptureFormat::PcapNg => f.write_str("pcapng"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PcapSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The header could not be read by the format's reader.
    #[error("cannot open {format} capture: {message}")]
    Open {
        format: CaptureFormat,
        message: String,
    },
    /// A block past the header is malformed or the refill failed.
    #[error("corrupt {format} block: {message}")]
    Block {
        format: CaptureFormat,
        message: String,
    },
}
