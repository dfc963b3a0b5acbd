//! Packet sources feeding captured traffic into the decoder.
//!
//! All file I/O lives here; decoding and state stay pure.

mod pcap;

pub use pcap::PcapFileSource;

use pcap_parser::Linktype;
use thiserror::Error;

use pcap::error::PcapSourceError;

/// One captured link-layer frame.
#[derive(Debug, Clone)]
pub struct PacketEvent {
    /// Capture time in seconds since the Unix epoch, when recorded.
    pub ts: Option<f64>,
    pub linktype: Linktype,
    pub data: Vec<u8>,
}

pub trait PacketSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError>;
}

/// Source over frames already held in memory.
#[derive(Debug, Default)]
pub struct MemorySource {
    events: std::collections::VecDeque<PacketEvent>,
}

impl MemorySource {
    pub fn new(events: impl IntoIterator<Item = PacketEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl PacketSource for MemorySource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        Ok(self.events.pop_front())
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Pcap(String),
}

impl From<PcapSourceError> for SourceError {
    fn from(value: PcapSourceError) -> Self {
        match value {
            PcapSourceError::Io(err) => SourceError::Io(err),
            other => SourceError::Pcap(other.to_string()),
        }
    }
}
