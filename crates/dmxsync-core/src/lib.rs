//! dmxsync core library: E1.31 (sACN) decoding and synchronized DMX state.
//!
//! A transport hands each received datagram to [`decode_and_apply`], which
//! validates the root, framing and DMP layers (layout/reader/parser) and then
//! applies the packet to a caller-owned [`UniverseTable`]. Each universe is
//! double-buffered: data lands in the inactive buffer and becomes visible by
//! swapping, either immediately or when a synchronization packet for the
//! universe's sync address arrives.
//!
//! Decoding and state changes are synchronous and perform no I/O. File I/O
//! for capture replay lives in `source` and is driven by `replay`.
//!
//! Invariants:
//! - A rejected datagram never mutates the table.
//! - Consumers only ever observe whole frames in the active buffer.
//! - Universes sharing a sync address swap together under one `&mut`.
//!
//! # Examples
//! ```
//! use dmxsync_core::{UniverseTable, decode_and_apply};
//!
//! let mut table = UniverseTable::new(1, 4)?;
//! let datagram = [0u8; 8];
//! assert!(decode_and_apply(&mut table, &datagram).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod apply;
mod capture;
mod net;
mod protocols;
mod replay;
mod source;
mod state;
#[cfg(test)]
mod test_support;

pub use apply::decode_and_apply;
pub use capture::udp::{UdpDatagram, UdpError, parse_udp_datagram};
pub use net::{
    DEFAULT_PORT, DEFAULT_PRIORITY, MULTICAST_BASE, NETWORK_DATA_LOSS_TIMEOUT,
    UNIVERSE_DISCOVERY_INTERVAL, is_data_lost, multicast_group,
};
pub use protocols::e131::{
    Cid, DataFraming, DataPacket, DecodeError, DmpLayer, E131Packet, RootLayer, SyncFraming,
    SyncPacket, parse_packet,
};
pub use replay::{ReplayError, ReplayOptions, replay_pcap_file, replay_source};
pub use source::{MemorySource, PacketEvent, PacketSource, PcapFileSource, SourceError};
pub use state::{
    Applied, DmxFrame, IgnoreReason, MAX_UNIVERSE, MIN_UNIVERSE, SEQUENCE_WINDOW, SequenceGate,
    SharedUniverseTable, TableError, Universe, UniverseTable,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Result of replaying captured traffic into a universe table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 time of the last replayed frame, or the epoch.
    pub generated_at: String,
    /// Capture file metadata, when replaying from a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<InputInfo>,
    pub summary: ReplaySummary,
    /// Active state of every managed universe after the replay, ascending.
    pub universes: Vec<UniverseSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the replayer.
    pub path: String,
    pub bytes: u64,
}

/// Counters gathered while replaying.
///
/// # Examples
/// ```
/// use dmxsync_core::ReplaySummary;
///
/// let summary = ReplaySummary::default();
/// assert_eq!(summary.frames_total, 0);
/// assert!(summary.decode_errors.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Captured frames read from the source.
    pub frames_total: u64,
    /// UDP datagrams handed to the decoder.
    pub datagrams: u64,
    pub committed: u64,
    pub staged: u64,
    pub synchronized: u64,
    /// Well-formed packets that changed nothing, keyed by reason.
    pub ignored: BTreeMap<String, u64>,
    /// Rejected datagrams keyed by error kind.
    pub decode_errors: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Visible state of one universe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseSnapshot {
    pub universe: u16,
    /// 0 when the universe commits without synchronization.
    pub sync_address: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_data_sequence: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync_sequence: Option<u8>,
    /// RFC3339 time of the last accepted data packet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    /// Whether the last update is older than the data-loss timeout at the
    /// end of the capture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stale: Option<bool>,
    pub start_code: u8,
    /// Active channel values, possibly truncated.
    pub slots: Vec<u8>,
}

/// Build a report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use dmxsync_core::make_stub_report;
///
/// let report = make_stub_report(None);
/// assert_eq!(report.report_version, dmxsync_core::REPORT_VERSION);
/// assert!(report.universes.is_empty());
/// ```
pub fn make_stub_report(input: Option<InputInfo>) -> ReplayReport {
    ReplayReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "dmxsync".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input,
        summary: ReplaySummary::default(),
        universes: vec![],
    }
}
