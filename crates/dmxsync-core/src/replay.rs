use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, info};

use crate::capture::udp::parse_udp_datagram;
use crate::net::{DEFAULT_PORT, is_data_lost};
use crate::protocols::e131::layout::DMX_MAX_SLOTS;
use crate::source::{PacketEvent, PacketSource, PcapFileSource, SourceError};
use crate::state::commit::Applied;
use crate::state::table::UniverseTable;
use crate::{
    DEFAULT_GENERATED_AT, InputInfo, ReplayReport, ReplaySummary, UniverseSnapshot,
    apply::decode_and_apply, make_stub_report,
};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Replay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Destination port to accept; `None` feeds every UDP datagram.
    pub port: Option<u16>,
    /// Channels kept per universe snapshot.
    pub channels: usize,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            port: Some(DEFAULT_PORT),
            channels: DMX_MAX_SLOTS,
        }
    }
}

pub fn replay_pcap_file(
    path: &Path,
    table: &mut UniverseTable,
    options: &ReplayOptions,
) -> Result<ReplayReport, ReplayError> {
    let source = PcapFileSource::open(path)?;
    let mut report = replay_source(table, source, options)?;
    report.input = Some(InputInfo {
        path: path.display().to_string(),
        bytes: path.metadata()?.len(),
    });
    Ok(report)
}

/// Feed every matching UDP datagram of `source` through `decode_and_apply`.
pub fn replay_source<S: PacketSource>(
    table: &mut UniverseTable,
    mut source: S,
    options: &ReplayOptions,
) -> Result<ReplayReport, ReplayError> {
    let mut summary = ReplaySummary::default();
    let mut first_ts = None;
    let mut last_ts = None;
    let mut last_update: BTreeMap<u16, f64> = BTreeMap::new();

    while let Some(PacketEvent { ts, linktype, data }) = source.next_packet()? {
        summary.frames_total += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);

        let datagram = match parse_udp_datagram(linktype, &data) {
            Ok(Some(datagram)) => datagram,
            Ok(None) => continue,
            Err(err) => {
                debug!(error = %err, "skipping unparseable frame");
                continue;
            }
        };
        if options.port.is_some_and(|port| port != datagram.dst_port) {
            continue;
        }
        summary.datagrams += 1;

        match decode_and_apply(table, datagram.payload) {
            Ok(applied) => record_applied(&mut summary, &mut last_update, applied, ts),
            Err(err) => *summary.decode_errors.entry(err.kind().to_string()).or_default() += 1,
        }
    }

    info!(
        frames = summary.frames_total,
        datagrams = summary.datagrams,
        committed = summary.committed,
        staged = summary.staged,
        synchronized = summary.synchronized,
        "replay finished"
    );

    summary.time_start = ts_to_rfc3339(first_ts);
    summary.time_end = ts_to_rfc3339(last_ts);

    let mut report = make_stub_report(None);
    report.generated_at = summary
        .time_end
        .clone()
        .or_else(|| summary.time_start.clone())
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.universes = build_snapshots(table, &last_update, last_ts, options.channels);
    report.summary = summary;
    Ok(report)
}

fn record_applied(
    summary: &mut ReplaySummary,
    last_update: &mut BTreeMap<u16, f64>,
    applied: Applied,
    ts: Option<f64>,
) {
    match applied {
        Applied::Committed { universe, .. } => {
            summary.committed += 1;
            mark_update(last_update, universe, ts);
        }
        Applied::Staged { universe, .. } => {
            summary.staged += 1;
            mark_update(last_update, universe, ts);
        }
        Applied::Synchronized { .. } => summary.synchronized += 1,
        Applied::Ignored(reason) => {
            *summary.ignored.entry(reason.kind().to_string()).or_default() += 1;
        }
    }
}

fn mark_update(last_update: &mut BTreeMap<u16, f64>, universe: u16, ts: Option<f64>) {
    if let Some(ts) = ts {
        last_update.insert(universe, ts);
    }
}

fn build_snapshots(
    table: &UniverseTable,
    last_update: &BTreeMap<u16, f64>,
    end_ts: Option<f64>,
    channels: usize,
) -> Vec<UniverseSnapshot> {
    let channels = channels.min(DMX_MAX_SLOTS);
    table
        .iter()
        .map(|(number, universe)| {
            let seen = last_update.get(&number).copied();
            let active = universe.active();
            UniverseSnapshot {
                universe: number,
                sync_address: universe.sync_address(),
                last_data_sequence: universe.last_data_sequence(),
                last_sync_sequence: universe.last_sync_sequence(),
                last_update: ts_to_rfc3339(seen),
                stale: seen.zip(end_ts).map(|(seen, end)| is_data_lost(seen, end)),
                start_code: active.start_code,
                slots: active.slots[..channels].to_vec(),
            }
        })
        .collect()
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else {
        return;
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
