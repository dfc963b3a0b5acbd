use crate::protocols::e131::{DataPacket, SyncPacket};

use super::table::UniverseTable;

/// What a successfully decoded datagram did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Data written and immediately visible (sync address 0).
    Committed { universe: u16, channels: usize },
    /// Data written to the inactive buffer, waiting for a sync packet.
    Staged {
        universe: u16,
        channels: usize,
        sync_address: u16,
    },
    /// Sync packet accepted; `universes` bound universes swapped together.
    Synchronized { sync_address: u16, universes: usize },
    Ignored(IgnoreReason),
}

/// Why a well-formed packet left the table untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Universe or sync address outside the managed range.
    OutOfRange { address: u16 },
    /// Sequence number rejected as stale or duplicate.
    StaleSequence { address: u16, sequence: u8 },
    /// Sync packet addressed to universe 0.
    ZeroSyncAddress,
}

impl IgnoreReason {
    pub fn kind(&self) -> &'static str {
        match self {
            IgnoreReason::OutOfRange { .. } => "out_of_range",
            IgnoreReason::StaleSequence { .. } => "stale_sequence",
            IgnoreReason::ZeroSyncAddress => "zero_sync_address",
        }
    }
}

/// Stage an accepted data packet into its universe and auto-commit when it
/// is not bound to a sync address.
pub(crate) fn commit_data(table: &mut UniverseTable, packet: &DataPacket<'_>) -> Applied {
    let number = packet.framing.universe;
    let Some(universe) = table.universe_mut(number) else {
        return Applied::Ignored(IgnoreReason::OutOfRange { address: number });
    };

    let sequence = packet.framing.sequence;
    if !universe.data_gate_mut().accept(sequence) {
        return Applied::Ignored(IgnoreReason::StaleSequence {
            address: number,
            sequence,
        });
    }

    let channels = match packet.start_code() {
        Some(start_code) => universe.inactive_mut().write(start_code, packet.channels()),
        None => 0,
    };

    let sync_address = packet.framing.sync_address;
    universe.bind_sync_address(sync_address);
    if sync_address == 0 {
        universe.swap();
        Applied::Committed {
            universe: number,
            channels,
        }
    } else {
        Applied::Staged {
            universe: number,
            channels,
            sync_address,
        }
    }
}

/// Swap every universe bound to the packet's sync address.
///
/// The sequence is tracked on the universe whose number equals the sync
/// address, so that address must itself be managed by the table.
pub(crate) fn commit_sync(table: &mut UniverseTable, packet: &SyncPacket) -> Applied {
    let sync_address = packet.framing.sync_address;
    if sync_address == 0 {
        return Applied::Ignored(IgnoreReason::ZeroSyncAddress);
    }
    let Some(anchor) = table.universe_mut(sync_address) else {
        return Applied::Ignored(IgnoreReason::OutOfRange {
            address: sync_address,
        });
    };

    let sequence = packet.framing.sequence;
    if !anchor.sync_gate_mut().accept(sequence) {
        return Applied::Ignored(IgnoreReason::StaleSequence {
            address: sync_address,
            sequence,
        });
    }

    Applied::Synchronized {
        sync_address,
        universes: table.swap_bound(sync_address),
    }
}
