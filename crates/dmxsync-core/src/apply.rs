use tracing::{debug, trace};

use crate::protocols::e131::{DecodeError, E131Packet, parse_packet};
use crate::state::commit::{Applied, commit_data, commit_sync};
use crate::state::table::UniverseTable;

/// Decode one datagram and apply it to `table`.
///
/// A decode failure at any layer returns the error and leaves the table
/// untouched. Packets for unmanaged universes and stale sequences are not
/// errors; they come back as [`Applied::Ignored`].
///
/// # Examples
/// ```
/// use dmxsync_core::{UniverseTable, decode_and_apply};
///
/// let mut table = UniverseTable::new(1, 4)?;
/// assert!(decode_and_apply(&mut table, &[0u8; 16]).is_err());
/// assert!(table.iter().all(|(_, u)| u.last_data_sequence().is_none()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode_and_apply(
    table: &mut UniverseTable,
    datagram: &[u8],
) -> Result<Applied, DecodeError> {
    let packet = parse_packet(datagram).inspect_err(|err| {
        debug!(len = datagram.len(), error = %err, "rejected E1.31 datagram");
    })?;

    let applied = match packet {
        E131Packet::Data(data) => {
            trace!(
                universe = data.framing.universe,
                sequence = data.framing.sequence,
                sync_address = data.framing.sync_address,
                value_count = data.dmp.value_count,
                cid = %data.root.cid,
                "data packet"
            );
            commit_data(table, &data)
        }
        E131Packet::Sync(sync) => {
            trace!(
                sync_address = sync.framing.sync_address,
                sequence = sync.framing.sequence,
                cid = %sync.root.cid,
                "sync packet"
            );
            commit_sync(table, &sync)
        }
    };

    trace!(?applied, "applied");
    Ok(applied)
}
