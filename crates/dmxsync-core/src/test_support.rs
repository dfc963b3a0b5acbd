//! Datagram builders shared by unit tests.

use crate::protocols::e131::layout;

const PDU_FLAGS: u16 = 0x7000;
const DMP_LENGTH_RANGE: std::ops::Range<usize> = 115..117;
const DMP_VECTOR_OFFSET: usize = 117;
const DMP_ADDRESS_TYPE_OFFSET: usize = 118;
const DMP_ADDRESS_INCREMENT_RANGE: std::ops::Range<usize> = 121..123;
const SYNC_PACKET_LEN: usize = 49;
const SOURCE_NAME: &[u8] = b"dmxsync test";

pub(crate) fn cid_bytes() -> [u8; 16] {
    let mut cid = [0u8; 16];
    for (idx, value) in cid.iter_mut().enumerate() {
        *value = idx as u8;
    }
    cid
}

/// Data packet whose DMP values are `values` (start code first).
pub(crate) fn data_packet(
    universe: u16,
    sequence: u8,
    sync_address: u16,
    values: &[u8],
) -> Vec<u8> {
    let mut payload = vec![0u8; layout::PROPERTY_VALUES_OFFSET + values.len()];
    write_root(&mut payload, layout::ROOT_VECTOR_DATA);
    payload[layout::FRAMING_VECTOR_RANGE]
        .copy_from_slice(&layout::FRAMING_VECTOR_DATA_PACKET.to_be_bytes());
    payload[layout::SOURCE_NAME_RANGE.start..layout::SOURCE_NAME_RANGE.start + SOURCE_NAME.len()]
        .copy_from_slice(SOURCE_NAME);
    payload[layout::PRIORITY_OFFSET] = 100;
    payload[layout::DATA_SYNC_ADDRESS_RANGE].copy_from_slice(&sync_address.to_be_bytes());
    payload[layout::DATA_SEQUENCE_OFFSET] = sequence;
    payload[layout::UNIVERSE_RANGE].copy_from_slice(&universe.to_be_bytes());
    payload[DMP_VECTOR_OFFSET] = 0x02;
    payload[DMP_ADDRESS_TYPE_OFFSET] = 0xa1;
    payload[DMP_ADDRESS_INCREMENT_RANGE].copy_from_slice(&1u16.to_be_bytes());
    payload[layout::DMP_PROPERTY_VALUE_COUNT_RANGE]
        .copy_from_slice(&(values.len() as u16).to_be_bytes());
    payload[layout::PROPERTY_VALUES_OFFSET..].copy_from_slice(values);
    set_lengths(&mut payload);
    payload
}

pub(crate) fn sync_packet(sync_address: u16, sequence: u8) -> Vec<u8> {
    let mut payload = vec![0u8; SYNC_PACKET_LEN];
    write_root(&mut payload, layout::ROOT_VECTOR_EXTENDED);
    payload[layout::FRAMING_VECTOR_RANGE]
        .copy_from_slice(&layout::FRAMING_VECTOR_SYNCHRONIZATION.to_be_bytes());
    payload[layout::SYNC_SEQUENCE_OFFSET] = sequence;
    payload[layout::SYNC_ADDRESS_RANGE].copy_from_slice(&sync_address.to_be_bytes());
    set_lengths(&mut payload);
    payload
}

/// Rewrite every PDU length field so it matches the buffer length.
pub(crate) fn set_lengths(payload: &mut [u8]) {
    let len = payload.len();
    write_pdu_length(payload, layout::ROOT_LENGTH_RANGE, len - layout::ROOT_LENGTH_BASE);
    if len >= layout::FRAMING_LENGTH_RANGE.end {
        write_pdu_length(
            payload,
            layout::FRAMING_LENGTH_RANGE,
            len - layout::FRAMING_LENGTH_BASE,
        );
    }
    if len >= DMP_LENGTH_RANGE.end && payload[layout::ROOT_VECTOR_RANGE] == [0, 0, 0, 4] {
        write_pdu_length(payload, DMP_LENGTH_RANGE, len - DMP_LENGTH_RANGE.start);
    }
}

fn write_root(payload: &mut [u8], vector: u32) {
    payload[layout::PREAMBLE_SIZE_RANGE].copy_from_slice(&layout::PREAMBLE_SIZE.to_be_bytes());
    payload[layout::POSTAMBLE_SIZE_RANGE].copy_from_slice(&layout::POSTAMBLE_SIZE.to_be_bytes());
    payload[layout::ACN_PID_RANGE].copy_from_slice(layout::ACN_PID);
    payload[layout::ROOT_VECTOR_RANGE].copy_from_slice(&vector.to_be_bytes());
    payload[layout::CID_RANGE].copy_from_slice(&cid_bytes());
}

fn write_pdu_length(payload: &mut [u8], range: std::ops::Range<usize>, length: usize) {
    let field = PDU_FLAGS | (length as u16 & layout::LENGTH_MASK);
    payload[range].copy_from_slice(&field.to_be_bytes());
}
