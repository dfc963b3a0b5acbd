//! Wire builders shared by the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use etherparse::PacketBuilder;

pub const SACN_PORT: u16 = 5568;

const ACN_PID: &[u8; 12] = b"ASC-E1.17\0\0\0";
const PREAMBLE_SIZE: u16 = 0x0010;
const ROOT_VECTOR_DATA: u32 = 0x0000_0004;
const ROOT_VECTOR_EXTENDED: u32 = 0x0000_0008;
const FRAMING_VECTOR_DATA: u32 = 0x0000_0002;
const FRAMING_VECTOR_SYNC: u32 = 0x0000_0001;
const FRAMING_VECTOR_DISCOVERY: u32 = 0x0000_0002;
const DMP_VECTOR_SET_PROPERTY: u8 = 0x02;
const PDU_FLAGS: u16 = 0x7000;

/// A data packet whose DMP values are `values`, start code first.
pub fn data_packet(universe: u16, sequence: u8, sync_address: u16, values: &[u8]) -> Vec<u8> {
    let len = 125 + values.len();
    let mut packet = root_layer(len, ROOT_VECTOR_DATA);
    packet[38..40].copy_from_slice(&pdu_length(len - 38));
    packet[40..44].copy_from_slice(&FRAMING_VECTOR_DATA.to_be_bytes());
    packet[44..56].copy_from_slice(b"dmxsync test");
    packet[108] = 100;
    packet[109..111].copy_from_slice(&sync_address.to_be_bytes());
    packet[111] = sequence;
    packet[113..115].copy_from_slice(&universe.to_be_bytes());
    packet[115..117].copy_from_slice(&pdu_length(len - 115));
    packet[117] = DMP_VECTOR_SET_PROPERTY;
    packet[118] = 0xa1;
    packet[121..123].copy_from_slice(&1u16.to_be_bytes());
    packet[123..125].copy_from_slice(&(values.len() as u16).to_be_bytes());
    packet[125..].copy_from_slice(values);
    packet
}

pub fn sync_packet(sync_address: u16, sequence: u8) -> Vec<u8> {
    let len = 49;
    let mut packet = root_layer(len, ROOT_VECTOR_EXTENDED);
    packet[38..40].copy_from_slice(&pdu_length(len - 38));
    packet[40..44].copy_from_slice(&FRAMING_VECTOR_SYNC.to_be_bytes());
    packet[44] = sequence;
    packet[45..47].copy_from_slice(&sync_address.to_be_bytes());
    packet
}

/// An extended-root packet carrying the discovery framing vector.
pub fn discovery_packet() -> Vec<u8> {
    let len = 120;
    let mut packet = root_layer(len, ROOT_VECTOR_EXTENDED);
    packet[38..40].copy_from_slice(&pdu_length(len - 38));
    packet[40..44].copy_from_slice(&FRAMING_VECTOR_DISCOVERY.to_be_bytes());
    packet
}

fn root_layer(len: usize, vector: u32) -> Vec<u8> {
    let mut packet = vec![0u8; len];
    packet[0..2].copy_from_slice(&PREAMBLE_SIZE.to_be_bytes());
    packet[4..16].copy_from_slice(ACN_PID);
    packet[16..18].copy_from_slice(&pdu_length(len - 16));
    packet[18..22].copy_from_slice(&vector.to_be_bytes());
    for (idx, value) in packet[22..38].iter_mut().enumerate() {
        *value = idx as u8;
    }
    packet
}

fn pdu_length(len: usize) -> [u8; 2] {
    (PDU_FLAGS | len as u16).to_be_bytes()
}

/// Ethernet/IPv4/UDP frame carrying `payload` to the universe 1 group.
pub fn udp_frame(dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [0x01, 0x00, 0x5e, 0x7f, 0, 1])
        .ipv4([10, 0, 0, 1], [239, 255, 0, 1], 64)
        .udp(SACN_PORT, dst_port);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).expect("build udp frame");
    frame
}

/// Write a big-endian PCAPNG file with one Ethernet interface. Timestamps
/// are in microseconds.
pub fn write_pcapng(path: &Path, frames: &[(u64, Vec<u8>)]) {
    let mut output = Vec::new();
    output.extend_from_slice(&pcapng_block(0x0A0D0D0A, &section_header_body()));
    output.extend_from_slice(&pcapng_block(1, &interface_desc_body()));
    for (ts_us, data) in frames {
        output.extend_from_slice(&pcapng_block(6, &enhanced_packet_body(*ts_us, data)));
    }
    fs::write(path, output).expect("write pcapng");
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (8 + body.len() + 4) as u32;
    let mut block = Vec::with_capacity(total_len as usize);
    block.extend_from_slice(&block_type.to_be_bytes());
    block.extend_from_slice(&total_len.to_be_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_be_bytes());
    block
}

fn section_header_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x1A2B3C4Du32.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&(-1i64).to_be_bytes());
    body
}

fn interface_desc_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&65535u32.to_be_bytes());
    body
}

fn enhanced_packet_body(ts_us: u64, data: &[u8]) -> Vec<u8> {
    let cap_len = data.len() as u32;
    let mut body = Vec::new();
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&((ts_us >> 32) as u32).to_be_bytes());
    body.extend_from_slice(&(ts_us as u32).to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(data);
    body.resize(body.len() + (4 - data.len() % 4) % 4, 0);
    body
}
