//! E1.31 (sACN) protocol decoding.
//!
//! The parser validates the ACN root envelope (preamble, postamble, packet
//! identifier, root length, root vector), then the framing layer selected by
//! the root vector, and for data packets the DMP property value count.
//! Synchronization packets ride the extended root vector; universe discovery
//! is recognized and rejected.
//!
//! All reads are bounds-checked against the datagram; a claimed layer length
//! larger than the buffer rejects the packet before any field is trusted.
//! Wire-format details are defined in `layout`, safe reads live in `reader`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::DecodeError;
pub use parser::{
    Cid, DataFraming, DataPacket, DmpLayer, E131Packet, RootLayer, SyncFraming, SyncPacket,
    parse_packet,
};
