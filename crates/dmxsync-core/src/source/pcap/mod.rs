//! PCAP/PCAPNG capture source.
//!
//! Reads legacy PCAP and PCAPNG files and yields captured link-layer frames
//! with their timestamps, for replay into a universe table.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
