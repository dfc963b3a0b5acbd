//! Frame-level decoding for captured traffic.
//!
//! Captures hold link-layer frames; the E1.31 decoder only wants the UDP
//! datagram inside. `udp` peels Ethernet or raw IP framing off with
//! etherparse and hands back the destination port and the datagram payload.

pub mod udp;
