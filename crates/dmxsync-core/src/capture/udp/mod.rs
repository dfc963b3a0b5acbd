pub mod error;
pub mod parser;

pub use error::UdpError;
pub use parser::{UdpDatagram, parse_udp_datagram};
