use thiserror::Error;

/// Errors returned while extracting a UDP datagram from a captured frame.
#[derive(Debug, Error)]
pub enum UdpError {
    #[error("frame slice error: {0}")]
    Slice(String),
}
