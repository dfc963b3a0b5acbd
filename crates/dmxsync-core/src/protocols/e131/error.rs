use thiserror::Error;

/// Errors returned by E1.31 decoding.
///
/// Every variant rejects a single datagram; none of them is fatal to the
/// receiver. Out-of-range addresses and stale sequences are not errors and
/// are reported through [`crate::Applied`] instead.
///
/// # Examples
/// ```
/// use dmxsync_core::DecodeError;
///
/// let err = DecodeError::InvalidRootVector { value: 1 };
/// assert!(err.to_string().contains("invalid root vector"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("invalid preamble size: {value:#06x}")]
    InvalidPreamble { value: u16 },
    #[error("invalid postamble size: {value:#06x}")]
    InvalidPostamble { value: u16 },
    #[error("invalid ACN PID")]
    InvalidAcnPid,
    #[error("root layer length {claimed} exceeds payload of {actual} bytes")]
    RootLengthOverrun { claimed: usize, actual: usize },
    #[error("invalid root vector: {value:#010x}")]
    InvalidRootVector { value: u32 },
    #[error("framing layer length {claimed} exceeds payload of {actual} bytes")]
    FramingLengthOverrun { claimed: usize, actual: usize },
    #[error("invalid framing vector: {value:#010x}")]
    InvalidFramingVector { value: u32 },
    #[error("universe discovery packets are not handled")]
    UnsupportedDiscovery,
    #[error("DMP value count {count} exceeds payload of {actual} bytes")]
    ValueCountOverrun { count: u16, actual: usize },
}

impl DecodeError {
    /// Stable, short identifier used when aggregating errors.
    ///
    /// ```
    /// use dmxsync_core::DecodeError;
    ///
    /// assert_eq!(DecodeError::InvalidAcnPid.kind(), "invalid_acn_pid");
    /// ```
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::TooShort { .. } => "too_short",
            DecodeError::InvalidPreamble { .. } => "invalid_preamble",
            DecodeError::InvalidPostamble { .. } => "invalid_postamble",
            DecodeError::InvalidAcnPid => "invalid_acn_pid",
            DecodeError::RootLengthOverrun { .. } => "root_length_overrun",
            DecodeError::InvalidRootVector { .. } => "invalid_root_vector",
            DecodeError::FramingLengthOverrun { .. } => "framing_length_overrun",
            DecodeError::InvalidFramingVector { .. } => "invalid_framing_vector",
            DecodeError::UnsupportedDiscovery => "unsupported_discovery",
            DecodeError::ValueCountOverrun { .. } => "value_count_overrun",
        }
    }
}
