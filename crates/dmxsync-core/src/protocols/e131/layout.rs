pub const PREAMBLE_SIZE_RANGE: std::ops::Range<usize> = 0..2;
pub const POSTAMBLE_SIZE_RANGE: std::ops::Range<usize> = 2..4;
pub const ACN_PID_RANGE: std::ops::Range<usize> = 4..16;

// Root layer. Lengths are the low 12 bits of a flags+length field.
pub const ROOT_LENGTH_RANGE: std::ops::Range<usize> = 16..18;
pub const ROOT_LENGTH_BASE: usize = 16;
pub const ROOT_VECTOR_RANGE: std::ops::Range<usize> = 18..22;
pub const CID_RANGE: std::ops::Range<usize> = 22..38;
pub const CID_LEN: usize = 16;

// Framing layer, shared prefix.
pub const FRAMING_LENGTH_RANGE: std::ops::Range<usize> = 38..40;
pub const FRAMING_LENGTH_BASE: usize = 38;
pub const FRAMING_VECTOR_RANGE: std::ops::Range<usize> = 40..44;

// Data framing layer.
pub const SOURCE_NAME_RANGE: std::ops::Range<usize> = 44..108;
pub const SOURCE_NAME_LEN: usize = 64;
pub const PRIORITY_OFFSET: usize = 108;
pub const DATA_SYNC_ADDRESS_RANGE: std::ops::Range<usize> = 109..111;
pub const DATA_SEQUENCE_OFFSET: usize = 111;
pub const OPTIONS_OFFSET: usize = 112;
pub const UNIVERSE_RANGE: std::ops::Range<usize> = 113..115;

// Synchronization framing layer.
pub const SYNC_SEQUENCE_OFFSET: usize = 44;
pub const SYNC_ADDRESS_RANGE: std::ops::Range<usize> = 45..47;

// DMP layer.
pub const DMP_PROPERTY_VALUE_COUNT_RANGE: std::ops::Range<usize> = 123..125;
pub const DMP_VALUE_COUNT_BASE: usize = 124;
pub const PROPERTY_VALUES_OFFSET: usize = 125;

pub const ACN_PID: &[u8; 12] = b"ASC-E1.17\0\0\0";
pub const PREAMBLE_SIZE: u16 = 0x0010;
pub const POSTAMBLE_SIZE: u16 = 0x0000;
pub const LENGTH_MASK: u16 = 0x0fff;

pub const ROOT_VECTOR_DATA: u32 = 0x0000_0004;
pub const ROOT_VECTOR_EXTENDED: u32 = 0x0000_0008;
pub const FRAMING_VECTOR_DATA_PACKET: u32 = 0x0000_0002;
pub const FRAMING_VECTOR_SYNCHRONIZATION: u32 = 0x0000_0001;
pub const FRAMING_VECTOR_DISCOVERY: u32 = 0x0000_0002;

/// Shortest buffer that can hold a root layer and its CID.
pub const ROOT_MIN_LEN: usize = 38;
pub const DATA_MIN_LEN: usize = 124;
pub const EXTENDED_MIN_LEN: usize = 44;
pub const SYNC_MIN_LEN: usize = 48;

pub const DMX_MAX_SLOTS: usize = 512;
