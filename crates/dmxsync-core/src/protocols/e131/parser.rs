use std::fmt;

use super::error::DecodeError;
use super::layout;
use super::reader::E131Reader;

/// Sender component identifier carried in the root layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cid(pub [u8; layout::CID_LEN]);

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootLayer {
    pub vector: u32,
    pub cid: Cid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataFraming<'a> {
    /// Raw 64-byte source name field, NUL padded.
    pub source_name: &'a [u8],
    pub priority: u8,
    pub sync_address: u16,
    pub sequence: u8,
    /// Options flags. Parsed but not acted on.
    pub options: u8,
    pub universe: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncFraming {
    pub sequence: u8,
    pub sync_address: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmpLayer<'a> {
    /// Start code plus channel count, as claimed on the wire.
    pub value_count: u16,
    /// Start code followed by channel values, clamped to the buffer.
    pub values: &'a [u8],
}

/// A decoded data packet, borrowing the datagram it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataPacket<'a> {
    pub root: RootLayer,
    pub framing: DataFraming<'a>,
    pub dmp: DmpLayer<'a>,
}

impl<'a> DataPacket<'a> {
    /// Start code, when the packet carries channel data.
    pub fn start_code(&self) -> Option<u8> {
        if self.dmp.value_count > 1 {
            self.dmp.values.first().copied()
        } else {
            None
        }
    }

    /// Channel values following the start code, at most 512.
    pub fn channels(&self) -> &'a [u8] {
        if self.dmp.value_count <= 1 {
            return &[];
        }
        let claimed = usize::from(self.dmp.value_count - 1).min(layout::DMX_MAX_SLOTS);
        let available = self.dmp.values.get(1..).unwrap_or(&[]);
        &available[..claimed.min(available.len())]
    }

    /// Source name up to the first NUL, lossily decoded and trimmed.
    pub fn source_name(&self) -> Option<String> {
        let raw = self.framing.source_name;
        let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
        let name = String::from_utf8_lossy(&raw[..end]);
        let trimmed = name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPacket {
    pub root: RootLayer,
    pub framing: SyncFraming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum E131Packet<'a> {
    Data(DataPacket<'a>),
    Sync(SyncPacket),
}

/// Decode a datagram into a data or synchronization packet.
///
/// Layers are validated outermost first and decoding stops at the first
/// failed check.
///
/// # Examples
/// ```
/// use dmxsync_core::{DecodeError, parse_packet};
///
/// let err = parse_packet(&[0u8; 12]).unwrap_err();
/// assert!(matches!(err, DecodeError::TooShort { needed: 38, .. }));
/// ```
pub fn parse_packet(payload: &[u8]) -> Result<E131Packet<'_>, DecodeError> {
    let reader = E131Reader::new(payload);
    let root = parse_root_layer(&reader)?;

    match root.vector {
        layout::ROOT_VECTOR_DATA => {
            let framing = parse_data_framing(&reader)?;
            let dmp = parse_dmp_layer(&reader)?;
            Ok(E131Packet::Data(DataPacket { root, framing, dmp }))
        }
        layout::ROOT_VECTOR_EXTENDED => {
            let framing = parse_sync_framing(&reader)?;
            Ok(E131Packet::Sync(SyncPacket { root, framing }))
        }
        value => Err(DecodeError::InvalidRootVector { value }),
    }
}

pub fn parse_root_layer(reader: &E131Reader<'_>) -> Result<RootLayer, DecodeError> {
    reader.require_len(layout::ROOT_MIN_LEN)?;

    let preamble = reader.read_u16_be(layout::PREAMBLE_SIZE_RANGE.clone())?;
    if preamble != layout::PREAMBLE_SIZE {
        return Err(DecodeError::InvalidPreamble { value: preamble });
    }
    let postamble = reader.read_u16_be(layout::POSTAMBLE_SIZE_RANGE.clone())?;
    if postamble != layout::POSTAMBLE_SIZE {
        return Err(DecodeError::InvalidPostamble { value: postamble });
    }

    let acn_pid = reader.read_slice(layout::ACN_PID_RANGE.clone())?;
    if acn_pid != layout::ACN_PID {
        return Err(DecodeError::InvalidAcnPid);
    }

    let root_length = reader.read_pdu_length(layout::ROOT_LENGTH_RANGE.clone())?;
    if root_length + layout::ROOT_LENGTH_BASE > reader.len() {
        return Err(DecodeError::RootLengthOverrun {
            claimed: root_length,
            actual: reader.len(),
        });
    }

    let vector = reader.read_u32_be(layout::ROOT_VECTOR_RANGE.clone())?;
    if vector != layout::ROOT_VECTOR_DATA && vector != layout::ROOT_VECTOR_EXTENDED {
        return Err(DecodeError::InvalidRootVector { value: vector });
    }
    let cid = Cid(reader.read_cid()?);

    Ok(RootLayer { vector, cid })
}

pub fn parse_data_framing<'a>(reader: &E131Reader<'a>) -> Result<DataFraming<'a>, DecodeError> {
    reader.require_len(layout::DATA_MIN_LEN)?;
    check_framing_length(reader)?;

    let vector = reader.read_u32_be(layout::FRAMING_VECTOR_RANGE.clone())?;
    if vector != layout::FRAMING_VECTOR_DATA_PACKET {
        return Err(DecodeError::InvalidFramingVector { value: vector });
    }

    Ok(DataFraming {
        source_name: reader.read_slice(layout::SOURCE_NAME_RANGE.clone())?,
        priority: reader.read_u8(layout::PRIORITY_OFFSET)?,
        sync_address: reader.read_u16_be(layout::DATA_SYNC_ADDRESS_RANGE.clone())?,
        sequence: reader.read_u8(layout::DATA_SEQUENCE_OFFSET)?,
        options: reader.read_u8(layout::OPTIONS_OFFSET)?,
        universe: reader.read_u16_be(layout::UNIVERSE_RANGE.clone())?,
    })
}

pub fn parse_sync_framing(reader: &E131Reader<'_>) -> Result<SyncFraming, DecodeError> {
    reader.require_len(layout::EXTENDED_MIN_LEN)?;
    check_framing_length(reader)?;

    match reader.read_u32_be(layout::FRAMING_VECTOR_RANGE.clone())? {
        layout::FRAMING_VECTOR_SYNCHRONIZATION => {}
        layout::FRAMING_VECTOR_DISCOVERY => return Err(DecodeError::UnsupportedDiscovery),
        value => return Err(DecodeError::InvalidFramingVector { value }),
    }

    reader.require_len(layout::SYNC_MIN_LEN)?;
    Ok(SyncFraming {
        sequence: reader.read_u8(layout::SYNC_SEQUENCE_OFFSET)?,
        sync_address: reader.read_u16_be(layout::SYNC_ADDRESS_RANGE.clone())?,
    })
}

pub fn parse_dmp_layer<'a>(reader: &E131Reader<'a>) -> Result<DmpLayer<'a>, DecodeError> {
    let value_count = reader.read_u16_be(layout::DMP_PROPERTY_VALUE_COUNT_RANGE.clone())?;
    if reader.len() < layout::DMP_VALUE_COUNT_BASE + usize::from(value_count) {
        return Err(DecodeError::ValueCountOverrun {
            count: value_count,
            actual: reader.len(),
        });
    }

    Ok(DmpLayer {
        value_count,
        values: reader.read_tail(layout::PROPERTY_VALUES_OFFSET, usize::from(value_count)),
    })
}

fn check_framing_length(reader: &E131Reader<'_>) -> Result<(), DecodeError> {
    let framing_length = reader.read_pdu_length(layout::FRAMING_LENGTH_RANGE.clone())?;
    if framing_length + layout::FRAMING_LENGTH_BASE > reader.len() {
        return Err(DecodeError::FramingLengthOverrun {
            claimed: framing_length,
            actual: reader.len(),
        });
    }
    Ok(())
}
