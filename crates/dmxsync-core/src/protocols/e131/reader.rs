use super::error::DecodeError;
use super::layout;

/// Bounds-checked big-endian access to an untrusted E1.31 datagram.
///
/// Offsets come from `layout`; every read returns `DecodeError::TooShort`
/// instead of indexing past the end of the buffer.
pub struct E131Reader<'a> {
    payload: &'a [u8],
}

impl<'a> E131Reader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn require_len(&self, needed: usize) -> Result<(), DecodeError> {
        if self.payload.len() < needed {
            return Err(DecodeError::TooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(DecodeError::TooShort {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, DecodeError> {
        let bytes = self.read_array::<2>(range)?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn read_u32_be(&self, range: std::ops::Range<usize>) -> Result<u32, DecodeError> {
        let bytes = self.read_array::<4>(range)?;
        Ok(u32::from_be_bytes(bytes))
    }

    pub fn read_array<const N: usize>(
        &self,
        range: std::ops::Range<usize>,
    ) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| DecodeError::TooShort {
            needed: N,
            actual: bytes.len(),
        })
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], DecodeError> {
        self.payload.get(range.clone()).ok_or(DecodeError::TooShort {
            needed: range.end,
            actual: self.payload.len(),
        })
    }

    /// Read a PDU flags+length field and keep only the 12 length bits.
    pub fn read_pdu_length(&self, range: std::ops::Range<usize>) -> Result<usize, DecodeError> {
        let raw = self.read_u16_be(range)?;
        Ok(usize::from(raw & layout::LENGTH_MASK))
    }

    pub fn read_cid(&self) -> Result<[u8; layout::CID_LEN], DecodeError> {
        self.read_array::<{ layout::CID_LEN }>(layout::CID_RANGE.clone())
    }

    /// Bytes from `offset` onward, capped at `max` bytes. Never fails: an
    /// offset past the end yields an empty slice.
    pub fn read_tail(&self, offset: usize, max: usize) -> &'a [u8] {
        let start = offset.min(self.payload.len());
        let end = start.saturating_add(max).min(self.payload.len());
        &self.payload[start..end]
    }
}
