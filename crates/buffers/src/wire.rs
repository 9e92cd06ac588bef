//! Wire types and tag packing.

use crate::BufferError;

/// Largest field number allowed by the format (2^29 - 1).
pub(crate) const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// The 3-bit suffix of a tag describing how the field body is laid out.
///
/// See <https://protobuf.dev/programming-guides/encoding/#structure>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// int32, int64, uint32, uint64, sint32, sint64, bool, enum.
    Varint = 0,
    /// fixed64, sfixed64, double. Eight little-endian bytes.
    Fixed64 = 1,
    /// string, bytes, embedded messages, packed repeated fields.
    LengthDelimited = 2,
    /// Deprecated group start. Only ever skipped.
    StartGroup = 3,
    /// Deprecated group end. Only ever skipped.
    EndGroup = 4,
    /// fixed32, sfixed32, float. Four little-endian bytes.
    Fixed32 = 5,
}

impl WireType {
    /// Packs a field number and wire type into a tag value.
    #[inline]
    pub fn tag(self, field_number: u32) -> u32 {
        (field_number << 3) | self as u32
    }
}

impl TryFrom<u8> for WireType {
    type Error = BufferError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            other => Err(BufferError::InvalidWireType(other)),
        }
    }
}

/// Splits a decoded tag into `(field_number, wire_type)`.
pub(crate) fn split_tag(tag: u64) -> Result<(u32, WireType), BufferError> {
    let wire_type = WireType::try_from((tag & 7) as u8)?;
    let number = tag >> 3;
    if number == 0 || number > MAX_FIELD_NUMBER as u64 {
        return Err(BufferError::InvalidFieldNumber);
    }
    Ok((number as u32, wire_type))
}
