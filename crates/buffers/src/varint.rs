//! Base-128 varints and zigzag mapping.
//!
//! Each byte holds seven payload bits, least-significant group first; the high
//! bit is set on every byte except the last. A `u64` needs at most ten bytes,
//! and only the lowest bit of the tenth byte may carry payload.
//!
//! Zigzag maps signed integers onto unsigned ones so that values of small
//! magnitude stay short: `0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, ...`. It is used
//! only for `sint32`/`sint64`. Plain `int32`/`int64` varint-encode the
//! sign-extended two's-complement pattern, so any negative value costs ten
//! bytes.

use crate::BufferError;

/// Maximum number of bytes for an encoded varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Appends `value` to `out` as a varint.
pub fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
    while value > 0x7f {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Writes `value` as a varint into the start of `out` and returns the number
/// of bytes written. `out` must hold at least [`encoded_len`] bytes.
#[inline]
pub(crate) fn write_varint_into(mut value: u64, out: &mut [u8]) -> usize {
    let mut i = 0;
    while value > 0x7f {
        out[i] = (value as u8 & 0x7f) | 0x80;
        value >>= 7;
        i += 1;
    }
    out[i] = value as u8;
    i + 1
}

/// Returns the number of bytes `value` occupies as a varint.
#[inline]
pub fn encoded_len(value: u64) -> usize {
    // One byte per started group of seven significant bits.
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Decodes a varint from the start of `buf`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize), BufferError> {
    let mut value = 0u64;
    for index in 0..MAX_VARINT_LEN {
        let Some(&byte) = buf.get(index) else {
            return Err(BufferError::UnexpectedEof);
        };
        if index == MAX_VARINT_LEN - 1 && byte > 0x01 {
            return Err(BufferError::MalformedVarint);
        }
        value |= ((byte & 0x7f) as u64) << (index * 7);
        if byte & 0x80 == 0 {
            return Ok((value, index + 1));
        }
    }
    Err(BufferError::MalformedVarint)
}

#[inline]
pub fn zigzag32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

#[inline]
pub fn unzigzag32(z: u32) -> i32 {
    ((z >> 1) as i32) ^ -((z & 1) as i32)
}

#[inline]
pub fn zigzag64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

#[inline]
pub fn unzigzag64(z: u64) -> i64 {
    ((z >> 1) as i64) ^ -((z & 1) as i64)
}
