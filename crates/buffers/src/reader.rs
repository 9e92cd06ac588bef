//! Bounded cursor reader for the Protocol Buffers wire format.

use std::str;

use crate::varint::{self, unzigzag32, unzigzag64};
use crate::wire::split_tag;
use crate::{BufferError, WireType};

/// Group nesting accepted by [`Reader::skip_type`].
pub const DEFAULT_GROUP_DEPTH: usize = 100;

/// A binary buffer reader that reads data from a byte slice.
///
/// The reader keeps a cursor `x` that only moves forward and a hard bound
/// `end`. Every read checks the bound and returns an error instead of
/// panicking, and the cursor does not advance when a read fails.
///
/// Embedded messages are decoded by computing their end offset from the
/// length prefix (`pos() + len`) and looping while `pos()` is below it; see
/// [`skip_type`](Self::skip_type) for how unknown fields are stepped over.
///
/// # Example
///
/// ```
/// use protocodec_buffers::{Reader, WireType};
///
/// let data = [0x08, 0x96, 0x01, 0x12, 0x02, 0x68, 0x69];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.read_tag().unwrap(), (1, WireType::Varint));
/// assert_eq!(reader.read_uint32().unwrap(), 150);
/// assert_eq!(reader.read_tag().unwrap(), (2, WireType::LengthDelimited));
/// assert_eq!(reader.read_string().unwrap(), "hi");
/// assert!(reader.is_empty());
/// ```
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Creates a reader over `uint8[x..end]`, clamping `end` to the slice.
    pub fn from_slice(uint8: &'a [u8], x: usize, end: usize) -> Self {
        let end = end.min(uint8.len());
        Self {
            uint8,
            x: x.min(end),
            end,
        }
    }

    /// Current cursor position.
    #[inline]
    pub fn pos(&self) -> usize {
        self.x
    }

    /// End position (exclusive).
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the number of remaining bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.x)
    }

    pub fn is_empty(&self) -> bool {
        self.x >= self.end
    }

    /// Checks that `n` more bytes are available from the current cursor.
    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if n > self.remaining() {
            Err(BufferError::UnexpectedEof)
        } else {
            Ok(())
        }
    }

    /// Reads `size` raw bytes and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let start = self.x;
        self.x += size;
        Ok(&self.uint8[start..self.x])
    }

    /// Advances the cursor by `length` bytes.
    pub fn skip(&mut self, length: usize) -> Result<(), BufferError> {
        self.check(length)?;
        self.x += length;
        Ok(())
    }

    // ---------------------------------------------------------------- varint

    /// Reads an unsigned varint.
    pub fn read_varint(&mut self) -> Result<u64, BufferError> {
        let (value, len) = varint::decode_varint(self.uint8.get(self.x..self.end).unwrap_or(&[]))?;
        self.x += len;
        Ok(value)
    }

    /// Reads a tag and splits it into `(field_number, wire_type)`.
    pub fn read_tag(&mut self) -> Result<(u32, WireType), BufferError> {
        let start = self.x;
        let tag = self.read_varint()?;
        split_tag(tag).inspect_err(|_| self.x = start)
    }

    /// Reads a `uint32`. Values wider than 32 bits are truncated, as other
    /// implementations do.
    #[inline]
    pub fn read_uint32(&mut self) -> Result<u32, BufferError> {
        self.read_varint().map(|v| v as u32)
    }

    #[inline]
    pub fn read_uint64(&mut self) -> Result<u64, BufferError> {
        self.read_varint()
    }

    #[inline]
    pub fn read_int32(&mut self) -> Result<i32, BufferError> {
        self.read_varint().map(|v| v as i32)
    }

    #[inline]
    pub fn read_int64(&mut self) -> Result<i64, BufferError> {
        self.read_varint().map(|v| v as i64)
    }

    #[inline]
    pub fn read_sint32(&mut self) -> Result<i32, BufferError> {
        self.read_varint().map(|v| unzigzag32(v as u32))
    }

    #[inline]
    pub fn read_sint64(&mut self) -> Result<i64, BufferError> {
        self.read_varint().map(unzigzag64)
    }

    #[inline]
    pub fn read_bool(&mut self) -> Result<bool, BufferError> {
        self.read_varint().map(|v| v != 0)
    }

    // ---------------------------------------------------------------- fixed

    #[inline]
    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let bytes = self.buf(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    #[inline]
    pub fn read_fixed32(&mut self) -> Result<u32, BufferError> {
        self.array().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn read_sfixed32(&mut self) -> Result<i32, BufferError> {
        self.array().map(i32::from_le_bytes)
    }

    #[inline]
    pub fn read_fixed64(&mut self) -> Result<u64, BufferError> {
        self.array().map(u64::from_le_bytes)
    }

    #[inline]
    pub fn read_sfixed64(&mut self) -> Result<i64, BufferError> {
        self.array().map(i64::from_le_bytes)
    }

    #[inline]
    pub fn read_float(&mut self) -> Result<f32, BufferError> {
        self.array().map(f32::from_le_bytes)
    }

    #[inline]
    pub fn read_double(&mut self) -> Result<f64, BufferError> {
        self.array().map(f64::from_le_bytes)
    }

    // ---------------------------------------------------------------- length-delimited

    /// Reads a length prefix and checks it against the remaining input.
    pub fn read_len(&mut self) -> Result<usize, BufferError> {
        let start = self.x;
        let len = self.read_varint()?;
        let remaining = self.remaining();
        if len > remaining as u64 {
            self.x = start;
            return Err(BufferError::TruncatedMessage { len, remaining });
        }
        Ok(len as usize)
    }

    /// Reads a length-prefixed byte sequence.
    pub fn read_bytes(&mut self) -> Result<&'a [u8], BufferError> {
        let len = self.read_len()?;
        self.buf(len)
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<&'a str, BufferError> {
        let start = self.x;
        let bytes = self.read_bytes()?;
        str::from_utf8(bytes).map_err(|_| {
            self.x = start;
            BufferError::InvalidUtf8
        })
    }

    // ---------------------------------------------------------------- skipping

    /// Consumes exactly the body of field `field_number` without
    /// interpreting it.
    ///
    /// Groups are skipped up to and including the matching end-group tag,
    /// nested at most [`DEFAULT_GROUP_DEPTH`] deep.
    pub fn skip_type(&mut self, field_number: u32, wire_type: WireType) -> Result<(), BufferError> {
        self.skip_type_with_limit(field_number, wire_type, DEFAULT_GROUP_DEPTH)
    }

    /// [`skip_type`](Self::skip_type) with an explicit group nesting limit.
    ///
    /// Groups are walked with a stack of open field numbers rather than by
    /// recursion, so hostile nesting fails with
    /// [`BufferError::GroupDepthExceeded`] instead of exhausting the stack.
    pub fn skip_type_with_limit(
        &mut self,
        field_number: u32,
        wire_type: WireType,
        max_depth: usize,
    ) -> Result<(), BufferError> {
        let mut open: Vec<u32> = Vec::new();
        let (mut number, mut wire_type) = (field_number, wire_type);
        loop {
            match wire_type {
                WireType::StartGroup => {
                    if open.len() >= max_depth {
                        return Err(BufferError::GroupDepthExceeded(max_depth));
                    }
                    open.push(number);
                }
                WireType::EndGroup => match open.pop() {
                    Some(start) if start == number => {}
                    _ => return Err(BufferError::UnexpectedEndGroup(number)),
                },
                other => self.skip_body(other)?,
            }
            if open.is_empty() {
                return Ok(());
            }
            (number, wire_type) = self.read_tag()?;
        }
    }

    /// Skips the body of a non-group wire type.
    fn skip_body(&mut self, wire_type: WireType) -> Result<(), BufferError> {
        match wire_type {
            WireType::Varint => self.read_varint().map(|_| ()),
            WireType::Fixed64 => self.skip(8),
            WireType::LengthDelimited => {
                let len = self.read_len()?;
                self.skip(len)
            }
            WireType::Fixed32 => self.skip(4),
            WireType::StartGroup | WireType::EndGroup => Ok(()),
        }
    }
}
