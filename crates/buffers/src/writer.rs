//! Auto-growing writer for the Protocol Buffers wire format.

use crate::varint::{self, MAX_VARINT_LEN};
use crate::{WireType, WriterError};

/// A binary buffer writer that grows automatically as needed.
///
/// Length-delimited regions (embedded messages, packed repeated fields) are
/// written without knowing their size up front: [`fork`](Self::fork) marks the
/// start of a region and [`ldelim`](Self::ldelim) closes it by splicing the
/// varint byte count in front of it. Regions nest to any depth.
///
/// # Example
///
/// ```
/// use protocodec_buffers::{WireType, Writer};
///
/// let mut writer = Writer::new();
/// writer.tag(3, WireType::LengthDelimited).fork();
/// writer.tag(1, WireType::Varint).uint32(150);
/// writer.ldelim().unwrap();
/// assert_eq!(writer.finish().unwrap(), [0x1a, 0x03, 0x08, 0x96, 0x01]);
/// ```
pub struct Writer {
    /// The underlying byte buffer. Bytes past `x` are scratch space.
    pub uint8: Vec<u8>,
    /// Position where the current message starts.
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
    /// Start offsets of the regions opened by `fork`.
    forks: Vec<usize>,
    /// Allocation size when buffer needs to grow.
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with the default allocation size (1KB).
    pub fn new() -> Self {
        Self::with_alloc_size(1024)
    }

    /// Creates a new writer with custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        let alloc_size = alloc_size.max(MAX_VARINT_LEN);
        Self {
            uint8: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            forks: Vec::new(),
            alloc_size,
        }
    }

    /// Ensures the buffer has at least `capacity` bytes available.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.len() - self.x;
        if remaining < capacity {
            let total = self.uint8.len() - self.x0;
            let required = capacity - remaining;
            let total_required = total + required;
            let new_size = if total_required <= self.alloc_size {
                self.alloc_size
            } else {
                total_required * 2
            };
            self.grow(new_size);
        }
    }

    fn grow(&mut self, new_size: usize) {
        let x0 = self.x0;
        let x = self.x;
        let mut new_buf = vec![0u8; new_size];
        new_buf[..x - x0].copy_from_slice(&self.uint8[x0..x]);
        self.uint8 = new_buf;
        self.x = x - x0;
        for start in &mut self.forks {
            *start -= x0;
        }
        self.x0 = 0;
    }

    /// Number of bytes written since the last [`finish`](Self::finish).
    pub fn len(&self) -> usize {
        self.x - self.x0
    }

    pub fn is_empty(&self) -> bool {
        self.x == self.x0
    }

    /// Number of regions opened by `fork` and not yet closed.
    pub fn depth(&self) -> usize {
        self.forks.len()
    }

    /// Returns the written bytes and resets the writer for the next message.
    ///
    /// Fails if a region opened with [`fork`](Self::fork) was never closed;
    /// the writer is reset either way.
    pub fn finish(&mut self) -> Result<Vec<u8>, WriterError> {
        let open = self.forks.len();
        let result = self.uint8[self.x0..self.x].to_vec();
        self.forks.clear();
        self.x0 = self.x;
        if open > 0 {
            return Err(WriterError::UnclosedFork(open));
        }
        Ok(result)
    }

    /// Discards everything written since the last `finish`.
    pub fn reset(&mut self) {
        self.forks.clear();
        self.x = self.x0;
    }

    // ---------------------------------------------------------------- nesting

    /// Opens a length-delimited region at the cursor.
    pub fn fork(&mut self) -> &mut Self {
        self.forks.push(self.x);
        self
    }

    /// Closes the innermost region opened by [`fork`](Self::fork), prefixing
    /// it with its byte length as a varint.
    pub fn ldelim(&mut self) -> Result<&mut Self, WriterError> {
        let start = self.forks.pop().ok_or(WriterError::UnbalancedLdelim)?;
        let len = self.x - start;
        let prefix_len = varint::encoded_len(len as u64);
        self.ensure_capacity(prefix_len);
        // `grow` rebases offsets, so recompute the region start afterwards.
        let start = self.x - len;
        self.uint8.copy_within(start..self.x, start + prefix_len);
        varint::write_varint_into(len as u64, &mut self.uint8[start..]);
        self.x += prefix_len;
        Ok(self)
    }

    // ---------------------------------------------------------------- raw

    /// Writes a single raw byte.
    #[inline]
    pub fn u8(&mut self, val: u8) -> &mut Self {
        self.ensure_capacity(1);
        self.uint8[self.x] = val;
        self.x += 1;
        self
    }

    /// Writes a raw byte slice without a length prefix.
    pub fn buf(&mut self, buf: &[u8]) -> &mut Self {
        let length = buf.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
        self
    }

    // ---------------------------------------------------------------- varint

    /// Writes a field tag.
    #[inline]
    pub fn tag(&mut self, field_number: u32, wire_type: WireType) -> &mut Self {
        self.varint(wire_type.tag(field_number) as u64)
    }

    /// Writes an unsigned varint.
    #[inline]
    pub fn varint(&mut self, val: u64) -> &mut Self {
        self.ensure_capacity(MAX_VARINT_LEN);
        self.x += varint::write_varint_into(val, &mut self.uint8[self.x..]);
        self
    }

    #[inline]
    pub fn uint32(&mut self, val: u32) -> &mut Self {
        self.varint(val as u64)
    }

    #[inline]
    pub fn uint64(&mut self, val: u64) -> &mut Self {
        self.varint(val)
    }

    /// Writes an `int32`. Negative values are sign-extended to 64 bits and
    /// therefore always take ten bytes.
    #[inline]
    pub fn int32(&mut self, val: i32) -> &mut Self {
        self.varint(val as i64 as u64)
    }

    #[inline]
    pub fn int64(&mut self, val: i64) -> &mut Self {
        self.varint(val as u64)
    }

    #[inline]
    pub fn sint32(&mut self, val: i32) -> &mut Self {
        self.varint(varint::zigzag32(val) as u64)
    }

    #[inline]
    pub fn sint64(&mut self, val: i64) -> &mut Self {
        self.varint(varint::zigzag64(val))
    }

    #[inline]
    pub fn bool(&mut self, val: bool) -> &mut Self {
        self.u8(val as u8)
    }

    // ---------------------------------------------------------------- fixed

    #[inline]
    pub fn fixed32(&mut self, val: u32) -> &mut Self {
        self.buf(&val.to_le_bytes())
    }

    #[inline]
    pub fn sfixed32(&mut self, val: i32) -> &mut Self {
        self.buf(&val.to_le_bytes())
    }

    #[inline]
    pub fn fixed64(&mut self, val: u64) -> &mut Self {
        self.buf(&val.to_le_bytes())
    }

    #[inline]
    pub fn sfixed64(&mut self, val: i64) -> &mut Self {
        self.buf(&val.to_le_bytes())
    }

    #[inline]
    pub fn float(&mut self, val: f32) -> &mut Self {
        self.buf(&val.to_le_bytes())
    }

    #[inline]
    pub fn double(&mut self, val: f64) -> &mut Self {
        self.buf(&val.to_le_bytes())
    }

    // ---------------------------------------------------------------- length-delimited

    /// Writes a length-prefixed byte sequence.
    pub fn bytes(&mut self, val: &[u8]) -> &mut Self {
        self.varint(val.len() as u64);
        self.buf(val)
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn string(&mut self, val: &str) -> &mut Self {
        self.bytes(val.as_bytes())
    }
}
