//! Protocol Buffers wire primitives.
//!
//! This crate provides the three leaf layers of the codec:
//! - [`varint`]: base-128 varints and zigzag mapping for signed integers
//! - [`Writer`]: an auto-growing byte buffer with `fork`/`ldelim` nesting
//! - [`Reader`]: a cursor over an immutable byte slice with tag reads and
//!   unknown-field skipping
//!
//! See <https://protobuf.dev/programming-guides/encoding/> for the format.
//!
//! # Example
//!
//! ```
//! use protocodec_buffers::{Reader, WireType, Writer};
//!
//! let mut writer = Writer::new();
//! writer.tag(1, WireType::Varint).uint32(150);
//! let data = writer.finish().unwrap();
//! assert_eq!(data, [0x08, 0x96, 0x01]);
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.read_tag().unwrap(), (1, WireType::Varint));
//! assert_eq!(reader.read_uint32().unwrap(), 150);
//! ```

#![forbid(unsafe_code)]

mod reader;
pub mod varint;
mod wire;
mod writer;

pub use reader::{Reader, DEFAULT_GROUP_DEPTH};
pub use wire::WireType;
pub use writer::Writer;

/// Errors produced by [`Reader`] and the varint decoder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// A varint did not terminate within ten bytes, or its tenth byte carried
    /// more than the single remaining payload bit.
    #[error("malformed varint")]
    MalformedVarint,

    /// A read required more bytes than remain before the end of the input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A length prefix declared more bytes than remain in the input.
    #[error("length-delimited value of {len} bytes exceeds the {remaining} bytes remaining")]
    TruncatedMessage { len: u64, remaining: usize },

    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,

    /// Wire types 6 and 7 are unassigned.
    #[error("invalid wire type: {0}")]
    InvalidWireType(u8),

    /// Field number 0, or a number beyond the 29-bit range.
    #[error("invalid field number in tag")]
    InvalidFieldNumber,

    /// An end-group tag that closes no open group, or closes a group
    /// started under a different field number.
    #[error("unexpected end-group tag for field {0}")]
    UnexpectedEndGroup(u32),

    #[error("groups nested deeper than {0} levels")]
    GroupDepthExceeded(usize),
}

/// Misuse of the [`Writer`] nesting API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriterError {
    #[error("ldelim called without a matching fork")]
    UnbalancedLdelim,

    #[error("finish called with {0} fork(s) still open")]
    UnclosedFork(usize),
}
