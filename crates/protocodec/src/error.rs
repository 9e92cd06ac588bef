//! Error types for encoding, decoding, JSON conversion and `Any` resolution.

use protocodec_buffers::{BufferError, WriterError};
use thiserror::Error;

/// Binary decoding error.
///
/// Decoding never fails because a field is missing; defaults apply. It fails
/// on malformed or truncated input only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed varint")]
    MalformedVarint,

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("length-delimited value of {len} bytes exceeds the {remaining} bytes remaining")]
    TruncatedMessage { len: u64, remaining: usize },

    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,

    #[error("invalid wire type: {0}")]
    InvalidWireType(u8),

    #[error("invalid field number in tag")]
    InvalidFieldNumber,

    /// The decode loop ended past the declared end of its message.
    #[error("{message} overran its declared end by {overrun} byte(s)")]
    OverrunMessage { message: String, overrun: usize },

    /// A known field arrived with a wire type its kind cannot carry.
    #[error("{message}.{field}: unexpected wire type {wire_type}")]
    WireTypeMismatch {
        message: String,
        field: String,
        wire_type: u8,
    },

    /// Message or group nesting beyond the configured limit.
    #[error("nesting exceeds the recursion limit of {0}")]
    RecursionLimitExceeded(usize),

    /// An end-group tag without a matching start-group of the same field.
    #[error("unexpected end-group tag for field {0}")]
    UnexpectedEndGroup(u32),
}

impl From<BufferError> for DecodeError {
    fn from(val: BufferError) -> Self {
        match val {
            BufferError::MalformedVarint => Self::MalformedVarint,
            BufferError::UnexpectedEof => Self::UnexpectedEof,
            BufferError::TruncatedMessage { len, remaining } => {
                Self::TruncatedMessage { len, remaining }
            }
            BufferError::InvalidUtf8 => Self::InvalidUtf8,
            BufferError::InvalidWireType(wire_type) => Self::InvalidWireType(wire_type),
            BufferError::InvalidFieldNumber => Self::InvalidFieldNumber,
            BufferError::UnexpectedEndGroup(field) => Self::UnexpectedEndGroup(field),
            BufferError::GroupDepthExceeded(limit) => Self::RecursionLimitExceeded(limit),
        }
    }
}

/// A value that does not fit the schema it is used with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{message}.{field}: expected {expected}")]
    TypeMismatch {
        message: String,
        field: String,
        expected: &'static str,
    },

    #[error("{message} has no field named {field:?}")]
    UnknownField { message: String, field: String },

    #[error("value is not a google.protobuf.Any: {0}")]
    InvalidAny(&'static str),
}

/// Binary encoding error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Writer(#[from] WriterError),
}

/// JSON / Amino-JSON conversion error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonError {
    #[error("{field}: expected {expected}")]
    ExpectedType {
        field: String,
        expected: &'static str,
    },

    #[error("{field}: invalid number {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("{field}: invalid base64")]
    InvalidBase64 { field: String },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("{field}: unknown enum value {value:?}")]
    UnknownEnumValue { field: String, value: String },

    #[error("{0} has no Amino name")]
    MissingAminoName(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// `Any` resolution error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no message type registered for {0:?}")]
    UnknownTypeUrl(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Json(#[from] JsonError),
}
