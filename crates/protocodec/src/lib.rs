//! Schema-driven Protocol Buffers codec.
//!
//! Messages are plain [`MessageValue`]s described by [`MessageDescriptor`]
//! tables. One engine implements the whole per-message contract:
//!
//! - [`ProtoEncoder`] / [`ProtoDecoder`]: proto3 binary wire format
//! - [`from_partial`]: complete a partially filled value with defaults
//! - [`json`]: proto3 JSON and Amino JSON, plus the Amino `{type, value}`
//!   envelope
//! - [`TypeRegistry`]: resolve `google.protobuf.Any` payloads by type URL
//!
//! Wire primitives live in [`protocodec_buffers`] and are re-exported here.
//!
//! # Example
//!
//! ```
//! use protocodec::schemas::dydx::market_param;
//! use protocodec::{MessageValue, ProtoDecoder, ProtoEncoder};
//!
//! let value = MessageValue::new()
//!     .with("id", 1u32)
//!     .with("pair", "BTC-USD")
//!     .with("exponent", -5i32);
//! let bytes = ProtoEncoder::new().encode(&value, &market_param()).unwrap();
//! assert_eq!(&bytes[..2], &[0x08, 0x01]);
//!
//! let decoded = ProtoDecoder::new().decode(&bytes, &market_param()).unwrap();
//! assert_eq!(decoded.get("pair").and_then(|v| v.as_str()), Some("BTC-USD"));
//! ```

#![forbid(unsafe_code)]

mod config;
mod decoder;
mod descriptor;
mod encoder;
mod error;
pub mod json;
pub mod naming;
mod partial;
mod registry;
pub mod schemas;
mod value;
pub mod wkt;

pub use config::CodecConfig;
pub use decoder::ProtoDecoder;
pub use descriptor::{EnumDescriptor, FieldDescriptor, FieldKind, Label, MessageDescriptor};
pub use encoder::ProtoEncoder;
pub use error::{DecodeError, EncodeError, JsonError, RegistryError, SchemaError};
pub use json::{
    from_amino, from_amino_msg, from_json, to_amino, to_amino_msg, to_json, JsonStyle,
};
pub use partial::from_partial;
pub use registry::{default_registry, TypeRegistry};
pub use value::{MapKey, MessageValue, ProtoValue};
pub use wkt::{Any, Duration, Timestamp};

pub use protocodec_buffers::{varint, BufferError, Reader, WireType, Writer, WriterError};
