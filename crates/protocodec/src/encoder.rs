//! Schema-driven binary encoder.

use protocodec_buffers::{WireType, Writer};

use crate::config::CodecConfig;
use crate::descriptor::{FieldDescriptor, FieldKind, Label, MessageDescriptor};
use crate::error::{EncodeError, SchemaError};
use crate::value::{MessageValue, ProtoValue};

/// Encodes [`MessageValue`]s against a [`MessageDescriptor`].
///
/// Fields are written in descriptor order. Singular fields holding their
/// default are skipped, as are empty repeated and map fields; message fields
/// and `optional` fields are written whenever present. Repeated scalars use
/// the packed encoding.
///
/// The writer is reused across calls; each [`encode`](Self::encode) returns
/// the bytes of one message.
pub struct ProtoEncoder {
    pub writer: Writer,
    config: CodecConfig,
}

impl Default for ProtoEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtoEncoder {
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            writer: Writer::with_alloc_size(config.writer_alloc_size),
            config,
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn encode(
        &mut self,
        value: &MessageValue,
        descriptor: &MessageDescriptor,
    ) -> Result<Vec<u8>, EncodeError> {
        // Drop whatever a previously failed call left behind.
        self.writer.reset();
        self.write_message(value, descriptor)?;
        Ok(self.writer.finish()?)
    }

    /// Appends the fields of `value` to the writer without a length prefix.
    pub fn write_message(
        &mut self,
        value: &MessageValue,
        descriptor: &MessageDescriptor,
    ) -> Result<(), EncodeError> {
        if let Some((name, _)) = value
            .iter()
            .find(|(name, _)| descriptor.field_by_name(name).is_none())
        {
            return Err(SchemaError::UnknownField {
                message: descriptor.full_name.clone(),
                field: name.to_string(),
            }
            .into());
        }
        for field in &descriptor.fields {
            if let Some(field_value) = value.get(&field.name) {
                self.write_field(descriptor, field, field_value)?;
            }
        }
        Ok(())
    }

    fn write_field(
        &mut self,
        descriptor: &MessageDescriptor,
        field: &FieldDescriptor,
        value: &ProtoValue,
    ) -> Result<(), EncodeError> {
        match &field.label {
            Label::Singular => {
                if !is_default(&field.kind, value) {
                    self.write_tagged(descriptor, field, field.number, &field.kind, value)?;
                }
            }
            Label::Optional => {
                self.write_tagged(descriptor, field, field.number, &field.kind, value)?;
            }
            Label::Repeated => {
                let items = value
                    .as_list()
                    .ok_or_else(|| mismatch(descriptor, field, "list"))?;
                if items.is_empty() {
                    return Ok(());
                }
                if field.kind.is_packable() {
                    self.writer
                        .tag(field.number, WireType::LengthDelimited)
                        .fork();
                    for item in items {
                        self.write_value(descriptor, field, &field.kind, item)?;
                    }
                    self.writer.ldelim()?;
                } else {
                    for item in items {
                        self.write_tagged(descriptor, field, field.number, &field.kind, item)?;
                    }
                }
            }
            Label::Map(key_kind) => {
                let ProtoValue::Map(entries) = value else {
                    return Err(mismatch(descriptor, field, "map").into());
                };
                for (key, entry_value) in entries {
                    let key = key
                        .to_value(key_kind)
                        .ok_or_else(|| mismatch(descriptor, field, key_kind.name()))?;
                    self.writer
                        .tag(field.number, WireType::LengthDelimited)
                        .fork();
                    self.write_tagged(descriptor, field, 1, key_kind, &key)?;
                    self.write_tagged(descriptor, field, 2, &field.kind, entry_value)?;
                    self.writer.ldelim()?;
                }
            }
        }
        Ok(())
    }

    fn write_tagged(
        &mut self,
        descriptor: &MessageDescriptor,
        field: &FieldDescriptor,
        number: u32,
        kind: &FieldKind,
        value: &ProtoValue,
    ) -> Result<(), EncodeError> {
        self.writer.tag(number, kind.wire_type());
        self.write_value(descriptor, field, kind, value)
    }

    /// Writes a single value without its tag.
    fn write_value(
        &mut self,
        descriptor: &MessageDescriptor,
        field: &FieldDescriptor,
        kind: &FieldKind,
        value: &ProtoValue,
    ) -> Result<(), EncodeError> {
        let writer = &mut self.writer;
        match (kind, value) {
            (FieldKind::Double, ProtoValue::Double(v)) => {
                writer.double(*v);
            }
            (FieldKind::Float, ProtoValue::Float(v)) => {
                writer.float(*v);
            }
            (FieldKind::Int32, ProtoValue::Int32(v)) => {
                writer.int32(*v);
            }
            (FieldKind::Sint32, ProtoValue::Int32(v)) => {
                writer.sint32(*v);
            }
            (FieldKind::Sfixed32, ProtoValue::Int32(v)) => {
                writer.sfixed32(*v);
            }
            (FieldKind::Int64, ProtoValue::Int64(v)) => {
                writer.int64(*v);
            }
            (FieldKind::Sint64, ProtoValue::Int64(v)) => {
                writer.sint64(*v);
            }
            (FieldKind::Sfixed64, ProtoValue::Int64(v)) => {
                writer.sfixed64(*v);
            }
            (FieldKind::Uint32, ProtoValue::Uint32(v)) => {
                writer.uint32(*v);
            }
            (FieldKind::Fixed32, ProtoValue::Uint32(v)) => {
                writer.fixed32(*v);
            }
            (FieldKind::Uint64, ProtoValue::Uint64(v)) => {
                writer.uint64(*v);
            }
            (FieldKind::Fixed64, ProtoValue::Uint64(v)) => {
                writer.fixed64(*v);
            }
            (FieldKind::Bool, ProtoValue::Bool(v)) => {
                writer.bool(*v);
            }
            (FieldKind::String, ProtoValue::String(v)) => {
                writer.string(v);
            }
            (FieldKind::Bytes, ProtoValue::Bytes(v)) => {
                writer.bytes(v);
            }
            (FieldKind::Enum(_), ProtoValue::Enum(v) | ProtoValue::Int32(v)) => {
                writer.int32(*v);
            }
            (FieldKind::Message(nested), ProtoValue::Message(v)) => {
                self.writer.fork();
                self.write_message(v, nested)?;
                self.writer.ldelim()?;
            }
            (FieldKind::Timestamp, ProtoValue::Timestamp(v)) => {
                self.write_seconds_nanos(v.seconds, v.nanos)?;
            }
            (FieldKind::Duration, ProtoValue::Duration(v)) => {
                self.write_seconds_nanos(v.seconds, v.nanos)?;
            }
            _ => return Err(mismatch(descriptor, field, kind.name()).into()),
        }
        Ok(())
    }

    /// Body shared by `Timestamp` and `Duration`: `int64 seconds = 1`,
    /// `int32 nanos = 2`.
    fn write_seconds_nanos(&mut self, seconds: i64, nanos: i32) -> Result<(), EncodeError> {
        self.writer.fork();
        if seconds != 0 {
            self.writer.tag(1, WireType::Varint).int64(seconds);
        }
        if nanos != 0 {
            self.writer.tag(2, WireType::Varint).int32(nanos);
        }
        self.writer.ldelim()?;
        Ok(())
    }
}

/// Whether a singular field holding `value` is left off the wire.
fn is_default(kind: &FieldKind, value: &ProtoValue) -> bool {
    match (kind, value) {
        (FieldKind::Double, ProtoValue::Double(v)) => *v == 0.0,
        (FieldKind::Float, ProtoValue::Float(v)) => *v == 0.0,
        (
            FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32,
            ProtoValue::Int32(v),
        ) => *v == 0,
        (
            FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64,
            ProtoValue::Int64(v),
        ) => *v == 0,
        (FieldKind::Uint32 | FieldKind::Fixed32, ProtoValue::Uint32(v)) => *v == 0,
        (FieldKind::Uint64 | FieldKind::Fixed64, ProtoValue::Uint64(v)) => *v == 0,
        (FieldKind::Bool, ProtoValue::Bool(v)) => !*v,
        (FieldKind::String, ProtoValue::String(v)) => v.is_empty(),
        (FieldKind::Bytes, ProtoValue::Bytes(v)) => v.is_empty(),
        (FieldKind::Enum(_), ProtoValue::Enum(v) | ProtoValue::Int32(v)) => *v == 0,
        _ => false,
    }
}

fn mismatch(
    descriptor: &MessageDescriptor,
    field: &FieldDescriptor,
    expected: &'static str,
) -> SchemaError {
    SchemaError::TypeMismatch {
        message: descriptor.full_name.clone(),
        field: field.name.clone(),
        expected,
    }
}
