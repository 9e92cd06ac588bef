//! Schema-driven binary decoder.

use protocodec_buffers::{Reader, WireType};

use crate::config::CodecConfig;
use crate::descriptor::{FieldDescriptor, FieldKind, Label, MessageDescriptor};
use crate::error::DecodeError;
use crate::value::{MapKey, MessageValue, ProtoValue};
use crate::wkt::{Duration, Timestamp};

/// Decodes bytes into [`MessageValue`]s against a [`MessageDescriptor`].
///
/// Every field starts at its default; fields absent from the input keep it.
/// Unknown field numbers are skipped. For singular fields the last
/// occurrence wins, and repeated scalars are accepted both packed and
/// unpacked.
#[derive(Debug, Clone, Default)]
pub struct ProtoDecoder {
    config: CodecConfig,
}

impl ProtoDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decodes `data` as one complete message.
    pub fn decode(
        &self,
        data: &[u8],
        descriptor: &MessageDescriptor,
    ) -> Result<MessageValue, DecodeError> {
        let mut reader = Reader::new(data);
        self.decode_from(&mut reader, descriptor, None)
    }

    /// Decodes one message from the reader's position: the next `length`
    /// bytes if given, otherwise everything up to the reader's end.
    pub fn decode_from(
        &self,
        reader: &mut Reader<'_>,
        descriptor: &MessageDescriptor,
        length: Option<usize>,
    ) -> Result<MessageValue, DecodeError> {
        if let Some(len) = length {
            let remaining = reader.remaining();
            if len > remaining {
                return Err(DecodeError::TruncatedMessage {
                    len: len as u64,
                    remaining,
                });
            }
        }
        self.read_message(reader, descriptor, length, 0)
    }

    fn read_message(
        &self,
        reader: &mut Reader<'_>,
        descriptor: &MessageDescriptor,
        length: Option<usize>,
        depth: usize,
    ) -> Result<MessageValue, DecodeError> {
        if depth > self.config.recursion_limit {
            return Err(DecodeError::RecursionLimitExceeded(self.config.recursion_limit));
        }
        let end = length.map_or(reader.end(), |len| reader.pos() + len);
        let mut message = descriptor.default_message();
        while reader.pos() < end {
            let (number, wire_type) = reader.read_tag()?;
            match descriptor.field_by_number(number) {
                Some(field) => {
                    self.read_field(reader, descriptor, field, wire_type, &mut message, depth)?
                }
                None => {
                    tracing::trace!(
                        type_name = %descriptor.full_name,
                        field = number,
                        ?wire_type,
                        "skipping unknown field"
                    );
                    reader.skip_type_with_limit(number, wire_type, self.config.recursion_limit)?;
                }
            }
        }
        check_end(reader, end, &descriptor.full_name)?;
        Ok(message)
    }

    fn read_field(
        &self,
        reader: &mut Reader<'_>,
        descriptor: &MessageDescriptor,
        field: &FieldDescriptor,
        wire_type: WireType,
        message: &mut MessageValue,
        depth: usize,
    ) -> Result<(), DecodeError> {
        match &field.label {
            Label::Singular | Label::Optional => {
                expect_wire_type(descriptor, field, wire_type, field.kind.wire_type())?;
                let value = self.read_value(reader, &field.kind, depth)?;
                message.set(&field.name, value);
            }
            Label::Repeated => {
                let mut items = Vec::new();
                if wire_type == WireType::LengthDelimited && field.kind.is_packable() {
                    let len = reader.read_len()?;
                    let end = reader.pos() + len;
                    while reader.pos() < end {
                        items.push(self.read_value(reader, &field.kind, depth)?);
                    }
                    check_end(reader, end, &descriptor.full_name)?;
                } else {
                    expect_wire_type(descriptor, field, wire_type, field.kind.wire_type())?;
                    items.push(self.read_value(reader, &field.kind, depth)?);
                }
                match message.get_mut(&field.name) {
                    Some(ProtoValue::List(list)) => list.extend(items),
                    _ => {
                        message.set(&field.name, ProtoValue::List(items));
                    }
                }
            }
            Label::Map(key_kind) => {
                expect_wire_type(descriptor, field, wire_type, WireType::LengthDelimited)?;
                let Some((key, value)) = self.read_map_entry(reader, descriptor, field, key_kind, depth)?
                else {
                    return Ok(());
                };
                match message.get_mut(&field.name) {
                    Some(ProtoValue::Map(entries)) => {
                        entries.insert(key, value);
                    }
                    _ => {
                        message.set(&field.name, ProtoValue::Map([(key, value)].into()));
                    }
                }
            }
        }
        Ok(())
    }

    /// Reads one `{key = 1, value = 2}` entry. Missing halves default.
    fn read_map_entry(
        &self,
        reader: &mut Reader<'_>,
        descriptor: &MessageDescriptor,
        field: &FieldDescriptor,
        key_kind: &FieldKind,
        depth: usize,
    ) -> Result<Option<(MapKey, ProtoValue)>, DecodeError> {
        let len = reader.read_len()?;
        let end = reader.pos() + len;
        let mut key = key_kind.default_value();
        let mut value = None;
        while reader.pos() < end {
            let (number, wire_type) = reader.read_tag()?;
            match number {
                1 => {
                    expect_wire_type(descriptor, field, wire_type, key_kind.wire_type())?;
                    key = Some(self.read_value(reader, key_kind, depth)?);
                }
                2 => {
                    expect_wire_type(descriptor, field, wire_type, field.kind.wire_type())?;
                    value = Some(self.read_value(reader, &field.kind, depth)?);
                }
                _ => reader.skip_type_with_limit(number, wire_type, self.config.recursion_limit)?,
            }
        }
        check_end(reader, end, &descriptor.full_name)?;
        let Some(key) = key.as_ref().and_then(MapKey::from_value) else {
            tracing::trace!(
                type_name = %descriptor.full_name,
                field = %field.name,
                "dropping map entry with unusable key kind"
            );
            return Ok(None);
        };
        let value = match value {
            Some(value) => value,
            None => default_element(&field.kind),
        };
        Ok(Some((key, value)))
    }

    /// Reads a single value of `kind` without its tag.
    fn read_value(
        &self,
        reader: &mut Reader<'_>,
        kind: &FieldKind,
        depth: usize,
    ) -> Result<ProtoValue, DecodeError> {
        let value = match kind {
            FieldKind::Double => ProtoValue::Double(reader.read_double()?),
            FieldKind::Float => ProtoValue::Float(reader.read_float()?),
            FieldKind::Int32 => ProtoValue::Int32(reader.read_int32()?),
            FieldKind::Sint32 => ProtoValue::Int32(reader.read_sint32()?),
            FieldKind::Sfixed32 => ProtoValue::Int32(reader.read_sfixed32()?),
            FieldKind::Int64 => ProtoValue::Int64(reader.read_int64()?),
            FieldKind::Sint64 => ProtoValue::Int64(reader.read_sint64()?),
            FieldKind::Sfixed64 => ProtoValue::Int64(reader.read_sfixed64()?),
            FieldKind::Uint32 => ProtoValue::Uint32(reader.read_uint32()?),
            FieldKind::Fixed32 => ProtoValue::Uint32(reader.read_fixed32()?),
            FieldKind::Uint64 => ProtoValue::Uint64(reader.read_uint64()?),
            FieldKind::Fixed64 => ProtoValue::Uint64(reader.read_fixed64()?),
            FieldKind::Bool => ProtoValue::Bool(reader.read_bool()?),
            FieldKind::String => ProtoValue::String(reader.read_string()?.to_string()),
            FieldKind::Bytes => ProtoValue::Bytes(reader.read_bytes()?.to_vec()),
            FieldKind::Enum(_) => ProtoValue::Enum(reader.read_int32()?),
            FieldKind::Message(nested) => {
                let len = reader.read_len()?;
                ProtoValue::Message(self.read_message(reader, nested, Some(len), depth + 1)?)
            }
            FieldKind::Timestamp => {
                let (seconds, nanos) = read_seconds_nanos(reader, "google.protobuf.Timestamp")?;
                ProtoValue::Timestamp(Timestamp { seconds, nanos })
            }
            FieldKind::Duration => {
                let (seconds, nanos) = read_seconds_nanos(reader, "google.protobuf.Duration")?;
                ProtoValue::Duration(Duration { seconds, nanos })
            }
        };
        Ok(value)
    }
}

/// Body of a `Timestamp` or `Duration`.
fn read_seconds_nanos(reader: &mut Reader<'_>, name: &str) -> Result<(i64, i32), DecodeError> {
    let len = reader.read_len()?;
    let end = reader.pos() + len;
    let mut seconds = 0;
    let mut nanos = 0;
    while reader.pos() < end {
        match reader.read_tag()? {
            (1, WireType::Varint) => seconds = reader.read_int64()?,
            (2, WireType::Varint) => nanos = reader.read_int32()?,
            (number, wire_type) => reader.skip_type(number, wire_type)?,
        }
    }
    check_end(reader, end, name)?;
    Ok((seconds, nanos))
}

/// Value of a map entry whose value half is missing.
fn default_element(kind: &FieldKind) -> ProtoValue {
    if let Some(value) = kind.default_value() {
        return value;
    }
    match kind {
        FieldKind::Message(nested) => ProtoValue::Message(nested.default_message()),
        FieldKind::Duration => ProtoValue::Duration(Duration::default()),
        _ => ProtoValue::Timestamp(Timestamp::default()),
    }
}

fn check_end(reader: &Reader<'_>, end: usize, message: &str) -> Result<(), DecodeError> {
    if reader.pos() > end {
        return Err(DecodeError::OverrunMessage {
            message: message.to_string(),
            overrun: reader.pos() - end,
        });
    }
    Ok(())
}

fn expect_wire_type(
    descriptor: &MessageDescriptor,
    field: &FieldDescriptor,
    actual: WireType,
    expected: WireType,
) -> Result<(), DecodeError> {
    if actual != expected {
        return Err(DecodeError::WireTypeMismatch {
            message: descriptor.full_name.clone(),
            field: field.name.clone(),
            wire_type: actual as u8,
        });
    }
    Ok(())
}
