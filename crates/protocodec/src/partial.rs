//! Building complete messages from partially filled values.

use crate::descriptor::{FieldDescriptor, FieldKind, Label, MessageDescriptor};
use crate::error::SchemaError;
use crate::value::{MapKey, MessageValue, ProtoValue};

/// Completes `partial` into a fully populated message.
///
/// Missing scalar, repeated and map fields take their defaults. Present
/// nested messages are completed recursively, including list elements and
/// map values; absent message and `optional` fields stay absent. Values of
/// the wrong type and keys the schema does not know are rejected.
///
/// An `Int32` given for an enum field is accepted as the enum number.
pub fn from_partial(
    partial: &MessageValue,
    descriptor: &MessageDescriptor,
) -> Result<MessageValue, SchemaError> {
    if let Some((name, _)) = partial
        .iter()
        .find(|(name, _)| descriptor.field_by_name(name).is_none())
    {
        return Err(SchemaError::UnknownField {
            message: descriptor.full_name.clone(),
            field: name.to_string(),
        });
    }
    let mut message = MessageValue::new();
    for field in &descriptor.fields {
        let value = match partial.get(&field.name) {
            Some(value) => normalize_field(descriptor, field, value)?,
            None => match field.default_value() {
                Some(value) => value,
                None => continue,
            },
        };
        message.set(&field.name, value);
    }
    Ok(message)
}

fn normalize_field(
    descriptor: &MessageDescriptor,
    field: &FieldDescriptor,
    value: &ProtoValue,
) -> Result<ProtoValue, SchemaError> {
    match (&field.label, value) {
        (Label::Singular | Label::Optional, _) => {
            normalize_element(descriptor, field, &field.kind, value)
        }
        (Label::Repeated, ProtoValue::List(items)) => items
            .iter()
            .map(|item| normalize_element(descriptor, field, &field.kind, item))
            .collect::<Result<Vec<_>, _>>()
            .map(ProtoValue::List),
        (Label::Map(key_kind), ProtoValue::Map(entries)) => entries
            .iter()
            .map(|(key, entry)| -> Result<(MapKey, ProtoValue), SchemaError> {
                if key.to_value(key_kind).is_none() {
                    return Err(mismatch(descriptor, field, key_kind.name()));
                }
                Ok((key.clone(), normalize_element(descriptor, field, &field.kind, entry)?))
            })
            .collect::<Result<_, _>>()
            .map(ProtoValue::Map),
        (Label::Repeated, _) => Err(mismatch(descriptor, field, "list")),
        (Label::Map(_), _) => Err(mismatch(descriptor, field, "map")),
    }
}

fn normalize_element(
    descriptor: &MessageDescriptor,
    field: &FieldDescriptor,
    kind: &FieldKind,
    value: &ProtoValue,
) -> Result<ProtoValue, SchemaError> {
    let normalized = match (kind, value) {
        (FieldKind::Message(nested), ProtoValue::Message(inner)) => {
            ProtoValue::Message(from_partial(inner, nested)?)
        }
        (FieldKind::Enum(_), ProtoValue::Enum(n) | ProtoValue::Int32(n)) => ProtoValue::Enum(*n),
        (FieldKind::Double, ProtoValue::Double(_))
        | (FieldKind::Float, ProtoValue::Float(_))
        | (FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32, ProtoValue::Int32(_))
        | (FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64, ProtoValue::Int64(_))
        | (FieldKind::Uint32 | FieldKind::Fixed32, ProtoValue::Uint32(_))
        | (FieldKind::Uint64 | FieldKind::Fixed64, ProtoValue::Uint64(_))
        | (FieldKind::Bool, ProtoValue::Bool(_))
        | (FieldKind::String, ProtoValue::String(_))
        | (FieldKind::Bytes, ProtoValue::Bytes(_))
        | (FieldKind::Timestamp, ProtoValue::Timestamp(_))
        | (FieldKind::Duration, ProtoValue::Duration(_)) => value.clone(),
        _ => return Err(mismatch(descriptor, field, kind.name())),
    };
    Ok(normalized)
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
