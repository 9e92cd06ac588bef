//! Proto3 JSON and Amino JSON adapters.
//!
//! Both styles share one walk over the descriptor and differ only in a few
//! spellings:
//!
//! | | canonical | Amino |
//! |---|---|---|
//! | keys | `lowerCamelCase` | `snake_case` |
//! | enums | symbolic name | number |
//! | durations | `"1.500s"` | total nanoseconds as a string |
//!
//! In both, 64-bit integers are decimal strings, bytes are padded base64 and
//! timestamps are RFC 3339 in UTC. Every field is written, defaults included,
//! except message and `optional` fields that are not set. Readers accept
//! either key spelling and either enum form, and fill in defaults for
//! missing or `null` fields.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::descriptor::{FieldDescriptor, FieldKind, Label, MessageDescriptor};
use crate::error::{JsonError, SchemaError};
use crate::value::{MapKey, MessageValue, ProtoValue};
use crate::wkt::{Duration, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonStyle {
    /// Proto3 canonical JSON.
    Canonical,
    /// Cosmos Amino JSON.
    Amino,
}

pub fn to_json(value: &MessageValue, descriptor: &MessageDescriptor) -> Result<Value, JsonError> {
    write_json(value, descriptor, JsonStyle::Canonical)
}

pub fn from_json(json: &Value, descriptor: &MessageDescriptor) -> Result<MessageValue, JsonError> {
    read_json(json, descriptor, JsonStyle::Canonical)
}

pub fn to_amino(value: &MessageValue, descriptor: &MessageDescriptor) -> Result<Value, JsonError> {
    write_json(value, descriptor, JsonStyle::Amino)
}

pub fn from_amino(json: &Value, descriptor: &MessageDescriptor) -> Result<MessageValue, JsonError> {
    read_json(json, descriptor, JsonStyle::Amino)
}

/// Wraps the Amino form as `{"type": <amino name>, "value": {...}}`.
pub fn to_amino_msg(value: &MessageValue, descriptor: &MessageDescriptor) -> Result<Value, JsonError> {
    let amino_name = descriptor
        .amino_name
        .as_ref()
        .ok_or_else(|| JsonError::MissingAminoName(descriptor.full_name.clone()))?;
    let mut msg = Map::new();
    msg.insert("type".to_string(), Value::String(amino_name.clone()));
    msg.insert("value".to_string(), to_amino(value, descriptor)?);
    Ok(Value::Object(msg))
}

/// Reads `{"type": ..., "value": {...}}`. The type, when present, must be
/// the descriptor's Amino name.
pub fn from_amino_msg(json: &Value, descriptor: &MessageDescriptor) -> Result<MessageValue, JsonError> {
    let amino_name = descriptor
        .amino_name
        .as_ref()
        .ok_or_else(|| JsonError::MissingAminoName(descriptor.full_name.clone()))?;
    let Value::Object(msg) = json else {
        return Err(expected(&descriptor.full_name, "object"));
    };
    match msg.get("type") {
        None | Some(Value::Null) => {}
        Some(Value::String(name)) if name == amino_name => {}
        Some(_) => return Err(expected("type", "the message's Amino type name")),
    }
    match msg.get("value") {
        Some(value) => from_amino(value, descriptor),
        None => from_amino(&Value::Null, descriptor),
    }
}

pub fn write_json(
    value: &MessageValue,
    descriptor: &MessageDescriptor,
    style: JsonStyle,
) -> Result<Value, JsonError> {
    write_message(value, descriptor, style).map(Value::Object)
}

/// Reads a message in `style`. `null` reads as the default message.
pub fn read_json(
    json: &Value,
    descriptor: &MessageDescriptor,
    style: JsonStyle,
) -> Result<MessageValue, JsonError> {
    match json {
        Value::Null => Ok(descriptor.default_message()),
        Value::Object(object) => read_message(object, descriptor, style),
        _ => Err(expected(&descriptor.full_name, "object")),
    }
}

// ---------------------------------------------------------------- writing

pub(crate) fn write_message(
    value: &MessageValue,
    descriptor: &MessageDescriptor,
    style: JsonStyle,
) -> Result<Map<String, Value>, JsonError> {
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
    let mut object = Map::new();
    for field in &descriptor.fields {
        let default;
        let field_value = match value.get(&field.name) {
            Some(field_value) => field_value,
            None => match field.default_value() {
                Some(value) => {
                    default = value;
                    &default
                }
                None => continue,
            },
        };
        let key = match style {
            JsonStyle::Canonical => field.json_name(),
            JsonStyle::Amino => field.name.clone(),
        };
        object.insert(key, write_field(descriptor, field, field_value, style)?);
    }
    Ok(object)
}

fn write_field(
    descriptor: &MessageDescriptor,
    field: &FieldDescriptor,
    value: &ProtoValue,
    style: JsonStyle,
) -> Result<Value, JsonError> {
    match (&field.label, value) {
        (Label::Singular | Label::Optional, _) => {
            write_element(descriptor, field, &field.kind, value, style)
        }
        (Label::Repeated, ProtoValue::List(items)) => items
            .iter()
            .map(|item| write_element(descriptor, field, &field.kind, item, style))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (Label::Map(_), ProtoValue::Map(entries)) => entries
            .iter()
            .map(|(key, entry)| -> Result<(String, Value), JsonError> {
                Ok((
                    key.to_json_key(),
                    write_element(descriptor, field, &field.kind, entry, style)?,
                ))
            })
            .collect::<Result<Map<_, _>, JsonError>>()
            .map(Value::Object),
        (Label::Repeated, _) => Err(mismatch(descriptor, field, "list")),
        (Label::Map(_), _) => Err(mismatch(descriptor, field, "map")),
    }
}

fn write_element(
    descriptor: &MessageDescriptor,
    field: &FieldDescriptor,
    kind: &FieldKind,
    value: &ProtoValue,
    style: JsonStyle,
) -> Result<Value, JsonError> {
    let json = match (kind, value) {
        (FieldKind::Double, ProtoValue::Double(v)) => write_float(*v),
        (FieldKind::Float, ProtoValue::Float(v)) => write_float(*v as f64),
        (FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32, ProtoValue::Int32(v)) => {
            Value::from(*v)
        }
        (FieldKind::Uint32 | FieldKind::Fixed32, ProtoValue::Uint32(v)) => Value::from(*v),
        (FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64, ProtoValue::Int64(v)) => {
            Value::String(v.to_string())
        }
        (FieldKind::Uint64 | FieldKind::Fixed64, ProtoValue::Uint64(v)) => {
            Value::String(v.to_string())
        }
        (FieldKind::Bool, ProtoValue::Bool(v)) => Value::Bool(*v),
        (FieldKind::String, ProtoValue::String(v)) => Value::String(v.clone()),
        (FieldKind::Bytes, ProtoValue::Bytes(v)) => Value::String(STANDARD.encode(v)),
        (FieldKind::Enum(enum_desc), ProtoValue::Enum(n) | ProtoValue::Int32(n)) => {
            match (style, enum_desc.name_of(*n)) {
                (JsonStyle::Canonical, Some(name)) => Value::String(name.to_string()),
                _ => Value::from(*n),
            }
        }
        (FieldKind::Message(nested), ProtoValue::Message(v)) => {
            Value::Object(write_message(v, nested, style)?)
        }
        (FieldKind::Timestamp, ProtoValue::Timestamp(v)) => Value::String(v.to_rfc3339()?),
        (FieldKind::Duration, ProtoValue::Duration(v)) => match style {
            JsonStyle::Canonical => Value::String(v.to_string()),
            JsonStyle::Amino => Value::String(v.total_nanos().to_string()),
        },
        _ => return Err(mismatch(descriptor, field, kind.name())),
    };
    Ok(json)
}

fn write_float(v: f64) -> Value {
    if v.is_nan() {
        Value::String("NaN".to_string())
    } else if v.is_infinite() {
        let text = if v > 0.0 { "Infinity" } else { "-Infinity" };
        Value::String(text.to_string())
    } else {
        Number::from_f64(v).map_or(Value::Null, Value::Number)
    }
}

// ---------------------------------------------------------------- reading

fn read_message(
    object: &Map<String, Value>,
    descriptor: &MessageDescriptor,
    style: JsonStyle,
) -> Result<MessageValue, JsonError> {
    let mut parsed = IndexMap::new();
    for (key, json) in object {
        let field = descriptor
            .field_by_key(key)
            .ok_or_else(|| SchemaError::UnknownField {
                message: descriptor.full_name.clone(),
                field: key.clone(),
            })?;
        if json.is_null() {
            continue;
        }
        parsed.insert(field.name.as_str(), read_field(field, json, style)?);
    }
    let mut message = MessageValue::new();
    for field in &descriptor.fields {
        let value = match parsed.swap_remove(field.name.as_str()) {
            Some(value) => value,
            None => match field.default_value() {
                Some(value) => value,
                None => continue,
            },
        };
        message.set(&field.name, value);
    }
    Ok(message)
}

fn read_field(field: &FieldDescriptor, json: &Value, style: JsonStyle) -> Result<ProtoValue, JsonError> {
    match &field.label {
        Label::Singular | Label::Optional => read_element(field, &field.kind, json, style),
        Label::Repeated => {
            let Value::Array(items) = json else {
                return Err(expected(&field.name, "array"));
            };
            items
                .iter()
                .map(|item| read_element(field, &field.kind, item, style))
                .collect::<Result<Vec<_>, _>>()
                .map(ProtoValue::List)
        }
        Label::Map(key_kind) => {
            let Value::Object(entries) = json else {
                return Err(expected(&field.name, "object"));
            };
            entries
                .iter()
                .map(|(key, entry)| -> Result<(MapKey, ProtoValue), JsonError> {
                    let key = MapKey::parse(key, key_kind).ok_or_else(|| JsonError::InvalidNumber {
                        field: field.name.clone(),
                        value: key.clone(),
                    })?;
                    Ok((key, read_element(field, &field.kind, entry, style)?))
                })
                .collect::<Result<_, JsonError>>()
                .map(ProtoValue::Map)
        }
    }
}

fn read_element(
    field: &FieldDescriptor,
    kind: &FieldKind,
    json: &Value,
    style: JsonStyle,
) -> Result<ProtoValue, JsonError> {
    let name = field.name.as_str();
    let value = match kind {
        FieldKind::Double => ProtoValue::Double(read_float(name, json)?),
        FieldKind::Float => ProtoValue::Float(read_float(name, json)? as f32),
        FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32 => {
            ProtoValue::Int32(narrow(name, json, read_i64(name, json)?)?)
        }
        FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64 => {
            ProtoValue::Int64(read_i64(name, json)?)
        }
        FieldKind::Uint32 | FieldKind::Fixed32 => {
            ProtoValue::Uint32(narrow(name, json, read_u64(name, json)?)?)
        }
        FieldKind::Uint64 | FieldKind::Fixed64 => ProtoValue::Uint64(read_u64(name, json)?),
        FieldKind::Bool => match json {
            Value::Bool(b) => ProtoValue::Bool(*b),
            _ => return Err(expected(name, "bool")),
        },
        FieldKind::String => match json {
            Value::String(s) => ProtoValue::String(s.clone()),
            _ => return Err(expected(name, "string")),
        },
        FieldKind::Bytes => {
            let Value::String(text) = json else {
                return Err(expected(name, "base64 string"));
            };
            let bytes = STANDARD
                .decode(text)
                .or_else(|_| URL_SAFE.decode(text))
                .map_err(|_| JsonError::InvalidBase64 {
                    field: name.to_string(),
                })?;
            ProtoValue::Bytes(bytes)
        }
        FieldKind::Enum(enum_desc) => {
            let number = match json {
                Value::String(text) => enum_desc.value_of(text).or_else(|| text.parse().ok()),
                Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
                _ => return Err(expected(name, "enum name or number")),
            };
            let number = number.ok_or_else(|| JsonError::UnknownEnumValue {
                field: name.to_string(),
                value: json.to_string(),
            })?;
            ProtoValue::Enum(number)
        }
        FieldKind::Message(nested) => match json {
            Value::Object(object) => ProtoValue::Message(read_message(object, nested, style)?),
            _ => return Err(expected(name, "object")),
        },
        FieldKind::Timestamp => match json {
            Value::String(text) => ProtoValue::Timestamp(Timestamp::parse_rfc3339(text)?),
            _ => return Err(expected(name, "RFC 3339 string")),
        },
        FieldKind::Duration => ProtoValue::Duration(read_duration(json)?),
    };
    Ok(value)
}

/// Accepts both the `"1.5s"` form and a count of nanoseconds.
fn read_duration(json: &Value) -> Result<Duration, JsonError> {
    let invalid = || JsonError::InvalidDuration(json.to_string());
    match json {
        Value::String(text) if text.ends_with('s') => Duration::parse_json(text),
        Value::String(text) => {
            let nanos: i128 = text.parse().map_err(|_| invalid())?;
            Duration::from_nanos(nanos).ok_or_else(invalid)
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|nanos| Duration::from_nanos(nanos as i128))
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

fn read_float(field: &str, json: &Value) -> Result<f64, JsonError> {
    match json {
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid_number(field, json)),
        Value::String(text) => match text.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            _ => text.parse().map_err(|_| invalid_number(field, json)),
        },
        _ => Err(expected(field, "number")),
    }
}

fn read_i64(field: &str, json: &Value) -> Result<i64, JsonError> {
    match json {
        Value::Number(n) => n.as_i64().ok_or_else(|| invalid_number(field, json)),
        Value::String(text) => text.parse().map_err(|_| invalid_number(field, json)),
        _ => Err(expected(field, "integer")),
    }
}

fn read_u64(field: &str, json: &Value) -> Result<u64, JsonError> {
    match json {
        Value::Number(n) => n.as_u64().ok_or_else(|| invalid_number(field, json)),
        Value::String(text) => text.parse().map_err(|_| invalid_number(field, json)),
        _ => Err(expected(field, "integer")),
    }
}

fn narrow<T: TryFrom<U>, U>(field: &str, json: &Value, value: U) -> Result<T, JsonError> {
    T::try_from(value).map_err(|_| invalid_number(field, json))
}

fn invalid_number(field: &str, json: &Value) -> JsonError {
    JsonError::InvalidNumber {
        field: field.to_string(),
        value: json.to_string(),
    }
}

fn expected(field: &str, expected: &'static str) -> JsonError {
    JsonError::ExpectedType {
        field: field.to_string(),
        expected,
    }
}

fn mismatch(
    descriptor: &MessageDescriptor,
    field: &FieldDescriptor,
    expected: &'static str,
) -> JsonError {
    SchemaError::TypeMismatch {
        message: descriptor.full_name.clone(),
        field: field.name.clone(),
        expected,
    }
    .into()
}
