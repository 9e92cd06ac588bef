//! Dynamic message values.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::descriptor::FieldKind;
use crate::wkt::{Duration, Timestamp};

/// A single field value.
///
/// Signed kinds of one width share a variant (`int32`, `sint32` and
/// `sfixed32` are all [`ProtoValue::Int32`]); the field's
/// [`FieldKind`](crate::FieldKind) decides how it is laid out on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtoValue {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Enum number. Unknown numbers are kept as-is.
    Enum(i32),
    Message(MessageValue),
    Timestamp(Timestamp),
    Duration(Duration),
    /// Elements of a repeated field.
    List(Vec<ProtoValue>),
    /// Entries of a map field, ordered by key.
    Map(BTreeMap<MapKey, ProtoValue>),
}

impl ProtoValue {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ProtoValue::Bool(_) => "bool",
            ProtoValue::Int32(_) => "int32",
            ProtoValue::Int64(_) => "int64",
            ProtoValue::Uint32(_) => "uint32",
            ProtoValue::Uint64(_) => "uint64",
            ProtoValue::Float(_) => "float",
            ProtoValue::Double(_) => "double",
            ProtoValue::String(_) => "string",
            ProtoValue::Bytes(_) => "bytes",
            ProtoValue::Enum(_) => "enum",
            ProtoValue::Message(_) => "message",
            ProtoValue::Timestamp(_) => "timestamp",
            ProtoValue::Duration(_) => "duration",
            ProtoValue::List(_) => "list",
            ProtoValue::Map(_) => "map",
        }
    }

    pub fn as_message(&self) -> Option<&MessageValue> {
        match self {
            ProtoValue::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ProtoValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ProtoValue]> {
        match self {
            ProtoValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for ProtoValue {
    fn from(val: bool) -> Self {
        ProtoValue::Bool(val)
    }
}

impl From<i32> for ProtoValue {
    fn from(val: i32) -> Self {
        ProtoValue::Int32(val)
    }
}

impl From<i64> for ProtoValue {
    fn from(val: i64) -> Self {
        ProtoValue::Int64(val)
    }
}

impl From<u32> for ProtoValue {
    fn from(val: u32) -> Self {
        ProtoValue::Uint32(val)
    }
}

impl From<u64> for ProtoValue {
    fn from(val: u64) -> Self {
        ProtoValue::Uint64(val)
    }
}

impl From<f32> for ProtoValue {
    fn from(val: f32) -> Self {
        ProtoValue::Float(val)
    }
}

impl From<f64> for ProtoValue {
    fn from(val: f64) -> Self {
        ProtoValue::Double(val)
    }
}

impl From<&str> for ProtoValue {
    fn from(val: &str) -> Self {
        ProtoValue::String(val.to_string())
    }
}

impl From<String> for ProtoValue {
    fn from(val: String) -> Self {
        ProtoValue::String(val)
    }
}

impl From<Vec<u8>> for ProtoValue {
    fn from(val: Vec<u8>) -> Self {
        ProtoValue::Bytes(val)
    }
}

impl From<MessageValue> for ProtoValue {
    fn from(val: MessageValue) -> Self {
        ProtoValue::Message(val)
    }
}

impl From<Timestamp> for ProtoValue {
    fn from(val: Timestamp) -> Self {
        ProtoValue::Timestamp(val)
    }
}

impl From<Duration> for ProtoValue {
    fn from(val: Duration) -> Self {
        ProtoValue::Duration(val)
    }
}

impl From<Vec<ProtoValue>> for ProtoValue {
    fn from(val: Vec<ProtoValue>) -> Self {
        ProtoValue::List(val)
    }
}

/// Key of a map field entry.
///
/// All signed key kinds map to `Int`, all unsigned ones to `Uint`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Bool(bool),
    Int(i64),
    Uint(u64),
    String(String),
}

impl MapKey {
    /// Converts a decoded key value; `None` for kinds that cannot be keys.
    pub fn from_value(value: &ProtoValue) -> Option<Self> {
        match value {
            ProtoValue::Bool(b) => Some(MapKey::Bool(*b)),
            ProtoValue::Int32(n) => Some(MapKey::Int(*n as i64)),
            ProtoValue::Int64(n) => Some(MapKey::Int(*n)),
            ProtoValue::Uint32(n) => Some(MapKey::Uint(*n as u64)),
            ProtoValue::Uint64(n) => Some(MapKey::Uint(*n)),
            ProtoValue::String(s) => Some(MapKey::String(s.clone())),
            _ => None,
        }
    }

    /// The key as a value of `kind`, or `None` if it does not fit.
    pub fn to_value(&self, kind: &FieldKind) -> Option<ProtoValue> {
        let value = match (self, kind) {
            (MapKey::Bool(b), FieldKind::Bool) => ProtoValue::Bool(*b),
            (MapKey::Int(n), FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32) => {
                ProtoValue::Int32(i32::try_from(*n).ok()?)
            }
            (MapKey::Int(n), FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64) => {
                ProtoValue::Int64(*n)
            }
            (MapKey::Uint(n), FieldKind::Uint32 | FieldKind::Fixed32) => {
                ProtoValue::Uint32(u32::try_from(*n).ok()?)
            }
            (MapKey::Uint(n), FieldKind::Uint64 | FieldKind::Fixed64) => ProtoValue::Uint64(*n),
            (MapKey::String(s), FieldKind::String) => ProtoValue::String(s.clone()),
            _ => return None,
        };
        Some(value)
    }

    /// Parses a JSON object key as a key of `kind`.
    pub fn parse(key: &str, kind: &FieldKind) -> Option<Self> {
        match kind {
            FieldKind::Bool => key.parse().ok().map(MapKey::Bool),
            FieldKind::Int32
            | FieldKind::Sint32
            | FieldKind::Sfixed32
            | FieldKind::Int64
            | FieldKind::Sint64
            | FieldKind::Sfixed64 => key.parse().ok().map(MapKey::Int),
            FieldKind::Uint32 | FieldKind::Fixed32 | FieldKind::Uint64 | FieldKind::Fixed64 => {
                key.parse().ok().map(MapKey::Uint)
            }
            FieldKind::String => Some(MapKey::String(key.to_string())),
            _ => None,
        }
        .filter(|k| k.to_value(kind).is_some())
    }

    /// The key as a JSON object key.
    pub fn to_json_key(&self) -> String {
        match self {
            MapKey::Bool(b) => b.to_string(),
            MapKey::Int(n) => n.to_string(),
            MapKey::Uint(n) => n.to_string(),
            MapKey::String(s) => s.clone(),
        }
    }
}

impl From<&str> for MapKey {
    fn from(val: &str) -> Self {
        MapKey::String(val.to_string())
    }
}

/// A message: field values keyed by proto field name.
///
/// Message-typed and `optional` fields that are not set are absent from the
/// map. Values produced by decoding or [`from_partial`](crate::from_partial)
/// hold every other field, defaults included. Equality ignores insertion
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageValue {
    pub fields: IndexMap<String, ProtoValue>,
}

impl MessageValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<ProtoValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<ProtoValue>) -> Option<ProtoValue> {
        self.fields.insert(name.to_string(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&ProtoValue> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ProtoValue> {
        self.fields.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ProtoValue> {
        self.fields.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProtoValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, ProtoValue)> for MessageValue {
    fn from_iter<T: IntoIterator<Item = (String, ProtoValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
