//! Declarative message schemas.
//!
//! A [`MessageDescriptor`] lists a message's fields in declaration order; the
//! encoder, decoder, [`from_partial`](crate::from_partial) and the JSON
//! adapters all walk the same table.
//!
//! ```
//! use std::sync::Arc;
//! use protocodec::{FieldKind, MessageDescriptor};
//!
//! let coin = Arc::new(
//!     MessageDescriptor::new("cosmos.base.v1beta1.Coin")
//!         .field("denom", 1, FieldKind::String)
//!         .field("amount", 2, FieldKind::String),
//! );
//! assert_eq!(coin.type_url(), "/cosmos.base.v1beta1.Coin");
//! assert_eq!(coin.field_by_number(2).unwrap().name, "amount");
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use protocodec_buffers::WireType;

use crate::naming::{to_camel_case, to_snake_case};
use crate::value::{MessageValue, ProtoValue};

/// Type of a field's values.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
    Enum(Arc<EnumDescriptor>),
    Message(Arc<MessageDescriptor>),
    /// `google.protobuf.Timestamp`, carried as [`ProtoValue::Timestamp`].
    Timestamp,
    /// `google.protobuf.Duration`, carried as [`ProtoValue::Duration`].
    Duration,
}

impl FieldKind {
    /// Wire type of a single, unpacked value of this kind.
    pub fn wire_type(&self) -> WireType {
        match self {
            FieldKind::Double | FieldKind::Fixed64 | FieldKind::Sfixed64 => WireType::Fixed64,
            FieldKind::Float | FieldKind::Fixed32 | FieldKind::Sfixed32 => WireType::Fixed32,
            FieldKind::String
            | FieldKind::Bytes
            | FieldKind::Message(_)
            | FieldKind::Timestamp
            | FieldKind::Duration => WireType::LengthDelimited,
            _ => WireType::Varint,
        }
    }

    /// Whether repeated values of this kind use the packed encoding.
    pub fn is_packable(&self) -> bool {
        self.wire_type() != WireType::LengthDelimited
    }

    /// Whether values of this kind are embedded messages with explicit
    /// presence.
    pub fn is_message(&self) -> bool {
        matches!(
            self,
            FieldKind::Message(_) | FieldKind::Timestamp | FieldKind::Duration
        )
    }

    /// Zero value of a scalar kind; `None` for message kinds.
    pub fn default_value(&self) -> Option<ProtoValue> {
        let value = match self {
            FieldKind::Double => ProtoValue::Double(0.0),
            FieldKind::Float => ProtoValue::Float(0.0),
            FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32 => ProtoValue::Int32(0),
            FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64 => ProtoValue::Int64(0),
            FieldKind::Uint32 | FieldKind::Fixed32 => ProtoValue::Uint32(0),
            FieldKind::Uint64 | FieldKind::Fixed64 => ProtoValue::Uint64(0),
            FieldKind::Bool => ProtoValue::Bool(false),
            FieldKind::String => ProtoValue::String(String::new()),
            FieldKind::Bytes => ProtoValue::Bytes(Vec::new()),
            FieldKind::Enum(_) => ProtoValue::Enum(0),
            FieldKind::Message(_) | FieldKind::Timestamp | FieldKind::Duration => return None,
        };
        Some(value)
    }

    /// Name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Double => "double",
            FieldKind::Float => "float",
            FieldKind::Int32 => "int32",
            FieldKind::Int64 => "int64",
            FieldKind::Uint32 => "uint32",
            FieldKind::Uint64 => "uint64",
            FieldKind::Sint32 => "sint32",
            FieldKind::Sint64 => "sint64",
            FieldKind::Fixed32 => "fixed32",
            FieldKind::Fixed64 => "fixed64",
            FieldKind::Sfixed32 => "sfixed32",
            FieldKind::Sfixed64 => "sfixed64",
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::Bytes => "bytes",
            FieldKind::Enum(_) => "enum",
            FieldKind::Message(_) => "message",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Duration => "duration",
        }
    }
}

/// Cardinality of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    /// Implicit presence: the default value is not written.
    Singular,
    /// proto3 `optional`: written whenever set, even to the default.
    Optional,
    Repeated,
    /// `map<K, V>`; holds the key kind, the field's kind is the value kind.
    Map(FieldKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Proto (snake_case) name.
    pub name: String,
    pub number: u32,
    pub kind: FieldKind,
    pub label: Label,
}

impl FieldDescriptor {
    /// lowerCamelCase name used by canonical JSON.
    pub fn json_name(&self) -> String {
        to_camel_case(&self.name)
    }

    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }

    /// Value a freshly decoded message holds for this field, or `None` if the
    /// field starts out absent.
    pub fn default_value(&self) -> Option<ProtoValue> {
        match &self.label {
            Label::Singular => self.kind.default_value(),
            Label::Optional => None,
            Label::Repeated => Some(ProtoValue::List(Vec::new())),
            Label::Map(_) => Some(ProtoValue::Map(BTreeMap::new())),
        }
    }
}

/// Schema of one message type.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDescriptor {
    /// Fully qualified name, e.g. `dydxprotocol.prices.MarketParam`.
    pub full_name: String,
    /// Fields in declaration order; also the encoding order.
    pub fields: Vec<FieldDescriptor>,
    /// Amino type name, for messages that have one.
    pub amino_name: Option<String>,
}

impl MessageDescriptor {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            fields: Vec::new(),
            amino_name: None,
        }
    }

    fn push(mut self, name: &str, number: u32, kind: FieldKind, label: Label) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.to_string(),
            number,
            kind,
            label,
        });
        self
    }

    /// Adds a singular field.
    pub fn field(self, name: &str, number: u32, kind: FieldKind) -> Self {
        self.push(name, number, kind, Label::Singular)
    }

    /// Adds a proto3 `optional` field.
    pub fn optional(self, name: &str, number: u32, kind: FieldKind) -> Self {
        self.push(name, number, kind, Label::Optional)
    }

    pub fn repeated(self, name: &str, number: u32, kind: FieldKind) -> Self {
        self.push(name, number, kind, Label::Repeated)
    }

    /// Adds a `map<key, value>` field.
    pub fn map(self, name: &str, number: u32, key: FieldKind, value: FieldKind) -> Self {
        self.push(name, number, value, Label::Map(key))
    }

    pub fn with_amino_name(mut self, amino_name: &str) -> Self {
        self.amino_name = Some(amino_name.to_string());
        self
    }

    /// Unqualified name, e.g. `MarketParam`.
    pub fn name(&self) -> &str {
        self.full_name
            .rsplit_once('.')
            .map_or(self.full_name.as_str(), |(_, name)| name)
    }

    /// `"/" + full_name`, the key under which `Any` payloads are resolved.
    pub fn type_url(&self) -> String {
        format!("/{}", self.full_name)
    }

    pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.number == number)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks a field up by either its proto name or its JSON name.
    pub fn field_by_key(&self, key: &str) -> Option<&FieldDescriptor> {
        self.field_by_name(key)
            .or_else(|| self.field_by_name(&to_snake_case(key)))
            .or_else(|| self.fields.iter().find(|f| f.json_name() == key))
    }

    /// A message holding every field's default.
    pub fn default_message(&self) -> MessageValue {
        self.fields
            .iter()
            .filter_map(|f| f.default_value().map(|v| (f.name.clone(), v)))
            .collect()
    }
}

/// Schema of an enum: symbolic names and their numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub full_name: String,
    pub values: Vec<(String, i32)>,
}

impl EnumDescriptor {
    pub fn new(full_name: impl Into<String>, values: &[(&str, i32)]) -> Self {
        Self {
            full_name: full_name.into(),
            values: values
                .iter()
                .map(|(name, number)| (name.to_string(), *number))
                .collect(),
        }
    }

    pub fn name_of(&self, number: i32) -> Option<&str> {
        self.values
            .iter()
            .find(|(_, n)| *n == number)
            .map(|(name, _)| name.as_str())
    }

    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, number)| *number)
    }
}
