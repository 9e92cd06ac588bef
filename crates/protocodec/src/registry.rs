//! Resolution of `google.protobuf.Any` payloads by type URL.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::config::CodecConfig;
use crate::decoder::ProtoDecoder;
use crate::descriptor::MessageDescriptor;
use crate::error::RegistryError;
use crate::json::{write_message, JsonStyle};
use crate::schemas;
use crate::value::MessageValue;
use crate::wkt::Any;

/// Maps type URLs (`"/" + full name`) to message descriptors.
///
/// The registry is filled once and then only read; it is `Send + Sync` and
/// can be shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Arc<MessageDescriptor>>,
    decoder: ProtoDecoder,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            types: HashMap::new(),
            decoder: ProtoDecoder::with_config(config),
        }
    }

    /// Registers `descriptor` under its own type URL, replacing any previous
    /// entry.
    pub fn register(&mut self, descriptor: Arc<MessageDescriptor>) -> &mut Self {
        let type_url = descriptor.type_url();
        self.register_as(type_url, descriptor)
    }

    /// Registers `descriptor` under an explicit type URL.
    pub fn register_as(
        &mut self,
        type_url: impl Into<String>,
        descriptor: Arc<MessageDescriptor>,
    ) -> &mut Self {
        let type_url = type_url.into();
        tracing::debug!(%type_url, full_name = %descriptor.full_name, "registering message type");
        self.types.insert(type_url, descriptor);
        self
    }

    pub fn get(&self, type_url: &str) -> Option<&Arc<MessageDescriptor>> {
        self.types.get(type_url)
    }

    pub fn contains(&self, type_url: &str) -> bool {
        self.types.contains_key(type_url)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered type URLs, in no particular order.
    pub fn type_urls(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    fn lookup(&self, type_url: &str) -> Result<&Arc<MessageDescriptor>, RegistryError> {
        self.types.get(type_url).ok_or_else(|| {
            tracing::debug!(%type_url, "no message type registered");
            RegistryError::UnknownTypeUrl(type_url.to_string())
        })
    }

    /// Decodes the payload of `any` with the descriptor registered for its
    /// type URL.
    pub fn resolve(&self, any: &Any) -> Result<MessageValue, RegistryError> {
        let descriptor = self.lookup(&any.type_url)?;
        Ok(self.decoder.decode(&any.value, descriptor)?)
    }

    /// Renders `any` as proto3 JSON: `{"@type": <url>, ...fields}`.
    pub fn resolve_json(&self, any: &Any) -> Result<Value, RegistryError> {
        let descriptor = self.lookup(&any.type_url)?;
        let message = self.decoder.decode(&any.value, descriptor)?;
        let fields = write_message(&message, descriptor, JsonStyle::Canonical)?;
        let mut object = serde_json::Map::with_capacity(fields.len() + 1);
        object.insert("@type".to_string(), Value::String(any.type_url.clone()));
        object.extend(fields);
        Ok(Value::Object(object))
    }
}

/// A registry holding every built-in schema and the well-known types.
pub fn default_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    for descriptor in schemas::all() {
        registry.register(descriptor);
    }
    registry
}
