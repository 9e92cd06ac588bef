//! Codec configuration.

use serde::{Deserialize, Serialize};

/// Tunables shared by the encoder, decoder and registry.
///
/// Deserializes from partial documents; missing keys take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Maximum depth of nested messages the decoder will follow.
    pub recursion_limit: usize,
    /// Growth chunk of the encoder's [`Writer`](protocodec_buffers::Writer).
    pub writer_alloc_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            recursion_limit: 100,
            writer_alloc_size: 1024,
        }
    }
}
