//! Built-in descriptor tables.
//!
//! Each function builds a fresh descriptor; nested message kinds are built
//! by calling the function of the nested type.

use std::sync::Arc;

use crate::descriptor::MessageDescriptor;
use crate::wkt;

pub mod cosmos;
pub mod dydx;

/// Every built-in message descriptor, well-known types included.
pub fn all() -> Vec<Arc<MessageDescriptor>> {
    let mut descriptors = vec![
        wkt::timestamp_descriptor(),
        wkt::duration_descriptor(),
        wkt::any_descriptor(),
    ];
    descriptors.extend(cosmos::all());
    descriptors.extend(dydx::all());
    descriptors
}
