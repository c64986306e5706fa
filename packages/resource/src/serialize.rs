//! Rendering resources back to text.

use manifold_value::GenericResource;

use crate::error::{Error, Result};

/// Render a resource as a single YAML document, without a leading `---`.
pub fn to_yaml(resource: &GenericResource) -> Result<Vec<u8>> {
    serde_yaml::to_string(resource)
        .map(String::into_bytes)
        .map_err(|e| Error::Serialize {
            message: e.to_string(),
        })
}

/// Render a resource as pretty-printed JSON.
pub fn to_json(resource: &GenericResource) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(resource).map_err(|e| Error::Serialize {
        message: e.to_string(),
    })
}
