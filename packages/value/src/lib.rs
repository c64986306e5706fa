//! Manifold values: the generic representation of a manifest.
//!
//! - `Value`: a loosely-typed tree (mappings, sequences, scalars)
//! - `GenericResource`: a `Value` mapping known to carry a `kind`
//! - `TypeIdentity`: the group/version/kind of a resource type
//!
//! # Example
//!
//! ```rust
//! use manifold_value::GenericResource;
//!
//! let resource = GenericResource::from_yaml_str("apiVersion: v1\nkind: Pod\n").unwrap();
//! assert_eq!(resource.kind(), "Pod");
//! assert_eq!(resource.namespace(), None);
//! ```

mod convert;
mod error;
mod identity;
mod resource;
mod value;

pub use convert::{from_json_slice, from_yaml_str, json_to_value, to_value, value_to_json};
pub use error::{Error, Result};
pub use identity::{split_api_version, TypeIdentity};
pub use resource::GenericResource;
pub use value::Value;
