//! # manifold-resource
//!
//! Loads Kubernetes-style manifests and writes them back.
//!
//! A source is a local path or an http(s) URL. Its bytes are split into YAML
//! documents, each document's type is looked up in a [`TypeRegistry`], and
//! the document is converted into a [`GenericResource`] and normalized:
//!
//! - a recognized type replaces the document's `apiVersion` and `kind`
//! - a resource without a namespace gets the configured default (`default`)
//!
//! ```rust
//! use manifold_resource::ResourceLoader;
//!
//! let loader = ResourceLoader::new().unwrap();
//! let policy = loader
//!     .convert(b"apiVersion: kyverno.io/v1\nkind: ClusterPolicy\nmetadata:\n  name: require-labels\nspec:\n  rules: []\n")
//!     .unwrap();
//!
//! assert_eq!(policy.namespace(), Some("default"));
//! ```
//!
//! Writing goes to local paths only; http(s) destinations are rejected.

pub mod builtin;
mod config;
mod error;
mod loader;
mod normalize;
mod scheme;
mod serialize;
mod split;

pub use builtin::{POLICY_GROUP, REPORT_GROUP};
pub use config::{HttpConfig, LoaderConfig, MAX_TIMEOUT_SECS};
pub use error::{Error, ErrorKind, Result};
pub use loader::{ResourceLoader, ResourceLoaderBuilder};
pub use normalize::{normalize, to_generic, DEFAULT_NAMESPACE};
pub use scheme::{DecodeError, Scheme, TypeRegistry};
pub use serialize::{to_json, to_yaml};
pub use split::{split_documents, DocumentBlock, DOCUMENT_SEPARATOR};

pub use manifold_http::Cancellation;
pub use manifold_value::{GenericResource, TypeIdentity, Value};
pub use manifold_vfs::Filesystem;
