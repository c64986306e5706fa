//! Recognizing a document's type against a registry of known types.
//!
//! [`TypeRegistry::recognize`] reports either the identity of a known type or
//! why the document is not one. An unrecognized document is not a failure:
//! the pipeline carries on with the document's own type fields. Syntax errors
//! and documents that claim a known type but do not fit its shape are hard
//! failures.

use std::collections::BTreeMap;
use std::fmt;

use manifold_value::TypeIdentity;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::split::DocumentBlock;

/// Outcome of a failed recognition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The document names no kind, or a kind the registry does not know.
    #[error("{reason}")]
    Unrecognized { reason: String },

    /// The document is not valid YAML.
    #[error("{message}")]
    Syntax { message: String },

    /// The type fields themselves are unusable (non-string kind, bad apiVersion).
    #[error("invalid type fields: {message}")]
    Invalid { message: String },

    /// The document claims a known type but does not fit its shape.
    #[error("document does not match {identity}: {message}")]
    Mismatch {
        identity: TypeIdentity,
        message: String,
    },
}

impl DecodeError {
    /// True for the soft outcome that lets conversion continue.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, DecodeError::Unrecognized { .. })
    }
}

impl From<DecodeError> for Error {
    fn from(error: DecodeError) -> Self {
        match error {
            DecodeError::Syntax { message } => Error::Parse { message },
            other => Error::Structural {
                message: other.to_string(),
            },
        }
    }
}

/// A registry of known resource types.
///
/// Implementations must be shareable across threads; a loader hands the same
/// registry to every call.
pub trait TypeRegistry: Send + Sync {
    fn recognize(&self, document: &DocumentBlock) -> Result<TypeIdentity, DecodeError>;
}

impl<T: TypeRegistry + ?Sized> TypeRegistry for std::sync::Arc<T> {
    fn recognize(&self, document: &DocumentBlock) -> Result<TypeIdentity, DecodeError> {
        (**self).recognize(document)
    }
}

type ShapeCheck = Box<dyn Fn(serde_yaml::Value) -> Result<(), String> + Send + Sync>;

/// A [`TypeRegistry`] mapping identities to shape checks.
///
/// Types registered with [`Scheme::register`] are checked by deserializing
/// the document into `T`; [`Scheme::register_untyped`] accepts any mapping.
#[derive(Default)]
pub struct Scheme {
    kinds: BTreeMap<TypeIdentity, ShapeCheck>,
}

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `identity`, requiring documents of that type to deserialize
    /// as `T`.
    pub fn register<T: DeserializeOwned + 'static>(&mut self, identity: TypeIdentity) -> &mut Self {
        let check: ShapeCheck = Box::new(|value| {
            serde_yaml::from_value::<T>(value)
                .map(drop)
                .map_err(|e| e.to_string())
        });
        self.kinds.insert(identity, check);
        self
    }

    /// Register `identity` without a shape check.
    pub fn register_untyped(&mut self, identity: TypeIdentity) -> &mut Self {
        let check: ShapeCheck = Box::new(|_| Ok(()));
        self.kinds.insert(identity, check);
        self
    }

    pub fn is_registered(&self, identity: &TypeIdentity) -> bool {
        self.kinds.contains_key(identity)
    }

    /// Registered identities, in order.
    pub fn identities(&self) -> impl Iterator<Item = &TypeIdentity> {
        self.kinds.keys()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl fmt::Debug for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheme")
            .field("kinds", &self.kinds.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TypeRegistry for Scheme {
    fn recognize(&self, document: &DocumentBlock) -> Result<TypeIdentity, DecodeError> {
        let mut yaml: serde_yaml::Value =
            serde_yaml::from_str(document.as_str()).map_err(|e| DecodeError::Syntax {
                message: e.to_string(),
            })?;

        let Some(mapping) = yaml.as_mapping() else {
            return Err(DecodeError::Unrecognized {
                reason: "Object 'Kind' is missing: document is not a mapping".to_string(),
            });
        };

        let kind = match mapping.get("kind") {
            Some(serde_yaml::Value::String(kind)) if !kind.is_empty() => kind.clone(),
            None | Some(serde_yaml::Value::Null) | Some(serde_yaml::Value::String(_)) => {
                return Err(DecodeError::Unrecognized {
                    reason: "Object 'Kind' is missing".to_string(),
                });
            }
            Some(_) => {
                return Err(DecodeError::Invalid {
                    message: "kind must be a string".to_string(),
                });
            }
        };

        let api_version = match mapping.get("apiVersion") {
            Some(serde_yaml::Value::String(v)) => v.clone(),
            None | Some(serde_yaml::Value::Null) => String::new(),
            Some(_) => {
                return Err(DecodeError::Invalid {
                    message: "apiVersion must be a string".to_string(),
                });
            }
        };

        let identity = TypeIdentity::from_api_version(&api_version, kind.as_str()).map_err(|e| {
            DecodeError::Invalid {
                message: e.to_string(),
            }
        })?;

        let Some(check) = self.kinds.get(&identity) else {
            return Err(DecodeError::Unrecognized {
                reason: format!("no kind {kind:?} is registered for version {api_version:?}"),
            });
        };

        yaml.apply_merge().map_err(|e| DecodeError::Invalid {
            message: e.to_string(),
        })?;
        check(yaml).map_err(|message| DecodeError::Mismatch {
            identity: identity.clone(),
            message,
        })?;

        Ok(identity)
    }
}
