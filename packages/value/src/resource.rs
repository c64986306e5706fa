//! GenericResource: a manifest held as a loosely-typed mapping.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::convert;
use crate::error::{Error, Result};
use crate::{TypeIdentity, Value};

/// A resource object whose schema is not known at compile time.
///
/// The object is always a mapping with a non-empty string `kind`. If
/// `apiVersion` is present it is a string, and if `metadata` is present it
/// is a mapping.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericResource {
    object: BTreeMap<String, Value>,
}

impl GenericResource {
    /// Wrap a Value, checking the resource shape.
    pub fn from_value(value: Value) -> Result<Self> {
        let object = match value {
            Value::Map(map) => map,
            other => {
                return Err(Error::NotAMapping {
                    found: other.type_name(),
                })
            }
        };

        match object.get("kind") {
            Some(Value::String(kind)) if !kind.is_empty() => {}
            Some(Value::String(_)) | None | Some(Value::Null) => {
                return Err(Error::InvalidField {
                    field: "kind".to_string(),
                    message: "object kind is missing".to_string(),
                })
            }
            Some(other) => return Err(wrong_type("kind", "string", other)),
        }

        match object.get("apiVersion") {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => return Err(wrong_type("apiVersion", "string", other)),
        }

        match object.get("metadata") {
            None | Some(Value::Null) | Some(Value::Map(_)) => {}
            Some(other) => return Err(wrong_type("metadata", "mapping", other)),
        }

        Ok(Self { object })
    }

    /// Parse one YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Self::from_value(convert::from_yaml_str(text)?)
    }

    /// Parse one JSON object.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_value(convert::from_json_slice(bytes)?)
    }

    /// Convert any serializable object, such as a typed resource struct.
    pub fn from_serializable<T: Serialize>(data: &T) -> Result<Self> {
        Self::from_value(convert::to_value(data)?)
    }

    pub fn object(&self) -> &BTreeMap<String, Value> {
        &self.object
    }

    pub fn into_value(self) -> Value {
        Value::Map(self.object)
    }

    /// Get a nested field.
    pub fn get(&self, fields: &[&str]) -> Option<&Value> {
        let (first, rest) = fields.split_first()?;
        self.object.get(*first)?.nested(rest)
    }

    fn get_str(&self, fields: &[&str]) -> Option<&str> {
        self.get(fields).and_then(Value::as_str)
    }

    fn set(&mut self, fields: &[&str], value: Value) {
        let Some((first, rest)) = fields.split_first() else {
            return;
        };
        self.object
            .entry((*first).to_string())
            .or_insert(Value::Null)
            .set_nested(rest, value);
    }

    pub fn api_version(&self) -> Option<&str> {
        self.get_str(&["apiVersion"])
    }

    pub fn kind(&self) -> &str {
        self.get_str(&["kind"]).unwrap_or_default()
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str(&["metadata", "name"])
    }

    /// The namespace, if set to a string. May be empty.
    pub fn namespace(&self) -> Option<&str> {
        self.get_str(&["metadata", "namespace"])
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.set(&["metadata", "namespace"], Value::String(namespace.into()));
    }

    /// The identity declared by the object's own type fields.
    ///
    /// Returns `None` when `apiVersion` is absent or malformed.
    pub fn type_identity(&self) -> Option<TypeIdentity> {
        TypeIdentity::from_api_version(self.api_version()?, self.kind()).ok()
    }

    /// Overwrite `apiVersion` and `kind` with the given identity.
    pub fn set_type_identity(&mut self, identity: &TypeIdentity) {
        self.object.insert(
            "apiVersion".to_string(),
            Value::String(identity.api_version()),
        );
        self.object
            .insert("kind".to_string(), Value::String(identity.kind.clone()));
    }

    /// Render as a JSON value, for consumers that speak JSON.
    pub fn to_json(&self) -> serde_json::Value {
        convert::value_to_json(Value::Map(self.object.clone()))
    }
}

impl Serialize for GenericResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.object.serialize(serializer)
    }
}

fn wrong_type(field: &str, expected: &str, found: &Value) -> Error {
    Error::InvalidField {
        field: field.to_string(),
        message: format!("expected {}, found {}", expected, found.type_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    const DEPLOYMENT: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: shop
spec:
  replicas: 3
"#;

    #[test]
    fn accessors() {
        let resource = GenericResource::from_yaml_str(DEPLOYMENT).unwrap();
        assert_eq!(resource.api_version(), Some("apps/v1"));
        assert_eq!(resource.kind(), "Deployment");
        assert_eq!(resource.name(), Some("web"));
        assert_eq!(resource.namespace(), Some("shop"));
        assert_eq!(
            resource.get(&["spec", "replicas"]),
            Some(&Value::Integer(3))
        );
        assert_eq!(
            resource.type_identity(),
            Some(TypeIdentity::new("apps", "v1", "Deployment"))
        );
    }

    #[test]
    fn into_value_keeps_every_field() {
        let resource = GenericResource::from_yaml_str(DEPLOYMENT).unwrap();
        let value = resource.clone().into_value();
        assert!(value.is_map());
        assert_eq!(value.nested(&["spec", "replicas"]), Some(&Value::Integer(3)));
        assert_eq!(GenericResource::from_value(value).unwrap(), resource);
    }

    #[test]
    fn set_namespace_creates_metadata() {
        let mut resource = GenericResource::from_yaml_str("kind: ConfigMap\n").unwrap();
        assert_eq!(resource.namespace(), None);

        resource.set_namespace("default");
        assert_eq!(resource.namespace(), Some("default"));
    }

    #[test]
    fn set_namespace_replaces_null_metadata() {
        let mut resource =
            GenericResource::from_yaml_str("kind: ConfigMap\nmetadata:\n").unwrap();
        resource.set_namespace("default");
        assert_eq!(resource.namespace(), Some("default"));
    }

    #[test]
    fn set_type_identity_overwrites() {
        let mut resource = GenericResource::from_yaml_str(DEPLOYMENT).unwrap();
        resource.set_type_identity(&TypeIdentity::new("", "v1", "Pod"));
        assert_eq!(resource.api_version(), Some("v1"));
        assert_eq!(resource.kind(), "Pod");
    }

    #[test]
    fn rejects_scalar_document() {
        let err = GenericResource::from_yaml_str("just a string").unwrap_err();
        assert!(matches!(err, Error::NotAMapping { found: "string" }));
    }

    #[test]
    fn rejects_missing_kind() {
        let err = GenericResource::from_yaml_str("apiVersion: v1\n").unwrap_err();
        assert!(matches!(err, Error::InvalidField { ref field, .. } if field == "kind"));
    }

    #[test]
    fn rejects_scalar_metadata() {
        let err = GenericResource::from_yaml_str("kind: Pod\nmetadata: web\n").unwrap_err();
        assert!(matches!(err, Error::InvalidField { ref field, .. } if field == "metadata"));
    }

    #[test]
    fn rejects_numeric_api_version() {
        let err = GenericResource::from_yaml_str("kind: Pod\napiVersion: 1\n").unwrap_err();
        assert!(matches!(err, Error::InvalidField { ref field, .. } if field == "apiVersion"));
    }

    #[test]
    fn from_serializable_struct() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Namespace {
            api_version: &'static str,
            kind: &'static str,
        }

        let resource = GenericResource::from_serializable(&Namespace {
            api_version: "v1",
            kind: "Namespace",
        })
        .unwrap();
        assert_eq!(resource.kind(), "Namespace");
        assert_eq!(resource.api_version(), Some("v1"));
    }

    #[test]
    fn json_bridge() {
        let resource =
            GenericResource::from_json_slice(br#"{"kind":"Pod","metadata":{"name":"a"}}"#)
                .unwrap();
        assert_eq!(resource.name(), Some("a"));
        assert_eq!(
            resource.to_json(),
            serde_json::json!({"kind": "Pod", "metadata": {"name": "a"}})
        );
    }
}
