//! The Value type - a loosely-typed resource tree.
//!
//! Every manifest that passes through the loader ends up as a tree of these,
//! whatever its original schema.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A tree-shaped value decoded from a manifest document.
///
/// # Design Notes
///
/// - Uses `BTreeMap` so key order never affects equality or output
/// - Integers are `i64`; anything wider decodes as `Float`
/// - No binary variant: manifests are text
/// - Floats compare by value, except that NaN equals NaN, so a document
///   holding `.nan` still equals itself after a round trip
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Explicit null (`~`, `null`, or an empty value).
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Mapping with string keys.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// Create an empty array.
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Borrow the string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "sequence",
            Value::Map(_) => "mapping",
        }
    }

    /// Get a nested value by field names.
    ///
    /// Only mappings are traversed. Returns `None` if any field is missing or
    /// an intermediate value is not a mapping.
    pub fn nested(&self, fields: &[&str]) -> Option<&Value> {
        let mut current = self;
        for field in fields {
            current = current.as_map()?.get(*field)?;
        }
        Some(current)
    }

    /// Get a nested string by field names.
    pub fn nested_str(&self, fields: &[&str]) -> Option<&str> {
        self.nested(fields).and_then(Value::as_str)
    }

    /// Set a nested value, creating intermediate mappings as needed.
    ///
    /// Any intermediate value that is not a mapping (including `self`) is
    /// replaced by an empty mapping, so this never fails.
    pub fn set_nested(&mut self, fields: &[&str], value: Value) {
        let Some((last, parents)) = fields.split_last() else {
            *self = value;
            return;
        };

        let mut current = self;
        for field in parents {
            current = ensure_map(current)
                .entry((*field).to_string())
                .or_insert_with(Value::map);
        }
        ensure_map(current).insert((*last).to_string(), value);
    }

    /// Remove a nested value, returning it if it existed.
    pub fn remove_nested(&mut self, fields: &[&str]) -> Option<Value> {
        let (last, parents) = fields.split_last()?;
        let mut current = self;
        for field in parents {
            current = current.as_map_mut()?.get_mut(*field)?;
        }
        current.as_map_mut()?.remove(*last)
    }
}

fn ensure_map(value: &mut Value) -> &mut BTreeMap<String, Value> {
    if !value.is_map() {
        *value = Value::map();
    }
    match value {
        Value::Map(map) => map,
        _ => unreachable!("value was just replaced with a map"),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

// Conversion from common types

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_lookup() {
        let mut value = Value::map();
        value.set_nested(&["metadata", "name"], Value::from("web"));

        assert_eq!(value.nested_str(&["metadata", "name"]), Some("web"));
        assert!(value.nested(&["metadata"]).unwrap().is_map());
        assert_eq!(value.nested(&["spec"]), None);
        assert_eq!(value.nested(&["metadata", "name", "deeper"]), None);
    }

    #[test]
    fn set_nested_replaces_scalars_on_the_way() {
        let mut value = Value::map();
        value.set_nested(&["metadata"], Value::from("not a map"));
        value.set_nested(&["metadata", "namespace"], Value::from("prod"));

        assert_eq!(value.nested_str(&["metadata", "namespace"]), Some("prod"));
    }

    #[test]
    fn set_nested_on_scalar_root() {
        let mut value = Value::from(3i64);
        value.set_nested(&["kind"], Value::from("Pod"));
        assert_eq!(value.nested_str(&["kind"]), Some("Pod"));
    }

    #[test]
    fn remove_nested_works() {
        let mut value = Value::map();
        value.set_nested(&["metadata", "labels", "app"], Value::from("web"));

        let removed = value.remove_nested(&["metadata", "labels", "app"]);
        assert_eq!(removed, Some(Value::from("web")));
        assert_eq!(value.nested(&["metadata", "labels", "app"]), None);
        assert!(value.nested(&["metadata", "labels"]).is_some());
        assert_eq!(value.remove_nested(&["missing", "field"]), None);
    }

    #[test]
    fn serializes_as_plain_json() {
        let mut value = Value::map();
        value.set_nested(&["b"], Value::from(vec![1i64, 2]));
        value.set_nested(&["a"], Value::Null);
        value.set_nested(&["c"], Value::from(1.5));

        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"a":null,"b":[1,2],"c":1.5}"#);
    }

    #[test]
    fn float_equality() {
        assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
        assert_eq!(Value::from(f64::INFINITY), Value::from(f64::INFINITY));
        assert_ne!(Value::from(f64::INFINITY), Value::from(f64::NEG_INFINITY));
        assert_eq!(Value::from(0.0), Value::from(-0.0));
        assert_ne!(Value::from(1.0), Value::from(1i64));
        assert_eq!(
            Value::from(vec![Value::from(f64::NAN)]),
            Value::from(vec![Value::from(f64::NAN)])
        );
    }

    #[test]
    fn kind_predicates() {
        assert!(Value::Null.is_null());
        assert!(Value::default().is_null());
        assert!(!Value::map().is_null());
        assert!(Value::array().is_array());
        assert!(!Value::map().is_array());
        assert!(Value::from(vec![1i64]).is_array());
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::map().type_name(), "mapping");
        assert_eq!(Value::array().type_name(), "sequence");
        assert_eq!(Value::from("x").type_name(), "string");
    }
}
