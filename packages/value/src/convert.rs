//! Conversions between Value and the serde data models.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::Value;

/// Parse a single YAML document into a Value.
///
/// Merge keys (`<<`) are resolved and tags are dropped. Scalar mapping keys
/// are stringified the way JSON conversion would; collection keys fail, and
/// so do two keys that stringify to the same text.
pub fn from_yaml_str(text: &str) -> Result<Value> {
    let mut yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
    yaml.apply_merge().map_err(|e| Error::InvalidField {
        field: "<<".to_string(),
        message: e.to_string(),
    })?;
    yaml_to_value(yaml, &mut Vec::new())
}

/// Parse JSON bytes into a Value.
pub fn from_json_slice(bytes: &[u8]) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_slice(bytes)?;
    Ok(json_to_value(json))
}

/// Convert any serializable data into a Value by way of JSON.
pub fn to_value<T: Serialize>(data: &T) -> Result<Value> {
    let json = serde_json::to_value(data)?;
    Ok(json_to_value(json))
}

fn yaml_to_value(yaml: serde_yaml::Value, path: &mut Vec<String>) -> Result<Value> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                path.push(i.to_string());
                out.push(yaml_to_value(item, path)?);
                path.pop();
            }
            Value::Array(out)
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut out = std::collections::BTreeMap::new();
            for (key, item) in mapping {
                let key = key_to_string(key, path)?;
                path.push(key.clone());
                if out.contains_key(&key) {
                    return Err(Error::InvalidField {
                        field: display_path(path),
                        message: "duplicate key once converted to a string".to_string(),
                    });
                }
                let item = yaml_to_value(item, path)?;
                path.pop();
                out.insert(key, item);
            }
            Value::Map(out)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(tagged.value, path)?,
    })
}

fn key_to_string(key: serde_yaml::Value, path: &[String]) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => key_to_string(tagged.value, path),
        serde_yaml::Value::Sequence(_) => Err(Error::UnsupportedKey {
            path: display_path(path),
            found: "sequence",
        }),
        serde_yaml::Value::Mapping(_) => Err(Error::UnsupportedKey {
            path: display_path(path),
            found: "mapping",
        }),
    }
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(".")
    }
}

/// Convert our Value to serde_json::Value.
///
/// Non-finite floats have no JSON form and become null.
pub fn value_to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Integer(i) => serde_json::Value::Number(i.into()),
        Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s),
        Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(value_to_json).collect()),
        Value::Map(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, value_to_json(v)))
                .collect(),
        ),
    }
}

/// Convert serde_json::Value to our Value.
pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(map) => Value::Map(
            map.into_iter()
                .map(|(k, v)| (k, json_to_value(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn yaml_scalars() {
        let value = from_yaml_str(
            "int: 42\nfloat: 2.5\nbool: true\nnull: ~\nquoted: \"42\"\nneg: -7\n",
        )
        .unwrap();

        assert_eq!(value.nested(&["int"]), Some(&Value::Integer(42)));
        assert_eq!(value.nested(&["float"]), Some(&Value::Float(2.5)));
        assert_eq!(value.nested(&["bool"]), Some(&Value::Bool(true)));
        assert_eq!(value.nested(&["null"]), Some(&Value::Null));
        assert_eq!(value.nested(&["quoted"]), Some(&Value::from("42")));
        assert_eq!(value.nested(&["neg"]), Some(&Value::Integer(-7)));
    }

    #[test]
    fn yaml_scalar_keys_are_stringified() {
        let value = from_yaml_str("1: one\ntrue: yes\n").unwrap();
        assert_eq!(value.nested_str(&["1"]), Some("one"));
        assert_eq!(value.nested_str(&["true"]), Some("yes"));
    }

    #[test]
    fn yaml_keys_colliding_as_strings_are_rejected() {
        let err = from_yaml_str("data:\n  1: a\n  '1': b\n").unwrap_err();
        assert!(!err.is_syntax());
        match err {
            Error::InvalidField { field, .. } => assert_eq!(field, "data.1"),
            other => panic!("unexpected error: {other}"),
        }

        assert!(from_yaml_str("true: a\n'true': b\n").is_err());
        assert!(from_yaml_str("~: a\nnull: b\n").is_err());
    }

    #[test]
    fn yaml_collection_keys_are_rejected() {
        let err = from_yaml_str("spec:\n  ? [a, b]\n  : value\n").unwrap_err();
        match err {
            Error::UnsupportedKey { path, found } => {
                assert_eq!(path, "spec");
                assert_eq!(found, "sequence");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn yaml_merge_keys_are_resolved() {
        let value = from_yaml_str(
            "base: &base\n  image: nginx\nfinal:\n  <<: *base\n  replicas: 2\n",
        )
        .unwrap();
        assert_eq!(value.nested_str(&["final", "image"]), Some("nginx"));
        assert_eq!(value.nested(&["final", "replicas"]), Some(&Value::Integer(2)));
    }

    #[test]
    fn yaml_tags_are_dropped() {
        let value = from_yaml_str("data: !custom\n  key: value\n").unwrap();
        assert_eq!(value.nested_str(&["data", "key"]), Some("value"));
    }

    #[test]
    fn yaml_syntax_error_is_syntax() {
        let err = from_yaml_str("key: [unclosed").unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn json_numbers() {
        let value = json_to_value(serde_json::json!({
            "integer": 42,
            "float": 2.75,
            "negative": -100
        }));

        assert_eq!(value.nested(&["integer"]), Some(&Value::Integer(42)));
        assert_eq!(value.nested(&["negative"]), Some(&Value::Integer(-100)));
        match value.nested(&["float"]) {
            Some(Value::Float(f)) => assert!((f - 2.75).abs() < 0.001),
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[test]
    fn value_to_json_nan_becomes_null() {
        assert_eq!(value_to_json(Value::Float(f64::NAN)), serde_json::Value::Null);
    }

    #[test]
    fn to_value_from_struct() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Meta {
            name: String,
            generate_name: Option<String>,
        }

        let value = to_value(&Meta {
            name: "web".to_string(),
            generate_name: None,
        })
        .unwrap();

        assert_eq!(value.nested_str(&["name"]), Some("web"));
        assert_eq!(value.nested(&["generateName"]), Some(&Value::Null));
    }

    #[test]
    fn json_slice_parses() {
        let value = from_json_slice(br#"{"kind":"Pod","spec":{"containers":[]}}"#).unwrap();
        assert_eq!(value.nested_str(&["kind"]), Some("Pod"));
        assert_eq!(value.nested(&["spec", "containers"]), Some(&Value::array()));
    }
}
