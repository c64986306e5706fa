//! Conversion of a document into a [`GenericResource`] and its normalization.

use manifold_value::{GenericResource, TypeIdentity};

use crate::error::Result;
use crate::split::DocumentBlock;

pub const DEFAULT_NAMESPACE: &str = "default";

/// Convert one document's text into a generic resource.
///
/// The document must be a mapping with a non-empty string `kind`; anything
/// else is a structural error. Syntax errors are parse errors.
pub fn to_generic(document: &DocumentBlock) -> Result<GenericResource> {
    Ok(GenericResource::from_yaml_str(document.as_str())?)
}

/// Apply the normalization rules to a converted resource.
///
/// - A recognized `identity` replaces `apiVersion` and `kind`.
/// - A missing, empty or non-string namespace becomes `default_namespace`
///   (or [`DEFAULT_NAMESPACE`] when that is empty).
///
/// Everything else is left untouched.
///
/// ```rust
/// use manifold_resource::normalize;
/// use manifold_value::GenericResource;
///
/// let pod = GenericResource::from_yaml_str("apiVersion: v1\nkind: Pod\n").unwrap();
/// let pod = normalize(pod, None, "default");
/// assert_eq!(pod.namespace(), Some("default"));
/// ```
pub fn normalize(
    mut resource: GenericResource,
    identity: Option<&TypeIdentity>,
    default_namespace: &str,
) -> GenericResource {
    if let Some(identity) = identity {
        resource.set_type_identity(identity);
    }

    if resource.namespace().map_or(true, str::is_empty) {
        let namespace = if default_namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            default_namespace
        };
        resource.set_namespace(namespace);
    }

    resource
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use manifold_value::Value;

    fn resource(text: &str) -> GenericResource {
        to_generic(&DocumentBlock::new(0, 1, text)).unwrap()
    }

    #[test]
    fn missing_namespace_is_defaulted() {
        let r = normalize(resource("apiVersion: v1\nkind: Pod\n"), None, DEFAULT_NAMESPACE);
        assert_eq!(r.namespace(), Some("default"));
    }

    #[test]
    fn empty_and_null_namespace_are_defaulted() {
        for text in [
            "kind: Pod\nmetadata:\n  namespace: \"\"\n",
            "kind: Pod\nmetadata:\n  namespace: null\n",
            "kind: Pod\nmetadata: null\n",
            "kind: Pod\nmetadata:\n  namespace: 7\n",
        ] {
            let r = normalize(resource(text), None, DEFAULT_NAMESPACE);
            assert_eq!(r.namespace(), Some("default"), "{text:?}");
        }
    }

    #[test]
    fn explicit_namespace_is_kept() {
        let r = normalize(
            resource("kind: Pod\nmetadata:\n  name: web\n  namespace: prod\n"),
            None,
            DEFAULT_NAMESPACE,
        );
        assert_eq!(r.namespace(), Some("prod"));
        assert_eq!(r.name(), Some("web"));
    }

    #[test]
    fn custom_default_namespace() {
        let r = normalize(resource("kind: Pod\n"), None, "sandbox");
        assert_eq!(r.namespace(), Some("sandbox"));

        let r = normalize(resource("kind: Pod\n"), None, "");
        assert_eq!(r.namespace(), Some(DEFAULT_NAMESPACE));
    }

    #[test]
    fn recognized_identity_wins() {
        let identity = TypeIdentity::new("example.com", "v2", "Bar");
        let r = normalize(
            resource("apiVersion: example.com/v1\nkind: Foo\n"),
            Some(&identity),
            DEFAULT_NAMESPACE,
        );
        assert_eq!(r.api_version(), Some("example.com/v2"));
        assert_eq!(r.kind(), "Bar");
    }

    #[test]
    fn unrecognized_keeps_declared_type() {
        let r = normalize(
            resource("apiVersion: example.com/v1\nkind: Foo\n"),
            None,
            DEFAULT_NAMESPACE,
        );
        assert_eq!(r.api_version(), Some("example.com/v1"));
        assert_eq!(r.kind(), "Foo");
    }

    #[test]
    fn other_fields_are_untouched() {
        let r = normalize(
            resource("kind: ConfigMap\ndata:\n  a: \"1\"\n  b: [1, 2]\n"),
            None,
            DEFAULT_NAMESPACE,
        );
        assert_eq!(r.get(&["data", "a"]), Some(&Value::from("1")));
        assert_eq!(
            r.get(&["data", "b"]),
            Some(&Value::from(vec![Value::from(1i64), Value::from(2i64)]))
        );
    }

    #[test]
    fn conversion_errors_are_classified() {
        let doc = |t: &str| DocumentBlock::new(0, 1, t);
        assert_eq!(to_generic(&doc("- a\n")).unwrap_err().kind(), ErrorKind::Structural);
        assert_eq!(to_generic(&doc("apiVersion: v1\n")).unwrap_err().kind(), ErrorKind::Structural);
        assert_eq!(to_generic(&doc("kind: [\n")).unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(
            to_generic(&doc("kind: Pod\nmetadata: [a]\n")).unwrap_err().kind(),
            ErrorKind::Structural
        );
    }
}
