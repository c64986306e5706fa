//! Group/version/kind identity of a resource type.

use std::fmt;

use crate::error::{Error, Result};

/// The group/version/kind triple identifying a resource's schema type.
///
/// The core API group is the empty string, so `v1` Pods have
/// `group == ""` and an `apiVersion` of just `v1`.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TypeIdentity {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl TypeIdentity {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Build an identity from an `apiVersion` string and a kind.
    ///
    /// ```rust
    /// use manifold_value::TypeIdentity;
    ///
    /// let gvk = TypeIdentity::from_api_version("apps/v1", "Deployment").unwrap();
    /// assert_eq!(gvk.group, "apps");
    /// assert_eq!(gvk.version, "v1");
    ///
    /// let core = TypeIdentity::from_api_version("v1", "Pod").unwrap();
    /// assert_eq!(core.group, "");
    /// ```
    pub fn from_api_version(api_version: &str, kind: impl Into<String>) -> Result<Self> {
        let (group, version) = split_api_version(api_version)?;
        Ok(Self::new(group, version, kind))
    }

    /// The `apiVersion` form: `version` for the core group, else `group/version`.
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}

/// Split `group/version` into its parts. A bare `version` has an empty group,
/// and an empty string yields two empty parts.
pub fn split_api_version(api_version: &str) -> Result<(&str, &str)> {
    if api_version.is_empty() {
        return Ok(("", ""));
    }
    match api_version.split_once('/') {
        None => Ok(("", api_version)),
        Some((group, version)) if !version.contains('/') => Ok((group, version)),
        Some(_) => Err(Error::InvalidApiVersion {
            api_version: api_version.to_string(),
            message: "expected at most one '/'".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_version_roundtrip() {
        let gvk = TypeIdentity::new("kyverno.io", "v1", "ClusterPolicy");
        assert_eq!(gvk.api_version(), "kyverno.io/v1");

        let parsed = TypeIdentity::from_api_version(&gvk.api_version(), "ClusterPolicy").unwrap();
        assert_eq!(parsed, gvk);
    }

    #[test]
    fn core_group_has_no_prefix() {
        let gvk = TypeIdentity::new("", "v1", "ConfigMap");
        assert_eq!(gvk.api_version(), "v1");
        assert_eq!(gvk.to_string(), "v1, Kind=ConfigMap");
    }

    #[test]
    fn too_many_slashes() {
        let err = TypeIdentity::from_api_version("a/b/c", "Thing").unwrap_err();
        assert!(matches!(err, Error::InvalidApiVersion { .. }));
    }

    #[test]
    fn empty_api_version() {
        assert_eq!(split_api_version("").unwrap(), ("", ""));
    }
}
