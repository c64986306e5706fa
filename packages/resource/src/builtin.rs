//! Built-in policy types.
//!
//! Every field is optional: a missing field decodes to its zero value, so
//! only fields of the wrong type make a document fail its shape check.

use std::collections::BTreeMap;

use manifold_value::TypeIdentity;
use serde::Deserialize;

use crate::scheme::Scheme;

pub const POLICY_GROUP: &str = "kyverno.io";
pub const REPORT_GROUP: &str = "wgpolicyk8s.io";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub generate_name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub annotations: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub metadata: Option<ObjectMeta>,
    #[serde(default)]
    pub spec: Option<PolicySpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySpec {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub validation_failure_action: Option<String>,
    #[serde(default)]
    pub background: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "match")]
    pub match_resources: Option<serde_yaml::Mapping>,
    #[serde(default)]
    pub exclude: Option<serde_yaml::Mapping>,
}

#[derive(Debug, Deserialize)]
pub struct PolicyException {
    #[serde(default)]
    pub metadata: Option<ObjectMeta>,
    #[serde(default)]
    pub spec: Option<ExceptionSpec>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExceptionSpec {
    #[serde(default)]
    pub exceptions: Vec<Exception>,
    #[serde(default, rename = "match")]
    pub match_resources: Option<serde_yaml::Mapping>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exception {
    #[serde(default)]
    pub policy_name: String,
    #[serde(default)]
    pub rule_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CleanupPolicy {
    #[serde(default)]
    pub metadata: Option<ObjectMeta>,
    #[serde(default)]
    pub spec: Option<CleanupSpec>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CleanupSpec {
    #[serde(default)]
    pub schedule: String,
    #[serde(default, rename = "match")]
    pub match_resources: Option<serde_yaml::Mapping>,
}

#[derive(Debug, Deserialize)]
pub struct PolicyReport {
    #[serde(default)]
    pub metadata: Option<ObjectMeta>,
    #[serde(default)]
    pub results: Vec<ReportResult>,
    #[serde(default)]
    pub summary: Option<BTreeMap<String, u64>>,
}

#[derive(Debug, Deserialize)]
pub struct ReportResult {
    #[serde(default)]
    pub policy: Option<String>,
    #[serde(default)]
    pub rule: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
}

impl Scheme {
    /// A scheme knowing the policy, exception, cleanup and report types.
    pub fn with_policy_kinds() -> Self {
        let mut scheme = Scheme::new();
        for version in ["v1", "v2beta1"] {
            scheme
                .register::<Policy>(TypeIdentity::new(POLICY_GROUP, version, "ClusterPolicy"))
                .register::<Policy>(TypeIdentity::new(POLICY_GROUP, version, "Policy"));
        }
        for version in ["v2beta1", "v2"] {
            scheme
                .register::<PolicyException>(TypeIdentity::new(POLICY_GROUP, version, "PolicyException"))
                .register::<CleanupPolicy>(TypeIdentity::new(POLICY_GROUP, version, "CleanupPolicy"))
                .register::<CleanupPolicy>(TypeIdentity::new(
                    POLICY_GROUP,
                    version,
                    "ClusterCleanupPolicy",
                ));
        }
        scheme
            .register::<PolicyReport>(TypeIdentity::new(REPORT_GROUP, "v1alpha2", "PolicyReport"))
            .register::<PolicyReport>(TypeIdentity::new(
                REPORT_GROUP,
                "v1alpha2",
                "ClusterPolicyReport",
            ));
        scheme
    }
}
