//! Loader configuration.
//!
//! Every field has a default, so an empty file is a valid configuration.
//!
//! ```yaml
//! default_namespace: "default"
//!
//! http:
//!   timeout_secs: 30
//!   max_response_bytes: 16777216
//!   user_agent: "policy-linter/2.1"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use manifold_http::FetchOptions;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::normalize::DEFAULT_NAMESPACE;

/// Largest accepted `http.timeout_secs`: one day.
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Namespace given to resources that do not set one.
    pub default_namespace: String,

    pub http: HttpConfig,
}

/// Limits for fetching HTTP(S) sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_response_bytes: u64,
    /// Defaults to `manifold/<version>`.
    pub user_agent: Option<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: FetchOptions::DEFAULT_TIMEOUT.as_secs(),
            max_response_bytes: FetchOptions::DEFAULT_MAX_BODY_BYTES,
            user_agent: None,
        }
    }
}

impl LoaderConfig {
    /// Load a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|error| Error::Io {
            operation: "read",
            path: path.display().to_string(),
            error,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: LoaderConfig = if yaml.trim().is_empty() {
            LoaderConfig::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| Error::Config {
                message: e.to_string(),
            })?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_namespace.trim().is_empty() {
            return Err(config_error("default_namespace must not be empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(config_error("http.timeout_secs must be greater than zero"));
        }
        if self.http.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(config_error("http.timeout_secs must be at most one day"));
        }
        if self.http.max_response_bytes == 0 {
            return Err(config_error(
                "http.max_response_bytes must be greater than zero",
            ));
        }
        if matches!(&self.http.user_agent, Some(agent) if agent.trim().is_empty()) {
            return Err(config_error("http.user_agent must not be empty when set"));
        }
        Ok(())
    }

    /// Fetch limits derived from the `http` section.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.http.timeout_secs),
            max_body_bytes: self.http.max_response_bytes,
            user_agent: self
                .http
                .user_agent
                .clone()
                .unwrap_or_else(FetchOptions::default_user_agent),
        }
    }
}

fn config_error(message: &str) -> Error {
    Error::Config {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn empty_yaml_is_default() {
        let config = LoaderConfig::from_yaml("").unwrap();
        assert_eq!(config, LoaderConfig::default());
        assert_eq!(config.default_namespace, "default");
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = LoaderConfig::from_yaml("http:\n  timeout_secs: 5\n").unwrap();
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.max_response_bytes, 16 * 1024 * 1024);
        assert_eq!(config.default_namespace, "default");
    }

    #[test]
    fn fetch_options_follow_config() {
        let config = LoaderConfig::from_yaml(
            "default_namespace: sandbox\nhttp:\n  timeout_secs: 2\n  max_response_bytes: 1024\n  user_agent: linter/1.0\n",
        )
        .unwrap();
        let options = config.fetch_options();
        assert_eq!(options.timeout, Duration::from_secs(2));
        assert_eq!(options.max_body_bytes, 1024);
        assert_eq!(options.user_agent, "linter/1.0");
        assert_eq!(config.default_namespace, "sandbox");
    }

    #[test]
    fn longest_timeout_is_accepted() {
        let config = LoaderConfig::from_yaml("http:\n  timeout_secs: 86400\n").unwrap();
        assert_eq!(config.fetch_options().timeout, Duration::from_secs(MAX_TIMEOUT_SECS));
    }

    #[test]
    fn default_user_agent() {
        let options = LoaderConfig::default().fetch_options();
        assert!(options.user_agent.starts_with("manifold/"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for yaml in [
            "default_namespace: \"\"\n",
            "http:\n  timeout_secs: 0\n",
            "http:\n  timeout_secs: 86401\n",
            "http:\n  timeout_secs: 18446744073709551615\n",
            "http:\n  max_response_bytes: 0\n",
            "http:\n  user_agent: \" \"\n",
            "http: [1, 2]\n",
        ] {
            let err = LoaderConfig::from_yaml(yaml).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config, "{yaml:?}");
        }
    }

    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifold.yaml");
        fs::write(&path, "default_namespace: team-a\n").unwrap();

        let config = LoaderConfig::from_file(&path).unwrap();
        assert_eq!(config.default_namespace, "team-a");

        let err = LoaderConfig::from_file(dir.path().join("missing.yaml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
