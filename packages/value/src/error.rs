//! Error types for value conversion.

/// Errors raised while turning text or serde data into resources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The text is not valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The text is not valid JSON, or a value could not pass through JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A mapping key is itself a collection and has no string form.
    #[error("unsupported {found} key in mapping at {path}")]
    UnsupportedKey { path: String, found: &'static str },

    /// The document is valid but its top level is not a mapping.
    #[error("expected a mapping at the top level, found {found}")]
    NotAMapping { found: &'static str },

    /// A well-known field has the wrong shape.
    #[error("invalid field {field}: {message}")]
    InvalidField { field: String, message: String },

    /// An `apiVersion` string that is not `version` or `group/version`.
    #[error("invalid apiVersion {api_version:?}: {message}")]
    InvalidApiVersion {
        api_version: String,
        message: String,
    },
}

impl Error {
    /// Whether the error comes from text that could not be tokenized at all,
    /// as opposed to well-formed text of the wrong shape.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Yaml(_) | Error::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
