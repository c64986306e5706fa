//! Error types for the loading pipeline.

use crate::split::DocumentBlock;

/// Broad category of a pipeline failure.
///
/// Context wrappers ([`Error::Document`], [`Error::Source`]) are looked
/// through, so callers can branch on the failure itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network unreachable, timeout, or a non-success HTTP status.
    Transport,
    /// A filesystem read or write failed.
    Io,
    /// Text that could not be tokenized.
    Parse,
    /// Valid text of the wrong shape for a resource.
    Structural,
    /// A write aimed at an HTTP(S) destination.
    UnsupportedDestination,
    /// A source without any documents.
    EmptyResult,
    Cancelled,
    Serialize,
    Config,
}

/// Errors raised by the loading pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to fetch {source_id}: {error}")]
    Transport {
        source_id: String,
        #[source]
        error: manifold_http::Error,
    },

    #[error("failed to {operation} {path}: {error}")]
    Io {
        operation: &'static str,
        path: String,
        #[source]
        error: std::io::Error,
    },

    #[error("parse error: {message}")]
    Parse { message: String },

    #[error("invalid resource: {message}")]
    Structural { message: String },

    #[error("unable to write resource as destination is http: {destination}")]
    UnsupportedDestination { destination: String },

    #[error("no resources found in {source_id}")]
    EmptyResult { source_id: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("failed to serialize resource: {message}")]
    Serialize { message: String },

    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// A failure inside one document of a multi-document stream.
    #[error("document {index} (line {line}): {error}")]
    Document {
        index: usize,
        line: usize,
        #[source]
        error: Box<Error>,
    },

    /// A failure while processing a named source.
    #[error("{source_id}: {error}")]
    Source {
        source_id: String,
        #[source]
        error: Box<Error>,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Io { .. } => ErrorKind::Io,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Structural { .. } => ErrorKind::Structural,
            Error::UnsupportedDestination { .. } => ErrorKind::UnsupportedDestination,
            Error::EmptyResult { .. } => ErrorKind::EmptyResult,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::Serialize { .. } => ErrorKind::Serialize,
            Error::Config { .. } => ErrorKind::Config,
            Error::Document { error, .. } | Error::Source { error, .. } => error.kind(),
        }
    }

    /// Index of the failing document, if the error was raised inside one.
    pub fn document_index(&self) -> Option<usize> {
        match self {
            Error::Document { index, .. } => Some(*index),
            Error::Source { error, .. } => error.document_index(),
            _ => None,
        }
    }

    /// Attach the document the error occurred in.
    pub fn in_document(self, document: &DocumentBlock) -> Self {
        Error::Document {
            index: document.index,
            line: document.line,
            error: Box::new(self),
        }
    }

    /// Attach the source identifier the error occurred in.
    pub fn in_source(self, source_id: impl Into<String>) -> Self {
        Error::Source {
            source_id: source_id.into(),
            error: Box::new(self),
        }
    }
}

impl From<manifold_value::Error> for Error {
    fn from(error: manifold_value::Error) -> Self {
        if error.is_syntax() {
            Error::Parse {
                message: error.to_string(),
            }
        } else {
            Error::Structural {
                message: error.to_string(),
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
