use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupingError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{what} not found: {}", path.display())]
    MissingInput { what: &'static str, path: PathBuf },
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
    #[error("no lines read from the primary input")]
    EmptyInput,
    #[error("{context}: {message}")]
    Collaborator {
        context: &'static str,
        message: String,
    },
}

impl GroupingError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn missing_input(what: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::MissingInput {
            what,
            path: path.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Wraps a failure reported by an external aligner or classifier.
    pub fn collaborator(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Collaborator {
            context,
            message: err.to_string(),
        }
    }
}
