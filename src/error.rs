//! Error taxonomy for the resolution pipeline.
//!
//! Every stage fails fast; nothing here is retried.

use std::path::PathBuf;

use thiserror::Error;

use crate::params::ParamError;

/// Errors that can occur while resolving the top-level configuration.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// More than one source supplies the same value, or an explicit flag
    /// collides with an equivalent `key=value` option.
    #[error("Conflicting arguments: {message}")]
    Conflict { message: String },

    /// A free-form token matched no classification rule.
    #[error("Free-form argument not understood: {0}")]
    UnrecognizedArgument(String),

    /// No shipped parameter file matches the size of N.
    #[error("No parameter file found for {primary} (tried {})", tried.join(", "))]
    ParameterFileNotFound { primary: String, tried: Vec<String> },

    /// Two sources disagree on a value that must be unique.
    #[error("Inconsistent value: {message}")]
    InconsistentValue { message: String },

    /// N could not be determined.
    #[error("Missing required value: {message}")]
    MissingRequiredValue { message: String },

    /// A file the run depends on does not exist.
    #[error("Could not find file named {}, cannot run clients", path.display())]
    MissingResource { path: PathBuf },

    /// Reading, or parsing a value from, the parameter hierarchy failed.
    #[error(transparent)]
    Params(#[from] ParamError),

    /// A filesystem operation on a resolved path failed.
    #[error("Failed to {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub(crate) fn missing(message: impl Into<String>) -> Self {
        Self::MissingRequiredValue {
            message: message.into(),
        }
    }

    pub(crate) fn inconsistent(message: impl Into<String>) -> Self {
        Self::InconsistentValue {
            message: message.into(),
        }
    }
}
