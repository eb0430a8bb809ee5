//! Error type for the kernel and the settings layer

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong outside the total numeric kernel.
#[derive(Debug, Error)]
pub enum FlockError {
    /// Weights supplied to a weighted mean do not pair up with the angles
    #[error("invalid argument: {weights} weights supplied for {angles} angles")]
    InvalidArgument { angles: usize, weights: usize },

    /// A settings field is out of range
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("failed to read settings from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// Serializing a population for output failed
    #[error("failed to write population: {0}")]
    Output(#[source] serde_json::Error),
}

impl FlockError {
    pub(crate) fn invalid_setting(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            field,
            reason: reason.into(),
        }
    }
}
