//! Configuration error types.

use geoforge_core::PathResolutionError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Error from loading or rewriting configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON or does not match the project schema
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// File that failed
        path: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Project root or alias table is invalid
    #[error(transparent)]
    Resolution(#[from] PathResolutionError),

    /// A value in a rewritten document failed to resolve
    #[error("Failed to resolve value at {pointer}: {source}")]
    Rewrite {
        /// JSON pointer of the offending value
        pointer: String,
        /// Underlying error
        #[source]
        source: PathResolutionError,
    },
}

impl ConfigError {
    /// Get the resolution error, if this error wraps one
    #[must_use]
    pub fn resolution_error(&self) -> Option<&PathResolutionError> {
        match self {
            Self::Resolution(err) | Self::Rewrite { source: err, .. } => Some(err),
            _ => None,
        }
    }
}
