//! Error types for endpoint queries.

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of an endpoint query. Covers the whole listing; there is no
/// per-record failure.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The service answered with an error.
    #[error("endpoint service error (code {code}): {message}")]
    Service {
        /// Service error code.
        code: u32,
        /// Service error message.
        message: String,
    },

    /// The service could not be reached.
    #[error("endpoint service unavailable: {source}")]
    Unavailable {
        /// Underlying transport error.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// An endpoint document could not be read.
    #[error("failed to read endpoints from {}: {source}", path.display())]
    Read {
        /// Document path.
        path: PathBuf,
        /// IO error.
        #[source]
        source: std::io::Error,
    },

    /// An endpoint document is not valid endpoint JSON.
    #[error("failed to parse endpoints from {}: {source}", path.display())]
    Parse {
        /// Document path.
        path: PathBuf,
        /// JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl QueryError {
    /// Creates an unavailable error from a transport failure.
    #[must_use]
    pub fn unavailable(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Unavailable {
            source: source.into(),
        }
    }
}
