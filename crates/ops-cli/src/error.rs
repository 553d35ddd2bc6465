//! CLI error types.

use ops_endpoints::QueryError;
use ops_workflow::UsageError;
use thiserror::Error;

/// Exit status for any failure other than rejected arguments.
pub const EXIT_FAILURE: u8 = 1;

/// Exit status for rejected arguments.
pub const EXIT_USAGE: u8 = 2;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Gateway connection failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The gateway sent something the shell protocol does not allow here.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The gateway answered with an error.
    #[error("gateway error {code}: {message}")]
    Gateway {
        /// Error code.
        code: u32,
        /// Error message.
        message: String,
    },

    /// A gateway round trip took too long.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// The command arguments were rejected.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// The endpoint query failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Some workflow invocations of the batch failed.
    #[error("{failed} of {issued} workflow invocations failed")]
    InvocationsFailed {
        /// Failed requests.
        failed: u64,
        /// Issued requests.
        issued: u64,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }

    /// Whether the failing command already printed this error to stderr.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}
