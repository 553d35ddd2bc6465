//! Error types for the invocation harness.

use std::error::Error as StdError;
use std::time::Duration;

use ops_proto::ProtoError;
use thiserror::Error;

/// Problems with the operator's arguments.
///
/// Detected before anything is submitted; a run that hits one issues no
/// invocations at all. The display strings are what the operator sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// No test name, or a blank one.
    #[error("invalid test-name parameter")]
    MissingTestName,

    /// The test name is not a registered scenario.
    #[error("Unsupported test-name: {0}")]
    UnsupportedTestName(String),

    /// The scenario needs a repeat count and none was given.
    #[error("arg1 is required for test {0}")]
    MissingRepeatCount(&'static str),

    /// The repeat count is not a base-10 integer.
    #[error("arg1 should be an integer value")]
    RepeatNotInteger(String),

    /// Argument handling failed in a way none of the above describe.
    #[error("{message}, trace: {trace}")]
    Unexpected {
        /// Error message.
        message: String,
        /// Diagnostic trace (the error's source chain).
        trace: String,
    },
}

impl UsageError {
    /// Wraps an unanticipated error, keeping its source chain as the trace.
    #[must_use]
    pub fn unexpected(err: &(dyn StdError + 'static)) -> Self {
        Self::Unexpected {
            message: err.to_string(),
            trace: format!("[{}]", error_chain(err).join(", ")),
        }
    }
}

/// Failure of a single workflow invocation.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The engine answered and refused the invocation.
    #[error("workflow {workflow_id} rejected (code {code}): {message}")]
    Rejected {
        /// Workflow identifier.
        workflow_id: String,
        /// Engine error code.
        code: u32,
        /// Engine error message.
        message: String,
    },

    /// The request could not be turned into a valid engine description.
    #[error("invalid invocation request: {0}")]
    InvalidRequest(#[from] ProtoError),

    /// The engine could not be reached.
    #[error("workflow service unavailable: {source}")]
    Unavailable {
        /// Underlying transport error.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The invocation did not complete within the configured limit.
    #[error("invocation timed out after {0:?}")]
    TimedOut(Duration),
}

impl InvocationError {
    /// Creates an unavailable error from a transport failure.
    #[must_use]
    pub fn unavailable(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Unavailable {
            source: source.into(),
        }
    }
}

/// Renders the source chain of `err`, outermost cause first, excluding `err`.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = err.source();
    while let Some(cause) = current {
        chain.push(format!("caused by: {cause}"));
        current = cause.source();
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(UsageError::MissingTestName, "invalid test-name parameter" ; "missing name")]
    #[test_case(UsageError::UnsupportedTestName("bogus".into()), "Unsupported test-name: bogus" ; "unsupported")]
    #[test_case(UsageError::MissingRepeatCount("invoke-sample"), "arg1 is required for test invoke-sample" ; "missing arg1")]
    #[test_case(UsageError::RepeatNotInteger("x".into()), "arg1 should be an integer value" ; "not an integer")]
    fn usage_error_messages(err: UsageError, expected: &str) {
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn unexpected_keeps_source_chain() {
        let io = std::io::Error::other("disk on fire");
        let wrapped = InvocationError::unavailable(io);
        let err = UsageError::unexpected(&wrapped);

        let text = err.to_string();
        assert!(text.starts_with("workflow service unavailable: disk on fire, trace: ["));
        assert!(text.contains("caused by: disk on fire"));
    }

    #[test]
    fn rejected_display() {
        let err = InvocationError::Rejected {
            workflow_id: "sample.workflow-2".into(),
            code: 409,
            message: "workplace busy".into(),
        };
        assert_eq!(
            err.to_string(),
            "workflow sample.workflow-2 rejected (code 409): workplace busy"
        );
    }

    #[test]
    fn error_chain_is_empty_without_source() {
        let err = InvocationError::TimedOut(Duration::from_secs(1));
        assert!(error_chain(&err).is_empty());
    }
}
