//! Per-request outcomes.

use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;
use tokio::task::JoinError;

use crate::error::error_chain;
use crate::request::InvocationRequest;

/// Why one invocation failed, in operator-readable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationFailure {
    /// Human-readable reason.
    pub reason: String,
    /// Diagnostic trace: the error's causes followed by the request coordinates.
    pub trace: Vec<String>,
}

impl InvocationFailure {
    /// Converts an invocation error into a failure record for `request`.
    #[must_use]
    pub fn from_error(err: &(dyn StdError + 'static), request: &InvocationRequest) -> Self {
        let mut trace = error_chain(err);
        trace.push(coordinates(request));
        Self {
            reason: err.to_string(),
            trace,
        }
    }

    /// Failure for a submission task that panicked or was cancelled.
    #[must_use]
    pub fn aborted(err: &JoinError, request: &InvocationRequest) -> Self {
        let reason = if err.is_panic() {
            format!("invocation task panicked: {err}")
        } else {
            format!("invocation task cancelled: {err}")
        };
        Self {
            reason,
            trace: vec![coordinates(request)],
        }
    }
}

impl fmt::Display for InvocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, trace: [{}]", self.reason, self.trace.join(", "))
    }
}

fn coordinates(request: &InvocationRequest) -> String {
    format!(
        "at request #{} ({} in {})",
        request.sequence(),
        request.workflow_id(),
        request.workplace()
    )
}

/// The result of submitting one request. Created once, never changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationOutcome {
    request: InvocationRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<InvocationFailure>,
}

impl InvocationOutcome {
    /// Creates an outcome from a submission result.
    #[must_use]
    pub fn new(request: InvocationRequest, result: Result<(), InvocationFailure>) -> Self {
        Self {
            request,
            failure: result.err(),
        }
    }

    /// The submitted request.
    #[must_use]
    pub const fn request(&self) -> &InvocationRequest {
        &self.request
    }

    /// Returns true if the engine accepted the request.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// The failure, if the request failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&InvocationFailure> {
        self.failure.as_ref()
    }
}
