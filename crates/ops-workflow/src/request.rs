//! Invocation requests.

use ops_proto::{DataPayload, ProtoError, WorkflowDescription};
use serde::Serialize;

/// One workflow invocation against one workplace.
///
/// Built fresh for every submission and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationRequest {
    sequence: u64,
    workplace: String,
    workflow_id: String,
    payload: DataPayload,
}

impl InvocationRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(
        sequence: u64,
        workplace: impl Into<String>,
        workflow_id: impl Into<String>,
        payload: DataPayload,
    ) -> Self {
        Self {
            sequence,
            workplace: workplace.into(),
            workflow_id: workflow_id.into(),
            payload,
        }
    }

    /// Zero-based position of this request in its batch's issuance order.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Target workplace name.
    #[must_use]
    pub fn workplace(&self) -> &str {
        &self.workplace
    }

    /// Workflow identifier.
    #[must_use]
    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    /// Data payload, passed to the engine verbatim.
    #[must_use]
    pub fn payload(&self) -> &DataPayload {
        &self.payload
    }

    /// Builds the engine-facing description of this request.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::Validation`] if the workplace or workflow id is blank.
    pub fn to_description(&self) -> Result<WorkflowDescription, ProtoError> {
        WorkflowDescription::new(
            self.workflow_id.clone(),
            self.workplace.clone(),
            self.payload.clone(),
        )
    }
}
