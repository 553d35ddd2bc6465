//! Workflow invocation data carried to the orchestration engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ProtoError;

/// Opaque data payload handed to a workflow.
///
/// opsh never interprets the contents; they are passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataPayload(Map<String, Value>);

impl DataPayload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Adds a field, replacing any previous value under the same key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Looks up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the payload has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for DataPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Everything the engine needs to start one workflow in one workplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDescription {
    /// Workflow identifier, e.g. `sample.workflow-0`.
    pub workflow_id: String,
    /// Target workplace (execution context) name.
    pub workplace: String,
    /// Data payload for the workflow.
    pub data: DataPayload,
}

impl WorkflowDescription {
    /// Creates and validates a description.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::Validation`] if the workflow id or workplace is blank.
    pub fn new(
        workflow_id: impl Into<String>,
        workplace: impl Into<String>,
        data: DataPayload,
    ) -> Result<Self, ProtoError> {
        let desc = Self {
            workflow_id: workflow_id.into(),
            workplace: workplace.into(),
            data,
        };
        desc.validate()?;
        Ok(desc)
    }

    /// Checks that the identifying fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::Validation`] naming the first blank field.
    pub fn validate(&self) -> Result<(), ProtoError> {
        if self.workflow_id.trim().is_empty() {
            return Err(ProtoError::Validation("workflow id must not be empty".into()));
        }
        if self.workplace.trim().is_empty() {
            return Err(ProtoError::Validation("workplace name must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn payload_serializes_as_plain_object() {
        let payload = DataPayload::new().with("count", 0);
        let json = serde_json::to_string(&payload).expect("should serialize");
        assert_eq!(json, r#"{"count":0}"#);
        assert_eq!(payload.get("count"), Some(&Value::from(0)));
        assert_eq!(payload.len(), 1);
    }

    #[test]
    fn empty_payload() {
        let payload = DataPayload::default();
        assert!(payload.is_empty());
        assert_eq!(serde_json::to_string(&payload).expect("serialize"), "{}");
    }

    #[test]
    fn description_accepts_valid_fields() {
        let desc = WorkflowDescription::new("sample.workflow-0", "test_name-0", DataPayload::new())
            .expect("valid description");
        assert_eq!(desc.workflow_id, "sample.workflow-0");
        assert_eq!(desc.workplace, "test_name-0");
    }

    #[test_case("", "wp" ; "blank workflow id")]
    #[test_case("wf", "  " ; "blank workplace")]
    fn description_rejects_blank_fields(id: &str, workplace: &str) {
        let result = WorkflowDescription::new(id, workplace, DataPayload::new());
        assert!(matches!(result, Err(ProtoError::Validation(_))));
    }
}
