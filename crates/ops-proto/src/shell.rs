//! Shell protocol messages between `opsh` and the gateway.
//!
//! Messages are JSON text frames, internally tagged by `type`. Each request
//! travels in a [`ShellRequest`] carrying a connection-unique `id`, and its
//! answer comes back in a [`ShellReply`] echoing that id. A failed request is
//! answered with [`ShellResponse::Error`]. Replies may arrive after the client
//! stopped waiting; the id is what keeps them from being read as the answer
//! to a later request.
//!
//! ```text
//! ┌──────┐     ShellMessage      ┌─────────┐──► workflow engine
//! │ opsh │──────────────────────►│ gateway │
//! │      │◄──────────────────────│         │──► networking service
//! └──────┘     ShellResponse     └─────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use ops_proto::ShellMessage;
//!
//! let json = ShellMessage::ListEndpoints.to_json().unwrap();
//! assert_eq!(json, r#"{"type":"list_endpoints"}"#);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ProtoError;
use crate::endpoints::EndpointRecord;
use crate::workflow::WorkflowDescription;

/// Protocol version for shell communication.
pub const SHELL_PROTOCOL_VERSION: u32 = 1;

/// Messages sent from opsh to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellMessage {
    /// Handshake to identify as a shell client.
    Hello {
        /// Client version.
        version: String,
        /// Protocol version.
        protocol_version: u32,
    },

    /// Invoke a workflow in a workplace.
    InvokeWorkflow(WorkflowDescription),

    /// List every endpoint record known to the networking service.
    ListEndpoints,

    /// Ping to check connection.
    Ping {
        /// Timestamp for latency measurement.
        timestamp: DateTime<Utc>,
    },
}

/// Responses sent from the gateway to opsh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellResponse {
    /// Handshake accepted.
    Welcome {
        /// Server version.
        server_version: String,
        /// Protocol version.
        protocol_version: u32,
    },

    /// The engine accepted the workflow invocation.
    WorkflowInvoked {
        /// Workflow identifier.
        workflow_id: String,
        /// Workplace the workflow was invoked in.
        workplace: String,
    },

    /// Endpoint records, in whatever order the service returned them.
    Endpoints {
        /// Records.
        endpoints: Vec<EndpointRecord>,
    },

    /// Reply to a ping.
    Pong {
        /// Timestamp sent by the client.
        client_timestamp: DateTime<Utc>,
        /// Gateway time when the ping was answered.
        server_timestamp: DateTime<Utc>,
    },

    /// The request failed.
    Error {
        /// Error code.
        code: u32,
        /// Error message.
        message: String,
        /// Original request type (if applicable).
        request_type: Option<String>,
    },
}

impl ShellMessage {
    /// Create a hello message.
    #[must_use]
    pub fn hello(version: impl Into<String>) -> Self {
        Self::Hello {
            version: version.into(),
            protocol_version: SHELL_PROTOCOL_VERSION,
        }
    }

    /// Create a ping message.
    #[must_use]
    pub fn ping() -> Self {
        Self::Ping {
            timestamp: Utc::now(),
        }
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ProtoError> {
        serde_json::to_string(self).map_err(|e| ProtoError::Encoding(e.to_string()))
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> Result<Self, ProtoError> {
        serde_json::from_str(json).map_err(|e| ProtoError::Decoding(e.to_string()))
    }

    /// Get the request type name for error reporting.
    #[must_use]
    pub fn request_type(&self) -> &'static str {
        match self {
            Self::Hello { .. } => "hello",
            Self::InvokeWorkflow(_) => "invoke_workflow",
            Self::ListEndpoints => "list_endpoints",
            Self::Ping { .. } => "ping",
        }
    }
}

impl ShellResponse {
    /// Create a welcome response.
    #[must_use]
    pub fn welcome(server_version: impl Into<String>) -> Self {
        Self::Welcome {
            server_version: server_version.into(),
            protocol_version: SHELL_PROTOCOL_VERSION,
        }
    }

    /// Create an error response.
    #[must_use]
    pub fn error(code: u32, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
            request_type: None,
        }
    }

    /// Create an error response with request type.
    #[must_use]
    pub fn error_for_request(
        code: u32,
        message: impl Into<String>,
        request_type: impl Into<String>,
    ) -> Self {
        Self::Error {
            code,
            message: message.into(),
            request_type: Some(request_type.into()),
        }
    }

    /// Create a pong response.
    #[must_use]
    pub fn pong(client_timestamp: DateTime<Utc>) -> Self {
        Self::Pong {
            client_timestamp,
            server_timestamp: Utc::now(),
        }
    }

    /// Check if this is an error response.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ProtoError> {
        serde_json::to_string(self).map_err(|e| ProtoError::Encoding(e.to_string()))
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> Result<Self, ProtoError> {
        serde_json::from_str(json).map_err(|e| ProtoError::Decoding(e.to_string()))
    }
}

/// A request with its correlation id.
///
/// The id is flattened next to the message's own fields:
/// `{"id": 7, "type": "list_endpoints"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShellRequest {
    /// Correlation id, unique per connection.
    pub id: u64,
    /// The request.
    #[serde(flatten)]
    pub message: ShellMessage,
}

impl ShellRequest {
    /// Wraps `message` with `id`.
    #[must_use]
    pub const fn new(id: u64, message: ShellMessage) -> Self {
        Self { id, message }
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ProtoError> {
        serde_json::to_string(self).map_err(|e| ProtoError::Encoding(e.to_string()))
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> Result<Self, ProtoError> {
        serde_json::from_str(json).map_err(|e| ProtoError::Decoding(e.to_string()))
    }
}

/// A response with the id of the request it answers.
///
/// `id` is absent only when the gateway could not read the request at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShellReply {
    /// Id of the answered request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// The response.
    #[serde(flatten)]
    pub response: ShellResponse,
}

impl ShellReply {
    /// Answers request `id`.
    #[must_use]
    pub const fn to(id: u64, response: ShellResponse) -> Self {
        Self {
            id: Some(id),
            response,
        }
    }

    /// A reply to a request whose id could not be read.
    #[must_use]
    pub const fn uncorrelated(response: ShellResponse) -> Self {
        Self { id: None, response }
    }

    /// Returns true if this reply belongs to request `id`.
    ///
    /// Uncorrelated replies belong to whichever request is outstanding.
    #[must_use]
    pub fn answers(&self, id: u64) -> bool {
        self.id.is_none_or(|reply_id| reply_id == id)
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ProtoError> {
        serde_json::to_string(self).map_err(|e| ProtoError::Encoding(e.to_string()))
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> Result<Self, ProtoError> {
        serde_json::from_str(json).map_err(|e| ProtoError::Decoding(e.to_string()))
    }
}
