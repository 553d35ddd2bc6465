//! # ops-proto
//!
//! Shared data types for the opsh operator tooling and the shell protocol
//! spoken between `opsh` and the gateway that fronts the workflow engine and
//! the cluster-networking service.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod endpoints;
pub mod error;
pub mod shell;
pub mod workflow;

pub use endpoints::{EndpointAddress, EndpointMeta, EndpointPort, EndpointRecord, EndpointSubset};
pub use error::ProtoError;
pub use shell::{SHELL_PROTOCOL_VERSION, ShellMessage, ShellReply, ShellRequest, ShellResponse};
pub use workflow::{DataPayload, WorkflowDescription};
