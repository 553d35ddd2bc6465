//! CLI command implementations.
//!
//! - [`workflow_test`] - Workflow smoke tests
//! - [`endpoints`] - Endpoint listing

pub mod endpoints;

pub use endpoints::EndpointsCommand;
pub use workflow_test::{StderrReporter, WorkflowTestCommand};
