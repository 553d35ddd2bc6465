//! # ops-workflow
//!
//! Batch invocation harness for workflow smoke tests.
//!
//! Given a test name and a repeat count, the harness generates a
//! deterministic sequence of workplace names, submits each scenario's fixed
//! list of workflow invocations against every workplace, and reports one
//! outcome per request. A failed invocation never stops the batch.
//!
//! ```text
//! test-name, arg1 ──► BatchPlan ──► InvocationRequest* ──► WorkflowService
//!                        │                                      │
//!                   UsageError                           InvocationOutcome ──► Reporter
//! ```
//!
//! The orchestration engine is reached only through the [`WorkflowService`]
//! trait, so tests substitute recording fakes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod harness;
pub mod outcome;
pub mod report;
pub mod request;
pub mod scenario;
pub mod service;

pub use config::{HarnessConfig, SubmissionMode};
pub use error::{InvocationError, UsageError};
pub use harness::BatchHarness;
pub use outcome::{InvocationFailure, InvocationOutcome};
pub use report::{BatchReport, CollectingReporter, Reporter, RunReport};
pub use request::InvocationRequest;
pub use scenario::{BatchPlan, ScenarioRecipe, TestScenario};
pub use service::{BoxFuture, WorkflowService};
