//! # ops-cli
//!
//! The `opsh` operator command-line interface.
//!
//! Provides commands for:
//! - `workflow-test`: batch smoke tests against the workflow engine
//! - `k8s-endpoints`: listing cluster endpoint records
//!
//! # Architecture
//!
//! `opsh` connects to a gateway via WebSocket using the shell protocol
//! defined in `ops-proto::shell`. The [`client::GatewayClient`] implements
//! both the workflow and endpoint service traits, so the command handlers
//! only ever see those traits.
//!
//! ```text
//! ┌──────┐     Shell Protocol     ┌─────────┐
//! │ opsh │◄──────────────────────►│ gateway │
//! └──────┘      (WebSocket)       └─────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, EndpointsArgs, Format, WorkflowTestArgs};
pub use client::{ClientConfig, GatewayClient};
pub use error::CliError;
pub use output::OutputFormat;
