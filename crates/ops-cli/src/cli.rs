//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ops_workflow::TestScenario;

/// Default gateway URL.
pub const DEFAULT_GATEWAY: &str = "ws://localhost:8181";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// opsh - operator shell tooling.
#[derive(Parser, Debug, Clone)]
#[command(name = "opsh")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Gateway URL to connect to.
    #[arg(short, long, env = "OPSH_GATEWAY", default_value = DEFAULT_GATEWAY)]
    pub gateway: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Seconds to wait for each gateway round trip.
    #[arg(
        long,
        env = "OPSH_REQUEST_TIMEOUT",
        value_name = "SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    pub request_timeout: u64,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a workflow smoke test.
    #[command(name = "workflow-test")]
    WorkflowTest(WorkflowTestArgs),

    /// List all kubernetes endpoints.
    #[command(name = "k8s-endpoints")]
    K8sEndpoints(EndpointsArgs),
}

/// Arguments for the workflow-test command.
///
/// Both positionals are optional at the parser level so that missing or
/// malformed values are reported by the harness with its own messages.
#[derive(Args, Debug, Clone, Default)]
pub struct WorkflowTestArgs {
    #[arg(value_name = "TEST-NAME", help = test_name_help())]
    pub test_name: Option<String>,

    /// Repeat count; workplaces 0 through ARG1 are exercised.
    #[arg(value_name = "ARG1", allow_hyphen_values = true)]
    pub arg1: Option<String>,

    /// Submit up to N invocations concurrently instead of one at a time.
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,
}

fn test_name_help() -> String {
    let names: Vec<_> = TestScenario::names().collect();
    format!("Test name ({})", names.join(", "))
}

/// Arguments for the k8s-endpoints command.
#[derive(Args, Debug, Clone, Default)]
pub struct EndpointsArgs {
    /// Read endpoint records from a `kubectl get endpoints -o json` file
    /// instead of asking the gateway.
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,
}
