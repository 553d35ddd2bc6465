//! opsh binary entrypoint.

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ops_cli::cli::{Cli, Commands};
use ops_cli::client::ClientConfig;
use ops_cli::commands::{EndpointsCommand, WorkflowTestCommand};
use ops_cli::output::OutputFormat;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is_reported() {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), ops_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let client_config =
        ClientConfig::new().with_request_timeout(Duration::from_secs(cli.request_timeout));
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::WorkflowTest(args) => {
            let cmd = WorkflowTestCommand::new(&cli.gateway, client_config);
            cmd.execute(&mut stdout, &format, &args).await?;
        }
        Commands::K8sEndpoints(args) => {
            let cmd = EndpointsCommand::new(&cli.gateway, client_config);
            cmd.execute(&mut stdout, &format, &args).await?;
        }
    }

    Ok(())
}
