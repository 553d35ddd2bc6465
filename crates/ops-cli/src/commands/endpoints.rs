//! Endpoint listing command.

use std::io::Write;

use ops_endpoints::{EndpointService, FileEndpointSource, list_endpoints};
use tracing::debug;

use crate::cli::EndpointsArgs;
use crate::client::{ClientConfig, GatewayClient};
use crate::error::CliError;
use crate::output::{EndpointTable, OutputFormat};

/// Endpoint listing command executor.
pub struct EndpointsCommand {
    gateway_url: String,
    client_config: ClientConfig,
}

impl EndpointsCommand {
    /// Create a new endpoints command.
    #[must_use]
    pub fn new(gateway_url: impl Into<String>, client_config: ClientConfig) -> Self {
        Self {
            gateway_url: gateway_url.into(),
            client_config,
        }
    }

    /// Execute the endpoints command.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be fetched or output fails.
    /// Nothing is written in that case.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &EndpointsArgs,
    ) -> Result<(), CliError> {
        let table = match &args.from_file {
            Some(path) => render(&FileEndpointSource::new(path)).await?,
            None => {
                let client =
                    GatewayClient::connect_with_config(&self.gateway_url, self.client_config)
                        .await?;
                let table = render(&client).await;
                if let Err(err) = client.close().await {
                    debug!(error = %err, "Failed to close gateway connection");
                }
                table?
            }
        };

        format.write(writer, &table)
    }
}

/// Queries `service` and builds the sorted table.
///
/// # Errors
///
/// Returns [`CliError::Query`] if the query fails.
pub async fn render(service: &dyn EndpointService) -> Result<EndpointTable, CliError> {
    Ok(EndpointTable::new(list_endpoints(service).await?))
}
