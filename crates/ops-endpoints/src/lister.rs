//! Sorting and flattening endpoint records for display.

use ops_proto::EndpointRecord;
use serde::Serialize;
use tracing::debug;

use crate::error::QueryError;
use crate::service::EndpointService;

/// One display row: a record name with its addresses and ports flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointRow {
    /// Record name.
    pub name: String,
    /// IP addresses of every subset, in subset order. Duplicates kept.
    pub ips: Vec<String>,
    /// Ports of every subset, in subset order. Duplicates kept.
    pub ports: Vec<u16>,
}

impl From<&EndpointRecord> for EndpointRow {
    fn from(record: &EndpointRecord) -> Self {
        let ips = record
            .subsets
            .iter()
            .flat_map(|s| s.addresses.iter().map(|a| a.ip.clone()))
            .collect();
        let ports = record
            .subsets
            .iter()
            .flat_map(|s| s.ports.iter().map(|p| p.port))
            .collect();
        Self {
            name: record.name().to_string(),
            ips,
            ports,
        }
    }
}

/// Sorts records by name and flattens each into a row.
#[must_use]
pub fn sorted_rows(mut records: Vec<EndpointRecord>) -> Vec<EndpointRow> {
    records.sort_by(|a, b| a.name().cmp(b.name()));
    records.iter().map(EndpointRow::from).collect()
}

/// Queries `service` once and returns display rows sorted by name.
///
/// # Errors
///
/// Propagates the query error; nothing is returned for a partial listing.
pub async fn list_endpoints(
    service: &dyn EndpointService,
) -> Result<Vec<EndpointRow>, QueryError> {
    let records = service.endpoints().await?;
    debug!(count = records.len(), "fetched endpoint records");
    Ok(sorted_rows(records))
}
