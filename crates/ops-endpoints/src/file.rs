//! Endpoint records read from a JSON document on disk.

use std::path::{Path, PathBuf};

use ops_proto::EndpointRecord;
use serde::Deserialize;
use tracing::debug;

use crate::error::QueryError;
use crate::service::{BoxFuture, EndpointService};

/// Accepted document shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum EndpointDocument {
    /// A Kubernetes list (`{"kind": "EndpointsList", "items": [...]}`).
    List { items: Vec<EndpointRecord> },
    /// A bare array of records.
    Records(Vec<EndpointRecord>),
    /// A single record.
    Single(EndpointRecord),
}

impl EndpointDocument {
    fn into_records(self) -> Vec<EndpointRecord> {
        match self {
            Self::List { items } => items,
            Self::Records(records) => records,
            Self::Single(record) => vec![record],
        }
    }
}

/// Serves endpoint records from a file, re-read on every query.
#[derive(Debug, Clone)]
pub struct FileEndpointSource {
    path: PathBuf,
}

impl FileEndpointSource {
    /// Creates a source for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The document path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses a document already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Parse`] if `json` is not an endpoint list, array or record.
    pub fn parse(&self, json: &str) -> Result<Vec<EndpointRecord>, QueryError> {
        serde_json::from_str::<EndpointDocument>(json)
            .map(EndpointDocument::into_records)
            .map_err(|source| QueryError::Parse {
                path: self.path.clone(),
                source,
            })
    }
}

impl EndpointService for FileEndpointSource {
    fn endpoints(&self) -> BoxFuture<'_, Result<Vec<EndpointRecord>, QueryError>> {
        Box::pin(async move {
            let json = tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| QueryError::Read {
                    path: self.path.clone(),
                    source,
                })?;
            let records = self.parse(&json)?;
            debug!(path = %self.path.display(), count = records.len(), "loaded endpoint records");
            Ok(records)
        })
    }
}
