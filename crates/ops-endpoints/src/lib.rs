//! # ops-endpoints
//!
//! Lists endpoint records from the cluster-networking service.
//!
//! The service is reached through the [`EndpointService`] trait. The gateway
//! client in `ops-cli` implements it over the network; [`FileEndpointSource`]
//! implements it over a saved `kubectl get endpoints -o json` document.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod file;
pub mod lister;
pub mod service;

pub use error::QueryError;
pub use file::FileEndpointSource;
pub use lister::{EndpointRow, list_endpoints, sorted_rows};
pub use service::{BoxFuture, EndpointService};
