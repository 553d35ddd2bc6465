//! The networking query interface.

use std::future::Future;
use std::pin::Pin;

use ops_proto::EndpointRecord;

use crate::error::QueryError;

/// Boxed, sendable future returned by [`EndpointService`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of endpoint records.
pub trait EndpointService: Send + Sync {
    /// Returns every endpoint record, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] if the records cannot be fetched.
    fn endpoints(&self) -> BoxFuture<'_, Result<Vec<EndpointRecord>, QueryError>>;
}
