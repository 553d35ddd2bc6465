//! The orchestration engine interface.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::InvocationError;
use crate::request::InvocationRequest;

/// Boxed, sendable future returned by service traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Something that can start workflows.
///
/// The harness only looks at success or failure; whatever the engine does
/// with an accepted invocation is its own business.
pub trait WorkflowService: Send + Sync {
    /// Invokes `request.workflow_id()` in `request.workplace()` with the
    /// request's payload.
    ///
    /// # Errors
    ///
    /// Returns an [`InvocationError`] if the engine rejects the request or
    /// cannot be reached.
    fn invoke<'a>(&'a self, request: &'a InvocationRequest)
    -> BoxFuture<'a, Result<(), InvocationError>>;
}

impl<T: WorkflowService + ?Sized> WorkflowService for Arc<T> {
    fn invoke<'a>(
        &'a self,
        request: &'a InvocationRequest,
    ) -> BoxFuture<'a, Result<(), InvocationError>> {
        (**self).invoke(request)
    }
}
