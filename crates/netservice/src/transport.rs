//! The transport capability every verb method delegates to.

use crate::failure::Failure;
use crate::request::Request;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

/// Sends one request and yields its body or a [`Failure`].
///
/// Implemented by [`crate::ReqwestTransport`] for real network I/O and by
/// test doubles. One call performs at most one exchange; there is no retry.
#[async_trait]
pub trait NetworkServiceClient: Send + Sync {
    /// Session or configuration object backing the transport.
    type Session;

    fn session(&self) -> &Self::Session;

    /// Perform a single exchange.
    async fn start(&self, request: Request) -> Result<Bytes, Failure>;
}

#[async_trait]
impl<T> NetworkServiceClient for Arc<T>
where
    T: NetworkServiceClient + ?Sized,
{
    type Session = T::Session;

    fn session(&self) -> &Self::Session {
        (**self).session()
    }

    async fn start(&self, request: Request) -> Result<Bytes, Failure> {
        (**self).start(request).await
    }
}
