use async_trait::async_trait;
use courier_core::{Envelope, OutboundMessage, SentMessage};

use crate::error::TransportError;

/// Strongly-typed transport trait with native `async fn`.
///
/// A transport sends exactly one message per call and reports the result;
/// it never retries or queues. Implementations must be safe to share across
/// concurrent sends, holding nothing mutable beyond immutable configuration.
///
/// This trait is **not** object-safe. Use [`DynTransport`] behind a `Box` or
/// `Arc`; every `Transport` implements it through a blanket implementation.
pub trait Transport: Send + Sync {
    /// Returns the unique name of this transport.
    fn name(&self) -> &str;

    /// Send `message`. When `envelope` is `None` it is derived from the
    /// message headers.
    fn send(
        &self,
        message: &OutboundMessage,
        envelope: Option<&Envelope>,
    ) -> impl std::future::Future<Output = Result<SentMessage, TransportError>> + Send;

    /// Perform a health check to verify the transport is operational.
    fn health_check(&self) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;
}

/// Object-safe transport trait for use behind `Box<dyn DynTransport>`.
///
/// You generally should not implement this trait directly; implement
/// [`Transport`] and rely on the blanket implementation.
#[async_trait]
pub trait DynTransport: Send + Sync {
    /// Returns the unique name of this transport.
    fn name(&self) -> &str;

    /// Send one message.
    async fn send(
        &self,
        message: &OutboundMessage,
        envelope: Option<&Envelope>,
    ) -> Result<SentMessage, TransportError>;

    /// Perform a health check to verify the transport is operational.
    async fn health_check(&self) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: Transport + Sync> DynTransport for T {
    fn name(&self) -> &str {
        Transport::name(self)
    }

    async fn send(
        &self,
        message: &OutboundMessage,
        envelope: Option<&Envelope>,
    ) -> Result<SentMessage, TransportError> {
        Transport::send(self, message, envelope).await
    }

    async fn health_check(&self) -> Result<(), TransportError> {
        Transport::health_check(self).await
    }
}
