use courier_core::{Envelope, OutboundMessage, SentMessage};
use tracing::info;

use crate::error::TransportError;
use crate::transport::Transport;

/// A transport that logs the message and reports every recipient as
/// delivered without performing any external I/O.
///
/// Useful for local development and tests where no real provider account
/// is available.
pub struct LogTransport {
    name: String,
}

impl LogTransport {
    /// Create a new `LogTransport` with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Transport for LogTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(
        &self,
        message: &OutboundMessage,
        envelope: Option<&Envelope>,
    ) -> Result<SentMessage, TransportError> {
        let envelope = match envelope {
            Some(envelope) => envelope.clone(),
            None => Envelope::from_message(message)?,
        };
        info!(
            transport = %self.name,
            sender = %envelope.sender.email,
            recipients = envelope.recipients.len(),
            subject = %message.subject,
            "log transport accepted message"
        );
        Ok(SentMessage {
            message_id: None,
            delivered: envelope.recipients.len(),
            envelope,
            failed_recipients: Vec::new(),
        })
    }

    #[allow(clippy::unused_async)]
    async fn health_check(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
