use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::MessageError;
use crate::message::OutboundMessage;

/// The authoritative sender and recipient list used for delivery.
///
/// Usually derived from the message itself, but may differ from its headers
/// (for example when a bounce address is used as the sender).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub sender: Address,
    pub recipients: Vec<Address>,
}

impl Envelope {
    /// Create an envelope, enforcing at least one recipient.
    pub fn new(sender: Address, recipients: Vec<Address>) -> Result<Self, MessageError> {
        if recipients.is_empty() {
            return Err(MessageError::MissingRecipients);
        }
        Ok(Self { sender, recipients })
    }

    /// Derive the envelope from a message: first `From` address as sender
    /// and every to/cc/bcc recipient in order.
    pub fn from_message(message: &OutboundMessage) -> Result<Self, MessageError> {
        let sender = message
            .sender()
            .cloned()
            .ok_or(MessageError::MissingSender)?;
        let recipients = message
            .recipients
            .iter()
            .map(|r| r.address.clone())
            .collect();
        Self::new(sender, recipients)
    }
}

/// Record of a message accepted by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    /// Provider-assigned message identifier, when the provider returns one.
    pub message_id: Option<String>,
    /// Envelope the message was sent with.
    pub envelope: Envelope,
    /// Number of recipients the provider accepted.
    pub delivered: usize,
    /// Recipients the provider did not accept.
    pub failed_recipients: Vec<String>,
}

impl SentMessage {
    /// Whether every recipient was accepted.
    pub fn is_complete(&self) -> bool {
        self.failed_recipients.is_empty()
    }
}
