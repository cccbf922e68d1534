use thiserror::Error;

/// Errors raised while building or converting an outbound message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    /// The message has no sender address.
    #[error("message has no sender address")]
    MissingSender,

    /// The message has no recipients.
    #[error("message has no recipients")]
    MissingRecipients,

    /// An address could not be parsed.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// A legacy message could not be converted.
    #[error("invalid legacy message: {0}")]
    InvalidLegacy(String),
}
