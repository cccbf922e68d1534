use courier_core::MessageError;
use courier_provider::TransportError;
use thiserror::Error;

/// Errors specific to the Mandrill transport.
///
/// These are internal errors that get converted into [`TransportError`] at
/// the public API boundary.
#[derive(Debug, Error)]
pub enum MandrillError {
    /// The Mandrill server could not be reached or the response could not
    /// be read.
    #[error("could not reach the remote Mandrill server: {0}")]
    Http(#[from] reqwest::Error),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// The response body was not the JSON Mandrill documents.
    #[error("unable to send an email: {body} (code {status})")]
    Protocol { status: u16, body: String },

    /// Mandrill returned an error response.
    #[error(
        "Mandrill API error (HTTP {status}): {}",
        .message.as_deref().unwrap_or("unknown error")
    )]
    Api {
        status: u16,
        code: Option<i64>,
        message: Option<String>,
    },

    /// The API key is missing or resolved to an empty value.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// Settings could not be parsed.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The message cannot be translated into a Mandrill payload.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<MessageError> for MandrillError {
    fn from(err: MessageError) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

impl From<MandrillError> for TransportError {
    fn from(err: MandrillError) -> Self {
        match err {
            // Unbuildable requests (bad scheme or URL) are configuration faults.
            MandrillError::Http(e) if e.is_builder() => {
                TransportError::Configuration(e.to_string())
            }
            MandrillError::Http(e) => TransportError::Network(e.to_string()),
            MandrillError::Client(msg) | MandrillError::Configuration(msg) => {
                TransportError::Configuration(msg)
            }
            MandrillError::Protocol { status, body } => TransportError::Protocol { status, body },
            MandrillError::Api {
                status,
                code,
                message,
            } => TransportError::Api {
                status,
                code,
                message,
            },
            MandrillError::MissingCredential(what) => TransportError::MissingCredential(what),
            MandrillError::InvalidPayload(msg) => TransportError::InvalidMessage(msg),
        }
    }
}
