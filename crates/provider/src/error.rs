use courier_core::MessageError;
use thiserror::Error;

/// Errors that can occur while configuring or using a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The requested adapter type was not found in the registry.
    #[error("transport adapter not found: {0}")]
    NotFound(String),

    /// A required credential is missing or resolved to an empty value.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// The transport was given invalid configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The message cannot be sent as given.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The remote host could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The remote host answered with something that is not the expected
    /// protocol (e.g. a non-JSON body).
    #[error("unable to send an email: {body} (code {status})")]
    Protocol {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The provider API rejected the request.
    #[error("{}", api_error_message(.status, .code.as_ref(), .message.as_deref()))]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Provider-specific error code, when reported.
        code: Option<i64>,
        /// Provider error message, when reported.
        message: Option<String>,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),
}

fn api_error_message(status: &u16, code: Option<&i64>, message: Option<&str>) -> String {
    let code = code.copied().unwrap_or_else(|| i64::from(*status));
    match message {
        Some(message) => format!("unable to send an email: {message} (code {code})"),
        None => format!("unable to send an email (code {code})"),
    }
}

impl TransportError {
    /// Returns `true` if the error is transient and the operation may succeed
    /// on retry. Transports never retry themselves; this is a hint for the
    /// caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<MessageError> for TransportError {
    fn from(err: MessageError) -> Self {
        Self::InvalidMessage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(TransportError::Network("reset".into()).is_retryable());
        assert!(!TransportError::MissingCredential("api key".into()).is_retryable());
        assert!(
            !TransportError::Protocol {
                status: 502,
                body: "<html>".into()
            }
            .is_retryable()
        );
        assert!(
            !TransportError::Api {
                status: 500,
                code: Some(-1),
                message: None
            }
            .is_retryable()
        );
    }

    #[test]
    fn api_error_display_with_message() {
        let err = TransportError::Api {
            status: 500,
            code: Some(12),
            message: Some("Invalid key".into()),
        };
        assert_eq!(err.to_string(), "unable to send an email: Invalid key (code 12)");
    }

    #[test]
    fn api_error_display_falls_back_to_status() {
        let err = TransportError::Api {
            status: 503,
            code: None,
            message: None,
        };
        assert_eq!(err.to_string(), "unable to send an email (code 503)");
    }

    #[test]
    fn protocol_error_display_includes_body_and_status() {
        let err = TransportError::Protocol {
            status: 502,
            body: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "unable to send an email: Bad Gateway (code 502)");
    }

    #[test]
    fn message_error_converts_to_invalid_message() {
        let err: TransportError = MessageError::MissingSender.into();
        assert!(matches!(err, TransportError::InvalidMessage(_)));
    }
}
