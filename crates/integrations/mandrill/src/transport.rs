use std::fmt;

use courier_core::{Envelope, OutboundMessage, SentMessage};
use courier_provider::{Transport, TransportError};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::MandrillConfig;
use crate::error::MandrillError;
use crate::translate::translate;
use crate::types::{ApiErrorBody, DeliveryReport, MandrillRequest, SendOutcome};

/// Mandrill transport: one message, one API call, one interpreted result.
///
/// Implements the [`Transport`] trait so hosts can use it behind
/// `Box<dyn DynTransport>`. Holds only immutable configuration and a
/// cloneable HTTP client, so concurrent sends share no mutable state.
pub struct MandrillTransport {
    config: MandrillConfig,
    client: Client,
}

impl fmt::Debug for MandrillTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MandrillTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for MandrillTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mandrill+api://{}", self.config.endpoint())
    }
}

#[derive(Serialize)]
struct PingRequest<'a> {
    key: &'a str,
}

impl MandrillTransport {
    /// Create a new Mandrill transport with the given configuration.
    ///
    /// Uses a default `reqwest::Client` with a 30 second timeout. Fails with
    /// [`MandrillError::MissingCredential`] when the API key is blank.
    pub fn new(config: MandrillConfig) -> Result<Self, MandrillError> {
        require_api_key(&config)?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| MandrillError::Client(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Create a new Mandrill transport with a custom HTTP client.
    ///
    /// Timeouts are whatever the client is configured with. The API key is
    /// checked as in [`MandrillTransport::new`].
    pub fn with_client(config: MandrillConfig, client: Client) -> Result<Self, MandrillError> {
        require_api_key(&config)?;
        Ok(Self { config, client })
    }

    /// Build the request payload for a message without sending it.
    pub fn translate(&self, message: &OutboundMessage, envelope: &Envelope) -> MandrillRequest {
        translate(message, envelope, &self.config)
    }

    /// POST a JSON body and return the raw status and body text.
    async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<(u16, String), MandrillError> {
        let response = courier_provider::inject_trace_context(self.client.post(url).json(body))
            .send()
            .await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok((status, text))
    }

    /// Deliver an already translated request.
    pub async fn deliver(
        &self,
        request: &MandrillRequest,
    ) -> Result<DeliveryReport, MandrillError> {
        let url = self.config.send_url();
        debug!(
            url = %url,
            recipients = request.message.to.len(),
            template = request.template_name.as_deref().unwrap_or(""),
            "sending email via Mandrill"
        );
        let (status, body) = self.post(&url, request).await?;
        interpret(status, &body)
    }
}

fn require_api_key(config: &MandrillConfig) -> Result<(), MandrillError> {
    if config.api_key.trim().is_empty() {
        return Err(MandrillError::MissingCredential(
            "Mandrill API key is empty".into(),
        ));
    }
    Ok(())
}

/// Decode a JSON body, keeping the raw text for protocol errors.
fn decode(status: u16, body: &str) -> Result<serde_json::Value, MandrillError> {
    serde_json::from_str(body).map_err(|_| MandrillError::Protocol {
        status,
        body: body.to_owned(),
    })
}

/// Turn a non-200 response into an API error.
fn api_error(status: u16, value: &serde_json::Value) -> MandrillError {
    let error = ApiErrorBody::from(value);
    let message = if error.status.as_deref() == Some("error") {
        error.message.or(error.name)
    } else {
        None
    };
    MandrillError::Api {
        status,
        code: error.code,
        message,
    }
}

/// Interpret a send response.
///
/// Non-JSON bodies are protocol errors, non-200 statuses are API errors,
/// and a 200 body must be the per-recipient result array. Recipients that
/// were not delivered are reported, not raised.
pub fn interpret(status: u16, body: &str) -> Result<DeliveryReport, MandrillError> {
    let value = decode(status, body)?;

    if status != 200 {
        return Err(api_error(status, &value));
    }

    let outcomes: Vec<SendOutcome> =
        serde_json::from_value(value).map_err(|_| MandrillError::Protocol {
            status,
            body: body.to_owned(),
        })?;
    Ok(DeliveryReport::from(outcomes))
}

impl Transport for MandrillTransport {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mandrill"
    }

    #[instrument(
        skip(self, message, envelope),
        fields(provider = "mandrill", subject = %message.subject)
    )]
    async fn send(
        &self,
        message: &OutboundMessage,
        envelope: Option<&Envelope>,
    ) -> Result<SentMessage, TransportError> {
        let envelope = match envelope {
            Some(envelope) => envelope.clone(),
            None => Envelope::from_message(message).map_err(MandrillError::from)?,
        };

        let request = self.translate(message, &envelope);
        let report = self.deliver(&request).await?;

        if report.failed_recipients.is_empty() {
            info!(
                delivered = report.delivered,
                message_id = report.message_id.as_deref().unwrap_or(""),
                "email sent via Mandrill"
            );
        } else {
            warn!(
                delivered = report.delivered,
                failed = ?report.failed_recipients,
                "Mandrill did not accept every recipient"
            );
        }

        Ok(SentMessage {
            message_id: report.message_id,
            envelope,
            delivered: report.delivered,
            failed_recipients: report.failed_recipients,
        })
    }

    #[instrument(skip(self), fields(provider = "mandrill"))]
    async fn health_check(&self) -> Result<(), TransportError> {
        let url = self.config.api_url("users/ping");

        debug!("performing Mandrill health check via ping");

        let (status, body) = self
            .post(
                &url,
                &PingRequest {
                    key: &self.config.api_key,
                },
            )
            .await?;
        let value = decode(status, &body)?;
        if status != 200 {
            return Err(api_error(status, &value).into());
        }

        debug!("Mandrill health check passed");

        Ok(())
    }
}
