use std::collections::BTreeMap;

use courier_core::RecipientKind;
use serde::{Deserialize, Serialize};

/// Request body for `messages/send.json` and `messages/send-template.json`.
#[derive(Clone, Serialize, PartialEq)]
pub struct MandrillRequest {
    /// API key used to authenticate the call.
    pub key: String,

    pub message: MandrillMessage,

    /// Name of the stored template (template mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,

    /// Content blocks merged into the template (template mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_content: Option<Vec<TemplateContent>>,
}

impl std::fmt::Debug for MandrillRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MandrillRequest")
            .field("key", &"[REDACTED]")
            .field("message", &self.message)
            .field("template_name", &self.template_name)
            .field("template_content", &self.template_content)
            .finish()
    }
}

impl MandrillRequest {
    /// Whether the request targets the template-send endpoint.
    pub fn is_template(&self) -> bool {
        self.template_name.is_some()
    }
}

/// The `message` object of a send request.
///
/// Optional fields are omitted from the JSON entirely rather than sent as
/// `null` or empty values.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MandrillMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    pub subject: String,

    pub from_email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,

    pub to: Vec<MandrillRecipient>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_text: Option<bool>,

    /// Boolean when the marker header held a boolean word, otherwise the raw
    /// header value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_css: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_domain: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subaccount: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub google_analytics_domains: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_analytics_campaign: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<MandrillFile>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<MandrillFile>,
}

/// One entry of `message.to`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MandrillRecipient {
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub kind: RecipientKind,
}

/// An attachment or inline image, base64-encoded.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MandrillFile {
    /// MIME type.
    #[serde(rename = "type")]
    pub content_type: String,

    /// File name for attachments, content-id for images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Base64-encoded content.
    pub content: String,
}

/// A `template_content` block.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TemplateContent {
    pub name: String,
    pub content: String,
}

/// Per-recipient status reported by Mandrill.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DeliveryStatus {
    Sent,
    Queued,
    Rejected,
    Invalid,
    /// Any status this crate does not know about (e.g. `scheduled`).
    Other(String),
}

impl From<String> for DeliveryStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "sent" => Self::Sent,
            "queued" => Self::Queued,
            "rejected" => Self::Rejected,
            "invalid" => Self::Invalid,
            _ => Self::Other(status),
        }
    }
}

impl DeliveryStatus {
    /// `sent` and `queued` count as delivered; everything else is a failure.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Sent | Self::Queued)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Sent => "sent",
            Self::Queued => "queued",
            Self::Rejected => "rejected",
            Self::Invalid => "invalid",
            Self::Other(status) => status,
        }
    }
}

/// One element of the array returned by a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendOutcome {
    pub email: String,

    pub status: DeliveryStatus,

    /// Mandrill message id for this recipient.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    #[serde(default)]
    pub reject_reason: Option<String>,
}

/// Error object returned with a non-200 status.
///
/// Fields are read one by one so a malformed field never hides the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiErrorBody {
    pub status: Option<String>,
    pub code: Option<i64>,
    pub name: Option<String>,
    pub message: Option<String>,
}

impl From<&serde_json::Value> for ApiErrorBody {
    fn from(value: &serde_json::Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        };
        let code = value.get("code").and_then(|code| match code {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });
        Self {
            status: text("status"),
            code,
            name: text("name"),
            message: text("message"),
        }
    }
}

/// Interpretation of a successful send response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Outcomes in response order.
    pub outcomes: Vec<SendOutcome>,
    /// Number of recipients reported `sent` or `queued`.
    pub delivered: usize,
    /// Recipients reported with any other status.
    pub failed_recipients: Vec<String>,
    /// Id of the first outcome, used as the message id.
    pub message_id: Option<String>,
}

impl From<Vec<SendOutcome>> for DeliveryReport {
    fn from(outcomes: Vec<SendOutcome>) -> Self {
        let (delivered, failed): (Vec<&SendOutcome>, Vec<&SendOutcome>) =
            outcomes.iter().partition(|o| o.status.is_delivered());
        let failed_recipients = failed.into_iter().map(|o| o.email.clone()).collect();
        let delivered = delivered.len();
        let message_id = outcomes.first().and_then(|o| o.id.clone());
        Self {
            outcomes,
            delivered,
            failed_recipients,
            message_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_omits_empty_optional_fields() {
        let message = MandrillMessage {
            subject: "Hi".into(),
            from_email: "a@x.com".into(),
            html: Some("<p>hi</p>".into()),
            ..MandrillMessage::default()
        };
        let json = serde_json::to_value(&message).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 4, "unexpected keys: {keys:?}");
        for key in ["html", "subject", "from_email", "to"] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }

    #[test]
    fn recipient_serializes_type() {
        let recipient = MandrillRecipient {
            email: "b@x.com".into(),
            name: None,
            kind: RecipientKind::Bcc,
        };
        assert_eq!(
            serde_json::to_value(&recipient).unwrap(),
            serde_json::json!({"email": "b@x.com", "type": "bcc"})
        );
    }

    #[test]
    fn request_debug_redacts_key() {
        let request = MandrillRequest {
            key: "md-secret-key".into(),
            message: MandrillMessage::default(),
            template_name: None,
            template_content: None,
        };
        let debug = format!("{request:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("md-secret-key"));
        assert!(!request.is_template());
    }

    #[test]
    fn outcome_deserializes_with_unknown_status() {
        let json = r#"{"email":"a@x.com","status":"scheduled","_id":"abc","reject_reason":null}"#;
        let outcome: SendOutcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.status, DeliveryStatus::Other("scheduled".into()));
        assert_eq!(outcome.status.as_str(), "scheduled");
        assert!(!outcome.status.is_delivered());
        assert_eq!(outcome.id.as_deref(), Some("abc"));
    }

    #[test]
    fn error_body_survives_mistyped_fields() {
        let value = serde_json::json!({
            "status": "error",
            "code": "12",
            "name": ["not", "a", "string"],
            "message": "Invalid key"
        });
        let body = ApiErrorBody::from(&value);
        assert_eq!(body.status.as_deref(), Some("error"));
        assert_eq!(body.code, Some(12));
        assert!(body.name.is_none());
        assert_eq!(body.message.as_deref(), Some("Invalid key"));
    }

    #[test]
    fn error_body_from_non_object_is_empty() {
        assert_eq!(
            ApiErrorBody::from(&serde_json::json!("PONG!")),
            ApiErrorBody::default()
        );
    }

    #[test]
    fn report_counts_delivered_and_failed() {
        let outcomes: Vec<SendOutcome> = serde_json::from_str(
            r#"[{"email":"a@x.com","status":"sent","_id":"1"},
                {"email":"b@x.com","status":"rejected","_id":"2","reject_reason":"hard-bounce"},
                {"email":"c@x.com","status":"queued","_id":"3"}]"#,
        )
        .unwrap();
        let report = DeliveryReport::from(outcomes);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed_recipients, ["b@x.com"]);
        assert_eq!(report.message_id.as_deref(), Some("1"));
        assert_eq!(
            report.outcomes[1].reject_reason.as_deref(),
            Some("hard-bounce")
        );
    }

    #[test]
    fn empty_report_has_no_message_id() {
        let report = DeliveryReport::from(Vec::new());
        assert_eq!(report.delivered, 0);
        assert!(report.message_id.is_none());
    }
}
