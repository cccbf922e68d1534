//! The older message shape used by earlier host versions.
//!
//! Older hosts hand over mailboxes as flat `(email, name)` lists, carry the
//! body and its declared content type directly on the message, and only know
//! plain string headers. Tags and metadata can therefore only travel as
//! `X-MC-*` marker headers. [`LegacyMessage`] converts into
//! [`OutboundMessage`] so transports only ever deal with one model.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::MessageError;
use crate::message::{Body, Disposition, Header, OutboundMessage, Part, Recipient, RecipientKind};

/// `(email, display name)` pair as stored by the legacy model.
pub type LegacyMailbox = (String, Option<String>);

/// A child part of a legacy message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyPart {
    pub content_type: String,
    /// Raw `Content-Disposition` value: `inline` or `attachment`.
    #[serde(default)]
    pub disposition: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub content_id: Option<String>,
    #[serde(default)]
    pub body: Vec<u8>,
}

/// A message in the legacy host representation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyMessage {
    pub from: Vec<LegacyMailbox>,
    #[serde(default)]
    pub reply_to: Vec<LegacyMailbox>,
    #[serde(default)]
    pub to: Vec<LegacyMailbox>,
    #[serde(default)]
    pub cc: Vec<LegacyMailbox>,
    #[serde(default)]
    pub bcc: Vec<LegacyMailbox>,
    #[serde(default)]
    pub subject: String,
    /// Declared content type of the top-level body.
    pub content_type: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub children: Vec<LegacyPart>,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

fn mailbox(entry: &LegacyMailbox) -> Address {
    let address = Address::new(entry.0.trim());
    match &entry.1 {
        Some(name) => address.with_name(name.clone()),
        None => address,
    }
}

fn disposition(raw: Option<&str>) -> Result<Option<Disposition>, MessageError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    // Parameters such as `; filename=...` are not significant here.
    let value = raw.split(';').next().unwrap_or_default().trim();
    match value.to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "inline" => Ok(Some(Disposition::Inline)),
        "attachment" => Ok(Some(Disposition::Attachment)),
        other => Err(MessageError::InvalidLegacy(format!(
            "unknown content disposition '{other}'"
        ))),
    }
}

impl TryFrom<LegacyPart> for Part {
    type Error = MessageError;

    fn try_from(part: LegacyPart) -> Result<Self, Self::Error> {
        Ok(Self {
            disposition: disposition(part.disposition.as_deref())?,
            content_type: part.content_type,
            filename: part.filename,
            content_id: part
                .content_id
                .map(|id| id.trim_start_matches('<').trim_end_matches('>').to_owned()),
            content: part.body,
        })
    }
}

impl TryFrom<LegacyMessage> for OutboundMessage {
    type Error = MessageError;

    fn try_from(legacy: LegacyMessage) -> Result<Self, Self::Error> {
        let from: Vec<Address> = legacy.from.iter().map(mailbox).collect();
        if from.is_empty() {
            return Err(MessageError::MissingSender);
        }

        let recipients: Vec<Recipient> = [
            (RecipientKind::To, &legacy.to),
            (RecipientKind::Cc, &legacy.cc),
            (RecipientKind::Bcc, &legacy.bcc),
        ]
        .into_iter()
        .flat_map(|(kind, list)| {
            list.iter().map(move |entry| Recipient {
                kind,
                address: mailbox(entry),
            })
        })
        .collect();
        if recipients.is_empty() {
            return Err(MessageError::MissingRecipients);
        }

        let body = if legacy.children.is_empty() {
            Body::Single(Part::text(legacy.content_type, legacy.body))
        } else {
            let mut parts = Vec::with_capacity(legacy.children.len() + 1);
            if !legacy.body.is_empty() {
                let main_type = if legacy
                    .content_type
                    .to_ascii_lowercase()
                    .starts_with("multipart/")
                {
                    "text/plain".to_owned()
                } else {
                    legacy.content_type
                };
                parts.push(Part::text(main_type, legacy.body));
            }
            for child in legacy.children {
                parts.push(Part::try_from(child)?);
            }
            Body::Multipart(parts)
        };

        Ok(Self {
            from,
            reply_to: legacy.reply_to.iter().map(mailbox).collect(),
            recipients,
            subject: legacy.subject,
            headers: legacy
                .headers
                .into_iter()
                .map(|(name, value)| Header::Raw { name, value })
                .collect(),
            body,
        })
    }
}
