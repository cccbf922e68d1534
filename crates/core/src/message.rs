use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::MessageError;

/// How a recipient is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientKind {
    To,
    Cc,
    Bcc,
}

/// A single addressed recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub kind: RecipientKind,
    pub address: Address,
}

/// Content disposition of a body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    Inline,
    Attachment,
}

/// One MIME part of a message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// MIME type without parameters, e.g. `text/html` or `image/png`.
    pub content_type: String,
    /// Declared disposition, if any. Body text parts usually have none.
    pub disposition: Option<Disposition>,
    /// File name for attachments.
    pub filename: Option<String>,
    /// Content-ID for inline parts, without angle brackets.
    pub content_id: Option<String>,
    /// Raw (decoded) content.
    pub content: Vec<u8>,
}

impl Part {
    /// A body text part with no disposition.
    pub fn text(content_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            disposition: None,
            filename: None,
            content_id: None,
            content: content.into().into_bytes(),
        }
    }

    /// A file attachment.
    pub fn attachment(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            disposition: Some(Disposition::Attachment),
            filename: Some(filename.into()),
            content_id: None,
            content: content.into(),
        }
    }

    /// An inline part referenced from HTML via `cid:<content_id>`.
    pub fn inline(
        content_id: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        let content_id: String = content_id.into();
        Self {
            content_type: content_type.into(),
            disposition: Some(Disposition::Inline),
            filename: None,
            content_id: Some(
                content_id
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_owned(),
            ),
            content: content.into(),
        }
    }

    /// Content type with any parameters stripped, lowercased.
    pub fn mime_type(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    /// Whether the part is an `image/*` type.
    pub fn is_image(&self) -> bool {
        self.mime_type().starts_with("image/")
    }

    /// Content decoded as UTF-8, replacing invalid sequences.
    pub fn content_str(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// Message body: either one part or an ordered list of child parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "parts", rename_all = "snake_case")]
pub enum Body {
    Single(Part),
    Multipart(Vec<Part>),
}

/// A message header.
///
/// Besides plain `name: value` pairs, tags and metadata are modelled as
/// structured headers so transports can map them onto native fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Header {
    Raw { name: String, value: String },
    Tag { value: String },
    Metadata { key: String, value: String },
}

impl Header {
    /// Convenience constructor for a raw header.
    pub fn raw(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Raw {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A generic outbound email message handed to a transport.
///
/// Built through [`OutboundMessage::builder`], which enforces that there is
/// a sender and at least one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// `From` addresses. The first one is the sender.
    pub from: Vec<Address>,
    /// `Reply-To` addresses.
    #[serde(default)]
    pub reply_to: Vec<Address>,
    /// Recipients in the order they were added.
    pub recipients: Vec<Recipient>,
    pub subject: String,
    /// Headers in the order they were added.
    #[serde(default)]
    pub headers: Vec<Header>,
    pub body: Body,
}

impl OutboundMessage {
    /// Start building a message.
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    /// The primary sender (first `From` address).
    pub fn sender(&self) -> Option<&Address> {
        self.from.first()
    }

    /// Addresses of the given kind, in order.
    pub fn addresses(&self, kind: RecipientKind) -> impl Iterator<Item = &Address> {
        self.recipients
            .iter()
            .filter(move |r| r.kind == kind)
            .map(|r| &r.address)
    }

    /// The kind under which `email` is addressed (`bcc` wins over `cc`, which
    /// wins over `to`). Unknown addresses default to `to`.
    pub fn kind_of(&self, email: &str) -> RecipientKind {
        let listed = |kind| {
            self.addresses(kind)
                .any(|a| a.email.eq_ignore_ascii_case(email))
        };
        if listed(RecipientKind::Bcc) {
            RecipientKind::Bcc
        } else if listed(RecipientKind::Cc) {
            RecipientKind::Cc
        } else {
            RecipientKind::To
        }
    }

    /// Iterate the body parts, whether single or multipart.
    pub fn parts(&self) -> &[Part] {
        match &self.body {
            Body::Single(part) => std::slice::from_ref(part),
            Body::Multipart(parts) => parts,
        }
    }
}

/// Builder for [`OutboundMessage`].
///
/// # Examples
///
/// ```
/// use courier_core::{Address, OutboundMessage};
///
/// let message = OutboundMessage::builder()
///     .from(Address::new("a@x.com").with_name("A"))
///     .to(Address::new("b@x.com"))
///     .subject("Hi")
///     .html("<p>hi</p>")
///     .build()
///     .unwrap();
/// assert_eq!(message.subject, "Hi");
/// ```
#[derive(Debug, Default, Clone)]
pub struct MessageBuilder {
    from: Vec<Address>,
    reply_to: Vec<Address>,
    recipients: Vec<Recipient>,
    subject: String,
    headers: Vec<Header>,
    html: Option<String>,
    text: Option<String>,
    body: Option<Part>,
    attachments: Vec<Part>,
}

impl MessageBuilder {
    #[must_use]
    pub fn from(mut self, address: Address) -> Self {
        self.from.push(address);
        self
    }

    #[must_use]
    pub fn reply_to(mut self, address: Address) -> Self {
        self.reply_to.push(address);
        self
    }

    #[must_use]
    pub fn to(self, address: Address) -> Self {
        self.recipient(RecipientKind::To, address)
    }

    #[must_use]
    pub fn cc(self, address: Address) -> Self {
        self.recipient(RecipientKind::Cc, address)
    }

    #[must_use]
    pub fn bcc(self, address: Address) -> Self {
        self.recipient(RecipientKind::Bcc, address)
    }

    #[must_use]
    pub fn recipient(mut self, kind: RecipientKind, address: Address) -> Self {
        self.recipients.push(Recipient { kind, address });
        self
    }

    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    #[must_use]
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set a single body with an explicit content type, replacing any
    /// `html`/`text` set so far.
    #[must_use]
    pub fn body(mut self, content_type: impl Into<String>, content: impl Into<String>) -> Self {
        self.html = None;
        self.text = None;
        self.body = Some(Part::text(content_type, content));
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::raw(name, value));
        self
    }

    #[must_use]
    pub fn tag(mut self, value: impl Into<String>) -> Self {
        self.headers.push(Header::Tag {
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::Metadata {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Attach a file.
    #[must_use]
    pub fn attach(
        mut self,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        self.attachments
            .push(Part::attachment(filename, content_type, content));
        self
    }

    /// Embed an inline part referenced as `cid:<content_id>`.
    #[must_use]
    pub fn embed(
        mut self,
        content_id: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        self.attachments
            .push(Part::inline(content_id, content_type, content));
        self
    }

    /// Add an arbitrary child part.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.attachments.push(part);
        self
    }

    /// Validate and assemble the message.
    ///
    /// A message with only one text body and no other parts becomes a
    /// single-part body; anything else becomes multipart.
    pub fn build(self) -> Result<OutboundMessage, MessageError> {
        if self.from.is_empty() {
            return Err(MessageError::MissingSender);
        }
        if self.recipients.is_empty() {
            return Err(MessageError::MissingRecipients);
        }

        let mut parts = Vec::new();
        if let Some(part) = self.body {
            parts.push(part);
        }
        if let Some(text) = self.text {
            parts.push(Part::text("text/plain", text));
        }
        if let Some(html) = self.html {
            parts.push(Part::text("text/html", html));
        }
        parts.extend(self.attachments);

        let body = if parts.len() == 1 {
            Body::Single(parts.remove(0))
        } else {
            Body::Multipart(parts)
        };

        Ok(OutboundMessage {
            from: self.from,
            reply_to: self.reply_to,
            recipients: self.recipients,
            subject: self.subject,
            headers: self.headers,
            body,
        })
    }
}
