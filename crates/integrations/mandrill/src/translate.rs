use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use courier_core::{Body, Disposition, Envelope, OutboundMessage, Part};

use crate::config::MandrillConfig;
use crate::headers::apply_headers;
use crate::types::{
    MandrillFile, MandrillMessage, MandrillRecipient, MandrillRequest, TemplateContent,
};

/// Build the Mandrill request for one message.
///
/// Pure: the same message, envelope, and configuration always produce the
/// same payload.
pub fn translate(
    message: &OutboundMessage,
    envelope: &Envelope,
    config: &MandrillConfig,
) -> MandrillRequest {
    let mut out = MandrillMessage {
        subject: message.subject.clone(),
        from_email: envelope.sender.email.clone(),
        from_name: envelope.sender.name().map(str::to_owned),
        to: envelope
            .recipients
            .iter()
            .map(|address| MandrillRecipient {
                email: address.email.clone(),
                name: address.name().map(str::to_owned),
                kind: message.kind_of(&address.email),
            })
            .collect(),
        subaccount: config.subaccount.clone(),
        ..MandrillMessage::default()
    };

    apply_body(&message.body, &mut out);
    apply_headers(&message.headers, &mut out);

    if !message.reply_to.is_empty() {
        let reply_to = message
            .reply_to
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        out.headers.insert("Reply-To".to_owned(), reply_to);
    }

    let template_content = config.template.as_ref().map(|_| {
        vec![TemplateContent {
            name: "body".to_owned(),
            content: out.html.clone().unwrap_or_default(),
        }]
    });

    MandrillRequest {
        key: config.api_key.clone(),
        message: out,
        template_name: config.template.clone(),
        template_content,
    }
}

fn apply_body(body: &Body, out: &mut MandrillMessage) {
    match body {
        Body::Single(part) if part.disposition.is_none() => {
            if part.mime_type() == "text/plain" {
                out.text = Some(part.content_str());
            } else {
                // text/html and anything else undeclared render as HTML.
                out.html = Some(part.content_str());
            }
        }
        Body::Single(part) => apply_child(part, out),
        Body::Multipart(parts) => {
            for part in parts {
                apply_child(part, out);
            }
        }
    }
}

fn apply_child(part: &Part, out: &mut MandrillMessage) {
    let mime = part.mime_type();

    if part.disposition.is_none() {
        match mime.as_str() {
            "text/html" => {
                out.html = Some(part.content_str());
                return;
            }
            "text/plain" => {
                out.text = Some(part.content_str());
                return;
            }
            _ => {}
        }
    }

    let inline = part.disposition == Some(Disposition::Inline) || part.content_id.is_some();
    if part.is_image() && inline {
        out.images.push(MandrillFile {
            content_type: mime,
            name: part.content_id.clone().or_else(|| part.filename.clone()),
            content: B64.encode(&part.content),
        });
    } else {
        out.attachments.push(MandrillFile {
            content_type: mime,
            name: part.filename.clone().or_else(|| part.content_id.clone()),
            content: B64.encode(&part.content),
        });
    }
}
