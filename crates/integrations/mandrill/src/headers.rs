//! Mapping of message headers onto Mandrill message fields.
//!
//! Mandrill understands a family of `X-MC-*` marker headers when mail is
//! relayed over SMTP. Over the HTTP API the same settings are native fields,
//! so the markers are diverted into those fields instead of being forwarded.
//! Lookup is an ordered table of lowercase header names to handlers; any
//! other `X-*` header is forwarded verbatim and the rest are dropped.

use courier_core::Header;
use tracing::{debug, warn};

use crate::types::MandrillMessage;

type Handler = fn(&str, &str, &mut MandrillMessage);

/// Headers Mandrill derives from dedicated fields; never forwarded.
const BYPASSED: &[&str] = &["from", "to", "cc", "bcc", "subject", "content-type"];

const HANDLERS: &[(&str, Handler)] = &[
    ("list-unsubscribe", forward),
    ("reply-to", reply_to),
    ("x-mc-tags", tags),
    ("x-mc-inlinecss", inline_css),
    ("x-mc-autotext", auto_text),
    ("x-mc-googleanalytics", google_analytics_domains),
    ("x-mc-googleanalyticscampaign", google_analytics_campaign),
    ("x-mc-trackingdomain", tracking_domain),
    ("x-mc-metadata", metadata),
    ("x-mc-important", important),
];

/// Parse the boolean words Mandrill accepts in marker headers.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "y" => Some(true),
        "false" | "off" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated list, trimming items and dropping empty ones.
pub fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
}

fn forward(name: &str, value: &str, message: &mut MandrillMessage) {
    message.headers.insert(name.to_owned(), value.to_owned());
}

fn reply_to(_name: &str, value: &str, message: &mut MandrillMessage) {
    message
        .headers
        .insert("Reply-To".to_owned(), value.to_owned());
}

fn tags(_name: &str, value: &str, message: &mut MandrillMessage) {
    message.tags.extend(split_list(value));
}

fn inline_css(_name: &str, value: &str, message: &mut MandrillMessage) {
    message.inline_css = Some(match parse_bool(value) {
        Some(flag) => serde_json::Value::Bool(flag),
        None => serde_json::Value::String(value.to_owned()),
    });
}

fn auto_text(name: &str, value: &str, message: &mut MandrillMessage) {
    match parse_bool(value) {
        Some(flag) => message.auto_text = Some(flag),
        None => debug!(header = name, value, "ignoring unrecognised auto-text value"),
    }
}

fn important(name: &str, value: &str, message: &mut MandrillMessage) {
    match parse_bool(value) {
        Some(flag) => message.important = Some(flag),
        None => debug!(header = name, value, "ignoring unrecognised importance value"),
    }
}

fn google_analytics_domains(_name: &str, value: &str, message: &mut MandrillMessage) {
    message.google_analytics_domains.extend(split_list(value));
}

fn google_analytics_campaign(_name: &str, value: &str, message: &mut MandrillMessage) {
    message.google_analytics_campaign = Some(value.to_owned());
}

fn tracking_domain(_name: &str, value: &str, message: &mut MandrillMessage) {
    message.tracking_domain = Some(value.to_owned());
}

fn metadata(name: &str, value: &str, message: &mut MandrillMessage) {
    let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(value)
    else {
        warn!(header = name, "dropping metadata header that is not a JSON object");
        return;
    };
    for (key, value) in map {
        let value = match value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        message.metadata.insert(key, value);
    }
}

/// Apply one raw `name: value` header.
pub fn apply_raw(name: &str, value: &str, message: &mut MandrillMessage) {
    let name = name.trim();
    let value = value.trim();
    let lower = name.to_ascii_lowercase();

    if BYPASSED.contains(&lower.as_str()) {
        return;
    }

    if let Some((_, handler)) = HANDLERS.iter().find(|(key, _)| *key == lower) {
        handler(name, value, message);
    } else if lower.starts_with("x-") {
        forward(name, value, message);
    }
}

/// Apply every header of a message, in order.
pub fn apply_headers(headers: &[Header], message: &mut MandrillMessage) {
    for header in headers {
        match header {
            Header::Raw { name, value } => apply_raw(name, value, message),
            Header::Tag { value } => message.tags.extend(split_list(value)),
            Header::Metadata { key, value } => {
                message.metadata.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(pairs: &[(&str, &str)]) -> MandrillMessage {
        let headers: Vec<Header> = pairs
            .iter()
            .map(|(name, value)| Header::raw(*name, *value))
            .collect();
        let mut message = MandrillMessage::default();
        apply_headers(&headers, &mut message);
        message
    }

    #[test]
    fn bypassed_headers_are_never_forwarded() {
        let message = apply(&[
            ("From", "a@x.com"),
            ("To", "b@x.com"),
            ("CC", "c@x.com"),
            ("Bcc", "d@x.com"),
            ("Subject", "Hi"),
            ("Content-Type", "text/html"),
        ]);
        assert!(message.headers.is_empty());
    }

    #[test]
    fn tag_marker_is_split() {
        let message = apply(&[("X-MC-Tags", "a,b,c")]);
        assert_eq!(message.tags, ["a", "b", "c"]);
        assert!(message.headers.is_empty());
    }

    #[test]
    fn tag_marker_and_structured_tags_are_equivalent() {
        let from_marker = apply(&[("X-MC-Tags", "a, b")]);
        let mut structured = MandrillMessage::default();
        apply_headers(
            &[Header::Tag {
                value: "a,b".into(),
            }],
            &mut structured,
        );
        assert_eq!(from_marker.tags, structured.tags);
    }

    #[test]
    fn structured_tags_append() {
        let mut message = MandrillMessage::default();
        apply_headers(
            &[
                Header::raw("X-MC-Tags", "first"),
                Header::Tag {
                    value: "a,b".into(),
                },
            ],
            &mut message,
        );
        assert_eq!(message.tags, ["first", "a", "b"]);
    }

    #[test]
    fn auto_text_words() {
        for word in ["true", "on", "YES", "y"] {
            assert_eq!(apply(&[("X-MC-Autotext", word)]).auto_text, Some(true));
        }
        for word in ["false", "Off", "no", "n"] {
            assert_eq!(apply(&[("X-MC-Autotext", word)]).auto_text, Some(false));
        }
        let message = apply(&[("X-MC-Autotext", "maybe")]);
        assert!(message.auto_text.is_none());
        assert!(message.headers.is_empty(), "unrecognised value must not be forwarded");
    }

    #[test]
    fn inline_css_boolean_or_string() {
        let message = apply(&[("X-MC-InlineCSS", "true")]);
        assert_eq!(message.inline_css, Some(serde_json::Value::Bool(true)));
        let message = apply(&[("X-MC-InlineCSS", "always")]);
        assert_eq!(
            message.inline_css,
            Some(serde_json::Value::String("always".into()))
        );
    }

    #[test]
    fn analytics_and_tracking_markers() {
        let message = apply(&[
            ("X-MC-GoogleAnalytics", "example.com, shop.example.com"),
            ("X-MC-GoogleAnalyticsCampaign", "spring"),
            ("X-MC-TrackingDomain", "track.example.com"),
        ]);
        assert_eq!(
            message.google_analytics_domains,
            ["example.com", "shop.example.com"]
        );
        assert_eq!(message.google_analytics_campaign.as_deref(), Some("spring"));
        assert_eq!(message.tracking_domain.as_deref(), Some("track.example.com"));
        assert!(message.headers.is_empty());
    }

    #[test]
    fn list_unsubscribe_and_x_headers_pass_through() {
        let message = apply(&[
            ("List-Unsubscribe", "<mailto:unsub@x.com>"),
            ("X-Campaign-Id", "42"),
            ("X-MC-PreserveRecipients", "true"),
            ("Importance", "high"),
        ]);
        assert_eq!(message.headers.len(), 3);
        assert_eq!(message.headers["List-Unsubscribe"], "<mailto:unsub@x.com>");
        assert_eq!(message.headers["X-Campaign-Id"], "42");
        assert_eq!(message.headers["X-MC-PreserveRecipients"], "true");
    }

    #[test]
    fn reply_to_is_canonicalised() {
        let message = apply(&[("reply-to", "r@x.com")]);
        assert_eq!(message.headers["Reply-To"], "r@x.com");
    }

    #[test]
    fn metadata_marker_and_structured_metadata() {
        let mut message = MandrillMessage::default();
        apply_headers(
            &[
                Header::raw("X-MC-Metadata", r#"{"user_id": 42, "plan": "pro"}"#),
                Header::Metadata {
                    key: "plan".into(),
                    value: "team".into(),
                },
            ],
            &mut message,
        );
        assert_eq!(message.metadata["user_id"], "42");
        assert_eq!(message.metadata["plan"], "team");
    }

    #[test]
    fn malformed_metadata_marker_is_dropped() {
        let message = apply(&[("X-MC-Metadata", "not json")]);
        assert!(message.metadata.is_empty());
        assert!(message.headers.is_empty());
    }

    #[test]
    fn important_marker() {
        assert_eq!(apply(&[("X-MC-Important", "yes")]).important, Some(true));
        assert!(apply(&[("X-MC-Important", "very")]).important.is_none());
    }

    #[test]
    fn split_list_drops_blanks() {
        let items: Vec<String> = split_list(" a ,, b ,").collect();
        assert_eq!(items, ["a", "b"]);
    }
}
