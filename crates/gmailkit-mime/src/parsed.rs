//! Structured view of a received message.

use chrono::{DateTime, Local};

use crate::attachment::Attachment;
use crate::error::Result;
use crate::header::Headers;
use crate::message::Message;

/// The fields a mail client shows for a received message.
///
/// Built from a parsed [`Message`]. Body parts that fail to decode are
/// decoded lossily instead of failing the whole message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMessage {
    /// Top-level headers in order.
    pub headers: Headers,
    /// `To` header, raw.
    pub to: Option<String>,
    /// `From` header, raw.
    pub from: Option<String>,
    /// `Cc` header, raw.
    pub cc: Option<String>,
    /// `Delivered-To` header, raw.
    pub delivered_to: Option<String>,
    /// `Subject` with RFC 2047 words decoded.
    pub subject: Option<String>,
    /// First `text/plain` body.
    pub body: Option<String>,
    /// First `text/html` body.
    pub html: Option<String>,
    /// `Date` header in local time.
    pub sent_at: Option<DateTime<Local>>,
    /// `Message-ID` header.
    pub message_id: Option<String>,
    /// Top-level parts carrying a `Content-Disposition`.
    pub attachments: Vec<Attachment>,
}

impl ParsedMessage {
    /// Parses raw message bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the MIME structure is unusable.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        Ok(Self::from_message(&Message::parse(raw)?))
    }

    /// Extracts the structured fields from a parsed message.
    #[must_use]
    pub fn from_message(message: &Message) -> Self {
        let headers = &message.headers;
        let header = |name: &str| headers.get(name).map(str::to_string);

        let (body, html) = if message.is_multipart() {
            let first_text = |sub: &str| {
                message
                    .walk()
                    .find(|part| !part.is_multipart() && is_text(part, sub))
                    .map(lossy_text)
            };
            (first_text("plain"), first_text("html"))
        } else if message.effective_content_type().is_text() {
            let text = lossy_text(message);
            let html = is_text(message, "html").then(|| text.clone());
            (Some(text), html)
        } else {
            (None, None)
        };

        let attachments = message
            .parts
            .iter()
            .filter(|part| part.headers.contains("content-disposition"))
            .map(Attachment::from_part)
            .collect();

        Self {
            headers: headers.clone(),
            to: header("to"),
            from: header("from"),
            cc: header("cc"),
            delivered_to: header("delivered-to"),
            subject: headers.get_decoded("subject"),
            body,
            html,
            sent_at: headers.get("date").and_then(parse_date),
            message_id: header("message-id"),
            attachments,
        }
    }
}

fn is_text(part: &Message, sub: &str) -> bool {
    part.effective_content_type().is("text", sub)
}

fn lossy_text(part: &Message) -> String {
    part.body_text()
        .unwrap_or_else(|_| String::from_utf8_lossy(&part.body).into_owned())
}

/// Parses an RFC 2822 date, tolerating a trailing `(comment)` such as
/// `(UTC)`.
#[must_use]
pub fn parse_date(value: &str) -> Option<DateTime<Local>> {
    let value = value.trim();
    let value = match value.rfind('(') {
        Some(i) if value.ends_with(')') => value[..i].trim_end(),
        _ => value,
    };
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Local))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_plain_message() {
        let raw = b"To: me@example.com\r\n\
From: Alice <alice@example.com>\r\n\
Delivered-To: me@example.com\r\n\
Subject: =?utf-8?B?SMOpbGxv?=\r\n\
Date: Tue, 02 Jan 2024 10:30:00 +0000\r\n\
Message-ID: <abc@example.com>\r\n\
\r\n\
Plain body\r\n";
        let parsed = ParsedMessage::parse(raw).unwrap();

        assert_eq!(parsed.to.as_deref(), Some("me@example.com"));
        assert_eq!(parsed.from.as_deref(), Some("Alice <alice@example.com>"));
        assert_eq!(parsed.delivered_to.as_deref(), Some("me@example.com"));
        assert_eq!(parsed.cc, None);
        assert_eq!(parsed.subject.as_deref(), Some("Héllo"));
        assert_eq!(parsed.body.as_deref(), Some("Plain body\r\n"));
        assert_eq!(parsed.html, None);
        assert_eq!(parsed.message_id.as_deref(), Some("<abc@example.com>"));
        assert_eq!(
            parsed.sent_at.unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap()
        );
        assert!(parsed.attachments.is_empty());
    }

    #[test]
    fn test_top_level_html_is_body_and_html() {
        let parsed =
            ParsedMessage::parse(b"Content-Type: text/html\r\n\r\n<b>hi</b>").unwrap();
        assert_eq!(parsed.body.as_deref(), Some("<b>hi</b>"));
        assert_eq!(parsed.html.as_deref(), Some("<b>hi</b>"));
    }

    #[test]
    fn test_multipart_picks_first_text_parts_and_attachments() {
        let raw = b"Content-Type: multipart/mixed; boundary=XX\r\n\
\r\n\
--XX\r\n\
Content-Type: multipart/alternative; boundary=YY\r\n\
\r\n\
--YY\r\n\
Content-Type: text/plain\r\n\
\r\n\
first plain\r\n\
--YY\r\n\
Content-Type: text/html\r\n\
\r\n\
<p>first html</p>\r\n\
--YY--\r\n\
--XX\r\n\
Content-Type: text/plain\r\n\
Content-Disposition: attachment; filename=notes.txt\r\n\
\r\n\
attached text\r\n\
--XX--\r\n";
        let parsed = ParsedMessage::parse(raw).unwrap();

        assert_eq!(parsed.body.as_deref(), Some("first plain"));
        assert_eq!(parsed.html.as_deref(), Some("<p>first html</p>"));
        assert_eq!(parsed.attachments.len(), 1);
        assert_eq!(parsed.attachments[0].filename(), "notes.txt");
        assert_eq!(parsed.attachments[0].data(), b"attached text");
    }

    #[test]
    fn test_non_text_single_part_has_no_body() {
        let parsed =
            ParsedMessage::parse(b"Content-Type: application/pdf\r\n\r\n%PDF").unwrap();
        assert_eq!(parsed.body, None);
    }

    #[test]
    fn test_parse_date_with_comment() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
        assert_eq!(
            parse_date("Tue, 5 Mar 2024 08:00:00 +0000 (UTC)").unwrap(),
            expected
        );
        assert_eq!(parse_date("not a date"), None);
    }
}
