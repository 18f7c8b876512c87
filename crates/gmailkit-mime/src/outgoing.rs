//! Composing messages to send.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, Local};

use crate::attachment::Attachment;
use crate::content_type::ContentType;
use crate::encoding::{encode_base64_wrapped, encode_quoted_printable, encode_rfc2047};
use crate::header::Headers;

/// A message to send.
///
/// Renders as a single `text/plain` entity when it is plain text without
/// attachments, and as `multipart/mixed` otherwise. HTML text is wrapped in a
/// `multipart/alternative` part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Subject line.
    pub subject: String,
    /// Recipient addresses.
    pub to: Vec<String>,
    /// CC addresses.
    pub cc: Vec<String>,
    /// BCC addresses. Never written to the headers.
    pub bcc: Vec<String>,
    /// Body text.
    pub text: String,
    /// Whether `text` is HTML.
    pub is_html: bool,
    /// Attached files.
    pub attachments: Vec<Attachment>,
    /// `From` header.
    pub sender: Option<String>,
    /// `Reply-To` header. Defaults to the sender.
    pub reply_to: Option<String>,
    /// `Date` header. Generated when rendering if unset.
    pub date: Option<DateTime<FixedOffset>>,
    /// `Message-ID` header. Generated when rendering if unset.
    pub message_id: Option<String>,
}

impl OutgoingMessage {
    /// Creates a message with a subject and nothing else.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Adds a recipient.
    #[must_use]
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.to.push(recipient.into());
        self
    }

    /// Adds a CC recipient.
    #[must_use]
    pub fn cc(mut self, recipient: impl Into<String>) -> Self {
        self.cc.push(recipient.into());
        self
    }

    /// Adds a BCC recipient.
    #[must_use]
    pub fn bcc(mut self, recipient: impl Into<String>) -> Self {
        self.bcc.push(recipient.into());
        self
    }

    /// Sets plain text content.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self.is_html = false;
        self
    }

    /// Sets HTML content.
    #[must_use]
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.text = html.into();
        self.is_html = true;
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Sets the `From` header.
    #[must_use]
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Sets the `Reply-To` header.
    #[must_use]
    pub fn reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// Sets the `Date` header.
    #[must_use]
    pub fn date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the `Message-ID` header.
    #[must_use]
    pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Envelope recipients: To, then Bcc, then Cc.
    #[must_use]
    pub fn recipients(&self) -> Vec<&str> {
        self.to
            .iter()
            .chain(&self.bcc)
            .chain(&self.cc)
            .map(String::as_str)
            .collect()
    }

    /// Renders the RFC 5322 message with CRLF line endings.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut headers = Headers::new();
        let body = if !self.is_html && self.attachments.is_empty() {
            let (part_headers, body) = text_entity(&self.text, "plain");
            for (name, value) in &part_headers {
                headers.add(name, value);
            }
            headers.add("MIME-Version", "1.0");
            body
        } else {
            let boundary = new_boundary();
            headers.add("Content-Type", ContentType::multipart_mixed(&boundary).to_string());
            headers.add("MIME-Version", "1.0");
            self.render_mixed(&boundary)
        };

        if !self.to.is_empty() {
            headers.add("To", self.to.join(", "));
        }
        if !self.cc.is_empty() {
            headers.add("Cc", self.cc.join(", "));
        }
        if let Some(sender) = &self.sender {
            headers.add("From", sender.as_str());
        }
        if let Some(reply_to) = self.reply_to.as_ref().or(self.sender.as_ref()) {
            headers.add("Reply-To", reply_to.as_str());
        }

        let date = self
            .date
            .unwrap_or_else(|| Local::now().fixed_offset());
        headers.add("Date", date.to_rfc2822());
        headers.add(
            "Message-ID",
            self.message_id
                .clone()
                .unwrap_or_else(|| new_message_id(self.sender.as_deref())),
        );
        headers.add("Subject", encode_rfc2047(&self.subject, "utf-8"));

        let mut out = headers.to_string().into_bytes();
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(body.as_bytes());
        out
    }

    fn render_mixed(&self, boundary: &str) -> String {
        let mut body = String::new();

        let _ = write!(body, "--{boundary}\r\n");
        if self.is_html {
            let inner = new_boundary();
            let (html_headers, html) = text_entity(&self.text, "html");
            let _ = write!(
                body,
                "Content-Type: {}\r\nMIME-Version: 1.0\r\n\r\n--{inner}\r\n{html_headers}\r\n{html}\r\n--{inner}--\r\n",
                ContentType::multipart_alternative(&inner),
            );
        } else {
            let (text_headers, text) = text_entity(&self.text, "plain");
            let _ = write!(body, "{text_headers}\r\n{text}\r\n");
        }

        for attachment in &self.attachments {
            let _ = write!(
                body,
                "--{boundary}\r\n{}\r\n{}\r\n",
                attachment_headers(attachment),
                encode_base64_wrapped(attachment.data())
            );
        }

        let _ = write!(body, "--{boundary}--\r\n");
        body
    }
}

/// Headers and encoded body for a text entity. ASCII goes out as 7bit,
/// anything else as quoted-printable UTF-8.
fn text_entity(text: &str, sub_type: &str) -> (Headers, String) {
    let mut headers = Headers::new();
    let (charset, encoding, body) = if text.is_ascii() {
        ("us-ascii", "7bit", normalize_newlines(text))
    } else {
        ("utf-8", "quoted-printable", encode_quoted_printable(text))
    };

    headers.add(
        "Content-Type",
        ContentType::new("text", sub_type)
            .with_parameter("charset", charset)
            .to_string(),
    );
    headers.add("Content-Transfer-Encoding", encoding);
    (headers, body)
}

fn attachment_headers(attachment: &Attachment) -> Headers {
    let filename = encode_rfc2047(attachment.filename(), "utf-8");
    let mut headers = Headers::new();
    headers.add("Content-Type", attachment.content_type().essence());
    headers.add("MIME-Version", "1.0");
    headers.add("Content-Transfer-Encoding", "base64");
    headers.add(
        "Content-Disposition",
        format!("attachment; filename=\"{}\"", filename.replace('"', "\\\"")),
    );
    headers
}

fn normalize_newlines(text: &str) -> String {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\r\n")
}

fn new_boundary() -> String {
    format!("==============={:020}==", rand::random::<u64>())
}

fn new_message_id(sender: Option<&str>) -> String {
    let domain = sender
        .and_then(|s| s.rsplit_once('@'))
        .map(|(_, d)| d.trim_end_matches('>').trim())
        .filter(|d| !d.is_empty())
        .unwrap_or("localhost");
    format!(
        "<{}.{:016x}@{domain}>",
        Local::now().timestamp_micros(),
        rand::random::<u64>()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::parsed::ParsedMessage;

    fn rendered(message: &OutgoingMessage) -> (String, Message) {
        let bytes = message.to_bytes();
        let text = String::from_utf8(bytes.clone()).unwrap();
        (text, Message::parse(&bytes).unwrap())
    }

    #[test]
    fn test_plain_text_single_part() {
        let message = OutgoingMessage::new("Hello")
            .to("bob@example.com")
            .to("carol@example.com")
            .sender("alice@example.com")
            .text("line one\nline two");

        let (text, parsed) = rendered(&message);
        assert!(!parsed.is_multipart());
        assert_eq!(parsed.headers.get("To"), Some("bob@example.com, carol@example.com"));
        assert_eq!(parsed.headers.get("Reply-To"), Some("alice@example.com"));
        assert_eq!(
            parsed.effective_content_type().to_string(),
            "text/plain; charset=us-ascii"
        );
        assert_eq!(parsed.body_text().unwrap(), "line one\r\nline two");
        assert!(text.starts_with("Content-Type: text/plain"));
        assert!(parsed.headers.contains("Date"));
        assert!(parsed.message_id().unwrap().ends_with("@example.com>"));
    }

    #[test]
    fn test_explicit_reply_to_wins() {
        let message = OutgoingMessage::new("x")
            .sender("alice@example.com")
            .reply_to("noreply@example.com");
        let (_, parsed) = rendered(&message);
        assert_eq!(parsed.headers.get_all("Reply-To"), vec!["noreply@example.com"]);
    }

    #[test]
    fn test_no_sender_no_from_or_reply_to() {
        let (_, parsed) = rendered(&OutgoingMessage::new("x").to("a@b.c"));
        assert!(!parsed.headers.contains("From"));
        assert!(!parsed.headers.contains("Reply-To"));
    }

    #[test]
    fn test_bcc_is_envelope_only() {
        let message = OutgoingMessage::new("x")
            .to("to@example.com")
            .cc("cc@example.com")
            .bcc("hidden@example.com");

        assert_eq!(
            message.recipients(),
            vec!["to@example.com", "hidden@example.com", "cc@example.com"]
        );
        let (text, _) = rendered(&message);
        assert!(!text.contains("hidden@example.com"));
    }

    #[test]
    fn test_unicode_subject_and_body() {
        let message = OutgoingMessage::new("Café ☕").text("Grüße");
        let parsed = ParsedMessage::parse(&message.to_bytes()).unwrap();
        assert_eq!(parsed.subject.as_deref(), Some("Café ☕"));
        assert_eq!(parsed.body.as_deref(), Some("Grüße"));
    }

    #[test]
    fn test_html_goes_into_alternative() {
        let message = OutgoingMessage::new("x").html("<h1>Hi</h1>");
        let (_, parsed) = rendered(&message);

        assert!(parsed.effective_content_type().is("multipart", "mixed"));
        assert_eq!(parsed.parts.len(), 1);
        let alternative = &parsed.parts[0];
        assert!(alternative.effective_content_type().is("multipart", "alternative"));
        assert_eq!(alternative.parts.len(), 1);
        assert_eq!(alternative.parts[0].body_text().unwrap(), "<h1>Hi</h1>");
    }

    #[test]
    fn test_plain_with_attachment() {
        let data: Vec<u8> = (0..=255).collect();
        let message = OutgoingMessage::new("report")
            .text("see attached")
            .attach(Attachment::new(
                "data.bin",
                ContentType::octet_stream(),
                data.clone(),
            ));

        let parsed = ParsedMessage::parse(&message.to_bytes()).unwrap();
        assert_eq!(parsed.body.as_deref(), Some("see attached"));
        assert_eq!(parsed.attachments.len(), 1);
        assert_eq!(parsed.attachments[0].filename(), "data.bin");
        assert_eq!(
            parsed.attachments[0].content_type().essence(),
            "application/octet-stream"
        );
        assert_eq!(parsed.attachments[0].data(), data.as_slice());
    }

    #[test]
    fn test_fixed_date_and_message_id() {
        let date = DateTime::parse_from_rfc2822("Tue, 02 Jan 2024 10:30:00 +0000").unwrap();
        let message = OutgoingMessage::new("x")
            .date(date)
            .message_id("<fixed@example.com>");
        let (_, parsed) = rendered(&message);
        assert_eq!(parsed.date(), Some("Tue, 2 Jan 2024 10:30:00 +0000"));
        assert_eq!(parsed.message_id(), Some("<fixed@example.com>"));
    }
}
