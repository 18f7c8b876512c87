//! MIME message structure and parsing.

use crate::content_type::{ContentType, split_parameters, unquote};
use crate::encoding::{
    decode_base64, decode_charset, decode_quoted_printable_bytes, decode_rfc2047,
};
use crate::error::{Error, Result};
use crate::header::Headers;
use std::fmt;

/// Deepest multipart nesting accepted by [`Message::parse`].
pub const MAX_NESTING_DEPTH: usize = 32;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit text.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string. Unknown values are 7bit.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit,
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// A MIME entity: headers plus either a body or child parts.
///
/// For multipart entities `body` is empty and `parts` holds the children in
/// order. Nested multiparts are nested `Message`s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Entity headers.
    pub headers: Headers,
    /// Raw (still transfer-encoded) body of a leaf entity.
    pub body: Vec<u8>,
    /// Child entities of a multipart.
    pub parts: Vec<Message>,
}

impl Message {
    /// Creates a leaf entity.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self {
            headers,
            body,
            parts: Vec::new(),
        }
    }

    /// Parses a raw RFC 822 message.
    ///
    /// A multipart without a usable boundary is kept as a single leaf.
    ///
    /// # Errors
    ///
    /// Returns an error if multiparts nest deeper than
    /// [`MAX_NESTING_DEPTH`].
    pub fn parse(raw: &[u8]) -> Result<Self> {
        Self::parse_at_depth(raw, 0)
    }

    fn parse_at_depth(raw: &[u8], depth: usize) -> Result<Self> {
        if depth > MAX_NESTING_DEPTH {
            return Err(Error::InvalidMultipart(format!(
                "nesting deeper than {MAX_NESTING_DEPTH} levels"
            )));
        }

        let (head, body) = split_head_body(raw);
        let headers = Headers::parse(&String::from_utf8_lossy(head));
        let mut message = Self::new(headers, body.to_vec());

        let boundary = message
            .content_type()
            .filter(ContentType::is_multipart)
            .and_then(|ct| ct.boundary().map(str::to_string));

        if let Some(boundary) = boundary {
            let sections = split_multipart(body, boundary.as_bytes());
            if !sections.is_empty() {
                message.parts = sections
                    .into_iter()
                    .map(|section| Self::parse_at_depth(section, depth + 1))
                    .collect::<Result<_>>()?;
                message.body.clear();
            }
        }

        Ok(message)
    }

    /// Gets the content type, if the header is present and valid.
    #[must_use]
    pub fn content_type(&self) -> Option<ContentType> {
        self.headers
            .get("content-type")
            .and_then(|v| ContentType::parse(v).ok())
    }

    /// Gets the content type, defaulting to `text/plain` per RFC 2045.
    #[must_use]
    pub fn effective_content_type(&self) -> ContentType {
        self.content_type()
            .unwrap_or_else(|| ContentType::new("text", "plain"))
    }

    /// Checks if this entity has child parts.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Decodes the body according to the transfer encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid in its declared encoding.
    pub fn decode_body(&self) -> Result<Vec<u8>> {
        match self.transfer_encoding() {
            TransferEncoding::Base64 => decode_base64(&String::from_utf8_lossy(&self.body)),
            TransferEncoding::QuotedPrintable => {
                decode_quoted_printable_bytes(&String::from_utf8_lossy(&self.body))
            }
            _ => Ok(self.body.clone()),
        }
    }

    /// Gets the decoded body as text in its declared charset.
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer encoding cannot be undone.
    pub fn body_text(&self) -> Result<String> {
        let bytes = self.decode_body()?;
        let charset = self.content_type();
        Ok(decode_charset(
            &bytes,
            charset.as_ref().and_then(ContentType::charset),
        ))
    }

    /// The disposition type (`attachment`, `inline`), lowercased.
    #[must_use]
    pub fn content_disposition(&self) -> Option<String> {
        let value = self.headers.get("content-disposition")?;
        let kind = split_parameters(value).first()?.to_ascii_lowercase();
        (!kind.is_empty()).then_some(kind)
    }

    /// The filename from `Content-Disposition`, falling back to the
    /// `Content-Type` `name` parameter. RFC 2047 words are decoded.
    #[must_use]
    pub fn filename(&self) -> Option<String> {
        let from_disposition = self.headers.get("content-disposition").and_then(|v| {
            split_parameters(v).into_iter().skip(1).find_map(|param| {
                let (key, value) = param.split_once('=')?;
                key.trim()
                    .eq_ignore_ascii_case("filename")
                    .then(|| unquote(value.trim()))
            })
        });

        let raw = from_disposition.or_else(|| {
            self.content_type()
                .and_then(|ct| ct.parameters.get("name").cloned())
        })?;

        Some(decode_rfc2047(&raw).unwrap_or(raw))
    }

    /// Iterates over this entity and all descendants, depth first.
    pub fn walk(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.parts.iter().rev());
            Some(next)
        })
    }

    /// Gets the Subject header, decoded.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        self.headers.get_decoded("subject")
    }

    /// Gets the From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.headers.get("from")
    }

    /// Gets the To header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.headers.get("to")
    }

    /// Gets the Date header.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.headers.get("date")
    }

    /// Gets the Message-ID header.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.headers.get("message-id")
    }
}

/// Splits raw bytes at the first empty line. Without one, everything is
/// header.
fn split_head_body(raw: &[u8]) -> (&[u8], &[u8]) {
    if raw.starts_with(b"\r\n") {
        return (&[], &raw[2..]);
    }
    if raw.starts_with(b"\n") {
        return (&[], &raw[1..]);
    }

    let crlf = find(raw, b"\r\n\r\n").map(|i| (i, 4));
    let lf = find(raw, b"\n\n").map(|i| (i, 2));
    let split = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };

    match split {
        Some((i, len)) => (&raw[..i], &raw[i + len..]),
        None => (raw, &[]),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits a multipart body into its sections.
///
/// The preamble before the first delimiter and the epilogue after the close
/// delimiter are dropped. A body that never closes ends at end of input.
fn split_multipart<'a>(body: &'a [u8], boundary: &[u8]) -> Vec<&'a [u8]> {
    let mut sections = Vec::new();
    let mut current: Option<usize> = None;
    let mut offset = 0;

    while offset < body.len() {
        let line_end = body[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(body.len(), |i| offset + i + 1);
        let line = &body[offset..line_end];

        if let Some(closing) = delimiter_kind(line, boundary) {
            if let Some(start) = current.take() {
                sections.push(trim_trailing_newline(&body[start..offset]));
            }
            if closing {
                return sections;
            }
            current = Some(line_end);
        }

        offset = line_end;
    }

    if let Some(start) = current {
        sections.push(&body[start..]);
    }
    sections
}

/// `Some(false)` for `--boundary`, `Some(true)` for `--boundary--`.
fn delimiter_kind(line: &[u8], boundary: &[u8]) -> Option<bool> {
    let rest = line.strip_prefix(b"--")?.strip_prefix(boundary)?;
    let (closing, rest) = match rest.strip_prefix(b"--") {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    rest.iter()
        .all(u8::is_ascii_whitespace)
        .then_some(closing)
}

/// The CRLF before a delimiter belongs to the delimiter.
fn trim_trailing_newline(section: &[u8]) -> &[u8] {
    section
        .strip_suffix(b"\r\n")
        .or_else(|| section.strip_suffix(b"\n"))
        .unwrap_or(section)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MULTIPART: &[u8] = b"From: a@example.com\r\n\
Subject: =?utf-8?Q?caf=C3=A9?=\r\n\
Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
\r\n\
preamble to ignore\r\n\
--outer\r\n\
Content-Type: multipart/alternative; boundary=inner\r\n\
\r\n\
--inner\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
Content-Transfer-Encoding: quoted-printable\r\n\
\r\n\
H=C3=A9llo\r\n\
--inner\r\n\
Content-Type: text/html\r\n\
\r\n\
<p>Hello</p>\r\n\
--inner--\r\n\
--outer\r\n\
Content-Type: application/pdf; name=\"fallback.pdf\"\r\n\
Content-Disposition: attachment; filename=\"report.pdf\"\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
JVBERi0x\r\n\
--outer--\r\n\
epilogue\r\n";

    #[test]
    fn test_transfer_encoding_parse() {
        assert_eq!(TransferEncoding::parse("7bit"), TransferEncoding::SevenBit);
        assert_eq!(TransferEncoding::parse(" BASE64 "), TransferEncoding::Base64);
        assert_eq!(
            TransferEncoding::parse("quoted-printable"),
            TransferEncoding::QuotedPrintable
        );
        assert_eq!(TransferEncoding::parse("x-unknown"), TransferEncoding::SevenBit);
    }

    #[test]
    fn test_single_part() {
        let message = Message::parse(b"Subject: Hi\nFrom: a@b.c\n\nHello, World!").unwrap();
        assert!(!message.is_multipart());
        assert_eq!(message.subject().as_deref(), Some("Hi"));
        assert_eq!(message.from(), Some("a@b.c"));
        assert_eq!(message.body_text().unwrap(), "Hello, World!");
        assert_eq!(message.effective_content_type().essence(), "text/plain");
    }

    #[test]
    fn test_nested_multipart() {
        let message = Message::parse(MULTIPART).unwrap();
        assert_eq!(message.subject().as_deref(), Some("café"));
        assert_eq!(message.parts.len(), 2);

        let alternative = &message.parts[0];
        assert_eq!(alternative.parts.len(), 2);
        assert_eq!(alternative.parts[0].body_text().unwrap(), "Héllo");
        assert_eq!(alternative.parts[1].body_text().unwrap(), "<p>Hello</p>");

        let attachment = &message.parts[1];
        assert_eq!(attachment.content_disposition().as_deref(), Some("attachment"));
        assert_eq!(attachment.filename().as_deref(), Some("report.pdf"));
        assert_eq!(attachment.decode_body().unwrap(), b"%PDF-1");
    }

    #[test]
    fn test_walk_is_depth_first() {
        let message = Message::parse(MULTIPART).unwrap();
        let types: Vec<String> = message
            .walk()
            .map(|m| m.effective_content_type().essence())
            .collect();
        assert_eq!(
            types,
            vec![
                "multipart/mixed",
                "multipart/alternative",
                "text/plain",
                "text/html",
                "application/pdf",
            ]
        );
    }

    #[test]
    fn test_filename_falls_back_to_name() {
        let message = Message::parse(
            b"Content-Type: image/png; name=\"=?utf-8?B?w6kucG5n?=\"\r\n\r\nxx",
        )
        .unwrap();
        assert_eq!(message.filename().as_deref(), Some("é.png"));
        assert_eq!(message.content_disposition(), None);
    }

    #[test]
    fn test_missing_boundary_is_single_leaf() {
        let message = Message::parse(b"Content-Type: multipart/mixed\r\n\r\nbody").unwrap();
        assert!(!message.is_multipart());
        assert_eq!(message.body, b"body");
    }

    #[test]
    fn test_unterminated_multipart_runs_to_end() {
        let raw = b"Content-Type: multipart/mixed; boundary=b\n\n--b\n\nfirst\n--b\n\nsecond";
        let message = Message::parse(raw).unwrap();
        assert_eq!(message.parts.len(), 2);
        assert_eq!(message.parts[0].body, b"first");
        assert_eq!(message.parts[1].body, b"second");
    }

    #[test]
    fn test_boundary_prefix_is_not_a_delimiter() {
        let raw = b"Content-Type: multipart/mixed; boundary=b\n\n--b\n\n--bb is text\n--b--\n";
        let message = Message::parse(raw).unwrap();
        assert_eq!(message.parts.len(), 1);
        assert_eq!(message.parts[0].body, b"--bb is text");
    }

    #[test]
    fn test_nesting_limit() {
        let mut raw = Vec::new();
        for i in 0..=MAX_NESTING_DEPTH + 1 {
            raw.extend_from_slice(
                format!("Content-Type: multipart/mixed; boundary=b{i}\r\n\r\n--b{i}\r\n").as_bytes(),
            );
        }
        raw.extend_from_slice(b"\r\nleaf\r\n");
        assert!(matches!(
            Message::parse(&raw),
            Err(Error::InvalidMultipart(_))
        ));
    }

    #[test]
    fn test_latin1_body() {
        let mut raw = b"Content-Type: text/plain; charset=iso-8859-1\r\n\r\ncaf".to_vec();
        raw.push(0xE9);
        let message = Message::parse(&raw).unwrap();
        assert_eq!(message.body_text().unwrap(), "café");
    }
}
