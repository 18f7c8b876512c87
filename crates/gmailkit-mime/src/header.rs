//! MIME header handling.

use crate::encoding::decode_rfc2047;
use std::fmt;

/// Collection of email headers.
///
/// Order is preserved and lookups are case-insensitive. Names keep the case
/// they were added with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Replaces every value of `name` with `value`, keeping the position
    /// of the first occurrence. Appends if the header is absent.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let mut value = Some(value.into());
        self.entries.retain_mut(|(n, v)| {
            if !n.eq_ignore_ascii_case(&name) {
                return true;
            }
            match value.take() {
                Some(first) => {
                    *v = first;
                    true
                }
                None => false,
            }
        });
        if let Some(value) = value {
            self.entries.push((name, value));
        }
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Gets the first value for a header with RFC 2047 encoded words decoded.
    ///
    /// Malformed encoded words are left as they are.
    #[must_use]
    pub fn get_decoded(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(|v| decode_rfc2047(v).unwrap_or_else(|_| v.to_string()))
    }

    /// Gets all values for a header.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Checks whether a header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes all values for a header.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// Returns an iterator over all headers in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of header lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses the header block at the start of `text`.
    ///
    /// Stops at the first empty line. Folded lines are joined to the
    /// previous value with one space; lines without a colon are dropped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut headers = Self::new();

        for line in text.lines().take_while(|line| !line.is_empty()) {
            if line.starts_with([' ', '\t']) {
                if let Some((_, value)) = headers.entries.last_mut() {
                    value.push(' ');
                    value.push_str(line.trim());
                }
            } else if let Some((name, value)) = line.split_once(':') {
                headers.add(name.trim(), value.trim());
            } else {
                // Continuations of a dropped line must not attach elsewhere.
                headers.entries.push((String::new(), String::new()));
            }
        }

        headers.entries.retain(|(name, _)| !name.is_empty());
        headers
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Writes each header as `Name: value` followed by CRLF.
impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gmail_headers() -> Headers {
        Headers::parse(concat!(
            "Delivered-To: me@gmail.com\r\n",
            "X-Gm-Message-State: AOJu0Yw\r\n",
            "Received: by 2002:a05 with SMTP id x1;\r\n",
            "        Mon, 15 Jan 2024 09:30:00 -0800 (PST)\r\n",
            "Received: from mail.example.org\r\n",
            "Subject: =?UTF-8?Q?Caf=C3=A9_menu?=\r\n",
            "\r\n",
            "X-Not-A-Header: body text\r\n",
        ))
    }

    #[test]
    fn lookup_ignores_case() {
        let headers = gmail_headers();
        assert_eq!(headers.get("delivered-to"), Some("me@gmail.com"));
        assert!(headers.contains("X-GM-MESSAGE-STATE"));
        assert!(!headers.contains("X-Not-A-Header"));
    }

    #[test]
    fn folded_lines_join_previous_value() {
        let headers = gmail_headers();
        assert_eq!(
            headers.get_all("Received"),
            vec![
                "by 2002:a05 with SMTP id x1; Mon, 15 Jan 2024 09:30:00 -0800 (PST)",
                "from mail.example.org",
            ]
        );
        assert_eq!(headers.len(), 5);
    }

    #[test]
    fn lines_without_colon_are_dropped_with_their_folds() {
        let headers = Headers::parse("From a mailer\n  still junk\nX-Ok: 1\n");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-ok"), Some("1"));
    }

    #[test]
    fn set_collapses_duplicates_at_first_position() {
        let mut headers = gmail_headers();
        headers.set("received", "from relay");
        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec!["Delivered-To", "X-Gm-Message-State", "Received", "Subject"]
        );
        assert_eq!(headers.get_all("Received"), vec!["from relay"]);

        headers.set("Reply-To", "list@example.org");
        assert_eq!(headers.iter().last(), Some(("Reply-To", "list@example.org")));
    }

    #[test]
    fn remove_drops_every_value() {
        let mut headers = gmail_headers();
        headers.remove("RECEIVED");
        assert!(headers.get_all("Received").is_empty());
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn decoded_subject() {
        let headers = gmail_headers();
        assert_eq!(headers.get_decoded("subject").as_deref(), Some("Café menu"));
        assert_eq!(headers.get_decoded("Cc"), None);
    }

    #[test]
    fn display_writes_crlf_lines_in_order() {
        let mut headers = Headers::new();
        headers.add("Bcc", "hidden@example.com");
        headers.add("X-Mailer", "gmailkit");
        assert_eq!(
            headers.to_string(),
            "Bcc: hidden@example.com\r\nX-Mailer: gmailkit\r\n"
        );
    }
}
