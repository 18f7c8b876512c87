//! Mailbox names and LIST data.

use crate::{Result, utf7};

/// A mailbox name in both of its forms.
///
/// The human-readable name and the modified UTF-7 wire name are computed
/// together once, so they always describe the same mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MailboxName {
    name: String,
    wire: String,
}

impl MailboxName {
    /// Creates a mailbox name from its human-readable form.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let wire = utf7::encode(&name);
        Self { name, wire }
    }

    /// Creates a mailbox name from the form the server sent.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Encoding`] if the wire name is not valid
    /// modified UTF-7.
    pub fn from_wire(wire: impl Into<String>) -> Result<Self> {
        let wire = wire.into();
        let name = utf7::decode(&wire)?;
        Ok(Self { name, wire })
    }

    /// Creates a mailbox name from caller input that may be in either form.
    ///
    /// Input that is already canonical modified UTF-7 with at least one
    /// `&` shift is taken as the wire form; anything else is a human name.
    #[must_use]
    pub fn from_user(name: &str) -> Self {
        let decoded = utf7::decode(name)
            .ok()
            .filter(|decoded| name.contains('&') && utf7::encode(decoded) == name);
        match decoded {
            Some(decoded) => Self {
                name: decoded,
                wire: name.to_string(),
            },
            None => Self::new(name),
        }
    }

    /// The INBOX mailbox.
    #[must_use]
    pub fn inbox() -> Self {
        Self::new("INBOX")
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Returns the modified UTF-7 name used on the wire.
    #[must_use]
    pub fn wire(&self) -> &str {
        &self.wire
    }
}

impl std::fmt::Display for MailboxName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// LIST response data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse {
    /// Mailbox attributes.
    pub attributes: Vec<MailboxAttribute>,
    /// Hierarchy delimiter.
    pub delimiter: Option<char>,
    /// Mailbox name exactly as sent by the server.
    pub wire_name: String,
}

impl ListResponse {
    /// Returns true if the mailbox can be selected.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.attributes.contains(&MailboxAttribute::NoSelect)
    }
}

/// A LIST attribute, including the RFC 6154 special-use markers Gmail sends.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MailboxAttribute {
    /// `\Noselect`
    NoSelect,
    /// `\HasNoChildren`
    HasNoChildren,
    /// `\HasChildren`
    HasChildren,
    /// `\All`, marks `[Gmail]/All Mail`.
    All,
    /// `\Drafts`
    Drafts,
    /// `\Flagged`, marks `[Gmail]/Starred`.
    Flagged,
    /// `\Junk`, or Gmail's older `\Spam`.
    Junk,
    /// `\Sent`
    Sent,
    /// `\Trash`
    Trash,
    /// `\Important`
    Important,
    /// Anything else, kept verbatim.
    Unknown(String),
}

const KNOWN_ATTRIBUTES: [(&str, MailboxAttribute); 11] = [
    ("\\Noselect", MailboxAttribute::NoSelect),
    ("\\HasNoChildren", MailboxAttribute::HasNoChildren),
    ("\\HasChildren", MailboxAttribute::HasChildren),
    ("\\All", MailboxAttribute::All),
    ("\\Drafts", MailboxAttribute::Drafts),
    ("\\Flagged", MailboxAttribute::Flagged),
    ("\\Junk", MailboxAttribute::Junk),
    ("\\Spam", MailboxAttribute::Junk),
    ("\\Sent", MailboxAttribute::Sent),
    ("\\Trash", MailboxAttribute::Trash),
    ("\\Important", MailboxAttribute::Important),
];

impl MailboxAttribute {
    /// Parses one attribute; known names match case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        KNOWN_ATTRIBUTES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map_or_else(|| Self::Unknown(s.to_string()), |(_, attr)| attr.clone())
    }
}
