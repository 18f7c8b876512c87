//! Message identifiers.
//!
//! Types for UIDs and Gmail's thread/message identifiers.

use std::num::NonZeroU32;
use std::str::FromStr;

/// Unique identifier for a message.
///
/// UIDs are scoped to a mailbox: copying a message elsewhere gives the copy a
/// new UID in the target mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uid(pub NonZeroU32);

impl Uid {
    /// Creates a new UID.
    ///
    /// Returns `None` if the value is 0.
    #[must_use]
    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Self)
    }

    /// Returns the underlying value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Uid {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| crate::Error::Protocol(format!("Invalid UID: {s:?}")))
    }
}

/// Gmail thread identifier (`X-GM-THRID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(pub u64);

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gmail message identifier (`X-GM-MSGID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GmailMessageId(pub u64);

impl std::fmt::Display for GmailMessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::unreadable_literal)]
mod tests {
    use super::*;

    #[test]
    fn uid_rejects_zero() {
        assert!(Uid::new(0).is_none());
        assert_eq!(Uid::new(42).unwrap().get(), 42);
    }

    #[test]
    fn uid_from_str() {
        assert_eq!("17".parse::<Uid>().unwrap().get(), 17);
        assert!("0".parse::<Uid>().is_err());
        assert!("abc".parse::<Uid>().is_err());
    }

    #[test]
    fn uid_ordering() {
        assert!(Uid::new(1).unwrap() < Uid::new(2).unwrap());
    }

    #[test]
    fn gmail_ids_display() {
        assert_eq!(ThreadId(1278455344230334865).to_string(), "1278455344230334865");
        assert_eq!(GmailMessageId(7).to_string(), "7");
    }
}
