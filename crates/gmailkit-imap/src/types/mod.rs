//! Core IMAP types.
//!
//! Identifiers, flags, Gmail labels, mailbox names and UID sets shared by the
//! search compiler, the command encoder and the response parsers.

#![allow(clippy::missing_const_for_fn)]

mod flags;
mod identifiers;
mod labels;
mod mailbox;
mod sequence;

pub use flags::{Flag, Flags};
pub use identifiers::{GmailMessageId, ThreadId, Uid};
pub use labels::Labels;
pub use mailbox::{ListResponse, MailboxAttribute, MailboxName};
pub use sequence::UidSet;
