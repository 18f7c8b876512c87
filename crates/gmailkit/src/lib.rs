//! # gmailkit
//!
//! Structured access to a Gmail account over IMAP and SMTP.
//!
//! This crate provides:
//! - [`Gmail`], the account façade: login, mailbox list, search, sending
//! - [`MessageHandle`], the message state machine: fetch, flags, labels,
//!   Gmail's delete/move/archive semantics
//! - [`Config`] with the Gmail server defaults
//!
//! Transports are not part of this crate. The application implements
//! [`ImapSession`] and [`SmtpSession`] on top of its connection of choice.
//!
//! ```ignore
//! use gmailkit::{Gmail, SearchQuery};
//!
//! let mut gmail = Gmail::new(imap, smtp);
//! gmail.login("me@gmail.com", "app password", false).await?;
//!
//! let uids = gmail.search("INBOX", &SearchQuery::new().unread()).await?;
//! for uid in uids {
//!     let mut message = gmail.message_mut("INBOX", uid)?;
//!     message.fetch().await?;
//!     println!("{}", *message);
//!     message.read().await?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod gmail;
pub mod message;
pub mod registry;
mod session;
mod smtp;

pub use config::{
    Config, ConfigBuilder, GMAIL_IMAP_HOST, GMAIL_IMAP_PORT, GMAIL_SMTP_HOST, GMAIL_SMTP_PORT,
    Security, ServerConfig,
};
pub use error::{Error, Result};
pub use gmail::Gmail;
pub use message::{Message, MessageHandle};
pub use registry::{Mailbox, MailboxRegistry};
pub use session::Session;
pub use smtp::{NoSmtp, SmtpError, SmtpSession};

pub use gmailkit_imap::{
    Flag, Flags, GmailMessageId, ImapSession, Labels, MailboxName, RawFetch, SearchQuery,
    ThreadId, Uid,
};
pub use gmailkit_mime::{Attachment, OutgoingMessage, ParsedMessage};
