//! # gmailkit-imap
//!
//! The IMAP vocabulary used to drive a Gmail account: identifiers, flags,
//! labels, mailbox names, the search compiler, command encoding, and parsers
//! for the FETCH and LIST responses the core consumes.
//!
//! ## Features
//!
//! - **Gmail extensions**: `X-GM-LABELS`, `X-GM-THRID`, `X-GM-MSGID` and
//!   `X-GM-RAW` in fetches, stores and searches
//! - **Modified UTF-7**: mailbox names travel in their RFC 3501 wire form
//! - **Typed search**: [`SearchQuery`] compiles to a deterministic
//!   `UID SEARCH` token list
//! - **Transport agnostic**: [`ImapSession`] is the only seam to the network
//!
//! ## Quick Start
//!
//! ```
//! use gmailkit_imap::{Command, SearchQuery};
//! use chrono::NaiveDate;
//!
//! let query = SearchQuery::new()
//!     .unread()
//!     .label("receipts")
//!     .after(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
//!
//! let cmd = Command::UidSearch { criteria: query.compile() };
//! assert_eq!(
//!     cmd.serialize("A1"),
//!     b"A1 UID SEARCH ALL UNSEEN X-GM-LABELS receipts SINCE 01-Jan-2024\r\n"
//! );
//! ```
//!
//! ## Implementing a session
//!
//! ```ignore
//! use gmailkit_imap::{ImapSession, Uid, FetchItems, StoreAction, RawFetch, Result};
//!
//! struct TlsSession { /* framed connection */ }
//!
//! impl ImapSession for TlsSession {
//!     async fn select(&mut self, mailbox: &str) -> Result<()> {
//!         self.run(Command::Select { mailbox: mailbox.to_string() }).await
//!     }
//!     // ...
//! }
//! ```
//!
//! ## Modules
//!
//! - [`command`]: IMAP command builders, search queries
//! - [`parser`]: FETCH metadata and LIST descriptor parsers
//! - [`sasl`]: XOAUTH2 initial response
//! - [`types`]: Core IMAP types (flags, labels, mailbox names, UIDs)
//! - [`utf7`]: Modified UTF-7 mailbox name codec

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
mod error;
pub mod parser;
pub mod sasl;
mod session;
pub mod types;
pub mod utf7;

pub use command::{Command, FetchAttribute, FetchItems, SearchDate, SearchQuery, StoreAction};
pub use error::{Error, Result};
pub use parser::{FetchMetadata, parse_fetch_metadata, parse_list_descriptor};
pub use session::{ImapSession, RawFetch};
pub use types::{
    Flag, Flags, GmailMessageId, Labels, ListResponse, MailboxAttribute, MailboxName, ThreadId,
    Uid, UidSet,
};
