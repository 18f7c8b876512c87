//! # gmailkit-mime
//!
//! MIME parsing of fetched messages and rendering of outgoing ones.
//!
//! ## Features
//!
//! - **Message parsing**: recursive multipart split with a nesting limit
//! - **Structured view**: [`ParsedMessage`] pulls out addresses, subject,
//!   text and HTML bodies, date and attachments
//! - **Message generation**: [`OutgoingMessage`] renders plain, HTML and
//!   attachment-carrying messages
//! - **Encoding/Decoding**: Base64, Quoted-Printable, RFC 2047 header words
//!
//! ## Quick Start
//!
//! ### Parsing a fetched message
//!
//! ```
//! use gmailkit_mime::ParsedMessage;
//!
//! let raw = b"From: sender@example.com\r\n\
//!             Subject: =?utf-8?Q?caf=C3=A9?=\r\n\
//!             \r\n\
//!             Hello, World!";
//!
//! let parsed = ParsedMessage::parse(raw)?;
//! assert_eq!(parsed.subject.as_deref(), Some("café"));
//! assert_eq!(parsed.body.as_deref(), Some("Hello, World!"));
//! # Ok::<(), gmailkit_mime::Error>(())
//! ```
//!
//! ### Building a message
//!
//! ```
//! use gmailkit_mime::{Attachment, ContentType, OutgoingMessage};
//!
//! let message = OutgoingMessage::new("Quarterly report")
//!     .to("bob@example.com")
//!     .sender("alice@example.com")
//!     .html("<p>Numbers attached.</p>")
//!     .attach(Attachment::new("q3.csv", ContentType::new("text", "csv"), b"a,b\n1,2\n".to_vec()));
//!
//! let bytes = message.to_bytes();
//! assert!(bytes.starts_with(b"Content-Type: multipart/mixed"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod attachment;
mod content_type;
mod error;
mod header;
mod message;
mod outgoing;
mod parsed;

pub mod encoding;

pub use attachment::Attachment;
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{MAX_NESTING_DEPTH, Message, TransferEncoding};
pub use outgoing::OutgoingMessage;
pub use parsed::{ParsedMessage, parse_date};
