//! IMAP response text parsers.
//!
//! Session implementations hand the core the text of FETCH and LIST
//! responses; these parsers turn it into structured data.
//!
//! # Example
//!
//! ```
//! use gmailkit_imap::parser::parse_list_descriptor;
//!
//! let list = parse_list_descriptor(r#"(\HasNoChildren \Trash) "/" "[Gmail]/Trash""#).unwrap();
//! assert_eq!(list.wire_name, "[Gmail]/Trash");
//! ```

pub mod lexer;

mod fetch;
mod list;

pub use fetch::{FetchMetadata, parse_fetch_metadata, parse_flag_list};
pub use lexer::{Lexer, Token, is_atom_char};
pub use list::parse_list_descriptor;
