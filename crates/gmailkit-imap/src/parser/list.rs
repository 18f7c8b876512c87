//! LIST response parsing.

use super::lexer::{Lexer, Token};
use crate::types::{ListResponse, MailboxAttribute};
use crate::{Error, Result};

/// Parses a LIST descriptor: `(<attrs>) "<delim>" <name>`.
///
/// A leading `* LIST ` is accepted and ignored. The mailbox name is returned
/// exactly as sent, i.e. in its modified UTF-7 wire form.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the descriptor is malformed.
pub fn parse_list_descriptor(text: &str) -> Result<ListResponse> {
    let trimmed = text.trim_end_matches(['\r', '\n']);
    let start = trimmed.find('(').ok_or_else(|| Error::Parse {
        position: 0,
        message: "LIST response has no attribute list".to_string(),
    })?;

    let mut lexer = Lexer::new(&trimmed.as_bytes()[start..]);
    lexer.open()?;

    let mut attributes = Vec::new();
    loop {
        match lexer.next_token()? {
            Token::Close => break,
            Token::Atom(attr) => attributes.push(MailboxAttribute::parse(attr)),
            token => {
                return Err(lexer.error(&format!("unexpected {token:?} in LIST attributes")));
            }
        }
    }

    let delimiter = match lexer.next_token()? {
        Token::Nil => None,
        Token::Quoted(delim) => delim.chars().next(),
        token => return Err(lexer.error(&format!("expected delimiter, got {token:?}"))),
    };
    let wire_name = lexer.string()?;

    Ok(ListResponse {
        attributes,
        delimiter,
        wire_name,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn quoted_gmail_name() {
        let list = parse_list_descriptor("(\\HasNoChildren \\All) \"/\" \"[Gmail]/All Mail\"")
            .unwrap();
        assert_eq!(list.wire_name, "[Gmail]/All Mail");
        assert_eq!(list.delimiter, Some('/'));
        assert_eq!(
            list.attributes,
            [MailboxAttribute::HasNoChildren, MailboxAttribute::All]
        );
    }

    #[test]
    fn atom_name_with_untagged_prefix() {
        let list = parse_list_descriptor("* LIST (\\HasNoChildren) \"/\" INBOX\r\n").unwrap();
        assert_eq!(list.wire_name, "INBOX");
        assert!(list.is_selectable());
    }

    #[test]
    fn encoded_name_stays_encoded() {
        let list = parse_list_descriptor("(\\HasNoChildren) \"/\" \"Entw&APw-rfe\"").unwrap();
        assert_eq!(list.wire_name, "Entw&APw-rfe");
    }

    #[test]
    fn nil_delimiter() {
        let list = parse_list_descriptor("(\\Noselect) NIL \"[Gmail]\"").unwrap();
        assert_eq!(list.delimiter, None);
        assert!(!list.is_selectable());
    }

    #[test]
    fn malformed() {
        assert!(parse_list_descriptor("\"/\" INBOX").is_err());
        assert!(parse_list_descriptor("(\\HasNoChildren)").is_err());
    }
}
