//! FETCH response metadata parsing.

use tracing::trace;

use super::lexer::{Lexer, Token};
use crate::types::{Flag, Flags, GmailMessageId, Labels, ThreadId, Uid};
use crate::{Error, Result};

/// Metadata carried by a FETCH response.
///
/// Items the server did not send stay at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchMetadata {
    /// `UID`.
    pub uid: Option<Uid>,
    /// `FLAGS`.
    pub flags: Flags,
    /// `X-GM-LABELS`.
    pub labels: Labels,
    /// `X-GM-THRID`.
    pub thread_id: Option<ThreadId>,
    /// `X-GM-MSGID`.
    pub message_id: Option<GmailMessageId>,
}

/// Parses the metadata items of a FETCH response.
///
/// Accepts the text with or without the `* n FETCH` prefix, for example
/// `1 (X-GM-THRID 1 X-GM-LABELS (\Inbox) UID 7 FLAGS (\Seen) BODY[] {512}`.
/// Parsing stops at the first literal, so the header line of a body fetch
/// can be passed as-is. Unknown items are skipped.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the item list is malformed.
pub fn parse_fetch_metadata(text: &str) -> Result<FetchMetadata> {
    let start = text.find('(').ok_or_else(|| Error::Parse {
        position: 0,
        message: "FETCH response has no item list".to_string(),
    })?;

    let mut lexer = Lexer::new(&text.as_bytes()[start..]);
    lexer.open()?;

    let mut meta = FetchMetadata::default();
    while !matches!(lexer.peek(), None | Some(b')' | b'{' | b'\r')) {
        let name = match lexer.next_token()? {
            Token::Atom(name) => name.to_ascii_uppercase(),
            token => return Err(lexer.error(&format!("expected FETCH item, got {token:?}"))),
        };
        skip_section(&mut lexer)?;

        match name.as_str() {
            "FLAGS" => meta.flags = parse_flag_list(&mut lexer)?,
            "X-GM-LABELS" => meta.labels = parse_label_list(&mut lexer)?,
            "X-GM-THRID" => meta.thread_id = Some(ThreadId(lexer.number()?)),
            "X-GM-MSGID" => meta.message_id = Some(GmailMessageId(lexer.number()?)),
            "UID" => {
                let n = lexer.number()?;
                let uid = u32::try_from(n).ok().and_then(Uid::new);
                meta.uid = Some(uid.ok_or_else(|| lexer.error(&format!("invalid UID {n}")))?);
            }
            // the body literal ends the metadata
            _ if lexer.peek() == Some(b'{') => break,
            _ => {
                trace!(item = %name, "skipping FETCH item");
                skip_value(&mut lexer)?;
            }
        }
    }

    Ok(meta)
}

/// Parses a flag list such as `(\Seen \Flagged $Forwarded)`.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the list is malformed.
pub fn parse_flag_list(lexer: &mut Lexer<'_>) -> Result<Flags> {
    lexer.open()?;
    let mut flags = Flags::new();
    loop {
        match lexer.next_token()? {
            Token::Close => return Ok(flags),
            Token::Atom(flag) => {
                flags.insert(Flag::parse(flag));
            }
            token => return Err(lexer.error(&format!("unexpected {token:?} in flag list"))),
        }
    }
}

/// Parses an `X-GM-LABELS` list. Labels may be atoms, numbers or strings.
fn parse_label_list(lexer: &mut Lexer<'_>) -> Result<Labels> {
    lexer.open()?;
    let mut labels = Labels::new();
    while lexer.peek() != Some(b')') {
        labels.insert(lexer.string()?);
    }
    lexer.bump();
    Ok(labels)
}

/// Skips a `[section]` and `<origin>` suffix after an item name.
fn skip_section(lexer: &mut Lexer<'_>) -> Result<()> {
    if lexer.peek() != Some(b'[') {
        return Ok(());
    }
    while let Some(byte) = lexer.bump() {
        if byte == b']' {
            if lexer.peek() == Some(b'<') {
                lexer.next_token()?;
            }
            return Ok(());
        }
    }
    Err(lexer.error("unterminated body section"))
}

/// Skips one value: a word, string, literal, `NIL` or nested list.
fn skip_value(lexer: &mut Lexer<'_>) -> Result<()> {
    let mut depth = 0usize;
    loop {
        match lexer.next_token()? {
            Token::Open => depth += 1,
            Token::Close if depth > 0 => depth -= 1,
            Token::Close | Token::End => {
                return Err(lexer.error("FETCH item has no value"));
            }
            _ => {}
        }
        if depth == 0 {
            return Ok(());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn gmail_body_fetch_header() {
        let text = "1 (X-GM-THRID 1278455344230334865 X-GM-MSGID 1278455344230334866 \
                    X-GM-LABELS (\\Inbox \\Important \"Muy Importante\" work) UID 42 \
                    FLAGS (\\Seen $Forwarded) BODY[] {2048}";
        let meta = parse_fetch_metadata(text).unwrap();

        assert_eq!(meta.uid, Uid::new(42));
        assert_eq!(meta.thread_id, Some(ThreadId(1_278_455_344_230_334_865)));
        assert_eq!(meta.message_id, Some(GmailMessageId(1_278_455_344_230_334_866)));
        assert!(meta.flags.is_seen());
        assert!(meta.flags.contains(&Flag::Keyword("$Forwarded".to_string())));
        assert_eq!(
            meta.labels.iter().collect::<Vec<_>>(),
            ["\\Inbox", "\\Important", "Muy Importante", "work"]
        );
    }

    #[test]
    fn untagged_prefix_and_closing_paren() {
        let meta = parse_fetch_metadata("* 3 FETCH (UID 9 FLAGS ())").unwrap();
        assert_eq!(meta.uid, Uid::new(9));
        assert!(meta.flags.is_empty());
        assert!(meta.labels.is_empty());
        assert_eq!(meta.thread_id, None);
    }

    #[test]
    fn unknown_items_are_skipped() {
        let text = "5 (RFC822.SIZE 4521 INTERNALDATE \"17-Jul-1996 02:44:25 -0700\" \
                    MODSEQ (12345) FLAGS (\\Flagged))";
        let meta = parse_fetch_metadata(text).unwrap();
        assert!(meta.flags.is_flagged());
    }

    #[test]
    fn body_section_with_origin() {
        let meta = parse_fetch_metadata("1 (BODY[HEADER]<0> NIL UID 3)").unwrap();
        assert_eq!(meta.uid, Uid::new(3));
    }

    #[test]
    fn missing_item_list_is_an_error() {
        assert!(matches!(
            parse_fetch_metadata("1 FETCH"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn uid_zero_is_rejected() {
        assert!(parse_fetch_metadata("1 (UID 0)").is_err());
    }
}
