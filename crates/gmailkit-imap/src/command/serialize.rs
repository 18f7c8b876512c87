//! Command serialization helpers.

use super::types::{FetchAttribute, FetchItems, StoreAction};

/// Writes an astring (atom or quoted string).
pub fn write_astring(buf: &mut Vec<u8>, s: &str) {
    if s.is_empty() || s.bytes().any(needs_quoting) {
        write_quoted(buf, s);
    } else {
        buf.extend_from_slice(s.as_bytes());
    }
}

/// Writes a quoted string, escaping `"` and `\`.
pub fn write_quoted(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for b in s.bytes() {
        if b == b'"' || b == b'\\' {
            buf.push(b'\\');
        }
        buf.push(b);
    }
    buf.push(b'"');
}

/// Writes one SEARCH token.
///
/// Sequence-set tokens (`1:*`, `4,7:9`) go out raw; everything else is an
/// astring.
pub fn write_search_token(buf: &mut Vec<u8>, token: &str) {
    if !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b':' | b',' | b'*'))
    {
        buf.extend_from_slice(token.as_bytes());
    } else {
        write_astring(buf, token);
    }
}

/// Returns true if the byte cannot appear in an atom.
///
/// `]` is a resp-special; `[` is quoted with it so bracketed Gmail names
/// always go out quoted.
const fn needs_quoting(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*' | b'[' | b']'
    ) || b < 0x20
        || b >= 0x7F
}

/// Writes FETCH items; a single item goes out without parentheses.
pub fn write_fetch_items(buf: &mut Vec<u8>, items: &FetchItems) {
    if let [attr] = items.0.as_slice() {
        write_fetch_attribute(buf, attr);
        return;
    }
    buf.push(b'(');
    for (i, attr) in items.0.iter().enumerate() {
        if i > 0 {
            buf.push(b' ');
        }
        write_fetch_attribute(buf, attr);
    }
    buf.push(b')');
}

/// Writes a single FETCH attribute.
pub fn write_fetch_attribute(buf: &mut Vec<u8>, attr: &FetchAttribute) {
    match attr {
        FetchAttribute::Flags => buf.extend_from_slice(b"FLAGS"),
        FetchAttribute::Uid => buf.extend_from_slice(b"UID"),
        FetchAttribute::GmailThreadId => buf.extend_from_slice(b"X-GM-THRID"),
        FetchAttribute::GmailMessageId => buf.extend_from_slice(b"X-GM-MSGID"),
        FetchAttribute::GmailLabels => buf.extend_from_slice(b"X-GM-LABELS"),
        FetchAttribute::Body { section, peek } => {
            if *peek {
                buf.extend_from_slice(b"BODY.PEEK[");
            } else {
                buf.extend_from_slice(b"BODY[");
            }
            if let Some(s) = section {
                buf.extend_from_slice(s.as_bytes());
            }
            buf.push(b']');
        }
    }
}

/// Writes STORE action.
pub fn write_store_action(buf: &mut Vec<u8>, action: &StoreAction) {
    match action {
        StoreAction::AddFlags(flags) | StoreAction::RemoveFlags(flags) => {
            let prefix: &[u8] = if matches!(action, StoreAction::AddFlags(_)) {
                b"+FLAGS ("
            } else {
                b"-FLAGS ("
            };
            buf.extend_from_slice(prefix);
            for (i, flag) in flags.iter().enumerate() {
                if i > 0 {
                    buf.push(b' ');
                }
                buf.extend_from_slice(flag.as_str().as_bytes());
            }
            buf.push(b')');
        }
        StoreAction::AddLabels(labels) | StoreAction::RemoveLabels(labels) => {
            let prefix: &[u8] = if matches!(action, StoreAction::AddLabels(_)) {
                b"+X-GM-LABELS ("
            } else {
                b"-X-GM-LABELS ("
            };
            buf.extend_from_slice(prefix);
            for (i, label) in labels.iter().enumerate() {
                if i > 0 {
                    buf.push(b' ');
                }
                write_quoted(buf, label);
            }
            buf.push(b')');
        }
    }
}
