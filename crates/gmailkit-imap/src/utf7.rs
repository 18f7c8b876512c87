//! Modified UTF-7 mailbox name codec (RFC 3501 §5.1.3).
//!
//! Printable US-ASCII passes through unchanged, except `&` which is written
//! as `&-`. Every other run of characters is encoded as UTF-16BE, base64'd
//! with `,` standing in for `/`, stripped of padding and framed by `&` … `-`.
//!
//! ```
//! use gmailkit_imap::utf7;
//!
//! assert_eq!(utf7::encode("Entwürfe"), "Entw&APw-rfe");
//! assert_eq!(utf7::decode("Entw&APw-rfe").unwrap(), "Entwürfe");
//! ```

use base64::Engine;
use base64::alphabet::IMAP_MUTF7;
use base64::engine::GeneralPurpose;
use base64::engine::general_purpose::NO_PAD;

use crate::{Error, Result};

/// Base64 with `,` in place of `/` and no padding.
const MODIFIED_BASE64: GeneralPurpose = GeneralPurpose::new(&IMAP_MUTF7, NO_PAD);

const fn is_direct(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{7e}')
}

/// Encodes a mailbox name into its modified UTF-7 wire form.
///
/// Total over all Unicode input.
#[must_use]
pub fn encode(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending: Vec<u16> = Vec::new();

    for c in name.chars() {
        if is_direct(c) {
            flush_shifted(&mut out, &mut pending);
            if c == '&' {
                out.push_str("&-");
            } else {
                out.push(c);
            }
        } else {
            let mut units = [0u16; 2];
            pending.extend_from_slice(c.encode_utf16(&mut units));
        }
    }
    flush_shifted(&mut out, &mut pending);

    out
}

fn flush_shifted(out: &mut String, pending: &mut Vec<u16>) {
    if pending.is_empty() {
        return;
    }
    let bytes: Vec<u8> = pending.iter().flat_map(|u| u.to_be_bytes()).collect();
    out.push('&');
    out.push_str(&MODIFIED_BASE64.encode(bytes));
    out.push('-');
    pending.clear();
}

/// Decodes a modified UTF-7 wire name into Unicode.
///
/// # Errors
///
/// Returns [`Error::Encoding`] when the input contains raw non-ASCII, an
/// unterminated shift sequence, invalid modified base64, or invalid UTF-16.
pub fn decode(wire: &str) -> Result<String> {
    let malformed = |reason: &str| Error::Encoding {
        name: wire.to_string(),
        reason: reason.to_string(),
    };

    let mut out = String::with_capacity(wire.len());
    let mut rest = wire;

    while let Some(c) = rest.chars().next() {
        if !is_direct(c) {
            return Err(malformed("raw non-ASCII character"));
        }
        if c != '&' {
            out.push(c);
            rest = &rest[c.len_utf8()..];
            continue;
        }

        let shifted = &rest[1..];
        let end = shifted
            .find('-')
            .ok_or_else(|| malformed("unterminated shift sequence"))?;
        let run = &shifted[..end];
        rest = &shifted[end + 1..];

        if run.is_empty() {
            out.push('&');
            continue;
        }

        let bytes = MODIFIED_BASE64
            .decode(run)
            .map_err(|e| malformed(&format!("invalid modified base64: {e}")))?;
        if bytes.len() % 2 != 0 {
            return Err(malformed("odd number of bytes in UTF-16 run"));
        }
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        let text = String::from_utf16(&units).map_err(|_| malformed("invalid UTF-16"))?;
        out.push_str(&text);
    }

    Ok(out)
}
