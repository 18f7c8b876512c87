//! Tokenizer for FETCH and LIST response text.
//!
//! Whitespace between tokens is skipped, so parsers only ever see values
//! and parentheses. A `{n}` literal is returned only when its data follows
//! in the same buffer.

use crate::{Error, Result};

/// One token of response text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `(`
    Open,
    /// `)`
    Close,
    /// Bare word such as `FLAGS`, `\Seen` or `INBOX`.
    Atom(&'a str),
    /// All-digit word. 64 bits hold Gmail thread and message ids.
    Number(u64),
    /// Quoted string with escapes resolved.
    Quoted(String),
    /// Literal data following a `{n}` prefix.
    Literal(&'a [u8]),
    /// `NIL`, in any case.
    Nil,
    /// No input left.
    End,
}

/// Cursor over response text.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Starts at the beginning of `input`.
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset of the cursor.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Skips spaces and returns the next byte without consuming it.
    pub fn peek(&mut self) -> Option<u8> {
        while self.input.get(self.pos) == Some(&b' ') {
            self.pos += 1;
        }
        self.input.get(self.pos).copied()
    }

    /// Consumes one raw byte, spaces included.
    pub fn bump(&mut self) -> Option<u8> {
        let byte = self.input.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    /// Reads the next token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] on a malformed string or literal, or a byte
    /// that cannot start a token.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        let Some(byte) = self.peek() else {
            return Ok(Token::End);
        };
        match byte {
            b'(' => {
                self.pos += 1;
                Ok(Token::Open)
            }
            b')' => {
                self.pos += 1;
                Ok(Token::Close)
            }
            b'"' => self.quoted(),
            b'{' => self.literal(),
            _ if is_atom_char(byte) => self.word(),
            _ => Err(self.error(&format!("unexpected byte {byte:#04x}"))),
        }
    }

    fn quoted(&mut self) -> Result<Token<'a>> {
        self.pos += 1;
        let mut text = Vec::new();
        loop {
            match self.bump() {
                Some(b'"') => break,
                Some(b'\\') => match self.bump() {
                    Some(escaped @ (b'"' | b'\\')) => text.push(escaped),
                    _ => return Err(self.error("bad escape in quoted string")),
                },
                Some(byte) => text.push(byte),
                None => return Err(self.error("unterminated quoted string")),
            }
        }
        String::from_utf8(text)
            .map(Token::Quoted)
            .map_err(|_| self.error("quoted string is not UTF-8"))
    }

    fn literal(&mut self) -> Result<Token<'a>> {
        self.pos += 1;
        let start = self.pos;
        while self.input.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        let size: usize = std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| self.error("bad literal size"))?;
        // LITERAL+ marker
        if self.input.get(self.pos) == Some(&b'+') {
            self.pos += 1;
        }
        if !self.input[self.pos..].starts_with(b"}\r\n") {
            return Err(self.error("expected }CRLF after literal size"));
        }
        self.pos += 3;

        let data = self
            .input
            .get(self.pos..self.pos + size)
            .ok_or_else(|| self.error("literal data is incomplete"))?;
        self.pos += size;
        Ok(Token::Literal(data))
    }

    fn word(&mut self) -> Result<Token<'a>> {
        let start = self.pos;
        while self.input.get(self.pos).copied().is_some_and(is_atom_char) {
            self.pos += 1;
        }
        let word = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.error("atom is not UTF-8"))?;

        if word.bytes().all(|b| b.is_ascii_digit()) {
            return word
                .parse()
                .map(Token::Number)
                .map_err(|_| self.error("number out of range"));
        }
        if word.eq_ignore_ascii_case("NIL") {
            return Ok(Token::Nil);
        }
        Ok(Token::Atom(word))
    }

    /// Consumes `(`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the next token is anything else.
    pub fn open(&mut self) -> Result<()> {
        match self.next_token()? {
            Token::Open => Ok(()),
            token => Err(self.error(&format!("expected '(', got {token:?}"))),
        }
    }

    /// Reads a number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the next token is not a number.
    pub fn number(&mut self) -> Result<u64> {
        match self.next_token()? {
            Token::Number(n) => Ok(n),
            token => Err(self.error(&format!("expected number, got {token:?}"))),
        }
    }

    /// Reads an atom, number, quoted string or literal as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for any other token or non-UTF-8 literal.
    pub fn string(&mut self) -> Result<String> {
        match self.next_token()? {
            Token::Atom(word) => Ok(word.to_string()),
            Token::Number(n) => Ok(n.to_string()),
            Token::Quoted(text) => Ok(text),
            Token::Literal(data) => String::from_utf8(data.to_vec())
                .map_err(|_| self.error("literal is not UTF-8")),
            token => Err(self.error(&format!("expected string, got {token:?}"))),
        }
    }

    /// Builds a parse error at the cursor.
    #[must_use]
    pub fn error(&self, message: &str) -> Error {
        Error::Parse {
            position: self.pos,
            message: message.to_string(),
        }
    }
}

/// Bytes that may appear in a bare word.
///
/// `\` is allowed so that flags lex as one atom; `[` and `]` are not, so a
/// body section stays outside its item name.
#[must_use]
pub const fn is_atom_char(b: u8) -> bool {
    b > b' ' && b < 0x7f && !matches!(b, b'(' | b')' | b'{' | b'"' | b'%' | b'*' | b'[' | b']')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        let mut lexer = Lexer::new(input.as_bytes());
        let mut out = Vec::new();
        loop {
            match lexer.next_token().unwrap() {
                Token::End => return out,
                token => out.push(token),
            }
        }
    }

    #[test]
    fn flag_list_skips_spaces() {
        assert_eq!(
            tokens("(\\Seen  \\Flagged $Label1)"),
            [
                Token::Open,
                Token::Atom("\\Seen"),
                Token::Atom("\\Flagged"),
                Token::Atom("$Label1"),
                Token::Close,
            ]
        );
    }

    #[test]
    fn gmail_ids_fit() {
        assert_eq!(
            tokens("X-GM-THRID 1278455344230334865"),
            [Token::Atom("X-GM-THRID"), Token::Number(1_278_455_344_230_334_865)]
        );
    }

    #[test]
    fn quoted_with_escapes_and_nil() {
        assert_eq!(
            tokens("\"say \\\"hi\\\"\" nil"),
            [Token::Quoted("say \"hi\"".to_string()), Token::Nil]
        );
        let mut lexer = Lexer::new(b"\"open");
        assert!(matches!(lexer.next_token(), Err(Error::Parse { .. })));
    }

    #[test]
    fn literal_with_data() {
        assert_eq!(tokens("{5}\r\nhello"), [Token::Literal(b"hello")]);
        assert_eq!(tokens("{2+}\r\nhi"), [Token::Literal(b"hi")]);
    }

    #[test]
    fn literal_without_data_is_an_error() {
        let mut lexer = Lexer::new(b"{1234}\r\nshort");
        assert!(matches!(lexer.next_token(), Err(Error::Parse { .. })));
    }

    #[test]
    fn section_brackets_end_a_word() {
        let mut lexer = Lexer::new(b"BODY[]");
        assert_eq!(lexer.next_token().unwrap(), Token::Atom("BODY"));
        assert_eq!(lexer.peek(), Some(b'['));
    }

    #[test]
    fn atom_chars() {
        assert!(is_atom_char(b'&'));
        assert!(is_atom_char(b'\\'));
        assert!(is_atom_char(b'<'));
        assert!(!is_atom_char(b' '));
        assert!(!is_atom_char(b'"'));
        assert!(!is_atom_char(b']'));
    }
}
