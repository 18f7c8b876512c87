//! Errors raised while encoding, parsing or running IMAP commands.

use thiserror::Error;

/// Everything that can go wrong below the account layer.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport under a session failed.
    #[error("IMAP transport failed: {0}")]
    Io(#[from] std::io::Error),

    /// Response data that does not parse.
    #[error("malformed response at byte {position}: {message}")]
    Parse {
        /// Offset into the parsed text.
        position: usize,
        /// What the parser expected.
        message: String,
    },

    /// LOGIN or AUTHENTICATE was refused.
    #[error("IMAP authentication refused: {0}")]
    Auth(String),

    /// Tagged `NO`.
    #[error("command refused (NO): {0}")]
    No(String),

    /// Tagged `BAD`.
    #[error("command rejected (BAD): {0}")]
    Bad(String),

    /// The server hung up with `BYE`.
    #[error("server closed the connection: {0}")]
    Bye(String),

    /// A mailbox name that is not valid modified UTF-7.
    #[error("mailbox name {name:?} is not modified UTF-7: {reason}")]
    Encoding {
        /// The wire name that failed to decode.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Anything else the server sent that makes no sense.
    #[error("unexpected server data: {0}")]
    Protocol(String),
}

impl Error {
    /// Returns the server's response text for NO/BAD/BYE replies.
    ///
    /// Other variants fall back to their display form.
    #[must_use]
    pub fn response_text(&self) -> String {
        match self {
            Self::No(text) | Self::Bad(text) | Self::Bye(text) | Self::Auth(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// `Result` with this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
