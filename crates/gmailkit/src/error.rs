//! Error types for the core library.

use gmailkit_imap::Uid;
use thiserror::Error;

use crate::smtp::SmtpError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Login or XOAUTH2 authentication was refused.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// `UID SEARCH` was not answered with OK.
    #[error("Search failed: {response}")]
    SearchFailed {
        /// Server response text.
        response: String,
    },

    /// `UID STORE` or `UID COPY` was not answered with OK.
    #[error("{operation} failed: {response}")]
    MutationFailed {
        /// The command as sent, without tag.
        operation: String,
        /// Server response text.
        response: String,
    },

    /// A mailbox name from the server is not valid modified UTF-7.
    #[error("Invalid mailbox name: {0}")]
    Encoding(String),

    /// A mailbox operation was attempted before logging in.
    #[error("You must log in first")]
    UnauthorizedOperation,

    /// No mailbox with this name is known.
    #[error("Mailbox not found: {0}")]
    MailboxNotFound(String),

    /// The message is not cached in its mailbox or the server returned
    /// nothing for it.
    #[error("Message not found: UID {0}")]
    MessageNotFound(Uid),

    /// Any other IMAP failure (SELECT, CREATE, FETCH, parsing).
    #[error("IMAP error: {0}")]
    Imap(#[from] gmailkit_imap::Error),

    /// MIME parsing failed.
    #[error("MIME error: {0}")]
    Mime(#[from] gmailkit_mime::Error),

    /// Sending failed.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_failed_display() {
        let err = Error::MutationFailed {
            operation: "UID COPY 7 \"[Gmail]/Trash\"".to_string(),
            response: "[TRYCREATE] Unknown Mailbox".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "UID COPY 7 \"[Gmail]/Trash\" failed: [TRYCREATE] Unknown Mailbox"
        );
    }

    #[test]
    fn test_message_not_found_display() {
        let err = Error::MessageNotFound(Uid::new(42).unwrap());
        assert_eq!(err.to_string(), "Message not found: UID 42");
    }
}
