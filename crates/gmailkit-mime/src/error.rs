//! Error types for MIME parsing and building.

use std::string::FromUtf8Error;

/// Errors from parsing or decoding a message.
///
/// Header values never fail; only structure and transfer encodings do.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `Content-Type` value without `type/subtype`.
    #[error("Malformed Content-Type: {0:?}")]
    InvalidContentType(String),

    /// A quoted-printable or RFC 2047 payload that does not decode.
    #[error("Bad transfer encoding: {0}")]
    InvalidEncoding(String),

    /// A base64 payload that does not decode.
    #[error("Bad base64 payload: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Decoded text that should be UTF-8 and is not.
    #[error("Payload is not UTF-8: {0}")]
    Utf8Decode(#[from] FromUtf8Error),

    /// Multipart nesting that cannot be split.
    #[error("Bad multipart structure: {0}")]
    InvalidMultipart(String),

    /// Reading or saving an attachment failed.
    #[error("Attachment I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;
