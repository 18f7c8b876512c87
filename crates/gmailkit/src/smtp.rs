//! SMTP seam for sending mail.
//!
//! Like IMAP, the transport lives outside this crate: an application plugs
//! in an [`SmtpSession`] that owns the connection, STARTTLS and AUTH.

use std::future::Future;

/// Failures reported by an [`SmtpSession`].
#[derive(Debug, thiserror::Error)]
pub enum SmtpError {
    /// There is no usable submission connection.
    #[error("SMTP unavailable: {0}")]
    Connection(String),

    /// `AUTH` was refused; carries the server reply.
    #[error("SMTP authentication refused: {0}")]
    Authentication(String),

    /// The mail transaction was refused; carries the server reply.
    #[error("SMTP transaction refused: {0}")]
    Send(String),

    /// The server rejected a `MAIL FROM` or `RCPT TO` address.
    #[error("SMTP rejected address {0}")]
    InvalidAddress(String),
}

/// An SMTP submission connection.
pub trait SmtpSession: Send {
    /// Authenticates with username and password.
    fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), SmtpError>> + Send;

    /// Runs one mail transaction: `MAIL FROM`, one `RCPT TO` per recipient,
    /// then `DATA` with the message bytes.
    fn send_mail(
        &mut self,
        from: &str,
        recipients: &[&str],
        message: &[u8],
    ) -> impl Future<Output = Result<(), SmtpError>> + Send;
}

/// Stand-in for accounts that only read mail.
///
/// Every call fails with [`SmtpError::Connection`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoSmtp;

impl SmtpSession for NoSmtp {
    async fn login(&mut self, _username: &str, _password: &str) -> Result<(), SmtpError> {
        Err(SmtpError::Connection("no SMTP session configured".into()))
    }

    async fn send_mail(
        &mut self,
        _from: &str,
        _recipients: &[&str],
        _message: &[u8],
    ) -> Result<(), SmtpError> {
        Err(SmtpError::Connection("no SMTP session configured".into()))
    }
}
