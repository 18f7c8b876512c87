//! The IMAP session capability.
//!
//! The core never touches sockets. A transport implements [`ImapSession`]
//! over whatever connection it owns and reports tagged NO/BAD replies as
//! [`Error::No`](crate::Error::No) / [`Error::Bad`](crate::Error::Bad)
//! carrying the server's text.

use std::future::Future;

use crate::Result;
use crate::command::{FetchItems, StoreAction};
use crate::types::Uid;

/// One FETCH response as received from the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFetch {
    /// Response text up to the first literal, e.g.
    /// `1 (X-GM-THRID 1 UID 7 FLAGS (\Seen) BODY[] {512}`.
    pub header: String,
    /// Literal payload (the message bytes for `BODY[]`), empty if none.
    pub body: Vec<u8>,
}

impl RawFetch {
    /// Creates a raw fetch response.
    #[must_use]
    pub fn new(header: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            header: header.into(),
            body: body.into(),
        }
    }
}

/// An authenticated-or-not IMAP connection to one account.
///
/// Every call completes before the next one is issued. Mailbox arguments are
/// wire (modified UTF-7) names.
pub trait ImapSession: Send {
    /// `LOGIN`.
    fn login(&mut self, username: &str, password: &str)
    -> impl Future<Output = Result<()>> + Send;

    /// `AUTHENTICATE` with an optional initial response.
    fn authenticate(
        &mut self,
        mechanism: &str,
        initial_response: Option<&str>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// `LOGOUT`.
    fn logout(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// `LIST "" "*"`, returning each untagged descriptor
    /// `(<attrs>) "<delim>" <name>`.
    fn list(&mut self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// `SELECT`.
    fn select(&mut self, mailbox: &str) -> impl Future<Output = Result<()>> + Send;

    /// `CREATE`.
    fn create(&mut self, mailbox: &str) -> impl Future<Output = Result<()>> + Send;

    /// `DELETE`.
    fn delete(&mut self, mailbox: &str) -> impl Future<Output = Result<()>> + Send;

    /// `UID SEARCH` with the given tokens.
    fn uid_search(&mut self, criteria: &[String])
    -> impl Future<Output = Result<Vec<Uid>>> + Send;

    /// `UID FETCH` for one message.
    fn uid_fetch(
        &mut self,
        uid: Uid,
        items: &FetchItems,
    ) -> impl Future<Output = Result<Vec<RawFetch>>> + Send;

    /// `UID STORE` for one message.
    fn uid_store(
        &mut self,
        uid: Uid,
        action: &StoreAction,
    ) -> impl Future<Output = Result<()>> + Send;

    /// `UID COPY` of one message to `mailbox`.
    fn uid_copy(&mut self, uid: Uid, mailbox: &str) -> impl Future<Output = Result<()>> + Send;
}
